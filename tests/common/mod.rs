// SPDX-License-Identifier: MIT

//! Shared helpers for integration tests: an app over an in-memory
//! store, plus form/cookie plumbing.

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use spendbook::config::Config;
use spendbook::db::Store;
use spendbook::routes::create_router;
use spendbook::AppState;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app over an in-memory SQLite store.
/// Returns the router and the shared state.
pub async fn create_test_app() -> (Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = Store::in_memory().await.expect("in-memory store");

    let state = Arc::new(AppState { config, db });
    (create_router(state.clone()), state)
}

/// Encode form fields as an `application/x-www-form-urlencoded` body.
pub fn form_body(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// GET a path, optionally with a session cookie.
pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// POST a form body, optionally with a session cookie.
pub async fn post_form(
    app: &Router,
    uri: &str,
    body: String,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// The `Location` header of a redirect response.
#[allow(dead_code)]
pub fn location_of(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect should carry a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// The session cookie set by a response, as a `name=value` pair.
#[allow(dead_code)]
pub fn session_cookie_from(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("spendbook_session=") && !v.starts_with("spendbook_session=;"))
        .map(|v| v.split(';').next().unwrap().to_string())
}

/// The flash cookie value set by a response (`level:encoded-message`).
#[allow(dead_code)]
pub fn flash_cookie_from(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("spendbook_flash=") && !v.starts_with("spendbook_flash=;"))
        .map(|v| {
            // `Set-Cookie` carries the value percent-encoded once more by
            // the cookie jar; undo that layer to get `level:encoded-message`.
            let raw = v
                .split(';')
                .next()
                .unwrap()
                .trim_start_matches("spendbook_flash=");
            urlencoding::decode(raw).unwrap().into_owned()
        })
}

/// Sign up a user and return their session cookie.
#[allow(dead_code)]
pub async fn signup(app: &Router, username: &str, email: &str, password: &str) -> String {
    let body = form_body(&[
        ("username", username),
        ("email", email),
        ("password", password),
    ]);
    let response = post_form(app, "/signup", body, None).await;
    session_cookie_from(&response).expect("signup should establish a session")
}

/// Collect a response body as a string.
#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
