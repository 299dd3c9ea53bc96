// SPDX-License-Identifier: MIT

//! Session authentication middleware.
//!
//! The session is a signed JWT carried in a cookie. Protected routes go
//! through [`require_auth`], which resolves the current user and stashes
//! an [`AuthUser`] extension; anonymous callers are bounced to the login
//! page with the originally requested path preserved in `?next=`.

use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "spendbook_session";

/// Session token claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from the session cookie.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Middleware that requires an authenticated session.
///
/// On success the request gains an [`AuthUser`] extension; otherwise the
/// caller is redirected to `/login?next=<requested path>`.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(user_id) = session_user(&jar, &state.config.session_signing_key) else {
        let wanted = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/index");
        let login = format!("/login?next={}", urlencoding::encode(wanted));
        return Redirect::to(&login).into_response();
    };

    request.extensions_mut().insert(AuthUser { user_id });
    next.run(request).await
}

/// Resolve the session cookie to a user id, if present and valid.
///
/// Used directly by pages that are public but adapt to login state.
pub fn session_user(jar: &CookieJar, signing_key: &[u8]) -> Option<i64> {
    let token = jar.get(SESSION_COOKIE)?.value();

    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Claims>(token, &key, &validation).ok()?;

    token_data.claims.sub.parse().ok()
}

/// Create a session token for a user.
pub fn create_session_token(user_id: i64, signing_key: &[u8]) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + 30 * 24 * 60 * 60, // 30 days
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Build the session cookie wrapping a token.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(axum_extra::extract::cookie::SameSite::Lax)
        .build()
}

/// Build the removal cookie that terminates a session.
pub fn clear_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    cookie
}
