// SPDX-License-Identifier: MIT

//! Login, signup, and logout handlers.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::flash::{flash_redirect, take_flash, Level};
use crate::middleware::auth::{
    clear_session_cookie, create_session_token, session_cookie, session_user,
};
use crate::validation::{validate_email, validate_password, validate_username};
use crate::views;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login_form).post(login_submit))
        .route("/signup", get(signup_form).post(signup_submit))
}

/// Post-login destination preserved across the login redirect.
#[derive(Deserialize)]
pub struct NextParams {
    #[serde(default)]
    next: Option<String>,
}

impl NextParams {
    /// The destination, if it is a same-site path.
    fn safe_next(&self) -> Option<&str> {
        self.next
            .as_deref()
            .filter(|n| n.starts_with('/') && !n.starts_with("//"))
    }
}

async fn login_form(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NextParams>,
    jar: CookieJar,
) -> Response {
    if session_user(&jar, &state.config.session_signing_key).is_some() {
        return Redirect::to("/index").into_response();
    }
    let (jar, flash) = take_flash(jar);
    (jar, views::login_page(flash.as_ref(), params.safe_next())).into_response()
}

#[derive(Deserialize)]
pub struct LoginForm {
    username_or_email: String,
    password: String,
}

async fn login_submit(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NextParams>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let identifier = form.username_or_email.trim();

    let user = state.db.find_user_by_identifier(identifier).await?;

    // One generic failure message: never reveal which field was wrong.
    let verified = user
        .as_ref()
        .map(|u| bcrypt::verify(&form.password, &u.password_hash).unwrap_or(false))
        .unwrap_or(false);

    let Some(user) = user.filter(|_| verified) else {
        tracing::info!("Failed login attempt");
        let back = match params.safe_next() {
            Some(next) => format!("/login?next={}", urlencoding::encode(next)),
            None => "/login".to_string(),
        };
        return Ok(flash_redirect(
            jar,
            Level::Danger,
            "Login Failed. Please check your username/email and password.",
            &back,
        )
        .into_response());
    };

    let token = create_session_token(user.id, &state.config.session_signing_key)?;
    let jar = jar.add(session_cookie(token));

    tracing::info!(user_id = user.id, "User logged in");

    let destination = params.safe_next().unwrap_or("/index").to_string();
    Ok(flash_redirect(
        jar,
        Level::Success,
        &format!("Welcome back, {}!", user.username),
        &destination,
    )
    .into_response())
}

async fn signup_form(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if session_user(&jar, &state.config.session_signing_key).is_some() {
        return Redirect::to("/index").into_response();
    }
    let (jar, flash) = take_flash(jar);
    (jar, views::signup_page(flash.as_ref())).into_response()
}

#[derive(Deserialize)]
pub struct SignupForm {
    username: String,
    email: String,
    password: String,
}

async fn signup_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let username = form.username.trim();
    let email = form.email.trim();

    if let Err(reason) = validate_username(username)
        .and_then(|_| validate_password(&form.password))
        .and_then(|_| validate_email(email))
    {
        return Ok(flash_redirect(jar, Level::Danger, &reason.0, "/signup").into_response());
    }

    let password_hash = bcrypt::hash(&form.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))?;

    let user = match state.db.create_user(username, email, &password_hash).await {
        Ok(user) => user,
        Err(AppError::DuplicateIdentity) => {
            return Ok(flash_redirect(
                jar,
                Level::Warning,
                "Username or email already exists. Please choose another.",
                "/signup",
            )
            .into_response());
        }
        Err(e) => return Err(e),
    };

    tracing::info!(user_id = user.id, "New user registered");

    // Log the user in immediately after signup.
    let token = create_session_token(user.id, &state.config.session_signing_key)?;
    let jar = jar.add(session_cookie(token));

    Ok(flash_redirect(
        jar,
        Level::Success,
        "Your account has been created! Please fill in your details to get started.",
        "/userdetails",
    )
    .into_response())
}

/// Terminate the session.
pub async fn logout(jar: CookieJar) -> Response {
    let jar = jar.remove(clear_session_cookie());
    flash_redirect(jar, Level::Info, "You have been logged out.", "/index").into_response()
}
