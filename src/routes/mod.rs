// SPDX-License-Identifier: MIT

//! HTTP route handlers.

pub mod auth;
pub mod expenses;
pub mod pages;
pub mod profile;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::middleware::require_auth;
use crate::models::User;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Health check response
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes (no session required; the index adapts to login state)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/", get(pages::home))
        .route("/index", get(pages::index))
        .merge(auth::routes());

    // Protected routes (session required)
    let protected_routes = Router::new()
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(pages::dashboard))
        .route("/settings", get(profile::settings))
        .route(
            "/userdetails",
            get(profile::userdetails_form).post(profile::userdetails_submit),
        )
        .route(
            "/edit_details",
            get(profile::edit_details_form).post(profile::edit_details_submit),
        )
        .route("/add_expense", post(expenses::add_expense))
        .route("/delete_expense/{id}", get(expenses::delete_expense))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Load the authenticated user's record.
///
/// A valid session for a row that no longer exists is treated as not
/// logged in.
pub(crate) async fn load_user(state: &AppState, auth: AuthUser) -> Result<User> {
    state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}
