// SPDX-License-Identifier: MIT

//! Spendbook: a personal expense-tracking web application.
//!
//! Users register, log in, record daily expenses, and view aggregate
//! spending against their savings goals. Server-rendered pages, form
//! input, SQLite storage.

pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod validation;
pub mod views;

use config::Config;
use db::Store;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Store,
}
