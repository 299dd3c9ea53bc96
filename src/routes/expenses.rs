// SPDX-License-Identifier: MIT

//! Add and delete expense handlers.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::flash::{flash_redirect, Level};
use crate::middleware::auth::AuthUser;
use crate::AppState;

#[derive(Deserialize)]
pub struct AddExpenseForm {
    #[serde(default)]
    expense_name: String,
    #[serde(default)]
    expense_amount: String,
}

/// Record an expense dated today.
pub async fn add_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
    Form(form): Form<AddExpenseForm>,
) -> Result<Response> {
    let name = form.expense_name.trim();
    let amount_raw = form.expense_amount.trim();

    if name.is_empty() || amount_raw.is_empty() {
        return Ok(flash_redirect(
            jar,
            Level::Danger,
            "Expense name and amount are required.",
            "/index",
        )
        .into_response());
    }

    let Ok(amount) = amount_raw.parse::<f64>() else {
        return Ok(flash_redirect(
            jar,
            Level::Danger,
            "Invalid amount. Please enter a number.",
            "/index",
        )
        .into_response());
    };

    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();

    match state.db.add_expense(user.user_id, name, amount, &today).await {
        Ok(expense) => {
            tracing::debug!(user_id = user.user_id, expense_id = expense.id, "Expense added");
            Ok(flash_redirect(jar, Level::Success, "Expense added successfully!", "/index")
                .into_response())
        }
        Err(AppError::InvalidAmount) => Ok(flash_redirect(
            jar,
            Level::Danger,
            "Amount must be positive.",
            "/index",
        )
        .into_response()),
        Err(e) => Err(e),
    }
}

/// Delete an expense; only its owner may do so.
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
    Path(expense_id): Path<i64>,
) -> Result<Response> {
    match state.db.delete_expense(expense_id, user.user_id).await {
        Ok(()) => Ok(flash_redirect(
            jar,
            Level::Success,
            "Expense deleted successfully!",
            "/index",
        )
        .into_response()),
        Err(AppError::Unauthorized) => {
            tracing::warn!(
                user_id = user.user_id,
                expense_id,
                "Attempt to delete someone else's expense"
            );
            Ok(flash_redirect(
                jar,
                Level::Danger,
                "You are not authorized to delete this expense.",
                "/index",
            )
            .into_response())
        }
        Err(AppError::NotFound(_)) => Ok(flash_redirect(
            jar,
            Level::Danger,
            "Expense not found.",
            "/index",
        )
        .into_response()),
        Err(e) => Err(e),
    }
}
