// SPDX-License-Identifier: MIT

//! Read-only pages: landing, index, dashboard.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::error::Result;
use crate::flash::take_flash;
use crate::middleware::auth::{session_user, AuthUser};
use crate::views::{self, DashboardView, IndexView};
use crate::AppState;

/// Root URL directs to the index.
pub async fn home() -> Redirect {
    Redirect::to("/index")
}

/// Landing page: today's expenses and totals when logged in, otherwise
/// an empty view inviting the visitor to sign up.
pub async fn index(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<Response> {
    let today = chrono::Local::now().date_naive();
    let today_iso = today.format("%Y-%m-%d").to_string();
    let today_display = today.format("%A, %B %d, %Y").to_string();

    // Public page: resolve the session opportunistically. A stale cookie
    // for a deleted user renders the anonymous view.
    let user = match session_user(&jar, &state.config.session_signing_key) {
        Some(user_id) => state.db.get_user(user_id).await?,
        None => None,
    };

    let view = match user {
        Some(user) => IndexView {
            authenticated: true,
            today_display,
            expenses: state.db.expenses_for_date(user.id, &today_iso).await?,
            total_amount: state.db.total_all_time(user.id).await?,
            total_today: state.db.total_for_date(user.id, &today_iso).await?,
            savings_goal: user.savings_goal,
        },
        None => IndexView::anonymous(today_display),
    };

    let (jar, flash) = take_flash(jar);
    Ok((jar, views::index_page(&view, flash.as_ref())).into_response())
}

/// Aggregate spending breakdown and savings figures.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    jar: CookieJar,
) -> Result<Response> {
    let user = super::load_user(&state, auth).await?;

    let grouped = state.db.grouped_by_name(user.id).await?;

    let month = chrono::Local::now().date_naive().format("%Y-%m").to_string();
    let month_spent = state.db.total_for_month(user.id, &month).await?;

    let view = DashboardView::build(grouped, month_spent, user.income_value());

    let (jar, flash) = take_flash(jar);
    Ok((jar, views::dashboard_page(&view, flash.as_ref())).into_response())
}
