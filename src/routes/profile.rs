// SPDX-License-Identifier: MIT

//! Profile collection and editing.
//!
//! Both forms run the full validation table as one pass: the first
//! failing rule aborts with its reason and nothing is persisted.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::Result;
use crate::flash::{flash_redirect, take_flash, Level};
use crate::middleware::auth::AuthUser;
use crate::validation::{validate_profile, ProfileInput};
use crate::views;
use crate::AppState;

/// Profile fields as submitted. Missing fields come through empty.
#[derive(Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    dob: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    occupation: String,
    #[serde(default)]
    income: String,
    #[serde(default)]
    monthly_expenses: String,
    #[serde(default)]
    savings_goal: String,
    #[serde(default)]
    currency: String,
    #[serde(default)]
    financial_goal: String,
}

impl ProfileForm {
    fn trimmed(&self) -> ProfileInput {
        ProfileInput {
            full_name: self.full_name.trim().to_string(),
            dob: self.dob.trim().to_string(),
            phone: self.phone.trim().to_string(),
            occupation: self.occupation.trim().to_string(),
            income: self.income.trim().to_string(),
            monthly_expenses: self.monthly_expenses.trim().to_string(),
            savings_goal: self.savings_goal.trim().to_string(),
            currency: self.currency.trim().to_string(),
            financial_goal: self.financial_goal.trim().to_string(),
        }
    }
}

/// First-time detail collection, right after signup.
pub async fn userdetails_form(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    jar: CookieJar,
) -> Result<Response> {
    let user = super::load_user(&state, auth).await?;
    let (jar, flash) = take_flash(jar);
    Ok((
        jar,
        views::profile_form_page(&user, "/userdetails", "Your details", flash.as_ref()),
    )
        .into_response())
}

pub async fn userdetails_submit(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    jar: CookieJar,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let user = super::load_user(&state, auth).await?;

    // The form may carry an email to validate; the stored one is the
    // fallback and neither is ever written back here.
    let submitted = form.email.trim();
    let email = if submitted.is_empty() {
        user.email.as_str()
    } else {
        submitted
    };

    save_profile(
        &state,
        user.id,
        &form.trimmed(),
        email,
        jar,
        "Your details have been saved successfully!",
        "/index",
        "/userdetails",
    )
    .await
}

/// Later profile editing from the settings page.
pub async fn edit_details_form(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    jar: CookieJar,
) -> Result<Response> {
    let user = super::load_user(&state, auth).await?;
    let (jar, flash) = take_flash(jar);
    Ok((
        jar,
        views::profile_form_page(&user, "/edit_details", "Edit details", flash.as_ref()),
    )
        .into_response())
}

pub async fn edit_details_submit(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    jar: CookieJar,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let user = super::load_user(&state, auth).await?;

    save_profile(
        &state,
        user.id,
        &form.trimmed(),
        &user.email,
        jar,
        "Profile updated successfully.",
        "/settings",
        "/edit_details",
    )
    .await
}

/// Validate then persist, all-or-nothing.
#[allow(clippy::too_many_arguments)]
async fn save_profile(
    state: &AppState,
    user_id: i64,
    input: &ProfileInput,
    email: &str,
    jar: CookieJar,
    success_message: &str,
    success_to: &str,
    failure_to: &str,
) -> Result<Response> {
    let today = chrono::Local::now().date_naive();

    let profile = match validate_profile(input, email, today) {
        Ok(profile) => profile,
        Err(reason) => {
            return Ok(flash_redirect(jar, Level::Danger, &reason.0, failure_to).into_response());
        }
    };

    state.db.update_profile(user_id, &profile).await?;
    tracing::debug!(user_id, "Profile saved");

    Ok(flash_redirect(jar, Level::Success, success_message, success_to).into_response())
}

/// Render the stored profile.
pub async fn settings(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    jar: CookieJar,
) -> Result<Response> {
    let user = super::load_user(&state, auth).await?;
    let (jar, flash) = take_flash(jar);
    Ok((jar, views::settings_page(&user, flash.as_ref())).into_response())
}
