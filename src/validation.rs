// SPDX-License-Identifier: MIT

//! Pure field-validation rules for signup and profile forms.
//!
//! Every rule returns the human-readable reason on failure; handlers
//! surface that reason in a flash message and abort the mutation.
//! Date-sensitive rules take `today` as a parameter so tests are
//! deterministic.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::AppError;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid regex"));
static FULL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z ]+$").expect("valid regex"));

/// Minimum age for an account holder, in whole years.
const MIN_AGE_YEARS: i32 = 12;

/// A failed validation rule, carrying the user-facing reason.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.0)
    }
}

/// Username: letters, digits, and underscores only; never empty.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "Username can contain only letters, numbers, and underscores.",
        ))
    }
}

/// Password: at least 8 characters, with a digit and a special character.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= 8;
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if long_enough && has_digit && has_special {
        Ok(())
    } else {
        Err(ValidationError::new(
            "Password must be at least 8 characters, include a digit and a special character.",
        ))
    }
}

/// Email: exactly one `@`; the domain part has at least one `.` and no digit.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || {
        ValidationError::new("Email must include @ and . and contain no digits in the domain.")
    };

    if email.chars().filter(|&c| c == '@').count() != 1 {
        return Err(invalid());
    }
    let domain = email.split_once('@').map(|(_, d)| d).ok_or_else(invalid)?;
    if !domain.contains('.') || domain.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    Ok(())
}

/// Full name: letters and spaces only. Empty is allowed (field is optional).
pub fn validate_full_name(full_name: &str) -> Result<(), ValidationError> {
    if full_name.is_empty() || FULL_NAME_RE.is_match(full_name) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "Full name should contain letters and spaces only.",
        ))
    }
}

/// Phone: digits only, at least 10 of them. Empty is allowed.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() {
        return Ok(());
    }
    if phone.chars().all(|c| c.is_ascii_digit()) && phone.len() >= 10 {
        Ok(())
    } else {
        Err(ValidationError::new(
            "Phone number must be at least 10 digits and digits only.",
        ))
    }
}

/// Date of birth: valid `YYYY-MM-DD`, and the holder must be at least
/// 12 years old as of `today`. Empty is allowed.
pub fn validate_dob(dob: &str, today: NaiveDate) -> Result<(), ValidationError> {
    if dob.is_empty() {
        return Ok(());
    }
    let born = NaiveDate::parse_from_str(dob, "%Y-%m-%d")
        .map_err(|_| ValidationError::new("Invalid date of birth."))?;

    if age_in_years(born, today) < MIN_AGE_YEARS {
        return Err(ValidationError::new(
            "You must be at least 12 years old.",
        ));
    }
    Ok(())
}

/// Whole years elapsed, accounting for a birthday not yet reached this year.
fn age_in_years(born: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    age
}

/// Income and savings goal: both must parse as non-negative numbers
/// (empty counts as zero), and when income is positive the goal must
/// not exceed it.
pub fn validate_money_goals(income: &str, savings_goal: &str) -> Result<(), ValidationError> {
    let parse = |raw: &str| -> Result<f64, ValidationError> {
        if raw.is_empty() {
            return Ok(0.0);
        }
        raw.parse::<f64>()
            .ok()
            .filter(|v| *v >= 0.0)
            .ok_or_else(|| ValidationError::new("Income and Savings Goal must be numbers."))
    };

    let income = parse(income)?;
    let goal = parse(savings_goal)?;
    if income > 0.0 && goal > income {
        return Err(ValidationError::new(
            "Savings goal cannot exceed monthly income.",
        ));
    }
    Ok(())
}

/// Raw profile fields as submitted, already trimmed by the handler.
#[derive(Debug, Default, Clone)]
pub struct ProfileInput {
    pub full_name: String,
    pub dob: String,
    pub phone: String,
    pub occupation: String,
    pub income: String,
    pub monthly_expenses: String,
    pub savings_goal: String,
    pub currency: String,
    pub financial_goal: String,
}

/// A profile that passed every rule; empty fields became `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProfile {
    pub full_name: Option<String>,
    pub dob: Option<String>,
    pub phone: Option<String>,
    pub occupation: Option<String>,
    pub income: Option<String>,
    pub monthly_expenses: Option<String>,
    pub savings_goal: Option<String>,
    pub currency: Option<String>,
    pub financial_goal: Option<String>,
}

/// Run the whole rules table as a single pass over a submitted profile.
///
/// Produces either a complete validated record or the first failure;
/// there is no partial result, so a handler can only ever persist all
/// fields or none of them. The email is validated but not part of the
/// result: profile updates never change the stored email.
pub fn validate_profile(
    input: &ProfileInput,
    email: &str,
    today: NaiveDate,
) -> Result<ValidatedProfile, ValidationError> {
    validate_full_name(&input.full_name)?;
    validate_email(email)?;
    validate_phone(&input.phone)?;
    validate_dob(&input.dob, today)?;
    validate_money_goals(&input.income, &input.savings_goal)?;

    let opt = |s: &str| {
        if s.is_empty() {
            None
        } else {
            Some(s.to_string())
        }
    };

    Ok(ValidatedProfile {
        full_name: opt(&input.full_name),
        dob: opt(&input.dob),
        phone: opt(&input.phone),
        occupation: opt(&input.occupation),
        income: opt(&input.income),
        monthly_expenses: opt(&input.monthly_expenses),
        savings_goal: opt(&input.savings_goal),
        currency: opt(&input.currency),
        financial_goal: opt(&input.financial_goal),
    })
}
