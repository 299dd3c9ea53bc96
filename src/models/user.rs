//! User model for storage and view rendering.

use serde::{Deserialize, Serialize};

/// Identity record: credentials plus optional profile fields.
///
/// The numeric-looking profile fields (income, savings goal, monthly
/// expense estimate) are stored as text and parsed where they are used,
/// so a profile can be saved before the user has filled everything in.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    /// Unique login name (letters, digits, underscore)
    pub username: String,
    /// Unique email address
    pub email: String,
    /// One-way bcrypt hash, never the plain password
    pub password_hash: String,
    pub full_name: Option<String>,
    /// Date of birth, ISO `YYYY-MM-DD`
    pub dob: Option<String>,
    pub phone: Option<String>,
    pub occupation: Option<String>,
    pub income: Option<String>,
    pub monthly_expenses: Option<String>,
    pub savings_goal: Option<String>,
    pub currency: Option<String>,
    pub financial_goal: Option<String>,
}

impl User {
    /// Monthly income as a number, if set and parseable.
    pub fn income_value(&self) -> Option<f64> {
        self.income.as_deref().and_then(|v| v.trim().parse().ok())
    }
}
