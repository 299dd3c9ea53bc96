//! Expense model.

use serde::{Deserialize, Serialize};

/// A single spending entry, exclusively owned by one user.
///
/// The date is an ISO `YYYY-MM-DD` string so that month aggregation can
/// prefix-match on `YYYY-MM-`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Expense {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub date: String,
    pub user_id: i64,
}
