// SPDX-License-Identifier: MIT

//! SQLite store with typed operations.
//!
//! Provides high-level operations for:
//! - Users (credentials and profile)
//! - Expenses (per-user ledger rows and aggregates)
//!
//! Uniqueness of username/email is enforced by the schema's UNIQUE
//! constraints; the store is the authority and any handler-side
//! existence check is advisory only.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::AppError;
use crate::models::{Expense, User};
use crate::validation::ValidatedProfile;

const USER_COLUMNS: &str = "id, username, email, password_hash, full_name, dob, phone, \
     occupation, income, monthly_expenses, savings_goal, currency, financial_goal";

/// SQLite database client.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if missing) the database at `database_url` and
    /// ensure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {e}")))?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::info!(url = database_url, "Connected to SQLite");
        Ok(store)
    }

    /// In-memory database for tests.
    ///
    /// A single connection, since every `:memory:` connection is its own
    /// database.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::Database(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create tables if they do not exist yet.
    async fn migrate(&self) -> Result<(), AppError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                full_name TEXT,
                dob TEXT,
                phone TEXT,
                occupation TEXT,
                income TEXT,
                monthly_expenses TEXT,
                savings_goal TEXT,
                currency TEXT,
                financial_goal TEXT
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Register a new user.
    ///
    /// A UNIQUE violation on username or email maps to
    /// [`AppError::DuplicateIdentity`]; no row is created in that case.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::DuplicateIdentity
                } else {
                    db_err(e)
                }
            })
    }

    /// Look up a user by username or email.
    pub async fn find_user_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, AppError> {
        let sql =
            format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1 OR email = ?1");
        sqlx::query_as::<_, User>(&sql)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)
    }

    /// Look up a user by id.
    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)
    }

    /// Persist a fully validated profile in a single statement.
    ///
    /// All fields are written together, so a caller can only commit a
    /// complete profile or nothing. The email is never changed here.
    pub async fn update_profile(
        &self,
        user_id: i64,
        profile: &ValidatedProfile,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET full_name = ?, dob = ?, phone = ?, occupation = ?, \
             income = ?, monthly_expenses = ?, savings_goal = ?, currency = ?, \
             financial_goal = ? WHERE id = ?",
        )
        .bind(&profile.full_name)
        .bind(&profile.dob)
        .bind(&profile.phone)
        .bind(&profile.occupation)
        .bind(&profile.income)
        .bind(&profile.monthly_expenses)
        .bind(&profile.savings_goal)
        .bind(&profile.currency)
        .bind(&profile.financial_goal)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    /// Delete a user; owned expenses go with them (FK cascade).
    pub async fn delete_user(&self, user_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    // ─── Expense Operations ──────────────────────────────────────

    /// Record an expense for a user.
    pub async fn add_expense(
        &self,
        user_id: i64,
        name: &str,
        amount: f64,
        date: &str,
    ) -> Result<Expense, AppError> {
        // Also rejects NaN.
        if !(amount > 0.0) {
            return Err(AppError::InvalidAmount);
        }

        sqlx::query_as::<_, Expense>(
            "INSERT INTO expenses (name, amount, date, user_id) VALUES (?, ?, ?, ?) \
             RETURNING id, name, amount, date, user_id",
        )
        .bind(name)
        .bind(amount)
        .bind(date)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)
    }

    /// A user's expenses for one date, newest first.
    pub async fn expenses_for_date(
        &self,
        user_id: i64,
        date: &str,
    ) -> Result<Vec<Expense>, AppError> {
        sqlx::query_as::<_, Expense>(
            "SELECT id, name, amount, date, user_id FROM expenses \
             WHERE user_id = ? AND date = ? ORDER BY id DESC",
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)
    }

    /// Delete an expense, but only for its owner.
    ///
    /// Reports `NotFound` for an unknown id and `Unauthorized` when the
    /// requester does not own the row; the row is left intact in both
    /// cases.
    pub async fn delete_expense(&self, expense_id: i64, requester: i64) -> Result<(), AppError> {
        let owner: Option<i64> =
            sqlx::query_scalar("SELECT user_id FROM expenses WHERE id = ?")
                .bind(expense_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        match owner {
            None => Err(AppError::NotFound(format!("expense {expense_id}"))),
            Some(owner) if owner != requester => Err(AppError::Unauthorized),
            Some(_) => {
                sqlx::query("DELETE FROM expenses WHERE id = ?")
                    .bind(expense_id)
                    .execute(&self.pool)
                    .await
                    .map_err(db_err)?;
                Ok(())
            }
        }
    }

    /// All-time spending total; zero when the ledger is empty.
    pub async fn total_all_time(&self, user_id: i64) -> Result<f64, AppError> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0.0) FROM expenses WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)
    }

    /// Spending total for one date.
    pub async fn total_for_date(&self, user_id: i64, date: &str) -> Result<f64, AppError> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0.0) FROM expenses \
             WHERE user_id = ? AND date = ?",
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)
    }

    /// Spending total for a calendar month.
    ///
    /// `year_month` is a zero-padded `YYYY-MM`; dates are stored as ISO
    /// strings, so the month is matched by prefix.
    pub async fn total_for_month(
        &self,
        user_id: i64,
        year_month: &str,
    ) -> Result<f64, AppError> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0.0) FROM expenses \
             WHERE user_id = ? AND date LIKE ?",
        )
        .bind(user_id)
        .bind(format!("{year_month}-%"))
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)
    }

    /// Per-name totals for the dashboard breakdown, name ascending.
    pub async fn grouped_by_name(&self, user_id: i64) -> Result<Vec<(String, f64)>, AppError> {
        sqlx::query_as(
            "SELECT name, COALESCE(SUM(amount), 0.0) FROM expenses \
             WHERE user_id = ? GROUP BY name ORDER BY name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)
    }
}

fn db_err(e: sqlx::Error) -> AppError {
    AppError::Database(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_user(username: &str, email: &str) -> (Store, User) {
        let store = Store::in_memory().await.unwrap();
        let user = store.create_user(username, email, "hash").await.unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let (store, _) = store_with_user("alice", "a@b.com").await;

        let err = store
            .create_user("alice", "other@b.com", "hash")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateIdentity));

        // No second row was created.
        assert!(store
            .find_user_by_identifier("other@b.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (store, _) = store_with_user("alice", "a@b.com").await;

        let err = store
            .create_user("bob", "a@b.com", "hash")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateIdentity));
    }

    #[tokio::test]
    async fn test_find_by_username_or_email() {
        let (store, user) = store_with_user("alice", "a@b.com").await;

        let by_name = store.find_user_by_identifier("alice").await.unwrap();
        let by_email = store.find_user_by_identifier("a@b.com").await.unwrap();
        assert_eq!(by_name.unwrap().id, user.id);
        assert_eq!(by_email.unwrap().id, user.id);

        assert!(store
            .find_user_by_identifier("nobody")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_nonpositive_amount_rejected() {
        let (store, user) = store_with_user("alice", "a@b.com").await;

        let err = store
            .add_expense(user.id, "Coffee", -5.0, "2026-08-27")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidAmount));

        let err = store
            .add_expense(user.id, "Coffee", 0.0, "2026-08-27")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidAmount));

        assert_eq!(store.total_all_time(user.id).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_expenses_for_date_newest_first() {
        let (store, user) = store_with_user("alice", "a@b.com").await;

        store
            .add_expense(user.id, "Breakfast", 8.0, "2026-08-27")
            .await
            .unwrap();
        store
            .add_expense(user.id, "Lunch", 12.0, "2026-08-27")
            .await
            .unwrap();
        store
            .add_expense(user.id, "Other day", 3.0, "2026-08-26")
            .await
            .unwrap();

        let today = store.expenses_for_date(user.id, "2026-08-27").await.unwrap();
        let names: Vec<_> = today.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Lunch", "Breakfast"]);

        assert_eq!(store.total_for_date(user.id, "2026-08-27").await.unwrap(), 20.0);
        assert_eq!(store.total_all_time(user.id).await.unwrap(), 23.0);
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let (store, alice) = store_with_user("alice", "a@b.com").await;
        let bob = store.create_user("bob", "b@b.com", "hash").await.unwrap();

        let expense = store
            .add_expense(bob.id, "Coffee", 3.0, "2026-08-27")
            .await
            .unwrap();

        let err = store.delete_expense(expense.id, alice.id).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));

        // Still retrievable afterward.
        let remaining = store.expenses_for_date(bob.id, "2026-08-27").await.unwrap();
        assert_eq!(remaining.len(), 1);

        store.delete_expense(expense.id, bob.id).await.unwrap();
        let err = store.delete_expense(expense.id, bob.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_grouped_by_name_aggregates() {
        let (store, user) = store_with_user("alice", "a@b.com").await;

        store.add_expense(user.id, "Coffee", 3.0, "2026-08-27").await.unwrap();
        store.add_expense(user.id, "Coffee", 2.0, "2026-08-26").await.unwrap();
        store.add_expense(user.id, "Bus", 2.5, "2026-08-27").await.unwrap();

        let grouped = store.grouped_by_name(user.id).await.unwrap();
        assert_eq!(
            grouped,
            vec![("Bus".to_string(), 2.5), ("Coffee".to_string(), 5.0)]
        );
    }

    #[tokio::test]
    async fn test_month_total_matches_prefix_only() {
        let (store, user) = store_with_user("alice", "a@b.com").await;

        store.add_expense(user.id, "In month", 10.0, "2026-08-01").await.unwrap();
        store.add_expense(user.id, "In month", 5.0, "2026-08-31").await.unwrap();
        store.add_expense(user.id, "Other month", 7.0, "2026-07-31").await.unwrap();
        store.add_expense(user.id, "Other year", 9.0, "2025-08-15").await.unwrap();

        assert_eq!(store.total_for_month(user.id, "2026-08").await.unwrap(), 15.0);
        assert_eq!(store.total_for_month(user.id, "2026-09").await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_deleting_user_cascades_expenses() {
        let (store, user) = store_with_user("alice", "a@b.com").await;

        let expense = store
            .add_expense(user.id, "Coffee", 3.0, "2026-08-27")
            .await
            .unwrap();

        store.delete_user(user.id).await.unwrap();

        let err = store.delete_expense(expense.id, user.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_profile_update_is_atomic() {
        let (store, user) = store_with_user("alice", "a@b.com").await;

        let profile = crate::validation::ValidatedProfile {
            full_name: Some("Alice Smith".into()),
            dob: Some("2000-01-01".into()),
            phone: None,
            occupation: Some("Engineer".into()),
            income: Some("1000".into()),
            monthly_expenses: None,
            savings_goal: Some("400".into()),
            currency: Some("USD".into()),
            financial_goal: None,
        };

        store.update_profile(user.id, &profile).await.unwrap();

        let saved = store.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(saved.full_name.as_deref(), Some("Alice Smith"));
        assert_eq!(saved.savings_goal.as_deref(), Some("400"));
        assert_eq!(saved.phone, None);
        // Email untouched by profile updates.
        assert_eq!(saved.email, "a@b.com");
    }
}
