// SPDX-License-Identifier: MIT

//! Data models stored in SQLite.

pub mod expense;
pub mod user;

pub use expense::Expense;
pub use user::User;
