// SPDX-License-Identifier: MIT

//! SQLite persistence layer.

pub mod store;

pub use store::Store;
