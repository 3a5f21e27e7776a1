//! bankscope-core: data model shared by the ingest, report and cli crates

pub mod categories;
pub mod transaction;

pub use categories::{Category, CategoryError, CategoryTable};
pub use transaction::{CategorizedTransaction, Statement, Transaction};
