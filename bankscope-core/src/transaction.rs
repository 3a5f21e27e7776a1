//! Transaction and statement types produced by statement parsing

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A single dated, described, signed movement parsed from a statement line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Negative for debits (parenthesized on the statement), positive otherwise.
    pub amount: Decimal,
}

impl Transaction {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
        }
    }

    pub fn is_debit(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

/// A transaction paired with the category it was attributed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedTransaction {
    pub transaction: Transaction,
    pub category: String,
}

/// All transactions read from one statement file, in page then line order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Statement {
    pub source: PathBuf,
    pub transactions: Vec<Transaction>,
}

impl Statement {
    pub fn new(source: impl AsRef<Path>) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            transactions: Vec::new(),
        }
    }

    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sum of all signed amounts on the statement
    pub fn net_total(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount).sum()
    }
}
