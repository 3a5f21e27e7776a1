use thiserror::Error;

/// Failure to turn a qualifying statement line into a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid date `{token}` in line: {line}")]
    InvalidDate { token: String, line: String },

    #[error("invalid amount `{token}` in line: {line}")]
    InvalidAmount { token: String, line: String },

    #[error("no amount column in line: {0}")]
    MissingAmount(String),
}
