//! Errors raised while parsing fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid txid prefix {value:?}: {reason}")]
    InvalidPrefix { value: String, reason: String },

    #[error("unknown denomination code {0:?} (expected one of 05, 005, 001)")]
    UnknownDenomination(String),
}
