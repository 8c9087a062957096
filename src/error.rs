//! Unified error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// The error type returned by bizshop's fallible server operations.
///
/// Application-level errors (404, 401, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures: parsing the bind address, binding to a port, or
/// accepting a connection.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{0}`")]
    InvalidAddress(String),
}

/// Why a [`UserContext`](crate::UserContext) could not be built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("unknown vip level `{0}`")]
    UnknownVipLevel(String),

    #[error("wallet balance `{0}` is not a decimal number")]
    InvalidBalance(String),

    #[error("wallet balance cannot be negative: {0}")]
    NegativeBalance(Decimal),

    #[error("wallet balance can have at most 2 decimal places, got: {0}")]
    BalancePrecision(Decimal),
}
