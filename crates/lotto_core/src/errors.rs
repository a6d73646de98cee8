//! Core-domain error set.

use thiserror::Error;

/// Errors raised by core-domain validation and by engine preconditions.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CoreError {
    /// Weight is undefined for a zero (or negative / non-finite) total score.
    #[error("total score must be positive and finite, got {0}")]
    NonPositiveTotal(f64),

    #[error("entrant address must not be empty")]
    EmptyAddress,

    #[error("score for {address} is not a finite number")]
    NonFiniteScore { address: String },

    #[error("wire value {value} is not a valid {kind}")]
    InvalidWireValue { kind: &'static str, value: i64 },

    #[error("domain out of range: {0}")]
    DomainOutOfRange(&'static str),
}

pub type CoreResult<T> = Result<T, CoreError>;
