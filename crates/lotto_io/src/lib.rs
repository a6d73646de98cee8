//! crates/lotto_io/src/lib.rs
//! Offline I/O for the lottery engine.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - Loaders for score lists, token holdings and engine params.
//! - Canonical JSON (sorted keys, compact) and SHA-256 over it.

#![forbid(unsafe_code)]

use lotto_core::CoreError;
use thiserror::Error;

/// Unified error for lotto_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, create_dir_all, rename, fsync, ...).
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors with a JSON Pointer hint.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Input exceeded the read limit.
    #[error("{path} exceeds {limit} bytes")]
    TooLarge { path: String, limit: usize },

    /// Parsed fine but violates an engine precondition.
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps no pointer; callers enrich when they know one.
        IoError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

impl From<CoreError> for IoError {
    fn from(e: CoreError) -> Self {
        IoError::Invalid(e.to_string())
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod loader;

pub mod prelude {
    pub use crate::canonical_json::{canonical_json_bytes, write_canonical, write_canonical_file};
    pub use crate::hasher::{sha256_canonical, sha256_hex};
    pub use crate::loader::{load_entrants, load_holdings, load_params};
    pub use crate::{IoError, IoResult};
}
