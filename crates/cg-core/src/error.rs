//! Core error type.
//!
//! Sub-crates define their own error enums and either convert `CoreError`
//! into them via `#[from]` or wrap it as one variant.  Constraint rejection
//! during generation is *not* an error anywhere in the workspace — only
//! configuration mistakes and numerical degeneracies surface here.

use thiserror::Error;

/// The top-level error type for `cg-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("non-finite coordinate: {axis} = {value}")]
    NonFinite { axis: &'static str, value: f64 },

    #[error("zero-length segment at ({x}, {y})")]
    ZeroLengthSegment { x: f64, y: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `cg-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
