//! City-generation error type.
//!
//! Constraint rejection during growth or placement is *not* represented
//! here — rejected proposals are a normal outcome, logged at debug level and
//! folded back into control flow.  Only configuration mistakes, numerical
//! degeneracies, and bad ids surface as errors.

use thiserror::Error;

use cg_core::{CoreError, SegmentId};
use cg_spatial::SpatialError;

/// Errors produced by `cg-city`.
#[derive(Debug, Error)]
pub enum CityError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("segment {0} not found")]
    SegmentNotFound(SegmentId),

    #[error("segment id space exhausted")]
    IdSpaceExhausted,
}

pub type CityResult<T> = Result<T, CityError>;
