//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `cg-spatial`.  All are configuration mistakes caught
/// at construction; the index itself never fails at runtime.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("quadtree bounds must be finite with positive extent, got \
             x={x} y={y} width={width} height={height}")]
    InvalidBounds { x: f64, y: f64, width: f64, height: f64 },

    #[error("quadtree max_objects must be at least 1")]
    ZeroMaxObjects,
}

pub type SpatialResult<T> = Result<T, SpatialError>;
