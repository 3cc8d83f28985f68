//! Spatial-subsystem error type.

use thiserror::Error;

use tn_core::Position;

/// Errors produced by `tn-spatial`.
///
/// Every search failure is an ordinary "not found" result: callers decide
/// whether it is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpatialError {
    #[error("collision grid is empty")]
    EmptyGrid,

    #[error("position {pos} lies outside the search grid")]
    OutOfBounds { pos: Position },

    #[error("no route from {from} to {to}")]
    NoRoute { from: Position, to: Position },

    #[error("terrain has {got} tiles, expected {expected}")]
    Dimensions { expected: usize, got: usize },

    #[error("row {row} has {got} tiles, expected {expected}")]
    RaggedRow { row: usize, expected: usize, got: usize },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
