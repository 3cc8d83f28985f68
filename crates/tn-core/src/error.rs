//! Core error type.
//!
//! Sub-crates define their own error enums (`SpatialError`, `RouterError`,
//! `MotionFault`, …) and keep them separate; `CoreError` only covers what
//! this crate can get wrong on its own.

use thiserror::Error;

/// Errors produced by `tn-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `tn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
