use std::fmt;
use std::time::Duration;

/// Errors that can occur during tiling, computation, scheduling, or assembly.
///
/// Every variant is fatal to the call that produced it: nothing is retried
/// internally, and no partially-filled matrix is ever returned alongside an
/// error. Callers decide whether to retry the whole computation.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Invalid static parameters: non-positive dimensions or extents, a
    /// non-positive split factor, a zero iteration budget, or a zero
    /// concurrency limit.
    Configuration(String),
    /// One tile's kernel failed. Carries the tile's grid coordinates and the
    /// underlying cause, so the failure can be diagnosed without re-running.
    Compute {
        row: usize,
        col: usize,
        reason: String,
    },
    /// A result grid's tile shapes are inconsistent: heights differ within a
    /// grid row, or widths differ within a grid column.
    ShapeMismatch(String),
    /// The overall deadline elapsed before every tile completed.
    Timeout {
        elapsed: Duration,
        completed: usize,
        total: usize,
    },
    /// A worker went away without reporting a result.
    Internal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(msg) => write!(f, "invalid configuration: {}", msg),
            Error::Compute { row, col, reason } => {
                write!(f, "tile ({}, {}) failed: {}", row, col, reason)
            }
            Error::ShapeMismatch(msg) => write!(f, "inconsistent tile shapes: {}", msg),
            Error::Timeout {
                elapsed,
                completed,
                total,
            } => write!(
                f,
                "deadline elapsed after {:?} with {} of {} tiles complete",
                elapsed, completed, total
            ),
            Error::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
