use crate::types::{ClumpId, Comparison};
use std::collections::TryReserveError;

/// Reasons why a clumping or decomposition run may fail.
///
/// Degenerate input (empty grid, nothing passing the threshold) is not an
/// error; it yields a run with zero clumps.
#[derive(Clone, Debug, PartialEq)]
pub enum ClumpError {
    InvalidDimensions {
        nx: usize,
        ny: usize,
        nz: usize,
    },
    BufferSizeMismatch {
        expected: usize,
        found: usize,
    },
    InvalidMinOverlap {
        min_overlap: usize,
    },
    SecondaryNotStricter {
        primary: f32,
        secondary: f32,
        comparison: Comparison,
    },
    InvalidFraction {
        name: &'static str,
        value: f64,
    },
    InvalidSizeBounds {
        min: f64,
        max: f64,
    },
    AllocationFailed {
        table: &'static str,
        requested: usize,
    },
    UnknownClump {
        id: ClumpId,
    },
    /// A footprint's bounding box reaches past the grid it is read from.
    FootprintOutsideGrid {
        id: ClumpId,
    },
}

impl ClumpError {
    pub(crate) fn allocation(table: &'static str, requested: usize) -> impl FnOnce(TryReserveError) -> Self {
        move |_| ClumpError::AllocationFailed { table, requested }
    }
}

impl std::fmt::Display for ClumpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClumpError::InvalidDimensions { nx, ny, nz } => {
                write!(f, "invalid grid dimensions ({nx} x {ny} x {nz})")
            }
            ClumpError::BufferSizeMismatch { expected, found } => {
                write!(f, "grid buffer holds {found} samples, expected {expected}")
            }
            ClumpError::InvalidMinOverlap { min_overlap } => {
                write!(f, "min_overlap must be >= 1 (got {min_overlap})")
            }
            ClumpError::SecondaryNotStricter {
                primary,
                secondary,
                comparison,
            } => match comparison {
                Comparison::AboveOrEqual => write!(
                    f,
                    "secondary threshold {secondary} is below primary threshold {primary}"
                ),
                Comparison::Below => write!(
                    f,
                    "secondary threshold {secondary} is above primary threshold {primary}"
                ),
            },
            ClumpError::InvalidFraction { name, value } => {
                write!(f, "{name} must lie in [0, 1] (got {value})")
            }
            ClumpError::InvalidSizeBounds { min, max } => {
                write!(f, "feature size bounds are inverted (min {min} > max {max})")
            }
            ClumpError::AllocationFailed { table, requested } => {
                write!(f, "failed to grow {table} table to {requested} entries")
            }
            ClumpError::UnknownClump { id } => write!(f, "no clump with id {id}"),
            ClumpError::FootprintOutsideGrid { id } => {
                write!(f, "footprint of clump {id} lies outside the grid")
            }
        }
    }
}

impl std::error::Error for ClumpError {}
