use crate::error::ClumpError;
use crate::types::Comparison;
use serde::{Deserialize, Serialize};

/// Parameters of one clumping run.
///
/// - `threshold`: value each qualifying cell is compared against.
/// - `comparison`: `above_or_equal` (default) or `below`.
/// - `min_overlap`: columns two intervals in adjacent rows/planes must share
///   to be connected. Must be at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClumpingOptions {
    pub threshold: f32,
    pub comparison: Comparison,
    pub min_overlap: usize,
}

impl Default for ClumpingOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            comparison: Comparison::AboveOrEqual,
            min_overlap: 1,
        }
    }
}

impl ClumpingOptions {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    pub fn with_min_overlap(mut self, min_overlap: usize) -> Self {
        self.min_overlap = min_overlap;
        self
    }

    pub fn with_comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn validate(&self) -> Result<(), ClumpError> {
        if self.min_overlap < 1 {
            return Err(ClumpError::InvalidMinOverlap {
                min_overlap: self.min_overlap,
            });
        }
        Ok(())
    }
}
