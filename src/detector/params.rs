//! Parameter types configuring a detector run.
//!
//! Defaults clump everything at or above 0.0 with single-column overlap,
//! keep every clump regardless of size and skip decomposition.

use crate::clumping::ClumpingOptions;
use crate::dual_threshold::DualThresholdOptions;
use crate::error::ClumpError;
use crate::grid::GridGeom;
use serde::{Deserialize, Serialize};

/// Detector-wide parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClumpParams {
    /// Primary threshold run.
    pub clumping: ClumpingOptions,
    /// Decompose surviving clumps when present.
    pub dual_threshold: Option<DualThresholdOptions>,
    /// Top-level clumps smaller than this (km² or km³) are dropped.
    pub min_clump_size: f64,
    /// Cell spacing used for every physical size.
    pub geom: GridGeom,
}

impl ClumpParams {
    pub fn new(clumping: ClumpingOptions) -> Self {
        Self {
            clumping,
            ..Default::default()
        }
    }

    pub fn with_dual_threshold(mut self, options: DualThresholdOptions) -> Self {
        self.dual_threshold = Some(options);
        self
    }

    pub fn with_min_clump_size(mut self, min_clump_size: f64) -> Self {
        self.min_clump_size = min_clump_size;
        self
    }

    pub fn with_geom(mut self, geom: GridGeom) -> Self {
        self.geom = geom;
        self
    }

    pub fn validate(&self) -> Result<(), ClumpError> {
        self.clumping.validate()?;
        if self.min_clump_size.is_nan() || self.min_clump_size < 0.0 {
            return Err(ClumpError::InvalidSizeBounds {
                min: self.min_clump_size,
                max: f64::INFINITY,
            });
        }
        if let Some(dual) = &self.dual_threshold {
            dual.validate(&self.clumping)?;
        }
        Ok(())
    }
}
