use crate::clumping::ClumpingOptions;
use crate::error::ClumpError;
use crate::types::Comparison;
use serde::{Deserialize, Serialize};

/// Parameters of a dual-threshold decomposition.
///
/// - `secondary_threshold`: stricter threshold used to find cores. For
///   `above_or_equal` clumping it must be >= the primary threshold, for
///   `below` clumping <= it.
/// - `min_fraction_all_parts`: minimum share of the parent's cells covered by
///   the grown parts together.
/// - `min_fraction_each_part`: minimum share of the grown union each part must
///   hold. One weak part rejects the whole split.
/// - `min_area_each_part`: cores with fewer cells are discarded before growth.
/// - `min_feature_size` / `max_feature_size`: physical size gate (km² for 2-D,
///   km³ for 3-D) applied to each accepted sub-clump.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DualThresholdOptions {
    pub secondary_threshold: f32,
    pub min_fraction_all_parts: f64,
    pub min_fraction_each_part: f64,
    pub min_area_each_part: usize,
    pub min_feature_size: f64,
    pub max_feature_size: f64,
}

impl Default for DualThresholdOptions {
    fn default() -> Self {
        Self {
            secondary_threshold: 0.0,
            min_fraction_all_parts: 0.5,
            min_fraction_each_part: 0.05,
            min_area_each_part: 4,
            min_feature_size: 0.0,
            max_feature_size: 1.0e99,
        }
    }
}

impl DualThresholdOptions {
    pub fn new(secondary_threshold: f32) -> Self {
        Self {
            secondary_threshold,
            ..Default::default()
        }
    }

    /// Check the options against the primary clumping run they refine.
    pub fn validate(&self, primary: &ClumpingOptions) -> Result<(), ClumpError> {
        primary.validate()?;
        let stricter = match primary.comparison {
            Comparison::AboveOrEqual => self.secondary_threshold >= primary.threshold,
            Comparison::Below => self.secondary_threshold <= primary.threshold,
        };
        if !stricter {
            return Err(ClumpError::SecondaryNotStricter {
                primary: primary.threshold,
                secondary: self.secondary_threshold,
                comparison: primary.comparison,
            });
        }
        for (name, value) in [
            ("min_fraction_all_parts", self.min_fraction_all_parts),
            ("min_fraction_each_part", self.min_fraction_each_part),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ClumpError::InvalidFraction { name, value });
            }
        }
        if self.min_feature_size.is_nan()
            || self.max_feature_size.is_nan()
            || self.min_feature_size > self.max_feature_size
        {
            return Err(ClumpError::InvalidSizeBounds {
                min: self.min_feature_size,
                max: self.max_feature_size,
            });
        }
        Ok(())
    }
}
