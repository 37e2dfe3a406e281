#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod boundary;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod grid;
pub mod types;

// Stage-level modules – public for tools and advanced users.
pub mod batch;
pub mod clumping;
pub mod config;
pub mod dual_threshold;
pub mod intervals;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{ClumpDetection, ClumpDetector, ClumpParams, ClumpProps};
pub use crate::error::ClumpError;
pub use crate::types::{BoundingBox, ClumpId, Comparison, GridShape, Interval};

// Building blocks for custom pipelines.
pub use crate::boundary::{emit_boundary, BoundaryNode, BoundaryPolicy, BoundaryPolygon, Corner};
pub use crate::clumping::{clump_grid, Clump, ClumpInfo, ClumpingOptions, Footprint};
pub use crate::dual_threshold::{
    Decomposition, DualThresholdDecomposer, DualThresholdOptions, SplitRejection, SubClump,
};

// High-level diagnostics returned by the detector.
pub use crate::diagnostics::ClumpReport;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use clump_detector::prelude::*;
///
/// # fn main() -> Result<(), ClumpError> {
/// let mut grid = GridF32::new(64, 48, 1);
/// grid.fill_rect(0, 10, 20, 5, 15, 42.0);
///
/// let info = clump_grid(&grid, &ClumpingOptions::new(35.0))?;
/// println!("clumps={} cells={}", info.num_clumps(), info.num_cells());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::grid::{GridF32, GridGeom, GridSource, GridView};
    pub use crate::{
        clump_grid, ClumpDetector, ClumpError, ClumpId, ClumpInfo, ClumpParams, ClumpingOptions,
        DualThresholdOptions,
    };
}
