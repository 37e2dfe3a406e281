//! Detector pipeline turning a grid into a flat list of features.
//!
//! The [`ClumpDetector`] exposes a simple API: feed a grid and get every
//! feature above the primary threshold, with large multi-peak clumps split
//! when a secondary threshold is configured.
//!
//! Typical usage:
//! ```no_run
//! use clump_detector::{ClumpDetector, ClumpParams, ClumpingOptions};
//! use clump_detector::grid::GridF32;
//!
//! # fn example(grid: GridF32) -> Result<(), clump_detector::ClumpError> {
//! let detector = ClumpDetector::new(ClumpParams::new(ClumpingOptions::new(35.0)))?;
//! let detection = detector.process_with_diagnostics(&grid)?;
//! println!("{}", detection.report.summary());
//! # Ok(())
//! # }
//! ```
use super::params::ClumpParams;
use super::props::ClumpProps;
use crate::clumping::{clump_grid, ClumpInfo};
use crate::diagnostics::{
    elapsed_ms, ClumpReport, ClumpSummary, DecompositionSummary, InputDescriptor, Stage,
    ThresholdSettings, TimingBreakdown,
};
use crate::dual_threshold::{Decomposition, DualThresholdDecomposer};
use crate::error::ClumpError;
use crate::grid::GridSource;
use crate::types::ClumpId;
use log::debug;
use std::time::Instant;

/// Output of [`ClumpDetector::process_with_diagnostics`].
#[derive(Clone, Debug)]
pub struct ClumpDetection {
    /// The primary-threshold run, before size gating.
    pub info: ClumpInfo,
    pub clumps: Vec<ClumpProps>,
    pub report: ClumpReport,
}

/// Clumps a grid, gates clumps by physical size and optionally decomposes
/// the survivors.
#[derive(Clone, Debug)]
pub struct ClumpDetector {
    params: ClumpParams,
    decomposer: Option<DualThresholdDecomposer>,
}

impl ClumpDetector {
    /// Create a detector, rejecting inconsistent parameters up front.
    pub fn new(params: ClumpParams) -> Result<Self, ClumpError> {
        params.validate()?;
        let decomposer = params
            .dual_threshold
            .map(|opts| DualThresholdDecomposer::new(params.clumping, opts, params.geom.clone()))
            .transpose()?;
        Ok(Self { params, decomposer })
    }

    pub fn params(&self) -> &ClumpParams {
        &self.params
    }

    /// Run the detector, returning only the feature list.
    pub fn process<G: GridSource>(&self, grid: &G) -> Result<Vec<ClumpProps>, ClumpError> {
        Ok(self.process_with_diagnostics(grid)?.clumps)
    }

    /// Run the detector and return the features, the primary run and a
    /// report.
    pub fn process_with_diagnostics<G: GridSource>(
        &self,
        grid: &G,
    ) -> Result<ClumpDetection, ClumpError> {
        let shape = grid.shape();
        debug!(
            "ClumpDetector::process start nx={} ny={} nz={} threshold={}",
            shape.nx, shape.ny, shape.nz, self.params.clumping.threshold
        );
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();

        let clump_start = Instant::now();
        let info = clump_grid(grid, &self.params.clumping)?;
        timings.record(Stage::Clumping, clump_start);

        let gate_start = Instant::now();
        let sizes = info.clump_sizes(&self.params.geom);
        let summaries = ClumpSummary::from_info(&info, &sizes, self.params.min_clump_size);
        let kept: Vec<(ClumpId, f64)> = summaries
            .iter()
            .filter(|s| s.kept)
            .map(|s| (s.id, s.size))
            .collect();
        timings.record(Stage::SizeGate, gate_start);
        debug!(
            "ClumpDetector::process clumps={} kept={} min_size={}",
            info.num_clumps(),
            kept.len(),
            self.params.min_clump_size
        );

        let mut clumps = Vec::with_capacity(kept.len());
        let mut decompositions = Vec::new();
        let decompose_start = Instant::now();
        for &(parent, size) in &kept {
            let decomposition = match &self.decomposer {
                Some(decomposer) => {
                    let d = decomposer.decompose_clump(grid, &info, parent)?;
                    decompositions.push(DecompositionSummary::new(parent, &d));
                    Some(d)
                }
                None => None,
            };
            match decomposition {
                // Parts outside the size range were dropped by the decomposer
                // and are not merged back into the parent.
                Some(Decomposition::Split { sub_clumps, .. }) => {
                    for sub in sub_clumps {
                        let id = ClumpId(clumps.len() as u32 + 1);
                        clumps.push(ClumpProps::from_sub_clump(id, sub));
                    }
                }
                Some(Decomposition::Unsplit(_)) | None => {
                    let id = ClumpId(clumps.len() as u32 + 1);
                    clumps.push(ClumpProps::whole(id, &info, parent, size)?);
                }
            }
        }
        if self.decomposer.is_some() {
            timings.record(Stage::Decomposition, decompose_start);
        }
        timings.total_ms = elapsed_ms(total_start);

        let report = ClumpReport {
            input: InputDescriptor::from(shape),
            settings: ThresholdSettings {
                threshold: self.params.clumping.threshold,
                comparison: self.params.clumping.comparison,
                min_overlap: self.params.clumping.min_overlap,
                secondary_threshold: self.params.dual_threshold.map(|d| d.secondary_threshold),
                min_clump_size: self.params.min_clump_size,
            },
            clumps: summaries,
            decompositions,
            timings,
        };
        debug!(
            "ClumpDetector::process done features={} split={} total_ms={:.3}",
            clumps.len(),
            report.num_split(),
            report.timings.total_ms
        );
        Ok(ClumpDetection {
            info,
            clumps,
            report,
        })
    }
}
