use super::TimingBreakdown;
use crate::clumping::ClumpInfo;
use crate::dual_threshold::{Decomposition, SplitRejection};
use crate::types::{BoundingBox, ClumpId, Comparison, GridShape};
use serde::Serialize;

/// Serializable account of one detector run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClumpReport {
    pub input: InputDescriptor,
    pub settings: ThresholdSettings,
    /// Every top-level clump, including those removed by the size gate.
    pub clumps: Vec<ClumpSummary>,
    /// One entry per clump that went through decomposition.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub decompositions: Vec<DecompositionSummary>,
    pub timings: TimingBreakdown,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl From<GridShape> for InputDescriptor {
    fn from(shape: GridShape) -> Self {
        Self {
            nx: shape.nx,
            ny: shape.ny,
            nz: shape.nz,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdSettings {
    pub threshold: f32,
    pub comparison: Comparison,
    pub min_overlap: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_threshold: Option<f32>,
    pub min_clump_size: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClumpSummary {
    pub id: ClumpId,
    pub bbox: BoundingBox,
    pub n_intervals: usize,
    pub n_cells: usize,
    pub size: f64,
    /// False when the clump fell below the minimum size.
    pub kept: bool,
}

impl ClumpSummary {
    /// Summaries of every clump in `info`, with `sizes` indexed like the
    /// clump table.
    pub fn from_info(info: &ClumpInfo, sizes: &[f64], min_size: f64) -> Vec<ClumpSummary> {
        info.clumps
            .iter()
            .zip(sizes)
            .map(|(c, &size)| ClumpSummary {
                id: c.id,
                bbox: c.bbox,
                n_intervals: c.n_intervals,
                n_cells: c.n_cells,
                size,
                kept: size >= min_size,
            })
            .collect()
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecompositionSummary {
    pub parent: ClumpId,
    pub outcome: DecompositionOutcome,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DecompositionOutcome {
    Split {
        parts: usize,
        #[serde(rename = "droppedBySize")]
        dropped_by_size: usize,
    },
    Unsplit {
        rejection: SplitRejection,
    },
}

impl DecompositionSummary {
    pub fn new(parent: ClumpId, decomposition: &Decomposition) -> Self {
        let outcome = match decomposition {
            Decomposition::Split {
                sub_clumps,
                dropped_by_size,
            } => DecompositionOutcome::Split {
                parts: sub_clumps.len(),
                dropped_by_size: *dropped_by_size,
            },
            Decomposition::Unsplit(rejection) => DecompositionOutcome::Unsplit {
                rejection: *rejection,
            },
        };
        Self { parent, outcome }
    }
}

impl ClumpReport {
    pub fn num_kept(&self) -> usize {
        self.clumps.iter().filter(|c| c.kept).count()
    }

    pub fn num_split(&self) -> usize {
        self.decompositions
            .iter()
            .filter(|d| matches!(d.outcome, DecompositionOutcome::Split { .. }))
            .count()
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "{}x{}x{} grid: {} clumps ({} kept), {} split, {:.2} ms",
            self.input.nx,
            self.input.ny,
            self.input.nz,
            self.clumps.len(),
            self.num_kept(),
            self.num_split(),
            self.timings.total_ms
        )
    }
}
