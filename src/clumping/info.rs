use crate::error::ClumpError;
use crate::grid::GridGeom;
use crate::types::{BoundingBox, ClumpId, Comparison, GridShape, Interval};
use serde::Serialize;
use std::borrow::Cow;

/// Summary of one connected component.
///
/// Member intervals are `interval_order[offset..offset + n_intervals]` of the
/// owning [`ClumpInfo`], sorted by (plane, row, begin).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Clump {
    pub id: ClumpId,
    pub bbox: BoundingBox,
    pub n_intervals: usize,
    pub n_cells: usize,
    #[serde(skip)]
    pub(crate) offset: usize,
}

/// Result of one clumping run: grid metadata, every interval tagged with
/// its dense clump id, and the clump table.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClumpInfo {
    pub shape: GridShape,
    pub threshold: f32,
    pub comparison: Comparison,
    pub min_overlap: usize,
    /// All intervals in sweep order.
    pub intervals: Vec<Interval>,
    /// Interval indices grouped by clump.
    #[serde(skip)]
    pub(crate) interval_order: Vec<usize>,
    pub clumps: Vec<Clump>,
}

/// Cells of one clump or sub-clump, as consumed by decomposition and
/// boundary tooling.
#[derive(Clone, Debug)]
pub struct Footprint<'a> {
    pub id: ClumpId,
    pub bbox: BoundingBox,
    pub n_cells: usize,
    pub intervals: Cow<'a, [Interval]>,
}

impl Footprint<'static> {
    /// Build a footprint from owned intervals, deriving the summary fields.
    /// Returns `None` for an empty interval list.
    pub fn from_intervals(id: ClumpId, intervals: Vec<Interval>) -> Option<Footprint<'static>> {
        let first = intervals.first()?;
        let mut bbox = BoundingBox::from_interval(first);
        let mut n_cells = 0;
        for intv in &intervals {
            bbox.include(intv);
            n_cells += intv.len();
        }
        Some(Footprint {
            id,
            bbox,
            n_cells,
            intervals: Cow::Owned(intervals),
        })
    }
}

impl<'a> Footprint<'a> {
    /// Physical size (km² or km³) of the footprint.
    pub fn size(&self, shape: GridShape, geom: &GridGeom) -> f64 {
        physical_size(self.intervals.iter(), shape, geom)
    }
}

pub(crate) fn physical_size<'a>(
    intervals: impl Iterator<Item = &'a Interval>,
    shape: GridShape,
    geom: &GridGeom,
) -> f64 {
    intervals
        .map(|intv| intv.len() as f64 * geom.cell_size(shape, intv.plane))
        .sum()
}

impl ClumpInfo {
    pub fn num_intervals(&self) -> usize {
        self.intervals.len()
    }

    pub fn num_clumps(&self) -> usize {
        self.clumps.len()
    }

    /// Total number of qualifying cells.
    pub fn num_cells(&self) -> usize {
        self.clumps.iter().map(|c| c.n_cells).sum()
    }

    pub fn clump(&self, id: ClumpId) -> Result<&Clump, ClumpError> {
        id.index()
            .and_then(|i| self.clumps.get(i))
            .ok_or(ClumpError::UnknownClump { id })
    }

    /// Member intervals of `id` in (plane, row, begin) order.
    pub fn clump_intervals(
        &self,
        id: ClumpId,
    ) -> Result<impl Iterator<Item = &Interval> + '_, ClumpError> {
        let clump = self.clump(id)?;
        let order = &self.interval_order[clump.offset..clump.offset + clump.n_intervals];
        Ok(order.iter().map(move |&i| &self.intervals[i]))
    }

    pub fn footprint(&self, id: ClumpId) -> Result<Footprint<'static>, ClumpError> {
        let clump = self.clump(id)?;
        let intervals: Vec<Interval> = self.clump_intervals(id)?.copied().collect();
        Ok(Footprint {
            id,
            bbox: clump.bbox,
            n_cells: clump.n_cells,
            intervals: Cow::Owned(intervals),
        })
    }

    /// Dense per-cell clump ids (0 = no clump), row-major like the grid.
    pub fn label_grid(&self) -> Vec<u32> {
        let mut labels = vec![0u32; self.shape.num_cells()];
        for intv in &self.intervals {
            let start = self.shape.index(intv.begin, intv.row, intv.plane);
            labels[start..start + intv.len()].fill(intv.id.0);
        }
        labels
    }

    /// Physical size of every clump, indexed like `clumps`.
    pub fn clump_sizes(&self, geom: &GridGeom) -> Vec<f64> {
        self.clumps
            .iter()
            .map(|c| {
                let order = &self.interval_order[c.offset..c.offset + c.n_intervals];
                physical_size(order.iter().map(|&i| &self.intervals[i]), self.shape, geom)
            })
            .collect()
    }
}
