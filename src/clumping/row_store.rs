use crate::error::ClumpError;
use crate::grid::GridSource;
use crate::intervals::{extract_row_into, ThresholdTest};
use crate::types::{GridShape, Interval};
use std::ops::Range;

/// Intervals of a whole grid, grouped by row.
///
/// Intervals live in one flat table in sweep order (plane, row, column);
/// `rows[plane * ny + y]` is the slice of that table belonging to one row.
/// Handles into the table are plain indices, stable for the life of the run.
#[derive(Clone, Debug)]
pub struct RowStore {
    shape: GridShape,
    intervals: Vec<Interval>,
    rows: Vec<Range<usize>>,
}

impl RowStore {
    /// Extract the intervals of every row of `grid`.
    pub fn build<G: GridSource>(grid: &G, test: &ThresholdTest) -> Result<Self, ClumpError> {
        let shape = grid.shape();
        let mut rows = Vec::new();
        rows.try_reserve_exact(shape.num_rows())
            .map_err(ClumpError::allocation("rows", shape.num_rows()))?;
        let mut intervals = Vec::new();
        for (plane, y, samples) in grid.rows() {
            let start = intervals.len();
            extract_row_into(samples, plane, y, test, &mut intervals)?;
            rows.push(start..intervals.len());
        }
        Ok(Self {
            shape,
            intervals,
            rows,
        })
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn num_intervals(&self) -> usize {
        self.intervals.len()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Table range of row `y` in `plane`.
    #[inline]
    pub fn row_range(&self, plane: usize, y: usize) -> Range<usize> {
        self.rows[plane * self.shape.ny + y].clone()
    }

    #[inline]
    pub fn row(&self, plane: usize, y: usize) -> &[Interval] {
        &self.intervals[self.row_range(plane, y)]
    }

    pub(crate) fn into_intervals(self) -> Vec<Interval> {
        self.intervals
    }
}
