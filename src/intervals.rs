//! Row interval extraction.
//!
//! Scans one row of samples and emits the maximal runs of cells that satisfy
//! a threshold test, left to right. This is the only stage that touches
//! individual samples; everything downstream works on intervals.
//!
//! A sample qualifies when it is valid (not NaN, not the grid's missing
//! sentinel) and passes the [`Comparison`] against the threshold. An
//! all-failing row yields no interval, an all-passing row yields exactly one
//! covering `[0, n-1]`.
use crate::error::ClumpError;
use crate::types::{Comparison, Interval};

/// Threshold test applied to every sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdTest {
    pub threshold: f32,
    pub comparison: Comparison,
    pub missing: Option<f32>,
}

impl ThresholdTest {
    pub fn new(threshold: f32, comparison: Comparison) -> Self {
        Self {
            threshold,
            comparison,
            missing: None,
        }
    }

    pub fn with_missing(mut self, missing: Option<f32>) -> Self {
        self.missing = missing;
        self
    }

    #[inline]
    pub fn passes(&self, value: f32) -> bool {
        if value.is_nan() || self.missing == Some(value) {
            return false;
        }
        self.comparison.passes(value, self.threshold)
    }
}

/// Iterator over the maximal qualifying runs of a row as inclusive
/// `(begin, end)` pairs, left to right.
pub struct Runs<'a> {
    row: &'a [f32],
    test: &'a ThresholdTest,
    x: usize,
}

/// Maximal qualifying runs of `row`.
pub fn runs<'a>(row: &'a [f32], test: &'a ThresholdTest) -> Runs<'a> {
    Runs { row, test, x: 0 }
}

impl Iterator for Runs<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.row.len();
        while self.x < n && !self.test.passes(self.row[self.x]) {
            self.x += 1;
        }
        if self.x == n {
            return None;
        }
        let begin = self.x;
        while self.x < n && self.test.passes(self.row[self.x]) {
            self.x += 1;
        }
        Some((begin, self.x - 1))
    }
}

/// Append the intervals of one row to `out`, growing it fallibly.
///
/// Returns the number of intervals appended.
pub fn extract_row_into(
    row: &[f32],
    plane: usize,
    y: usize,
    test: &ThresholdTest,
    out: &mut Vec<Interval>,
) -> Result<usize, ClumpError> {
    let before = out.len();
    for (begin, end) in runs(row, test) {
        push_interval(out, Interval::new(plane, y, begin, end))?;
    }
    Ok(out.len() - before)
}

/// Push with doubling growth; a failed reservation aborts the run.
fn push_interval(out: &mut Vec<Interval>, intv: Interval) -> Result<(), ClumpError> {
    if out.len() == out.capacity() {
        let extra = out.capacity().max(64);
        out.try_reserve(extra)
            .map_err(ClumpError::allocation("intervals", out.len() + extra))?;
    }
    out.push(intv);
    Ok(())
}
