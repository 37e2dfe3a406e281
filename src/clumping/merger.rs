//! Row/plane sweep merging intervals into connected components.
//!
//! Rows are visited in sweep order. Each interval is compared with the
//! intervals of the previous row in its plane and, for volumes, with the same
//! row of the previous plane. Two intervals are connected when they share at
//! least `min_overlap` columns. A connected interval inherits the smallest
//! label among its tagged neighbours and records the equivalence of any other
//! labels in a [`DisjointSet`]; relabelling is deferred to aggregation, so the
//! sweep is linear in the number of intervals.
use super::row_store::RowStore;
use super::union_find::DisjointSet;
use crate::error::ClumpError;
use crate::types::Interval;
use std::ops::Range;

/// Provisional labelling produced by the sweep. Labels are only meaningful
/// through `sets.canonical_id`, which the aggregator resolves.
#[derive(Clone, Debug)]
pub struct ProvisionalLabels {
    pub(crate) labels: Vec<u32>,
    pub(crate) sets: DisjointSet,
}

impl ProvisionalLabels {
    pub fn num_provisional(&self) -> usize {
        self.sets.len()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ConnectivityMerger {
    min_overlap: usize,
}

impl ConnectivityMerger {
    pub fn new(min_overlap: usize) -> Result<Self, ClumpError> {
        if min_overlap < 1 {
            return Err(ClumpError::InvalidMinOverlap { min_overlap });
        }
        Ok(Self { min_overlap })
    }

    pub fn min_overlap(&self) -> usize {
        self.min_overlap
    }

    /// True when the two intervals share at least `min_overlap` columns.
    #[inline]
    pub fn connected(&self, a: &Interval, b: &Interval) -> bool {
        a.overlap(b) >= self.min_overlap
    }

    pub fn sweep(&self, store: &RowStore) -> Result<ProvisionalLabels, ClumpError> {
        let shape = store.shape();
        let n = store.num_intervals();
        let mut labels: Vec<u32> = Vec::new();
        labels
            .try_reserve_exact(n)
            .map_err(ClumpError::allocation("labels", n))?;
        let mut sets = DisjointSet::new();
        let intervals = store.intervals();

        for plane in 0..shape.nz {
            for y in 0..shape.ny {
                let current = store.row_range(plane, y);
                if current.is_empty() {
                    continue;
                }
                let north = (y > 0).then(|| store.row_range(plane, y - 1));
                let below = (plane > 0).then(|| store.row_range(plane - 1, y));

                let mut north_start = north.as_ref().map_or(0, |r| r.start);
                let mut below_start = below.as_ref().map_or(0, |r| r.start);

                for idx in current {
                    let intv = &intervals[idx];
                    let mut label: Option<u32> = None;
                    if let Some(range) = &north {
                        self.merge_neighbours(
                            intervals, range, &mut north_start, intv, &labels, &mut sets, &mut label,
                        );
                    }
                    if let Some(range) = &below {
                        self.merge_neighbours(
                            intervals, range, &mut below_start, intv, &labels, &mut sets, &mut label,
                        );
                    }
                    let label = match label {
                        Some(l) => l,
                        None => sets.make_set()?,
                    };
                    labels.push(label);
                }
            }
        }

        debug_assert_eq!(labels.len(), n);
        Ok(ProvisionalLabels { labels, sets })
    }

    /// Fold the labels of every interval in `range` connected to `intv` into
    /// `label`. `start` tracks the first neighbour that can still overlap
    /// the remaining (further right) intervals of the current row.
    #[allow(clippy::too_many_arguments)]
    fn merge_neighbours(
        &self,
        intervals: &[Interval],
        range: &Range<usize>,
        start: &mut usize,
        intv: &Interval,
        labels: &[u32],
        sets: &mut DisjointSet,
        label: &mut Option<u32>,
    ) {
        let m = self.min_overlap;
        while *start < range.end && intervals[*start].end + 1 < intv.begin + m {
            *start += 1;
        }
        let mut j = *start;
        while j < range.end && intervals[j].begin + m <= intv.end + 1 {
            if self.connected(&intervals[j], intv) {
                let other = labels[j];
                *label = Some(match *label {
                    None => sets.canonical_id(other),
                    Some(cur) => sets.union(cur, other),
                });
            }
            j += 1;
        }
    }
}
