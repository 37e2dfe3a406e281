use super::info::{Clump, ClumpInfo};
use super::merger::ProvisionalLabels;
use super::options::ClumpingOptions;
use super::row_store::RowStore;
use crate::error::ClumpError;
use crate::types::{BoundingBox, ClumpId};

/// Resolves provisional labels and builds the clump table.
///
/// Dense ids are handed out in order of first appearance in the sweep, so a
/// given grid always yields the same numbering.
pub struct ClumpAggregator;

impl ClumpAggregator {
    pub fn aggregate(
        store: RowStore,
        provisional: ProvisionalLabels,
        options: &ClumpingOptions,
    ) -> Result<ClumpInfo, ClumpError> {
        let shape = store.shape();
        let ProvisionalLabels { labels, mut sets } = provisional;
        let mut intervals = store.into_intervals();
        let n = intervals.len();

        // canonical label -> dense id (0 = not seen yet)
        let mut dense = Vec::new();
        dense
            .try_reserve_exact(sets.len())
            .map_err(ClumpError::allocation("clump ids", sets.len()))?;
        dense.resize(sets.len(), 0u32);

        let mut clumps: Vec<Clump> = Vec::new();
        for (intv, &label) in intervals.iter_mut().zip(&labels) {
            let root = sets.canonical_id(label) as usize;
            if dense[root] == 0 {
                if clumps.len() == clumps.capacity() {
                    let extra = clumps.len().max(16);
                    clumps
                        .try_reserve(extra)
                        .map_err(ClumpError::allocation("clumps", clumps.len() + extra))?;
                }
                let id = ClumpId(clumps.len() as u32 + 1);
                dense[root] = id.0;
                clumps.push(Clump {
                    id,
                    bbox: BoundingBox::from_interval(intv),
                    n_intervals: 0,
                    n_cells: 0,
                    offset: 0,
                });
            }
            let id = ClumpId(dense[root]);
            intv.id = id;
            let clump = &mut clumps[id.0 as usize - 1];
            clump.bbox.include(intv);
            clump.n_intervals += 1;
            clump.n_cells += intv.len();
        }

        let mut offset = 0;
        for clump in &mut clumps {
            clump.offset = offset;
            offset += clump.n_intervals;
        }

        // Sweep order is (plane, row, begin), so a stable bucket fill keeps
        // each clump's members sorted.
        let mut interval_order = Vec::new();
        interval_order
            .try_reserve_exact(n)
            .map_err(ClumpError::allocation("interval order", n))?;
        interval_order.resize(n, 0usize);
        let mut cursor: Vec<usize> = clumps.iter().map(|c| c.offset).collect();
        for (i, intv) in intervals.iter().enumerate() {
            let slot = &mut cursor[intv.id.0 as usize - 1];
            interval_order[*slot] = i;
            *slot += 1;
        }

        Ok(ClumpInfo {
            shape,
            threshold: options.threshold,
            comparison: options.comparison,
            min_overlap: options.min_overlap,
            intervals,
            interval_order,
            clumps,
        })
    }
}
