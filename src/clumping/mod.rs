//! Interval-based clumping of thresholded grids.
//!
//! A clumping run turns a dense 2-D or 3-D grid into connected components
//! ("clumps") of cells that pass a threshold test. It works on row
//! intervals rather than cells:
//!
//! - Extraction: every row is scanned once and its maximal qualifying runs
//!   are stored in a [`RowStore`] (one flat table, rows as index ranges).
//! - Sweep: [`ConnectivityMerger`] visits rows in (plane, row) order and
//!   connects each interval to the overlapping intervals of the previous row
//!   and, for volumes, of the same row in the previous plane. Overlap must
//!   cover at least `min_overlap` columns. Label equivalences are recorded in
//!   a disjoint-set forest instead of relabelling earlier intervals.
//! - Aggregation: [`ClumpAggregator`] resolves each interval to its canonical
//!   label, renumbers clumps densely as `1..=N` in order of first appearance,
//!   and accumulates bounding boxes, cell counts and per-clump interval lists.
//!
//! Guarantees
//! - Every qualifying cell belongs to exactly one interval and every interval
//!   to exactly one clump; clump cell counts sum to the number of qualifying
//!   cells.
//! - Ids are deterministic for a given grid and options.
//!
//! Complexity
//! - Extraction is O(cells); sweep and aggregation are O(intervals) up to the
//!   inverse-Ackermann factor of the disjoint-set forest.
//!
//! Tables grow fallibly. An allocation failure aborts the run with
//! [`ClumpError::AllocationFailed`] and drops every table the run built.

mod aggregate;
mod info;
mod merger;
mod options;
mod row_store;
mod union_find;

pub use aggregate::ClumpAggregator;
pub use info::{Clump, ClumpInfo, Footprint};
pub use merger::{ConnectivityMerger, ProvisionalLabels};
pub use options::ClumpingOptions;
pub use row_store::RowStore;
pub use union_find::DisjointSet;

pub(crate) use info::physical_size;

use crate::error::ClumpError;
use crate::grid::GridSource;
use crate::intervals::ThresholdTest;
use log::debug;

/// Clump `grid` with the given options.
pub fn clump_grid<G: GridSource>(
    grid: &G,
    options: &ClumpingOptions,
) -> Result<ClumpInfo, ClumpError> {
    options.validate()?;
    grid.validate()?;
    let shape = grid.shape();

    let test = ThresholdTest::new(options.threshold, options.comparison)
        .with_missing(grid.missing());
    let store = RowStore::build(grid, &test)?;
    let merger = ConnectivityMerger::new(options.min_overlap)?;
    let provisional = merger.sweep(&store)?;
    let n_provisional = provisional.num_provisional();
    let info = ClumpAggregator::aggregate(store, provisional, options)?;

    debug!(
        "clump_grid nx={} ny={} nz={} threshold={} intervals={} provisional={} clumps={}",
        shape.nx,
        shape.ny,
        shape.nz,
        options.threshold,
        info.num_intervals(),
        n_provisional,
        info.num_clumps()
    );
    Ok(info)
}
