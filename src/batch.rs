//! Fan-out of independent clumping and decomposition runs.
//!
//! Runs share only read-only input; each task builds and owns its tables, so
//! a failing task yields its own `Err` and leaves the others untouched. With
//! the `parallel` feature the tasks run on rayon's global pool, otherwise
//! sequentially in input order. Results always come back in input order.

use crate::clumping::{clump_grid, ClumpInfo, ClumpingOptions};
use crate::dual_threshold::{Decomposition, DualThresholdDecomposer};
use crate::error::ClumpError;
use crate::grid::GridSource;
use crate::types::ClumpId;
use log::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Clump every grid of `grids` (e.g. the time steps of a sequence) with the
/// same options.
pub fn clump_many<G>(grids: &[G], options: &ClumpingOptions) -> Vec<Result<ClumpInfo, ClumpError>>
where
    G: GridSource + Sync,
{
    debug!("batch::clump_many grids={}", grids.len());
    #[cfg(feature = "parallel")]
    let results: Vec<_> = grids.par_iter().map(|g| clump_grid(g, options)).collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = grids.iter().map(|g| clump_grid(g, options)).collect();

    for (i, res) in results.iter().enumerate() {
        if let Err(err) = res {
            warn!("batch::clump_many grid {} failed: {}", i, err);
        }
    }
    results
}

/// Decompose every clump of `info`, reading samples from the grid the run
/// was made on. Entry `k` belongs to clump id `k + 1`.
pub fn decompose_all<G>(
    info: &ClumpInfo,
    grid: &G,
    decomposer: &DualThresholdDecomposer,
) -> Vec<Result<Decomposition, ClumpError>>
where
    G: GridSource + Sync,
{
    debug!("batch::decompose_all clumps={}", info.num_clumps());
    let task = |id: ClumpId| decomposer.decompose_clump(grid, info, id);
    let ids = (1..=info.num_clumps() as u32).map(ClumpId);

    #[cfg(feature = "parallel")]
    let results: Vec<_> = ids.collect::<Vec<_>>().into_par_iter().map(task).collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = ids.map(task).collect();

    for (i, res) in results.iter().enumerate() {
        if let Err(err) = res {
            warn!("batch::decompose_all clump {} failed: {}", i + 1, err);
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dual_threshold::DualThresholdOptions;
    use crate::grid::{GridF32, GridGeom, GridView};

    fn blobs(n: usize) -> GridF32 {
        let mut grid = GridF32::new(4 * n, 3, 1);
        for k in 0..n {
            grid.fill_rect(0, 4 * k, 4 * k + 2, 0, 2, 30.0);
        }
        grid
    }

    #[test]
    fn clump_many_keeps_input_order() {
        let grids: Vec<GridF32> = (1..=4).map(blobs).collect();
        let results = clump_many(&grids, &ClumpingOptions::new(10.0));
        let counts: Vec<usize> = results
            .into_iter()
            .map(|r| r.unwrap().num_clumps())
            .collect();
        assert_eq!(counts, vec![1, 2, 3, 4]);
    }

    #[test]
    fn failing_task_does_not_affect_others() {
        let data = vec![0.0f32; 6];
        let grids = vec![
            GridView::new(3, 2, 1, &data).unwrap(),
            GridView {
                nx: 0,
                ny: 2,
                nz: 1,
                missing: None,
                data: &data,
            },
        ];
        let results = clump_many(&grids, &ClumpingOptions::new(-1.0));
        assert_eq!(results[0].as_ref().unwrap().num_clumps(), 1);
        assert!(matches!(
            results[1],
            Err(ClumpError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn decompose_all_covers_every_clump() {
        let mut grid = GridF32::new(12, 3, 1);
        grid.fill_rect(0, 0, 8, 1, 1, 15.0);
        grid.fill_rect(0, 0, 2, 0, 2, 30.0);
        grid.fill_rect(0, 6, 8, 0, 2, 30.0);
        grid.set(11, 2, 0, 30.0);
        let primary = ClumpingOptions::new(10.0);
        let info = clump_grid(&grid, &primary).unwrap();
        assert_eq!(info.num_clumps(), 2);

        let decomposer = DualThresholdDecomposer::new(
            primary,
            DualThresholdOptions::new(25.0),
            GridGeom::default(),
        )
        .unwrap();
        let results = decompose_all(&info, &grid, &decomposer);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().sub_clumps().len(), 2);
        assert!(!results[1].as_ref().unwrap().is_split());
    }
}
