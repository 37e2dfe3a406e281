use super::grow::{grow_cores, LocalDims};
use super::options::DualThresholdOptions;
use crate::clumping::{clump_grid, physical_size, ClumpInfo, ClumpingOptions, Footprint};
use crate::error::ClumpError;
use crate::grid::{GridF32, GridGeom, GridSource};
use crate::types::{BoundingBox, ClumpId, GridShape, Interval};
use log::debug;
use nalgebra::{Point3, Vector3};
use serde::Serialize;
use std::borrow::Cow;

/// One part of a split clump, grown back from a secondary-threshold core.
///
/// Intervals are in grid coordinates and tagged with the sub-clump id.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubClump {
    pub id: ClumpId,
    pub parent: ClumpId,
    /// Id of the core in the secondary-threshold run it grew from.
    pub core_id: ClumpId,
    pub bbox: BoundingBox,
    pub n_cells: usize,
    pub n_core_cells: usize,
    /// Physical size (km² for 2-D, km³ for 3-D).
    pub size: f64,
    pub intervals: Vec<Interval>,
}

impl SubClump {
    /// Borrow as a footprint, e.g. to decompose it again.
    pub fn footprint(&self) -> Footprint<'_> {
        Footprint {
            id: self.id,
            bbox: self.bbox,
            n_cells: self.n_cells,
            intervals: Cow::Borrowed(&self.intervals),
        }
    }
}

/// Why a parent clump was kept whole.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum SplitRejection {
    /// A single cell can never hold two cores.
    SingleCell,
    /// Fewer than two cores reached `min_area_each_part`.
    TooFewCores { found: usize },
    /// The grown parts together cover too little of the parent.
    AllPartsFraction { fraction: f64, minimum: f64 },
    /// One grown part holds too small a share of the union.
    EachPartFraction {
        core_id: ClumpId,
        fraction: f64,
        minimum: f64,
    },
}

impl std::fmt::Display for SplitRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitRejection::SingleCell => write!(f, "single-cell clump"),
            SplitRejection::TooFewCores { found } => write!(f, "too few cores ({found} < 2)"),
            SplitRejection::AllPartsFraction { fraction, minimum } => write!(
                f,
                "parts cover {:.3} of parent (need {:.3})",
                fraction, minimum
            ),
            SplitRejection::EachPartFraction {
                core_id,
                fraction,
                minimum,
            } => write!(
                f,
                "part from core {core_id} holds {:.3} of union (need {:.3})",
                fraction, minimum
            ),
        }
    }
}

/// Outcome of decomposing one parent clump.
#[derive(Clone, Debug, PartialEq)]
pub enum Decomposition {
    /// The split was accepted. Sub-clumps outside the physical size range
    /// have already been dropped and are only counted.
    Split {
        sub_clumps: Vec<SubClump>,
        dropped_by_size: usize,
    },
    /// The parent stays as it is.
    Unsplit(SplitRejection),
}

impl Decomposition {
    pub fn is_split(&self) -> bool {
        matches!(self, Decomposition::Split { .. })
    }

    /// Accepted sub-clumps; empty when the parent was kept whole.
    pub fn sub_clumps(&self) -> &[SubClump] {
        match self {
            Decomposition::Split { sub_clumps, .. } => sub_clumps,
            Decomposition::Unsplit(_) => &[],
        }
    }

    pub fn into_sub_clumps(self) -> Vec<SubClump> {
        match self {
            Decomposition::Split { sub_clumps, .. } => sub_clumps,
            Decomposition::Unsplit(_) => Vec::new(),
        }
    }

    pub fn rejection(&self) -> Option<SplitRejection> {
        match self {
            Decomposition::Split { .. } => None,
            Decomposition::Unsplit(reason) => Some(*reason),
        }
    }
}

/// Splits clumps into sub-features using a stricter secondary threshold.
///
/// Steps per parent:
/// 1. Copy the parent's samples into a local grid spanning its bounding box;
///    cells outside the footprint are left as NaN and never qualify.
/// 2. Clump the local grid at the secondary threshold; each clump is a core.
/// 3. Drop cores smaller than `min_area_each_part`; fewer than two left
///    keeps the parent whole.
/// 4. Grow the cores back over the parent footprint.
/// 5. Check the coverage fractions (all-or-nothing).
/// 6. Emit one sub-clump per part, dropping those outside the size range.
#[derive(Clone, Debug)]
pub struct DualThresholdDecomposer {
    primary: ClumpingOptions,
    options: DualThresholdOptions,
    geom: GridGeom,
}

impl DualThresholdDecomposer {
    pub fn new(
        primary: ClumpingOptions,
        options: DualThresholdOptions,
        geom: GridGeom,
    ) -> Result<Self, ClumpError> {
        options.validate(&primary)?;
        Ok(Self {
            primary,
            options,
            geom,
        })
    }

    pub fn options(&self) -> &DualThresholdOptions {
        &self.options
    }

    /// Decompose clump `id` of a run over `grid`.
    pub fn decompose_clump<G: GridSource>(
        &self,
        grid: &G,
        info: &ClumpInfo,
        id: ClumpId,
    ) -> Result<Decomposition, ClumpError> {
        let footprint = info.footprint(id)?;
        self.decompose(grid, &footprint)
    }

    /// Decompose the clump whose cells are `parent`, reading samples from
    /// `grid`.
    pub fn decompose<G: GridSource>(
        &self,
        grid: &G,
        parent: &Footprint<'_>,
    ) -> Result<Decomposition, ClumpError> {
        grid.validate()?;
        let shape = grid.shape();
        let bbox = parent.bbox;
        if bbox.max_x >= shape.nx || bbox.max_y >= shape.ny || bbox.max_z >= shape.nz {
            return Err(ClumpError::FootprintOutsideGrid { id: parent.id });
        }
        if parent.n_cells < 2 {
            return Ok(Decomposition::Unsplit(SplitRejection::SingleCell));
        }
        let dims = LocalDims {
            w: bbox.width(),
            h: bbox.height(),
            d: bbox.depth(),
        };

        let (local, member) = build_local_grid(grid, parent, dims)?;
        let secondary = ClumpingOptions {
            threshold: self.options.secondary_threshold,
            ..self.primary
        };
        let cores = clump_grid(&local, &secondary)?;

        let kept: Vec<ClumpId> = cores
            .clumps
            .iter()
            .filter(|c| c.n_cells >= self.options.min_area_each_part)
            .map(|c| c.id)
            .collect();
        debug!(
            "DualThresholdDecomposer::decompose parent={} cells={} cores={} kept={}",
            parent.id,
            parent.n_cells,
            cores.num_clumps(),
            kept.len()
        );
        if kept.len() < 2 {
            return Ok(Decomposition::Unsplit(SplitRejection::TooFewCores {
                found: kept.len(),
            }));
        }

        let position = |idx: usize| {
            let (x, y, z) = dims.coords(idx);
            cell_position(&self.geom, shape, bbox.min_x + x, bbox.min_y + y, bbox.min_z + z)
        };

        // Seed labels: part k (1-based) for every cell of the k-th kept core.
        let mut seeds = vec![0u32; dims.len()];
        let mut centroids = Vec::with_capacity(kept.len());
        let mut core_cells = Vec::with_capacity(kept.len());
        for (k, &core) in kept.iter().enumerate() {
            let part = k as u32 + 1;
            let mut sum = Vector3::<f64>::zeros();
            let mut count = 0usize;
            for intv in cores.clump_intervals(core)? {
                for x in intv.begin..=intv.end {
                    let idx = dims.index(x, intv.row, intv.plane);
                    seeds[idx] = part;
                    sum += position(idx).coords;
                    count += 1;
                }
            }
            centroids.push(Point3::from(sum / count as f64));
            core_cells.push(count);
        }

        let owner = grow_cores(dims, &member, &seeds, &centroids, position);

        let mut part_cells = vec![0usize; kept.len()];
        for &o in &owner {
            if o != 0 {
                part_cells[o as usize - 1] += 1;
            }
        }
        let grown: usize = part_cells.iter().sum();
        let all_fraction = grown as f64 / parent.n_cells as f64;
        if all_fraction < self.options.min_fraction_all_parts {
            return Ok(Decomposition::Unsplit(SplitRejection::AllPartsFraction {
                fraction: all_fraction,
                minimum: self.options.min_fraction_all_parts,
            }));
        }
        for (k, &cells) in part_cells.iter().enumerate() {
            let fraction = cells as f64 / grown as f64;
            if fraction < self.options.min_fraction_each_part {
                return Ok(Decomposition::Unsplit(SplitRejection::EachPartFraction {
                    core_id: kept[k],
                    fraction,
                    minimum: self.options.min_fraction_each_part,
                }));
            }
        }

        let part_intervals = owner_to_intervals(&owner, dims, bbox, kept.len());
        let mut sub_clumps = Vec::with_capacity(kept.len());
        let mut dropped_by_size = 0;
        for (k, intervals) in part_intervals.into_iter().enumerate() {
            let size = physical_size(intervals.iter(), shape, &self.geom);
            if size < self.options.min_feature_size || size > self.options.max_feature_size {
                dropped_by_size += 1;
                continue;
            }
            let id = ClumpId(sub_clumps.len() as u32 + 1);
            let intervals: Vec<Interval> = intervals
                .into_iter()
                .map(|mut intv| {
                    intv.id = id;
                    intv
                })
                .collect();
            let Some(fp) = Footprint::from_intervals(id, intervals) else {
                continue;
            };
            sub_clumps.push(SubClump {
                id,
                parent: parent.id,
                core_id: kept[k],
                bbox: fp.bbox,
                n_cells: fp.n_cells,
                n_core_cells: core_cells[k],
                size,
                intervals: fp.intervals.into_owned(),
            });
        }

        debug!(
            "DualThresholdDecomposer::decompose parent={} split into {} (dropped by size {})",
            parent.id,
            sub_clumps.len(),
            dropped_by_size
        );
        Ok(Decomposition::Split {
            sub_clumps,
            dropped_by_size,
        })
    }
}

/// Local copy of the parent's samples plus its membership mask.
fn build_local_grid<G: GridSource>(
    grid: &G,
    parent: &Footprint<'_>,
    dims: LocalDims,
) -> Result<(GridF32, Vec<bool>), ClumpError> {
    let bbox = parent.bbox;
    let mut samples = Vec::new();
    samples
        .try_reserve_exact(dims.len())
        .map_err(ClumpError::allocation("local grid", dims.len()))?;
    samples.resize(dims.len(), f32::NAN);
    let mut member = vec![false; dims.len()];

    for intv in parent.intervals.iter() {
        let row = grid.row(intv.plane, intv.row);
        let start = dims.index(intv.begin - bbox.min_x, intv.row - bbox.min_y, intv.plane - bbox.min_z);
        let n = intv.len();
        for (dst, &v) in samples[start..start + n].iter_mut().zip(&row[intv.begin..=intv.end]) {
            // Missing samples become NaN so they fail any threshold.
            *dst = if grid.is_valid(v) { v } else { f32::NAN };
        }
        member[start..start + n].fill(true);
    }

    let local = GridF32::from_vec(dims.w, dims.h, dims.d, samples)?;
    Ok((local, member))
}

/// Physical location of grid cell `(x, y, z)` in km.
pub(super) fn cell_position(
    geom: &GridGeom,
    shape: GridShape,
    x: usize,
    y: usize,
    z: usize,
) -> Point3<f64> {
    let s = geom.spacing(shape, z);
    Point3::new(x as f64 * s.x, y as f64 * s.y, geom.height_km(z))
}

/// Run-length encode the owner grid into per-part interval lists in grid
/// coordinates, each list in (plane, row, begin) order.
fn owner_to_intervals(
    owner: &[u32],
    dims: LocalDims,
    bbox: BoundingBox,
    n_parts: usize,
) -> Vec<Vec<Interval>> {
    let mut parts: Vec<Vec<Interval>> = vec![Vec::new(); n_parts];
    for z in 0..dims.d {
        for y in 0..dims.h {
            let base = dims.index(0, y, z);
            let row = &owner[base..base + dims.w];
            let mut x = 0;
            while x < dims.w {
                let part = row[x];
                let begin = x;
                while x < dims.w && row[x] == part {
                    x += 1;
                }
                if part != 0 {
                    parts[part as usize - 1].push(Interval::new(
                        bbox.min_z + z,
                        bbox.min_y + y,
                        bbox.min_x + begin,
                        bbox.min_x + x - 1,
                    ));
                }
            }
        }
    }
    parts
}
