use clump_detector::grid::{GridF32, GridSource};
use clump_detector::Comparison;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::VecDeque;

/// Two `size`x`size` peaks at `peak` joined through the middle row by a
/// bridge of `bridge_len` cells at `bridge`.
pub fn dumbbell(size: usize, bridge_len: usize, peak: f32, bridge: f32) -> GridF32 {
    let nx = 2 * size + bridge_len;
    let mut grid = GridF32::new(nx, size, 1);
    grid.fill_rect(0, 0, size - 1, 0, size - 1, peak);
    grid.fill_rect(0, size + bridge_len, nx - 1, 0, size - 1, peak);
    grid.fill_rect(0, size, size + bridge_len - 1, size / 2, size / 2, bridge);
    grid
}

/// `nz` copies of the same plane.
pub fn stacked_planes(plane: &GridF32, nz: usize) -> GridF32 {
    let mut data = Vec::with_capacity(plane.data.len() * nz);
    for _ in 0..nz {
        data.extend_from_slice(&plane.data);
    }
    GridF32::from_vec(plane.nx, plane.ny, nz, data).unwrap()
}

/// Uniform noise in `[0, 100)`.
pub fn noise(rng: &mut StdRng, nx: usize, ny: usize, nz: usize) -> GridF32 {
    let data = (0..nx * ny * nz).map(|_| rng.gen_range(0.0..100.0)).collect();
    GridF32::from_vec(nx, ny, nz, data).unwrap()
}

/// Smooth field made of `n` Gaussian bumps with peaks in `[40, 100)`.
pub fn bumps(rng: &mut StdRng, nx: usize, ny: usize, n: usize) -> GridF32 {
    let centres: Vec<(f32, f32, f32, f32)> = (0..n)
        .map(|_| {
            (
                rng.gen_range(0.0..nx as f32),
                rng.gen_range(0.0..ny as f32),
                rng.gen_range(40.0..100.0),
                rng.gen_range(1.5..4.0),
            )
        })
        .collect();
    let mut grid = GridF32::new(nx, ny, 1);
    for y in 0..ny {
        for x in 0..nx {
            let v = centres
                .iter()
                .map(|&(cx, cy, peak, sigma)| {
                    let d2 = (x as f32 - cx).powi(2) + (y as f32 - cy).powi(2);
                    peak * (-d2 / (2.0 * sigma * sigma)).exp()
                })
                .fold(0.0f32, f32::max);
            grid.set(x, y, 0, v);
        }
    }
    grid
}

/// Reference labelling by breadth-first flood fill over face neighbours.
/// Labels are assigned in row-major order of each component's first cell.
pub fn flood_fill_labels<G: GridSource>(grid: &G, threshold: f32, comparison: Comparison) -> Vec<u32> {
    let shape = grid.shape();
    let (nx, ny, nz) = (shape.nx, shape.ny, shape.nz);
    let qualifies = |x: usize, y: usize, z: usize| {
        let v = grid.get(x, y, z);
        grid.is_valid(v) && comparison.passes(v, threshold)
    };
    let mut labels = vec![0u32; shape.num_cells()];
    let mut next = 0u32;
    let mut queue = VecDeque::new();
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                let idx = shape.index(x, y, z);
                if labels[idx] != 0 || !qualifies(x, y, z) {
                    continue;
                }
                next += 1;
                labels[idx] = next;
                queue.push_back((x, y, z));
                while let Some((cx, cy, cz)) = queue.pop_front() {
                    let mut nbrs = Vec::with_capacity(6);
                    if cx > 0 {
                        nbrs.push((cx - 1, cy, cz));
                    }
                    if cx + 1 < nx {
                        nbrs.push((cx + 1, cy, cz));
                    }
                    if cy > 0 {
                        nbrs.push((cx, cy - 1, cz));
                    }
                    if cy + 1 < ny {
                        nbrs.push((cx, cy + 1, cz));
                    }
                    if cz > 0 {
                        nbrs.push((cx, cy, cz - 1));
                    }
                    if cz + 1 < nz {
                        nbrs.push((cx, cy, cz + 1));
                    }
                    for (x2, y2, z2) in nbrs {
                        let j = shape.index(x2, y2, z2);
                        if labels[j] == 0 && qualifies(x2, y2, z2) {
                            labels[j] = next;
                            queue.push_back((x2, y2, z2));
                        }
                    }
                }
            }
        }
    }
    labels
}
