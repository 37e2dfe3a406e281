//! Seeded region growing of secondary-threshold cores.
//!
//! Growth is a multi-source breadth-first search over the parent footprint
//! using face neighbours (4 in a plane, plus up/down for volumes). A cell is
//! claimed at the first BFS layer that reaches it. When several parts reach
//! the same cell in the same layer, the part whose core centroid is nearest
//! in physical space wins, then the lowest part index. Cells no part can
//! reach stay unassigned.
use nalgebra::Point3;

/// Dimensions of the local working box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LocalDims {
    pub w: usize,
    pub h: usize,
    pub d: usize,
}

impl LocalDims {
    pub fn len(&self) -> usize {
        self.w * self.h * self.d
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.h + y) * self.w + x
    }

    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize, usize) {
        let x = idx % self.w;
        let y = (idx / self.w) % self.h;
        let z = idx / (self.w * self.h);
        (x, y, z)
    }

    fn for_each_neighbour(&self, idx: usize, mut f: impl FnMut(usize)) {
        let (x, y, z) = self.coords(idx);
        if x > 0 {
            f(idx - 1);
        }
        if x + 1 < self.w {
            f(idx + 1);
        }
        if y > 0 {
            f(idx - self.w);
        }
        if y + 1 < self.h {
            f(idx + self.w);
        }
        let plane = self.w * self.h;
        if z > 0 {
            f(idx - plane);
        }
        if z + 1 < self.d {
            f(idx + plane);
        }
    }
}

/// Grow `seeds` (0 = none, k = part k) over `member` cells.
///
/// `position` maps a local index to its physical location; `centroids[k-1]`
/// is the centroid of part k's core. Returns the owner of every cell.
pub(crate) fn grow_cores(
    dims: LocalDims,
    member: &[bool],
    seeds: &[u32],
    centroids: &[Point3<f64>],
    position: impl Fn(usize) -> Point3<f64>,
) -> Vec<u32> {
    debug_assert_eq!(member.len(), dims.len());
    debug_assert_eq!(seeds.len(), dims.len());

    let mut owner: Vec<u32> = seeds
        .iter()
        .zip(member)
        .map(|(&s, &m)| if m { s } else { 0 })
        .collect();
    let mut frontier: Vec<usize> = (0..owner.len()).filter(|&i| owner[i] != 0).collect();
    let mut claims: Vec<(usize, u32)> = Vec::new();

    while !frontier.is_empty() {
        claims.clear();
        for &cell in &frontier {
            let part = owner[cell];
            dims.for_each_neighbour(cell, |nb| {
                if member[nb] && owner[nb] == 0 {
                    claims.push((nb, part));
                }
            });
        }
        claims.sort_unstable();
        claims.dedup();

        frontier.clear();
        let mut i = 0;
        while i < claims.len() {
            let cell = claims[i].0;
            let mut j = i;
            while j < claims.len() && claims[j].0 == cell {
                j += 1;
            }
            let winner = if j - i == 1 {
                claims[i].1
            } else {
                let p = position(cell);
                claims[i..j]
                    .iter()
                    .map(|&(_, part)| {
                        let dist = (centroids[part as usize - 1] - p).norm_squared();
                        (dist, part)
                    })
                    .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
                    .map(|(_, part)| part)
                    .unwrap_or(claims[i].1)
            };
            owner[cell] = winner;
            frontier.push(cell);
            i = j;
        }
    }
    owner
}
