//! Owned single-field f32 grid in row-major layout.
//!
//! Used for local working grids (dual-threshold decomposition) and for grids
//! loaded by the tooling. Planes are stacked after each other, rows inside a
//! plane, columns fastest.
use super::traits::GridSource;
use crate::error::ClumpError;
use crate::types::GridShape;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridF32 {
    /// Number of columns
    pub nx: usize,
    /// Number of rows per plane
    pub ny: usize,
    /// Number of planes
    #[serde(default = "one")]
    pub nz: usize,
    /// Bad/missing data sentinel
    #[serde(default)]
    pub missing: Option<f32>,
    /// Backing storage, `nx * ny * nz` samples
    pub data: Vec<f32>,
}

fn one() -> usize {
    1
}

impl GridF32 {
    /// Grid of `nx × ny × nz` cells filled with `fill`.
    pub fn filled(nx: usize, ny: usize, nz: usize, fill: f32) -> Self {
        Self {
            nx,
            ny,
            nz,
            missing: None,
            data: vec![fill; nx * ny * nz],
        }
    }

    /// Zero-initialised grid.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self::filled(nx, ny, nz, 0.0)
    }

    /// Wrap an existing buffer, checking its length against the dimensions.
    pub fn from_vec(nx: usize, ny: usize, nz: usize, data: Vec<f32>) -> Result<Self, ClumpError> {
        let grid = Self {
            nx,
            ny,
            nz,
            missing: None,
            data,
        };
        grid.validate()?;
        Ok(grid)
    }

    pub fn with_missing(mut self, missing: f32) -> Self {
        self.missing = Some(missing);
        self
    }

    #[inline]
    /// Convert (x, y, plane) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize, plane: usize) -> usize {
        (plane * self.ny + y) * self.nx + x
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, plane: usize, v: f32) {
        let i = self.idx(x, y, plane);
        self.data[i] = v;
    }

    /// Fill an inclusive rectangle in one plane.
    pub fn fill_rect(&mut self, plane: usize, x0: usize, x1: usize, y0: usize, y1: usize, v: f32) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set(x, y, plane, v);
            }
        }
    }
}

impl GridSource for GridF32 {
    #[inline]
    fn shape(&self) -> GridShape {
        GridShape::new(self.nx, self.ny, self.nz)
    }

    #[inline]
    fn missing(&self) -> Option<f32> {
        self.missing
    }

    #[inline]
    fn num_samples(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn row(&self, plane: usize, y: usize) -> &[f32] {
        let start = self.idx(0, y, plane);
        &self.data[start..start + self.nx]
    }
}
