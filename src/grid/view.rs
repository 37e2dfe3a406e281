use super::traits::GridSource;
use crate::error::ClumpError;
use crate::types::GridShape;

/// Borrowed view over a caller-owned sample buffer.
///
/// The clumping engine only ever reads through this view, so several runs
/// may share one buffer concurrently.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub missing: Option<f32>,
    pub data: &'a [f32],
}

impl<'a> GridView<'a> {
    pub fn new(nx: usize, ny: usize, nz: usize, data: &'a [f32]) -> Result<Self, ClumpError> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(ClumpError::InvalidDimensions { nx, ny, nz });
        }
        let expected = nx * ny * nz;
        if data.len() != expected {
            return Err(ClumpError::BufferSizeMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            nx,
            ny,
            nz,
            missing: None,
            data,
        })
    }

    pub fn plane_2d(nx: usize, ny: usize, data: &'a [f32]) -> Result<Self, ClumpError> {
        Self::new(nx, ny, 1, data)
    }

    pub fn with_missing(mut self, missing: f32) -> Self {
        self.missing = Some(missing);
        self
    }
}

impl<'a> GridSource for GridView<'a> {
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
        let start = (plane * self.ny + y) * self.nx;
        &self.data[start..start + self.nx]
    }
}

impl<'a> From<&'a super::GridF32> for GridView<'a> {
    fn from(grid: &'a super::GridF32) -> Self {
        Self {
            nx: grid.nx,
            ny: grid.ny,
            nz: grid.nz,
            missing: grid.missing,
            data: &grid.data,
        }
    }
}
