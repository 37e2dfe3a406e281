use crate::error::ClumpError;
use crate::types::GridShape;

/// Read-only access to a dense `nx × ny × nz` float grid stored row-major
/// (column fastest, then row, then plane).
pub trait GridSource {
    fn shape(&self) -> GridShape;

    /// Bad/missing data sentinel. Cells holding it never qualify.
    fn missing(&self) -> Option<f32>;

    /// Number of samples in the backing buffer.
    fn num_samples(&self) -> usize;

    /// Samples of row `y` in `plane`, exactly `nx` long.
    fn row(&self, plane: usize, y: usize) -> &[f32];

    /// Check that the dimensions are non-zero and that the buffer holds
    /// exactly `nx * ny * nz` samples. `row` may panic on grids that fail.
    fn validate(&self) -> Result<(), ClumpError> {
        let shape = self.shape();
        if shape.nx == 0 || shape.ny == 0 || shape.nz == 0 {
            return Err(ClumpError::InvalidDimensions {
                nx: shape.nx,
                ny: shape.ny,
                nz: shape.nz,
            });
        }
        let expected = shape.nx * shape.ny * shape.nz;
        let found = self.num_samples();
        if found != expected {
            return Err(ClumpError::BufferSizeMismatch { expected, found });
        }
        Ok(())
    }

    #[inline]
    fn get(&self, x: usize, y: usize, plane: usize) -> f32 {
        self.row(plane, y)[x]
    }

    /// True when `value` is neither NaN nor the missing sentinel.
    #[inline]
    fn is_valid(&self, value: f32) -> bool {
        !value.is_nan() && self.missing().map_or(true, |m| value != m)
    }

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows {
            grid: self,
            shape: self.shape(),
            next: 0,
        }
    }
}

/// Iterator over `(plane, row_in_plane, samples)` in sweep order.
pub struct Rows<'a, G: ?Sized + GridSource> {
    grid: &'a G,
    shape: GridShape,
    next: usize,
}

impl<'a, G: GridSource> Iterator for Rows<'a, G> {
    type Item = (usize, usize, &'a [f32]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.shape.num_rows() {
            return None;
        }
        let plane = self.next / self.shape.ny;
        let y = self.next % self.shape.ny;
        self.next += 1;
        Some((plane, y, self.grid.row(plane, y)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.shape.num_rows().saturating_sub(self.next);
        (left, Some(left))
    }
}
