//! Physical geometry of a grid: cell spacing, origin and vertical levels.
//!
//! Only what the clumping core needs to turn cell counts into areas or
//! volumes and to place boundary points in projection coordinates.
use crate::types::GridShape;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Kilometres per degree of latitude (and of longitude at the equator).
pub const KM_PER_DEG_AT_EQ: f64 = 111.12;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Cartesian grid, spacing in km.
    #[default]
    Flat,
    /// Regular lat/lon grid, spacing in degrees.
    LatLon,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridGeom {
    pub dx: f64,
    pub dy: f64,
    pub min_x: f64,
    pub min_y: f64,
    /// Height of each plane in km. May be empty for 2-D grids.
    pub z_levels: Vec<f64>,
    pub projection: Projection,
}

impl Default for GridGeom {
    fn default() -> Self {
        Self {
            dx: 1.0,
            dy: 1.0,
            min_x: 0.0,
            min_y: 0.0,
            z_levels: Vec::new(),
            projection: Projection::Flat,
        }
    }
}

impl GridGeom {
    pub fn flat(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            ..Default::default()
        }
    }

    pub fn with_origin(mut self, min_x: f64, min_y: f64) -> Self {
        self.min_x = min_x;
        self.min_y = min_y;
        self
    }

    pub fn with_z_levels(mut self, z_levels: Vec<f64>) -> Self {
        self.z_levels = z_levels;
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Column spacing in km. Lat/lon grids use the cosine of the latitude at
    /// the middle of the grid.
    pub fn dx_km(&self, shape: GridShape) -> f64 {
        match self.projection {
            Projection::Flat => self.dx,
            Projection::LatLon => {
                let mid_lat = self.min_y + shape.ny as f64 * self.dy / 2.0;
                self.dx * KM_PER_DEG_AT_EQ * mid_lat.to_radians().cos()
            }
        }
    }

    pub fn dy_km(&self) -> f64 {
        match self.projection {
            Projection::Flat => self.dy,
            Projection::LatLon => self.dy * KM_PER_DEG_AT_EQ,
        }
    }

    /// Thickness of `plane` in km: centred difference of the neighbouring
    /// levels, one-sided at the ends, 1.0 when fewer than two levels exist.
    pub fn dz_km(&self, plane: usize) -> f64 {
        let z = &self.z_levels;
        let n = z.len();
        if n < 2 || plane >= n {
            return 1.0;
        }
        if plane == 0 {
            z[1] - z[0]
        } else if plane == n - 1 {
            z[n - 1] - z[n - 2]
        } else {
            (z[plane + 1] - z[plane - 1]) / 2.0
        }
    }

    /// Height of `plane` in km. Planes past the last level are stacked on it
    /// with the last thickness; without levels every plane is 1 km thick.
    pub fn height_km(&self, plane: usize) -> f64 {
        match self.z_levels.len() {
            0 => plane as f64 * self.dz_km(plane),
            n if plane < n => self.z_levels[plane],
            n => self.z_levels[n - 1] + (plane - (n - 1)) as f64 * self.dz_km(n - 1),
        }
    }

    /// Physical spacing `(dx, dy, dz)` of cells in `plane`.
    pub fn spacing(&self, shape: GridShape, plane: usize) -> Vector3<f64> {
        let dz = if shape.is_3d() { self.dz_km(plane) } else { 1.0 };
        Vector3::new(self.dx_km(shape), self.dy_km(), dz)
    }

    /// Size of one cell in `plane`: km² for 2-D grids, km³ for 3-D grids.
    pub fn cell_size(&self, shape: GridShape, plane: usize) -> f64 {
        let s = self.spacing(shape, plane);
        s.x * s.y * s.z
    }

    /// Projection coordinates of the grid point `(x, y)`.
    pub fn to_world(&self, x: f64, y: f64) -> (f64, f64) {
        (self.min_x + x * self.dx, self.min_y + y * self.dy)
    }
}
