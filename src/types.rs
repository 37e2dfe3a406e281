//! Core value types shared by every clumping stage.
use serde::{Deserialize, Serialize};

/// Identifier of a clump. Dense ids start at 1; [`ClumpId::NONE`] marks an
/// interval that has not been assigned yet.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ClumpId(pub u32);

impl ClumpId {
    pub const NONE: ClumpId = ClumpId(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Zero-based position of this clump in `ClumpInfo::clumps`.
    pub fn index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }
}

impl std::fmt::Display for ClumpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of the threshold test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Cells with `value >= threshold` qualify.
    #[default]
    AboveOrEqual,
    /// Cells with `value < threshold` qualify.
    Below,
}

impl Comparison {
    #[inline]
    pub fn passes(self, value: f32, threshold: f32) -> bool {
        match self {
            Comparison::AboveOrEqual => value >= threshold,
            Comparison::Below => value < threshold,
        }
    }
}

/// Maximal run of qualifying cells in one grid row.
///
/// `row` is the row index inside its plane; `begin` and `end` are inclusive
/// column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub plane: usize,
    pub row: usize,
    pub begin: usize,
    pub end: usize,
    pub id: ClumpId,
}

impl Interval {
    pub fn new(plane: usize, row: usize, begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end, "interval begin {begin} > end {end}");
        Self {
            plane,
            row,
            begin,
            end,
            id: ClumpId::NONE,
        }
    }

    /// Number of cells covered (`end - begin + 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.begin + 1
    }

    /// Number of shared columns with `other`, 0 when disjoint.
    #[inline]
    pub fn overlap(&self, other: &Interval) -> usize {
        let lo = self.begin.max(other.begin);
        let hi = self.end.min(other.end);
        if hi >= lo {
            hi - lo + 1
        } else {
            0
        }
    }

    /// Ordering key used for clump member lists.
    #[inline]
    pub fn sort_key(&self) -> (usize, usize, usize) {
        (self.plane, self.row, self.begin)
    }
}

/// Inclusive bounding box in grid indices (x = column, y = row, z = plane).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: usize,
    pub min_y: usize,
    pub min_z: usize,
    pub max_x: usize,
    pub max_y: usize,
    pub max_z: usize,
}

impl BoundingBox {
    pub fn from_interval(intv: &Interval) -> Self {
        Self {
            min_x: intv.begin,
            min_y: intv.row,
            min_z: intv.plane,
            max_x: intv.end,
            max_y: intv.row,
            max_z: intv.plane,
        }
    }

    pub fn include(&mut self, intv: &Interval) {
        self.min_x = self.min_x.min(intv.begin);
        self.max_x = self.max_x.max(intv.end);
        self.min_y = self.min_y.min(intv.row);
        self.max_y = self.max_y.max(intv.row);
        self.min_z = self.min_z.min(intv.plane);
        self.max_z = self.max_z.max(intv.plane);
    }

    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }

    pub fn depth(&self) -> usize {
        self.max_z - self.min_z + 1
    }

    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        (self.min_x..=self.max_x).contains(&x)
            && (self.min_y..=self.max_y).contains(&y)
            && (self.min_z..=self.max_z).contains(&z)
    }
}

/// Dimensions of a grid: columns, rows per plane, planes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl GridShape {
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    pub fn num_cells(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub fn num_rows(&self) -> usize {
        self.ny * self.nz
    }

    pub fn is_3d(&self) -> bool {
        self.nz > 1
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.ny + y) * self.nx + x
    }
}
