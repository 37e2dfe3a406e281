pub mod f32;
pub mod geom;
pub mod io;
pub mod traits;
pub mod view;

pub use self::f32::GridF32;
pub use self::geom::{GridGeom, Projection, KM_PER_DEG_AT_EQ};
pub use self::traits::{GridSource, Rows};
pub use self::view::GridView;
