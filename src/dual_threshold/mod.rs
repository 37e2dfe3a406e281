//! Dual-threshold decomposition of clumps into sub-features.
//!
//! A clump found at a permissive primary threshold may hold several
//! distinct features that only separate at a stricter threshold. The
//! decomposer re-clumps the parent's cells at the secondary threshold to
//! find cores, grows each core back over the parent footprint, and accepts
//! the split only when the grown parts cover enough of the parent and each
//! part holds enough of the grown union. A rejected split leaves the parent
//! whole. Accepted parts are gated by physical size.
//!
//! Sub-clumps carry their own interval lists, so they can be decomposed
//! again with a still stricter threshold.

mod decompose;
mod grow;
mod options;

pub use decompose::{Decomposition, DualThresholdDecomposer, SplitRejection, SubClump};
pub use options::DualThresholdOptions;
