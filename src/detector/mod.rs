//! Clump detector orchestrating the full run over one grid.
//!
//! Overview
//! - Clumps the grid at the primary threshold.
//! - Computes the physical size of every clump from the grid geometry and
//!   drops clumps below `min_clump_size`.
//! - When dual-threshold options are set, decomposes each surviving clump.
//!   An accepted split replaces the parent by its sub-clumps; otherwise the
//!   parent is kept whole.
//! - Returns a flat list of [`ClumpProps`] numbered from 1, plus a
//!   [`ClumpReport`](crate::diagnostics::ClumpReport) with stage timings.
//!
//! Modules
//! - [`params`] – configuration types used by the detector and CLI.
//! - `pipeline` – the [`ClumpDetector`] implementation.
//! - `props` – the per-feature output record.

pub mod params;
mod pipeline;
mod props;

pub use params::ClumpParams;
pub use pipeline::{ClumpDetection, ClumpDetector};
pub use props::ClumpProps;
