//! Diagnostics data model returned by the detector and written by the demo.
//!
//! `ClumpReport` is the main entry point: input shape, threshold settings,
//! per-clump summaries, decomposition outcomes and stage timings, all
//! serializable to camelCase JSON.

pub mod report;
pub mod timing;

pub use report::{
    ClumpReport, ClumpSummary, DecompositionOutcome, DecompositionSummary, InputDescriptor,
    ThresholdSettings,
};
pub use timing::{elapsed_ms, Stage, StageTiming, TimingBreakdown};
