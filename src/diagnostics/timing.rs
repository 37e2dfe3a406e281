use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Timed stages of a detector run, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    /// Interval extraction, connectivity sweep and aggregation.
    Clumping,
    /// Physical size computation and the `min_clump_size` filter.
    SizeGate,
    /// Dual-threshold decomposition of every kept clump.
    Decomposition,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Clumping => "clumping",
            Stage::SizeGate => "sizeGate",
            Stage::Decomposition => "decomposition",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub stage: Stage,
    pub elapsed_ms: f64,
}

/// Wall-clock trace of one detector run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    /// Record `stage` as having run from `start` until now.
    pub fn record(&mut self, stage: Stage, start: Instant) {
        self.stages.push(StageTiming {
            stage,
            elapsed_ms: elapsed_ms(start),
        });
    }

    pub fn stage_ms(&self, stage: Stage) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.elapsed_ms)
    }

    /// Time not attributed to any stage (report assembly, logging).
    pub fn overhead_ms(&self) -> f64 {
        let staged: f64 = self.stages.iter().map(|s| s.elapsed_ms).sum();
        (self.total_ms - staged).max(0.0)
    }
}

/// Milliseconds elapsed since `start`.
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_looked_up_by_kind() {
        let mut timings = TimingBreakdown::default();
        timings.record(Stage::Clumping, Instant::now());
        timings.stages.push(StageTiming {
            stage: Stage::SizeGate,
            elapsed_ms: 2.5,
        });
        timings.total_ms = 10.0;

        assert!(timings.stage_ms(Stage::Clumping).is_some());
        assert_eq!(timings.stage_ms(Stage::SizeGate), Some(2.5));
        assert_eq!(timings.stage_ms(Stage::Decomposition), None);
        assert!(timings.overhead_ms() <= 7.5);
    }

    #[test]
    fn stages_serialize_camel_case() {
        let timing = StageTiming {
            stage: Stage::SizeGate,
            elapsed_ms: 1.0,
        };
        let json = serde_json::to_value(timing).unwrap();
        assert_eq!(json["stage"], "sizeGate");
        assert_eq!(json["elapsedMs"], 1.0);
        assert_eq!(Stage::Decomposition.to_string(), "decomposition");
    }
}
