use serde::Serialize;
use std::time::Instant;

/// Wall-clock time spent in one pipeline stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Per-stage timings of one capture run.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    /// Record the time elapsed since `start` under `label`.
    pub fn record(&mut self, label: impl Into<String>, start: Instant) {
        self.stages.push(StageTiming::new(label, elapsed_ms(start)));
    }

    pub fn stage_ms(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }
}

pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_looked_up_by_label() {
        let mut t = TimingBreakdown::default();
        t.stages.push(StageTiming::new("deskew", 1.5));
        t.record("grid", Instant::now());
        assert_eq!(t.stage_ms("deskew"), Some(1.5));
        assert!(t.stage_ms("grid").is_some_and(|ms| ms >= 0.0));
        assert_eq!(t.stage_ms("render"), None);
    }
}
