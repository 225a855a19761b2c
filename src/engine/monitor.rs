//! Named timing checkpoints for a single job.

use std::fmt;
use std::time::{Duration, Instant};

/// Records elapsed time at named checkpoints.
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    start: Instant,
    checkpoints: Vec<(String, Duration)>,
}

/// Timing of one checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointTiming {
    pub name: String,
    /// Time since the monitor started
    pub at: Duration,
    /// Time since the previous checkpoint
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceReport {
    pub total: Duration,
    pub checkpoints: Vec<CheckpointTiming>,
}

impl PerformanceMonitor {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            checkpoints: Vec::new(),
        }
    }

    pub fn checkpoint(&mut self, name: impl Into<String>) {
        self.checkpoints.push((name.into(), self.start.elapsed()));
    }

    pub fn report(&self) -> PerformanceReport {
        let mut previous = Duration::ZERO;
        let checkpoints = self
            .checkpoints
            .iter()
            .map(|(name, at)| {
                let timing = CheckpointTiming {
                    name: name.clone(),
                    at: *at,
                    duration: at.saturating_sub(previous),
                };
                previous = *at;
                timing
            })
            .collect();
        PerformanceReport {
            total: self.start.elapsed(),
            checkpoints,
        }
    }

    /// Restart the clock and forget all checkpoints.
    pub fn reset(&mut self) {
        self.start = Instant::now();
        self.checkpoints.clear();
    }
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "total {:.1?}", self.total)?;
        for cp in &self.checkpoints {
            write!(f, ", {} +{:.1?}", cp.name, cp.duration)?;
        }
        Ok(())
    }
}
