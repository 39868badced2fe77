//! Simulation configuration.
//!
//! Parameters for random problem generation and dispatch mode. Every field
//! has a default, so partial configurations deserialize cleanly.
//!
//! # Defaults
//!
//! | Field | Default |
//! |-------|---------|
//! | `jobs` | 150 |
//! | `machines` | 4 |
//! | `priority_queues` | `false` |
//! | `task_ranges` | 7 tasks: 10–20, 20–25, 10–20, 120–360, 120–360, 10–20, 20–25 |
//! | `arrival_gap` | 35–120 |
//! | `priority_weights` | Low 0.3, Medium 0.4, High 0.3 |
//! | `seed` | 0 |
//! | `max_threads` | `None` |

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::models::Time;
use crate::validation::validate_config;

/// An integer time range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min: Time,
    pub max: Time,
}

impl TimeRange {
    /// Creates the range `[min, max]`.
    pub fn new(min: Time, max: Time) -> Self {
        Self { min, max }
    }

    /// A range that always yields `value`.
    pub fn fixed(value: Time) -> Self {
        Self::new(value, value)
    }
}

/// Share of generated jobs falling into each priority class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl PriorityWeights {
    /// Creates weights for Low, Medium, and High.
    pub fn new(low: f64, medium: f64, high: f64) -> Self {
        Self { low, medium, high }
    }

    /// Weights indexed by `Priority::index()`.
    pub fn as_array(&self) -> [f64; 3] {
        [self.low, self.medium, self.high]
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self::new(0.3, 0.4, 0.3)
    }
}

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of jobs to generate.
    pub jobs: usize,
    /// Number of parallel machines.
    pub machines: usize,
    /// Stratify holding queues by priority (3 queues instead of 1).
    pub priority_queues: bool,
    /// Duration range of each task; one entry per task of every job.
    pub task_ranges: Vec<TimeRange>,
    /// Gap between consecutive arrivals, drawn from `[min, max)`.
    pub arrival_gap: TimeRange,
    /// Priority class distribution.
    pub priority_weights: PriorityWeights,
    /// RNG seed; equal seeds reproduce equal problems.
    pub seed: u64,
    /// Upper bound on worker threads for surrounding tooling.
    ///
    /// Not consumed by the dispatcher, which is single-threaded.
    pub max_threads: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            jobs: 150,
            machines: 4,
            priority_queues: false,
            task_ranges: vec![
                TimeRange::new(10, 20),
                TimeRange::new(20, 25),
                TimeRange::new(10, 20),
                TimeRange::new(120, 360),
                TimeRange::new(120, 360),
                TimeRange::new(10, 20),
                TimeRange::new(20, 25),
            ],
            arrival_gap: TimeRange::new(35, 120),
            priority_weights: PriorityWeights::default(),
            seed: 0,
            max_threads: None,
        }
    }
}

impl SimulationConfig {
    /// Sets the number of jobs to generate.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Sets the number of machines.
    pub fn with_machines(mut self, machines: usize) -> Self {
        self.machines = machines;
        self
    }

    /// Enables or disables priority-stratified holding queues.
    pub fn with_priority_queues(mut self, enabled: bool) -> Self {
        self.priority_queues = enabled;
        self
    }

    /// Sets one duration range per task.
    pub fn with_task_ranges(mut self, ranges: Vec<TimeRange>) -> Self {
        self.task_ranges = ranges;
        self
    }

    /// Sets the range of gaps between consecutive arrivals.
    pub fn with_arrival_gap(mut self, gap: TimeRange) -> Self {
        self.arrival_gap = gap;
        self
    }

    /// Sets the priority class mix.
    pub fn with_priority_weights(mut self, weights: PriorityWeights) -> Self {
        self.priority_weights = weights;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Caps worker threads for surrounding tooling.
    pub fn with_max_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = Some(max_threads);
        self
    }

    /// Checks the parameters, folding all issues into one error.
    pub fn validate(&self) -> Result<()> {
        validate_config(self).map_err(|errors| SimError::invalid_config(&errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SimulationConfig::default();
        assert_eq!(c.jobs, 150);
        assert_eq!(c.machines, 4);
        assert!(!c.priority_queues);
        assert_eq!(c.task_ranges.len(), 7);
        assert_eq!(c.task_ranges[3], TimeRange::new(120, 360));
        assert_eq!(c.arrival_gap, TimeRange::new(35, 120));
        assert_eq!(c.max_threads, None);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let c = SimulationConfig::default()
            .with_jobs(10)
            .with_machines(2)
            .with_priority_queues(true)
            .with_task_ranges(vec![TimeRange::fixed(5)])
            .with_arrival_gap(TimeRange::new(1, 3))
            .with_seed(42)
            .with_max_threads(8);

        assert_eq!(c.jobs, 10);
        assert_eq!(c.machines, 2);
        assert!(c.priority_queues);
        assert_eq!(c.task_ranges, vec![TimeRange::new(5, 5)]);
        assert_eq!(c.seed, 42);
        assert_eq!(c.max_threads, Some(8));
    }

    #[test]
    fn test_validate_reports_invalid_config() {
        let c = SimulationConfig::default().with_machines(0);
        assert!(matches!(c.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_serde_roundtrip() {
        let c = SimulationConfig::default().with_seed(7).with_priority_queues(true);
        let json = serde_json::to_string(&c).unwrap();
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let c: SimulationConfig =
            serde_json::from_str(r#"{ "jobs": 12, "priority_queues": true }"#).unwrap();
        assert_eq!(c.jobs, 12);
        assert!(c.priority_queues);
        assert_eq!(c.machines, 4);
        assert_eq!(c.priority_weights, PriorityWeights::default());
    }
}
