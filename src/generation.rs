//! Random problem generation.
//!
//! Builds a reproducible [`Problem`] from a [`SimulationConfig`]: arrival
//! times advance by random gaps, every job draws one duration per task
//! range, and priority classes follow the configured weights.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{PriorityWeights, SimulationConfig, TimeRange};
use crate::error::Result;
use crate::models::{Job, Priority, Problem, Time};

/// Generates a random problem.
///
/// The first job arrives at 0. Each subsequent arrival adds a gap drawn
/// from `[arrival_gap.min, arrival_gap.max)`, or exactly `min` when the
/// range is a single point. Task durations are drawn from their inclusive
/// ranges. The same config and seed always yield the same problem.
pub fn random_instance(config: &SimulationConfig) -> Result<Problem> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut jobs = Vec::with_capacity(config.jobs);
    let mut arrival: Time = 0;

    for i in 0..config.jobs {
        let priority = draw_priority(&config.priority_weights, rng.random::<f64>());
        let durations = config
            .task_ranges
            .iter()
            .map(|range| rng.random_range(range.min..=range.max))
            .collect();

        jobs.push(Job::new(i, format!("J.{i}"), arrival, priority, durations));
        arrival = arrival.saturating_add(draw_gap(&config.arrival_gap, &mut rng));
    }

    log::debug!(
        "generated {} jobs for {} machines (seed {}, last arrival {})",
        jobs.len(),
        config.machines,
        config.seed,
        jobs.last().map_or(0, Job::expected_arrival_time)
    );

    Problem::new(jobs, config.machines, config.priority_queues)
}

/// Maps a uniform draw in `[0, 1)` onto a class by cumulative weight.
fn draw_priority(weights: &PriorityWeights, draw: f64) -> Priority {
    if draw < weights.low {
        Priority::Low
    } else if draw < weights.low + weights.medium {
        Priority::Medium
    } else {
        Priority::High
    }
}

fn draw_gap<R: Rng>(range: &TimeRange, rng: &mut R) -> Time {
    if range.max > range.min {
        rng.random_range(range.min..range.max)
    } else {
        range.min
    }
}
