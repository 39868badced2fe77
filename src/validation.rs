//! Input validation for simulation problems and configurations.
//!
//! Checks structural integrity before dispatching. Detects:
//! - Job ids that do not match their arena position
//! - Arrivals out of non-decreasing time order
//! - Arrival and processing times whose horizon overflows `Time`
//! - Holding queue counts other than 1 or 3
//! - Holding queues that are not empty before dispatch
//! - Empty machine pools and machines listing unknown jobs
//! - Malformed generation parameters (ranges, priority weights)
//!
//! All checks collect every issue found rather than stopping at the first.

use std::fmt;

use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::models::{Job, JobQueue, MachinePool, Priority, Time};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A job's id differs from its position in the job arena.
    JobIdMismatch,
    /// A job arrives earlier than the job queued before it.
    UnorderedArrivals,
    /// Latest arrival plus all processing time exceeds `Time::MAX`.
    TimeOverflow,
    /// A queue references a job that is not in the arena.
    UnknownJob,
    /// Holding queue count is neither 1 nor 3.
    QueueCountMismatch,
    /// A holding queue already holds jobs before dispatch.
    NonEmptyHoldingQueue,
    /// The machine pool is empty.
    NoMachines,
    /// A `[min, max]` range with `min > max`.
    InvalidRange,
    /// Priority weights are negative, not finite, or do not sum to one.
    InvalidPriorityWeights,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SimError {
    /// Folds problem validation errors into one [`SimError::InvalidProblem`].
    pub fn invalid_problem(errors: &[ValidationError]) -> Self {
        SimError::InvalidProblem(join(errors))
    }

    /// Folds config validation errors into one [`SimError::InvalidConfig`].
    pub fn invalid_config(errors: &[ValidationError]) -> Self {
        SimError::InvalidConfig(join(errors))
    }
}

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Validates a job arena.
///
/// Checks:
/// 1. Every job's id equals its position in the slice
/// 2. Expected arrival times are non-decreasing
/// 3. The latest arrival plus every task duration fits in `Time`, which
///    bounds every start and departure a run can produce
pub fn validate_jobs(jobs: &[Job]) -> ValidationResult {
    let mut errors = Vec::new();

    for (position, job) in jobs.iter().enumerate() {
        if job.id().index() != position {
            errors.push(ValidationError::new(
                ValidationErrorKind::JobIdMismatch,
                format!("Job '{}' is stored at position {}", job.id(), position),
            ));
        }
    }

    for pair in jobs.windows(2) {
        if pair[1].expected_arrival_time() < pair[0].expected_arrival_time() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnorderedArrivals,
                format!(
                    "Job '{}' arrives at {} before job '{}' at {}",
                    pair[1].id(),
                    pair[1].expected_arrival_time(),
                    pair[0].id(),
                    pair[0].expected_arrival_time()
                ),
            ));
        }
    }

    let latest_arrival = jobs
        .iter()
        .map(Job::expected_arrival_time)
        .max()
        .unwrap_or(0);
    let horizon = jobs.iter().try_fold(latest_arrival, |acc: Time, job| {
        job.task_durations()
            .iter()
            .try_fold(acc, |acc, &d| acc.checked_add(d))
    });
    if horizon.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::TimeOverflow,
            format!(
                "Latest arrival {latest_arrival} plus total processing time exceeds {}",
                Time::MAX
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the queues handed to the dispatcher.
///
/// Checks:
/// 1. The arrival queue only references jobs in the arena
/// 2. Arrival queue order is non-decreasing in expected arrival
/// 3. There are exactly 1 or 3 holding queues
/// 4. Every holding queue is empty
pub fn validate_queues(jobs: &[Job], arrivals: &JobQueue, holding: &[JobQueue]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut previous: Option<&Job> = None;
    for job_id in arrivals.iter() {
        let Some(job) = jobs.get(job_id.index()) else {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownJob,
                format!("Arrival queue references unknown job '{job_id}'"),
            ));
            continue;
        };
        if let Some(prev) = previous {
            if job.expected_arrival_time() < prev.expected_arrival_time() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnorderedArrivals,
                    format!(
                        "Arrival queue has '{}' at {} after '{}' at {}",
                        job.id(),
                        job.expected_arrival_time(),
                        prev.id(),
                        prev.expected_arrival_time()
                    ),
                ));
            }
        }
        previous = Some(job);
    }

    if holding.len() != 1 && holding.len() != Priority::COUNT {
        errors.push(ValidationError::new(
            ValidationErrorKind::QueueCountMismatch,
            format!(
                "Expected 1 or {} holding queues, found {}",
                Priority::COUNT,
                holding.len()
            ),
        ));
    }

    for (i, queue) in holding.iter().enumerate() {
        if !queue.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonEmptyHoldingQueue,
                format!("Holding queue {} already holds {} jobs", i, queue.len()),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a machine pool against the job arena.
///
/// Checks:
/// 1. The pool has at least one machine
/// 2. Every job listed on a machine is in the arena
pub fn validate_pool(jobs: &[Job], machines: &MachinePool) -> ValidationResult {
    let mut errors = Vec::new();

    if machines.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoMachines,
            "At least one machine is required",
        ));
    }

    for machine in machines.iter() {
        for job_id in machine.jobs() {
            if jobs.get(job_id.index()).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownJob,
                    format!("Machine {} lists unknown job '{job_id}'", machine.id()),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates generation parameters.
///
/// Checks:
/// 1. At least one machine
/// 2. Every task range and the arrival gap have `min <= max`
/// 3. Priority weights are finite, non-negative, and sum to one
pub fn validate_config(config: &SimulationConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.machines == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoMachines,
            "At least one machine is required",
        ));
    }

    for (i, range) in config.task_ranges.iter().enumerate() {
        if range.min > range.max {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRange,
                format!("Task {} range [{}, {}] is inverted", i, range.min, range.max),
            ));
        }
    }

    if config.arrival_gap.min > config.arrival_gap.max {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidRange,
            format!(
                "Arrival gap range [{}, {}] is inverted",
                config.arrival_gap.min, config.arrival_gap.max
            ),
        ));
    }

    let weights = config.priority_weights.as_array();
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidPriorityWeights,
            format!("Priority weights {weights:?} must be finite and non-negative"),
        ));
    } else {
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPriorityWeights,
                format!("The sum of the priority weights is {sum}, not 1"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
