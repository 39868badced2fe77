//! Error types for simulation runs.
//!
//! Every fault is detected at the point of violation and propagated to
//! the caller. A run that returns an error leaves no valid schedule.

use thiserror::Error;

use crate::models::{JobId, MachineId, Time};

/// Errors raised by the scheduling core and its collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Dequeue or peek on an empty queue.
    #[error("queue is empty")]
    EmptyQueueAccess,
    /// Enqueue on a queue already holding `capacity` jobs.
    #[error("queue capacity of {capacity} jobs exceeded")]
    CapacityExceeded { capacity: usize },
    /// The supplied problem is structurally malformed.
    #[error("invalid problem: {0}")]
    InvalidProblem(String),
    /// The simulation configuration is malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A machine id outside the pool.
    #[error("machine {0} is not part of the pool")]
    UnknownMachine(MachineId),
    /// No machine is free at a time the pool reported as available.
    #[error("no machine available at time {time}")]
    NoAvailableMachine { time: Time },
    /// A job was handed to a machine twice.
    #[error("job {0} is already assigned to a machine")]
    JobAlreadyAssigned(JobId),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SimError>;
