//! Job model.
//!
//! A job is the unit of work dispatched onto a machine. It arrives at an
//! expected time, belongs to a priority class, and occupies its machine for
//! the sum of its task durations as one atomic block.
//!
//! # Time Representation
//! All times are non-negative integer time units relative to t=0.
//! The consumer defines what one unit means. Sums that would exceed
//! `Time::MAX` saturate; [`crate::validation::validate_jobs`] rejects
//! problems whose horizon does not fit.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::MachineId;

/// Simulation time unit.
pub type Time = u64;

/// Index of a job in its problem's job arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub usize);

impl JobId {
    /// Position in the job arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "J.{}", self.0)
    }
}

/// Priority class of a job.
///
/// Ordered `Low < Medium < High`. When holding queues are stratified,
/// each class has its own queue and higher classes drain first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Number of priority classes.
    pub const COUNT: usize = 3;

    /// All classes in ascending order.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Counter slot for this class (`Low` = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        };
        f.pad(name)
    }
}

/// A job to be dispatched.
///
/// Arrival, priority and durations are fixed at construction. The start
/// time begins at the expected arrival and is moved forward at most once,
/// when the dispatcher places the job on a machine that is still busy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    name: String,
    expected_arrival_time: Time,
    priority: Priority,
    task_durations: Vec<Time>,
    total_processing_time: Time,
    due_time: Option<Time>,
    start_time: Time,
    machine: Option<MachineId>,
}

impl Job {
    /// Creates a job with no due time.
    pub fn new(
        id: usize,
        name: impl Into<String>,
        expected_arrival_time: Time,
        priority: Priority,
        task_durations: Vec<Time>,
    ) -> Self {
        let total_processing_time = task_durations
            .iter()
            .fold(0, |total: Time, &d| total.saturating_add(d));
        Self {
            id: JobId(id),
            name: name.into(),
            expected_arrival_time,
            priority,
            task_durations,
            total_processing_time,
            due_time: None,
            start_time: expected_arrival_time,
            machine: None,
        }
    }

    /// Sets the due time (latest on-time departure).
    pub fn with_due_time(mut self, due_time: Time) -> Self {
        self.due_time = Some(due_time);
        self
    }

    /// Arena index of this job.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Display name, e.g. `J.4`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time at which the job enters the shop.
    pub fn expected_arrival_time(&self) -> Time {
        self.expected_arrival_time
    }

    /// Priority class.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Per-task durations, in task order.
    pub fn task_durations(&self) -> &[Time] {
        &self.task_durations
    }

    /// Duration of one task, if it exists.
    pub fn processing_time(&self, task: usize) -> Option<Time> {
        self.task_durations.get(task).copied()
    }

    /// Number of tasks in this job.
    pub fn task_count(&self) -> usize {
        self.task_durations.len()
    }

    /// Sum of all task durations.
    pub fn total_processing_time(&self) -> Time {
        self.total_processing_time
    }

    /// Due time. `None` = no deadline.
    pub fn due_time(&self) -> Option<Time> {
        self.due_time
    }

    /// Processing start. Equals the expected arrival until the job is
    /// placed on a busy machine.
    pub fn start_time(&self) -> Time {
        self.start_time
    }

    /// Machine the job was dispatched to, once assigned.
    pub fn machine(&self) -> Option<MachineId> {
        self.machine
    }

    /// Whether the dispatcher has placed this job.
    pub fn is_assigned(&self) -> bool {
        self.machine.is_some()
    }

    /// Departure if processed right at its expected arrival.
    pub fn expected_departure_time(&self) -> Time {
        self.expected_arrival_time
            .saturating_add(self.total_processing_time)
    }

    /// Time at which the job leaves its machine.
    #[inline]
    pub fn departure_time(&self) -> Time {
        self.start_time.saturating_add(self.total_processing_time)
    }

    /// Time spent waiting between arrival and start.
    #[inline]
    pub fn waiting_time(&self) -> Time {
        self.start_time - self.expected_arrival_time
    }

    /// Positive lateness past the due time; 0 without a due time.
    pub fn tardiness(&self) -> Time {
        match self.due_time {
            Some(due) => self.departure_time().saturating_sub(due),
            None => 0,
        }
    }

    /// Places the job on `machine`, no earlier than `machine_clock`.
    pub(crate) fn start_on(&mut self, machine: MachineId, machine_clock: Time) {
        if self.start_time < machine_clock {
            self.start_time = machine_clock;
        }
        self.machine = Some(machine);
    }
}
