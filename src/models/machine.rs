//! Machine model.
//!
//! A machine processes one job at a time. Its clock is the time at which
//! it becomes free; every assignment appends a job at or after the clock
//! and advances the clock to that job's departure, so the job list is
//! always ordered by start time.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Job, JobId, Priority, Time};
use crate::error::{Result, SimError};

/// Index of a machine in its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MachineId(pub usize);

impl MachineId {
    /// Position in the pool.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M.{}", self.0)
    }
}

/// A single processing resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    id: MachineId,
    name: String,
    clock: Time,
    jobs: Vec<JobId>,
    priority_jobs: [usize; Priority::COUNT],
    idle_time: Time,
    idle_periods: usize,
}

impl Machine {
    /// Creates an idle machine with its clock at 0.
    pub fn new(id: usize, name: impl Into<String>) -> Self {
        Self {
            id: MachineId(id),
            name: name.into(),
            clock: 0,
            jobs: Vec::new(),
            priority_jobs: [0; Priority::COUNT],
            idle_time: 0,
            idle_periods: 0,
        }
    }

    /// Pool index of this machine.
    pub fn id(&self) -> MachineId {
        self.id
    }

    /// Display name, e.g. `M.2`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time at which the machine becomes free.
    pub fn clock(&self) -> Time {
        self.clock
    }

    /// Assigned jobs in assignment order.
    pub fn jobs(&self) -> &[JobId] {
        &self.jobs
    }

    /// Number of jobs processed here.
    pub fn number_of_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Jobs of one priority class processed here.
    pub fn number_of_priority_jobs(&self, priority: Priority) -> usize {
        self.priority_jobs[priority.index()]
    }

    /// First job assigned, if any.
    pub fn first_job(&self) -> Option<JobId> {
        self.jobs.first().copied()
    }

    /// Idle time from the last [`Machine::compute_idle_stats`] pass.
    pub fn idle_time(&self) -> Time {
        self.idle_time
    }

    /// Idle periods from the last [`Machine::compute_idle_stats`] pass.
    pub fn idle_periods(&self) -> usize {
        self.idle_periods
    }

    /// Mean length of an idle period. `NaN` when there are none.
    pub fn mean_idle_time(&self) -> f64 {
        self.idle_time as f64 / self.idle_periods as f64
    }

    /// Appends a job whose start time is already at or after the clock.
    pub(crate) fn push(&mut self, job: &Job) {
        debug_assert!(job.start_time() >= self.clock);
        self.jobs.push(job.id());
        self.clock = job.departure_time();
        self.priority_jobs[job.priority().index()] += 1;
    }

    /// Recomputes idle time and idle periods from the assigned jobs.
    ///
    /// A leading gap before the first job counts as one period; every
    /// positive gap between one job's departure and the next job's start
    /// counts as another. Calling this repeatedly yields the same result.
    ///
    /// Fails with [`SimError::InvalidProblem`] if a listed job is not in
    /// `arena`; the previous statistics are kept in that case.
    pub fn compute_idle_stats(&mut self, arena: &[Job]) -> Result<()> {
        let mut idle_time = 0;
        let mut idle_periods = 0;

        let mut previous_departure: Time = 0;
        for job_id in &self.jobs {
            let job = arena.get(job_id.index()).ok_or_else(|| {
                SimError::InvalidProblem(format!("machine {} lists unknown job '{job_id}'", self.id))
            })?;
            let gap = job.start_time().saturating_sub(previous_departure);
            if gap > 0 {
                idle_time += gap;
                idle_periods += 1;
            }
            previous_departure = job.departure_time();
        }

        self.idle_time = idle_time;
        self.idle_periods = idle_periods;
        Ok(())
    }
}
