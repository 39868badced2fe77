//! Bounded FIFO job queue.
//!
//! Used in two roles: the arrival queue (every job of a problem, in arrival
//! order) and the holding queues that buffer jobs no machine can take yet.
//!
//! # Counters
//! - **High-water mark**: the largest length the queue ever reached.
//! - **Late counters**: one per priority class, incremented on every
//!   enqueue regardless of any due time.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::{Job, JobId, Priority};
use crate::error::{Result, SimError};

/// A FIFO queue of job ids with an optional capacity bound.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobQueue {
    jobs: VecDeque<JobId>,
    max_capacity: Option<usize>,
    high_water_mark: usize,
    late_counters: [usize; Priority::COUNT],
}

impl JobQueue {
    /// Creates an unbounded queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue that holds at most `capacity` jobs.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            max_capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Appends a job at the tail.
    ///
    /// Fails with [`SimError::CapacityExceeded`] when the queue is already
    /// holding `max_capacity` jobs.
    pub fn enqueue(&mut self, job: &Job) -> Result<()> {
        if let Some(capacity) = self.max_capacity {
            if self.jobs.len() >= capacity {
                return Err(SimError::CapacityExceeded { capacity });
            }
        }
        self.jobs.push_back(job.id());
        self.high_water_mark = self.high_water_mark.max(self.jobs.len());
        self.late_counters[job.priority().index()] += 1;
        Ok(())
    }

    /// Removes and returns the head.
    pub fn dequeue(&mut self) -> Result<JobId> {
        self.jobs.pop_front().ok_or(SimError::EmptyQueueAccess)
    }

    /// Returns the head without removing it.
    pub fn peek(&self) -> Result<JobId> {
        self.jobs.front().copied().ok_or(SimError::EmptyQueueAccess)
    }

    /// Job at `position` from the head (0 = head).
    pub fn get(&self, position: usize) -> Option<JobId> {
        self.jobs.get(position).copied()
    }

    /// Number of queued jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no job is queued.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Iterates job ids from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = JobId> + '_ {
        self.jobs.iter().copied()
    }

    /// Capacity bound. `None` = unbounded.
    pub fn max_capacity(&self) -> Option<usize> {
        self.max_capacity
    }

    /// Largest length ever reached.
    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark
    }

    /// Whether the high-water mark has reached the capacity bound.
    ///
    /// Always `false` for unbounded queues.
    pub fn is_full(&self) -> bool {
        self.max_capacity
            .is_some_and(|capacity| self.high_water_mark >= capacity)
    }

    /// Enqueues recorded for a priority class.
    pub fn late_jobs(&self, priority: Priority) -> usize {
        self.late_counters[priority.index()]
    }

    /// Enqueues recorded across all classes.
    pub fn total_late_jobs(&self) -> usize {
        self.late_counters.iter().sum()
    }
}
