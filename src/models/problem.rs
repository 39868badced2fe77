//! Problem model.
//!
//! A problem owns everything one dispatch run reads and mutates: the job
//! arena, the arrival queue, the machine pool, and the holding queues.
//! It also carries summary counters precomputed at construction.
//!
//! # Holding Queues
//! One queue when priority stratification is off; three (Low, Medium, High,
//! indexed by `Priority::index()`) when it is on.
//!
//! # Serialization
//! Only the jobs, queues, pool, and held-jobs mark are serialized.
//! Deserializing runs the same validation as construction and recomputes
//! the summary counters, so a malformed document is rejected with
//! [`SimError::InvalidProblem`].

use serde::{Deserialize, Serialize};

use super::{Job, JobId, JobQueue, MachinePool, Priority, Time};
use crate::error::{Result, SimError};
use crate::validation::{validate_jobs, validate_pool, validate_queues};

/// A dispatching problem and, after a run, its solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ProblemData")]
pub struct Problem {
    pub(crate) jobs: Vec<Job>,
    pub(crate) arrivals: JobQueue,
    pub(crate) machines: MachinePool,
    pub(crate) holding: Vec<JobQueue>,
    pub(crate) max_jobs_queued: usize,
    #[serde(skip_serializing)]
    total_processing_time: Time,
    #[serde(skip_serializing)]
    jobs_in_priority: [usize; Priority::COUNT],
    #[serde(skip_serializing)]
    processing_time_in_priority: [Time; Priority::COUNT],
    #[serde(skip_serializing)]
    tasks_per_job: usize,
}

/// Serialized form of a [`Problem`], checked before conversion.
#[derive(Deserialize)]
struct ProblemData {
    jobs: Vec<Job>,
    arrivals: JobQueue,
    machines: MachinePool,
    holding: Vec<JobQueue>,
    #[serde(default)]
    max_jobs_queued: usize,
}

impl TryFrom<ProblemData> for Problem {
    type Error = SimError;

    fn try_from(data: ProblemData) -> Result<Self> {
        validate_jobs(&data.jobs).map_err(|errors| SimError::invalid_problem(&errors))?;
        validate_pool(&data.jobs, &data.machines)
            .map_err(|errors| SimError::invalid_problem(&errors))?;
        validate_queues(&data.jobs, &data.arrivals, &data.holding)
            .map_err(|errors| SimError::invalid_problem(&errors))?;

        let mut problem = Self::from_parts(data.jobs, data.arrivals, data.machines, data.holding);
        problem.max_jobs_queued = data.max_jobs_queued;
        Ok(problem)
    }
}

impl Problem {
    /// Creates a problem with `machine_count` idle machines.
    ///
    /// `jobs` must be in non-decreasing arrival order with ids equal to
    /// their positions. `stratified` selects three priority holding queues
    /// instead of one.
    pub fn new(jobs: Vec<Job>, machine_count: usize, stratified: bool) -> Result<Self> {
        let queue_count = if stratified { Priority::COUNT } else { 1 };
        let holding = (0..queue_count).map(|_| JobQueue::new()).collect();
        Self::with_holding_queues(jobs, MachinePool::new(machine_count)?, holding)
    }

    /// Creates a problem from caller-supplied holding queues.
    ///
    /// Stratification follows the queue count: 1 queue disables it, 3
    /// enable it, anything else is rejected.
    pub fn with_holding_queues(
        jobs: Vec<Job>,
        machines: MachinePool,
        holding: Vec<JobQueue>,
    ) -> Result<Self> {
        validate_jobs(&jobs).map_err(|errors| SimError::invalid_problem(&errors))?;
        validate_pool(&jobs, &machines).map_err(|errors| SimError::invalid_problem(&errors))?;

        let mut arrivals = JobQueue::bounded(jobs.len());
        for job in &jobs {
            arrivals.enqueue(job)?;
        }
        validate_queues(&jobs, &arrivals, &holding)
            .map_err(|errors| SimError::invalid_problem(&errors))?;

        Ok(Self::from_parts(jobs, arrivals, machines, holding))
    }

    /// Assembles validated parts and computes the summary counters.
    fn from_parts(
        jobs: Vec<Job>,
        arrivals: JobQueue,
        machines: MachinePool,
        holding: Vec<JobQueue>,
    ) -> Self {
        let mut jobs_in_priority = [0; Priority::COUNT];
        let mut processing_time_in_priority = [0; Priority::COUNT];
        for job in &jobs {
            jobs_in_priority[job.priority().index()] += 1;
            processing_time_in_priority[job.priority().index()] += job.total_processing_time();
        }
        let total_processing_time = processing_time_in_priority.iter().sum();
        let tasks_per_job = jobs.iter().map(Job::task_count).max().unwrap_or(0);

        Self {
            jobs,
            arrivals,
            machines,
            holding,
            max_jobs_queued: 0,
            total_processing_time,
            jobs_in_priority,
            processing_time_in_priority,
            tasks_per_job,
        }
    }

    /// All jobs, indexed by `JobId`.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Job with the given id, if it is in the arena.
    pub fn job(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(id.index())
    }

    /// Jobs not yet taken by the dispatcher, in arrival order.
    pub fn arrivals(&self) -> &JobQueue {
        &self.arrivals
    }

    /// The machine pool.
    pub fn machines(&self) -> &MachinePool {
        &self.machines
    }

    /// Holding queues, indexed by `Priority::index()` when stratified.
    pub fn holding_queues(&self) -> &[JobQueue] {
        &self.holding
    }

    /// Holding queue that buffers jobs of `priority`.
    ///
    /// Without stratification every class shares the single queue.
    pub fn holding_queue(&self, priority: Priority) -> Option<&JobQueue> {
        if self.is_stratified() {
            self.holding.get(priority.index())
        } else {
            self.holding.first()
        }
    }

    /// Whether holding queues are split by priority.
    pub fn is_stratified(&self) -> bool {
        self.holding.len() > 1
    }

    /// Number of jobs in the arena.
    pub fn number_of_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Number of machines in the pool.
    pub fn number_of_machines(&self) -> usize {
        self.machines.len()
    }

    /// Number of holding queues (1 or 3).
    pub fn number_of_queues(&self) -> usize {
        self.holding.len()
    }

    /// Largest task count over all jobs.
    pub fn tasks_per_job(&self) -> usize {
        self.tasks_per_job
    }

    /// Processing time summed over all jobs.
    pub fn total_processing_time(&self) -> Time {
        self.total_processing_time
    }

    /// Number of jobs in one priority class.
    pub fn jobs_in_priority(&self, priority: Priority) -> usize {
        self.jobs_in_priority[priority.index()]
    }

    /// Processing time summed over one priority class.
    pub fn processing_time_in_priority(&self, priority: Priority) -> Time {
        self.processing_time_in_priority[priority.index()]
    }

    /// Largest number of jobs held across all holding queues at once.
    pub fn max_jobs_queued(&self) -> usize {
        self.max_jobs_queued
    }

    /// Jobs currently held across all holding queues.
    pub fn jobs_held(&self) -> usize {
        self.holding.iter().map(JobQueue::len).sum()
    }
}
