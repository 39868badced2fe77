//! Greedy FIFO dispatch engine.
//!
//! Consumes the arrival queue in order and places each job on the pool,
//! buffering jobs in holding queues while no machine can take them.
//!
//! # Algorithm
//!
//! For each arriving job `cur` with ready time `t = cur.start_time`:
//! 1. Scan the pool for a machine free by `t` (first fit by index).
//! 2. Found, all holding queues empty: assign `cur` to that machine.
//! 3. Found, jobs held: drain holding queues in drain order, each one
//!    while the pool's next free clock is `<= t`. Then assign `cur` if
//!    capacity is still free by `t`, otherwise hold it.
//! 4. Not found: hold `cur`.
//!
//! After the last arrival, every holding queue is drained fully in drain
//! order against the pool's next free clock.
//!
//! # Complexity
//! O(n * m) where n=jobs, m=machines (each assignment scans the pool).

use std::fmt;

use crate::error::{Result, SimError};
use crate::models::{Job, JobId, JobQueue, MachineId, MachinePool, Priority, Time};

/// Holding queue layout used by a dispatch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DispatchMode {
    /// One FIFO holding queue shared by all priority classes.
    SingleQueue,
    /// One FIFO holding queue per priority class, drained High first.
    Stratified,
}

const SINGLE_DRAIN_ORDER: [usize; 1] = [0];
const STRATIFIED_DRAIN_ORDER: [usize; 3] = [
    Priority::High as usize,
    Priority::Medium as usize,
    Priority::Low as usize,
];

impl DispatchMode {
    /// Mode matching a holding queue count.
    pub(crate) fn for_queue_count(count: usize) -> Self {
        if count > 1 {
            DispatchMode::Stratified
        } else {
            DispatchMode::SingleQueue
        }
    }

    /// Holding queue that buffers a job of `priority`.
    pub(crate) fn queue_for(self, priority: Priority) -> usize {
        match self {
            DispatchMode::SingleQueue => 0,
            DispatchMode::Stratified => priority.index(),
        }
    }

    /// Holding queue indices in the order they are drained.
    pub(crate) fn drain_order(self) -> &'static [usize] {
        match self {
            DispatchMode::SingleQueue => &SINGLE_DRAIN_ORDER,
            DispatchMode::Stratified => &STRATIFIED_DRAIN_ORDER,
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchMode::SingleQueue => f.write_str("single-queue FIFO"),
            DispatchMode::Stratified => f.write_str("priority-stratified FIFO"),
        }
    }
}

/// Mutable view of a problem for the duration of one run.
pub(crate) struct Engine<'a> {
    mode: DispatchMode,
    jobs: &'a mut [Job],
    machines: &'a mut MachinePool,
    holding: &'a mut [JobQueue],
    max_jobs_queued: &'a mut usize,
}

impl<'a> Engine<'a> {
    pub(crate) fn new(
        mode: DispatchMode,
        jobs: &'a mut [Job],
        machines: &'a mut MachinePool,
        holding: &'a mut [JobQueue],
        max_jobs_queued: &'a mut usize,
    ) -> Self {
        Self {
            mode,
            jobs,
            machines,
            holding,
            max_jobs_queued,
        }
    }

    /// Dispatches every job of `arrivals`, leaving it empty.
    pub(crate) fn dispatch(&mut self, arrivals: &mut JobQueue) -> Result<()> {
        while !arrivals.is_empty() {
            let current = arrivals.dequeue()?;
            let ready = self.job(current)?.start_time();

            match self.machines.available_machine(ready) {
                Some(machine) if self.nothing_held() => self.assign(machine, current)?,
                Some(_) => {
                    for &queue in self.mode.drain_order() {
                        self.drain_until(queue, ready)?;
                    }
                    let next = self.machines.next_available_clock();
                    if next <= ready {
                        self.assign_at(next, current)?;
                    } else {
                        self.hold(current)?;
                    }
                }
                None => self.hold(current)?,
            }
        }

        for &queue in self.mode.drain_order() {
            self.drain_all(queue)?;
        }
        Ok(())
    }

    fn job(&self, id: JobId) -> Result<&Job> {
        self.jobs
            .get(id.index())
            .ok_or_else(|| SimError::InvalidProblem(format!("unknown job '{id}'")))
    }

    fn nothing_held(&self) -> bool {
        self.holding.iter().all(JobQueue::is_empty)
    }

    fn assign(&mut self, machine: MachineId, id: JobId) -> Result<()> {
        let job = self
            .jobs
            .get_mut(id.index())
            .ok_or_else(|| SimError::InvalidProblem(format!("unknown job '{id}'")))?;
        self.machines.assign(machine, job)
    }

    /// Assigns to the first machine free by `time`.
    fn assign_at(&mut self, time: Time, id: JobId) -> Result<()> {
        let machine = self
            .machines
            .available_machine(time)
            .ok_or(SimError::NoAvailableMachine { time })?;
        self.assign(machine, id)
    }

    fn hold(&mut self, id: JobId) -> Result<()> {
        let job = self
            .jobs
            .get(id.index())
            .ok_or_else(|| SimError::InvalidProblem(format!("unknown job '{id}'")))?;
        let queue = self.mode.queue_for(job.priority());
        self.holding[queue].enqueue(job)?;

        let held = self.holding.iter().map(JobQueue::len).sum();
        *self.max_jobs_queued = (*self.max_jobs_queued).max(held);
        log::trace!("{} held in queue {} ({} held)", id, queue, held);
        Ok(())
    }

    /// Serves `queue` while some machine frees up no later than `ready`.
    fn drain_until(&mut self, queue: usize, ready: Time) -> Result<()> {
        let mut next = self.machines.next_available_clock();
        while !self.holding[queue].is_empty() && next <= ready {
            let id = self.holding[queue].dequeue()?;
            self.assign_at(next, id)?;
            next = self.machines.next_available_clock();
        }
        Ok(())
    }

    fn drain_all(&mut self, queue: usize) -> Result<()> {
        while !self.holding[queue].is_empty() {
            let next = self.machines.next_available_clock();
            let id = self.holding[queue].dequeue()?;
            self.assign_at(next, id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_for_queue_count() {
        assert_eq!(DispatchMode::for_queue_count(1), DispatchMode::SingleQueue);
        assert_eq!(DispatchMode::for_queue_count(3), DispatchMode::Stratified);
    }

    #[test]
    fn test_queue_for() {
        assert_eq!(DispatchMode::SingleQueue.queue_for(Priority::High), 0);
        assert_eq!(DispatchMode::Stratified.queue_for(Priority::Low), 0);
        assert_eq!(DispatchMode::Stratified.queue_for(Priority::Medium), 1);
        assert_eq!(DispatchMode::Stratified.queue_for(Priority::High), 2);
    }

    #[test]
    fn test_drain_order_highest_first() {
        assert_eq!(DispatchMode::SingleQueue.drain_order(), &[0]);
        assert_eq!(DispatchMode::Stratified.drain_order(), &[2, 1, 0]);
    }

    #[test]
    fn test_engine_leaves_arrivals_empty() {
        let mut jobs = vec![
            Job::new(0, "J.0", 0, Priority::Low, vec![4]),
            Job::new(1, "J.1", 1, Priority::High, vec![2]),
        ];
        let mut arrivals = JobQueue::new();
        for job in &jobs {
            arrivals.enqueue(job).unwrap();
        }
        let mut machines = MachinePool::new(1).unwrap();
        let mut holding = vec![JobQueue::new()];
        let mut max_held = 0;

        Engine::new(
            DispatchMode::SingleQueue,
            &mut jobs,
            &mut machines,
            &mut holding,
            &mut max_held,
        )
        .dispatch(&mut arrivals)
        .unwrap();

        assert!(arrivals.is_empty());
        assert_eq!(max_held, 1);
        assert_eq!(jobs[1].start_time(), 4);
        assert_eq!(machines.makespan(), 6);
    }
}
