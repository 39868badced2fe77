//! Machine pool.
//!
//! A fixed, ordered set of identical machines. Availability is resolved
//! first-fit by index: the lowest-numbered machine that is free by the
//! requested time wins, which keeps runs reproducible.

use serde::{Deserialize, Serialize};

use super::{Job, Machine, MachineId, Time};
use crate::error::{Result, SimError};

/// The machines of a problem, indexed `0..n` in construction order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachinePool {
    machines: Vec<Machine>,
}

impl MachinePool {
    /// Creates `count` idle machines named `M.0`, `M.1`, ...
    ///
    /// A pool needs at least one machine.
    pub fn new(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(SimError::InvalidProblem(
                "machine pool needs at least one machine".into(),
            ));
        }
        let machines = (0..count).map(|i| Machine::new(i, format!("M.{i}"))).collect();
        Ok(Self { machines })
    }

    /// Number of machines.
    pub fn len(&self) -> usize {
        self.machines.len()
    }

    /// Whether the pool has no machines.
    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// Machine with the given id, if it is in the pool.
    pub fn machine(&self, id: MachineId) -> Option<&Machine> {
        self.machines.get(id.index())
    }

    /// Iterates machines in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Machine> {
        self.machines.iter()
    }

    /// First machine, by index, whose clock is at or before `time`.
    pub fn available_machine(&self, time: Time) -> Option<MachineId> {
        self.machines
            .iter()
            .find(|m| m.clock() <= time)
            .map(Machine::id)
    }

    /// Places `job` on `machine`.
    ///
    /// The job's start time is moved up to the machine's clock if the
    /// machine is still busy at the job's start time.
    pub fn assign(&mut self, machine: MachineId, job: &mut Job) -> Result<()> {
        if job.is_assigned() {
            return Err(SimError::JobAlreadyAssigned(job.id()));
        }
        let target = self
            .machines
            .get_mut(machine.index())
            .ok_or(SimError::UnknownMachine(machine))?;

        job.start_on(machine, target.clock());
        target.push(job);
        log::trace!(
            "{} -> {} start={} departure={}",
            job.id(),
            machine,
            job.start_time(),
            job.departure_time()
        );
        Ok(())
    }

    /// Earliest clock over all machines.
    pub fn next_available_clock(&self) -> Time {
        self.machines.iter().map(Machine::clock).min().unwrap_or(0)
    }

    /// Runs the idle-statistics pass on every machine.
    pub fn refresh_idle_stats(&mut self, arena: &[Job]) -> Result<()> {
        for machine in &mut self.machines {
            machine.compute_idle_stats(arena)?;
        }
        Ok(())
    }

    /// Idle time summed over all machines.
    pub fn total_idle_time(&self) -> Time {
        self.machines.iter().map(Machine::idle_time).sum()
    }

    /// Idle periods summed over all machines.
    pub fn total_idle_periods(&self) -> usize {
        self.machines.iter().map(Machine::idle_periods).sum()
    }

    /// Latest clock over all machines.
    pub fn makespan(&self) -> Time {
        self.machines.iter().map(Machine::clock).max().unwrap_or(0)
    }

    /// Jobs processed across all machines.
    pub fn total_jobs(&self) -> usize {
        self.machines.iter().map(Machine::number_of_jobs).sum()
    }
}
