//! Schedule extracted from a dispatched problem.
//!
//! Flattens machine job lists into job-machine-time assignments that can
//! be queried or serialized independently of the problem.

use serde::{Deserialize, Serialize};

use crate::models::{JobId, MachineId, Priority, Problem, Time};

/// Which machine processed a job, in which position, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub job_id: JobId,
    pub job_name: String,
    pub priority: Priority,
    pub machine_id: MachineId,
    /// Position in the machine's processing order (0 = first).
    pub position: usize,
    pub start: Time,
    pub end: Time,
}

impl Assignment {
    /// Processing time on the machine.
    #[inline]
    pub fn duration(&self) -> Time {
        self.end - self.start
    }
}

/// A complete schedule, machine-major in processing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub assignments: Vec<Assignment>,
}

impl Schedule {
    /// Collects the assignments of every machine of `problem`.
    pub fn from_problem(problem: &Problem) -> Self {
        let mut assignments = Vec::with_capacity(problem.number_of_jobs());
        for machine in problem.machines().iter() {
            for (position, id) in machine.jobs().iter().enumerate() {
                let Some(job) = problem.job(*id) else {
                    log::warn!("{} lists unknown job '{}', skipped", machine.id(), id);
                    continue;
                };
                assignments.push(Assignment {
                    job_id: job.id(),
                    job_name: job.name().to_string(),
                    priority: job.priority(),
                    machine_id: machine.id(),
                    position,
                    start: job.start_time(),
                    end: job.departure_time(),
                });
            }
        }
        Self { assignments }
    }

    /// Latest end time over all assignments.
    pub fn makespan(&self) -> Time {
        self.assignments.iter().map(|a| a.end).max().unwrap_or(0)
    }

    /// Assignment of one job, if it was dispatched.
    pub fn assignment_for_job(&self, job_id: JobId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.job_id == job_id)
    }

    /// Assignments of one machine, in processing order.
    pub fn assignments_for_machine(&self, machine_id: MachineId) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.machine_id == machine_id)
            .collect()
    }

    /// Busy time of a machine over the makespan.
    ///
    /// Returns `None` for an empty schedule.
    pub fn machine_utilization(&self, machine_id: MachineId) -> Option<f64> {
        let horizon = self.makespan();
        if horizon == 0 {
            return None;
        }
        let busy: Time = self
            .assignments_for_machine(machine_id)
            .iter()
            .map(|a| a.duration())
            .sum();
        Some(busy as f64 / horizon as f64)
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}
