//! Problem summary and job listing tables.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Job, Priority, Problem, Time};

/// Input statistics for one priority class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityMix {
    pub priority: Priority,
    pub jobs: usize,
    /// Fraction of all jobs (0.0..1.0, NaN without jobs).
    pub job_share: f64,
    pub processing_time: Time,
    /// Fraction of the total processing time (NaN when it is zero).
    pub processing_share: f64,
    /// Mean processing time per job (NaN without jobs in the class).
    pub mean_processing_time: f64,
}

/// Shape of a problem before dispatching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSummary {
    pub jobs: usize,
    pub machines: usize,
    pub queues: usize,
    pub tasks_per_job: usize,
    pub total_processing_time: Time,
    pub mean_processing_time: f64,
    /// Per-class rows, Low first.
    pub priorities: Vec<PriorityMix>,
    /// Departure of the last arrival if it met no contention.
    pub last_expected_departure: Option<Time>,
}

impl ProblemSummary {
    /// Summarizes the jobs and resources of `problem`.
    pub fn from_problem(problem: &Problem) -> Self {
        let jobs = problem.number_of_jobs();
        let total = problem.total_processing_time();

        let priorities = Priority::ALL
            .iter()
            .map(|&priority| {
                let count = problem.jobs_in_priority(priority);
                let time = problem.processing_time_in_priority(priority);
                PriorityMix {
                    priority,
                    jobs: count,
                    job_share: ratio(count as f64, jobs as f64),
                    processing_time: time,
                    processing_share: ratio(time as f64, total as f64),
                    mean_processing_time: ratio(time as f64, count as f64),
                }
            })
            .collect();

        Self {
            jobs,
            machines: problem.number_of_machines(),
            queues: problem.number_of_queues(),
            tasks_per_job: problem.tasks_per_job(),
            total_processing_time: total,
            mean_processing_time: ratio(total as f64, jobs as f64),
            priorities,
            last_expected_departure: problem.jobs().last().map(Job::expected_departure_time),
        }
    }
}

impl fmt::Display for ProblemSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PROBLEM")?;
        writeln!(
            f,
            "Jobs: {}  Machines: {}  Queues: {}  Tasks per job: {}",
            self.jobs, self.machines, self.queues, self.tasks_per_job
        )?;
        writeln!(
            f,
            "{:<8} {:>8} {:>9} {:>12} {:>9} {:>12}",
            "Priority", "Jobs", "% Jobs", "Proc. time", "% Time", "Mean time"
        )?;
        for row in &self.priorities {
            writeln!(
                f,
                "{:<8} {:>8} {:>8.2}% {:>12} {:>8.2}% {:>12.2}",
                row.priority,
                row.jobs,
                row.job_share * 100.0,
                row.processing_time,
                row.processing_share * 100.0,
                row.mean_processing_time
            )?;
        }
        writeln!(
            f,
            "{:<8} {:>8} {:>9} {:>12} {:>9} {:>12.2}",
            "Total", self.jobs, "", self.total_processing_time, "", self.mean_processing_time
        )?;
        match self.last_expected_departure {
            Some(t) => writeln!(f, "Last job expected to depart at {t}"),
            None => writeln!(f, "No jobs"),
        }
    }
}

/// Per-job table of a problem, dispatched or not.
pub struct JobListing<'a> {
    problem: &'a Problem,
}

impl<'a> JobListing<'a> {
    /// Lists the jobs of `problem` in arena order.
    pub fn new(problem: &'a Problem) -> Self {
        Self { problem }
    }
}

impl fmt::Display for JobListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<8} {:<8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "Job", "Priority", "Arrival", "Proc.", "Start", "End", "Wait", "Machine"
        )?;
        for job in self.problem.jobs() {
            let machine = job
                .machine()
                .map_or_else(|| "-".to_string(), |m| m.to_string());
            writeln!(
                f,
                "{:<8} {:<8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
                job.name(),
                job.priority(),
                job.expected_arrival_time(),
                job.total_processing_time(),
                job.start_time(),
                job.departure_time(),
                job.waiting_time(),
                machine
            )?;
        }
        Ok(())
    }
}

/// `num / den`, NaN when `den` is zero.
pub(crate) fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        f64::NAN
    } else {
        num / den
    }
}
