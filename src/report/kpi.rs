//! Solution metrics (KPIs) of a dispatched problem.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Late jobs | Enqueue events into a holding queue, per class |
//! | On-time jobs | Jobs minus late jobs |
//! | Waiting time | Sum of `start - arrival` |
//! | Mean waiting time | Waiting time per late job |
//! | Tardiness | Sum and max of `max(0, departure - due)` |
//! | Idle time | Machine gaps before and between jobs |
//! | Makespan | Latest machine clock |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::fmt;

use serde::{Deserialize, Serialize};

use super::summary::ratio;
use crate::models::{MachineId, Priority, Problem, Time};

/// Per-machine row of a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineKpi {
    pub machine: MachineId,
    pub jobs: usize,
    /// Fraction of all jobs processed here (NaN without jobs).
    pub job_share: f64,
    pub idle_time: Time,
    pub idle_periods: usize,
    /// NaN when the machine was never idle.
    pub mean_idle_time: f64,
    /// Start of the first job, if any.
    pub first_start: Option<Time>,
    pub clock: Time,
    /// Jobs processed per class, indexed by [`Priority::index`].
    pub priority_jobs: [usize; Priority::COUNT],
}

/// Solution performance indicators.
///
/// Read after [`crate::dispatching::run`]; idle statistics come from the
/// machines as the run left them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionKpi {
    pub jobs: usize,
    /// High-water mark of each holding queue.
    pub queue_high_water_marks: Vec<usize>,
    /// Most jobs held at once across all queues.
    pub max_jobs_queued: usize,
    /// Late counters per class, indexed by [`Priority::index`].
    pub late_jobs: [usize; Priority::COUNT],
    pub total_late_jobs: usize,
    pub on_time_jobs: usize,
    /// Waiting time per class, indexed by [`Priority::index`].
    pub waiting_time: [Time; Priority::COUNT],
    pub total_waiting_time: Time,
    /// Waiting time per late job, per class (NaN without late jobs).
    pub mean_waiting_time: [f64; Priority::COUNT],
    pub total_tardiness: Time,
    pub max_tardiness: Time,
    pub machines: Vec<MachineKpi>,
    pub total_idle_time: Time,
    pub total_idle_periods: usize,
    pub mean_idle_time: f64,
    pub makespan: Time,
}

impl SolutionKpi {
    /// Computes KPIs from the current state of `problem`.
    pub fn calculate(problem: &Problem) -> Self {
        let jobs = problem.number_of_jobs();
        let holding = problem.holding_queues();

        let mut late_jobs = [0; Priority::COUNT];
        for priority in Priority::ALL {
            late_jobs[priority.index()] = holding.iter().map(|q| q.late_jobs(priority)).sum();
        }
        let total_late_jobs: usize = late_jobs.iter().sum();

        let mut waiting_time = [0; Priority::COUNT];
        let mut total_tardiness = 0;
        let mut max_tardiness = 0;
        for job in problem.jobs().iter().filter(|j| j.is_assigned()) {
            waiting_time[job.priority().index()] += job.waiting_time();
            let tardiness = job.tardiness();
            total_tardiness += tardiness;
            max_tardiness = max_tardiness.max(tardiness);
        }

        let mean_waiting_time: [f64; Priority::COUNT] =
            std::array::from_fn(|i| ratio(waiting_time[i] as f64, late_jobs[i] as f64));

        let pool = problem.machines();
        let machines = pool
            .iter()
            .map(|m| {
                let priority_jobs =
                    Priority::ALL.map(|priority| m.number_of_priority_jobs(priority));
                MachineKpi {
                    machine: m.id(),
                    jobs: m.number_of_jobs(),
                    job_share: ratio(m.number_of_jobs() as f64, jobs as f64),
                    idle_time: m.idle_time(),
                    idle_periods: m.idle_periods(),
                    mean_idle_time: m.mean_idle_time(),
                    first_start: m
                        .first_job()
                        .and_then(|id| problem.job(id))
                        .map(|j| j.start_time()),
                    clock: m.clock(),
                    priority_jobs,
                }
            })
            .collect();

        let total_idle_time = pool.total_idle_time();
        let total_idle_periods = pool.total_idle_periods();

        Self {
            jobs,
            queue_high_water_marks: holding.iter().map(|q| q.high_water_mark()).collect(),
            max_jobs_queued: problem.max_jobs_queued(),
            late_jobs,
            total_late_jobs,
            on_time_jobs: jobs.saturating_sub(total_late_jobs),
            waiting_time,
            total_waiting_time: waiting_time.iter().sum(),
            mean_waiting_time,
            total_tardiness,
            max_tardiness,
            machines,
            total_idle_time,
            total_idle_periods,
            mean_idle_time: ratio(total_idle_time as f64, total_idle_periods as f64),
            makespan: pool.makespan(),
        }
    }

    /// Fraction of jobs never held (NaN without jobs).
    pub fn on_time_rate(&self) -> f64 {
        ratio(self.on_time_jobs as f64, self.jobs as f64)
    }
}

impl fmt::Display for SolutionKpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "QUEUES")?;
        for (i, mark) in self.queue_high_water_marks.iter().enumerate() {
            writeln!(f, "Queue {i}: at most {mark} jobs")?;
        }
        writeln!(f, "Max jobs queued: {}", self.max_jobs_queued)?;

        writeln!(f, "JOBS")?;
        writeln!(
            f,
            "On time jobs: {} ({:.2}%)",
            self.on_time_jobs,
            self.on_time_rate() * 100.0
        )?;
        writeln!(
            f,
            "{:<8} {:>9} {:>9} {:>12} {:>12}",
            "Priority", "Late", "% Late", "Waiting", "Mean wait"
        )?;
        for priority in Priority::ALL {
            let i = priority.index();
            writeln!(
                f,
                "{:<8} {:>9} {:>8.2}% {:>12} {:>12.2}",
                priority,
                self.late_jobs[i],
                ratio(self.late_jobs[i] as f64, self.total_late_jobs as f64) * 100.0,
                self.waiting_time[i],
                self.mean_waiting_time[i]
            )?;
        }
        writeln!(
            f,
            "{:<8} {:>9} {:>9} {:>12} {:>12.2}",
            "Total",
            self.total_late_jobs,
            "",
            self.total_waiting_time,
            ratio(self.total_waiting_time as f64, self.total_late_jobs as f64)
        )?;
        writeln!(
            f,
            "Tardiness: total {} max {}",
            self.total_tardiness, self.max_tardiness
        )?;

        writeln!(f, "MACHINES")?;
        writeln!(
            f,
            "{:<8} {:>6} {:>9} {:>9} {:>8} {:>10} {:>8} {:>8} {:>6} {:>6} {:>6}",
            "Machine", "Jobs", "% Jobs", "Idle", "Periods", "Mean idle", "Start", "Clock",
            "Low", "Medium", "High"
        )?;
        for row in &self.machines {
            let start = row
                .first_start
                .map_or_else(|| "-".to_string(), |t| t.to_string());
            writeln!(
                f,
                "{:<8} {:>6} {:>8.2}% {:>9} {:>8} {:>10.2} {:>8} {:>8} {:>6} {:>6} {:>6}",
                row.machine.to_string(),
                row.jobs,
                row.job_share * 100.0,
                row.idle_time,
                row.idle_periods,
                row.mean_idle_time,
                start,
                row.clock,
                row.priority_jobs[Priority::Low.index()],
                row.priority_jobs[Priority::Medium.index()],
                row.priority_jobs[Priority::High.index()]
            )?;
        }
        writeln!(
            f,
            "{:<8} {:>6} {:>9} {:>9} {:>8} {:>10.2} {:>8} {:>8}",
            "Total",
            self.machines.iter().map(|m| m.jobs).sum::<usize>(),
            "",
            self.total_idle_time,
            self.total_idle_periods,
            self.mean_idle_time,
            "",
            self.makespan
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching;
    use crate::models::Job;

    fn job(id: usize, arrival: Time, duration: Time, priority: Priority) -> Job {
        Job::new(id, format!("J.{id}"), arrival, priority, vec![duration])
    }

    fn dispatched(stratified: bool) -> Problem {
        let jobs = vec![
            job(0, 0, 10, Priority::Low),
            job(1, 1, 2, Priority::High).with_due_time(8),
            job(2, 3, 1, Priority::Medium),
            job(3, 20, 5, Priority::Low).with_due_time(30),
        ];
        let mut p = Problem::new(jobs, 1, stratified).unwrap();
        dispatching::run(&mut p).unwrap();
        p
    }

    #[test]
    fn test_late_and_waiting_counters() {
        let kpi = SolutionKpi::calculate(&dispatched(false));

        assert_eq!(kpi.late_jobs, [0, 1, 1]);
        assert_eq!(kpi.total_late_jobs, 2);
        assert_eq!(kpi.on_time_jobs, 2);
        assert!((kpi.on_time_rate() - 0.5).abs() < 1e-10);

        // J.1 starts at 10 (waits 9), J.2 at 12 (waits 9)
        assert_eq!(kpi.waiting_time, [0, 9, 9]);
        assert_eq!(kpi.total_waiting_time, 18);
        assert!(kpi.mean_waiting_time[Priority::Low.index()].is_nan());
        assert!((kpi.mean_waiting_time[Priority::High.index()] - 9.0).abs() < 1e-10);
    }

    #[test]
    fn test_tardiness() {
        let kpi = SolutionKpi::calculate(&dispatched(false));
        // J.1 departs at 12 against due 8; J.3 departs at 25, on time
        assert_eq!(kpi.total_tardiness, 4);
        assert_eq!(kpi.max_tardiness, 4);
    }

    #[test]
    fn test_machine_rows() {
        let kpi = SolutionKpi::calculate(&dispatched(false));
        assert_eq!(kpi.machines.len(), 1);

        let m0 = &kpi.machines[0];
        assert_eq!(m0.machine, MachineId(0));
        assert_eq!(m0.jobs, 4);
        assert!((m0.job_share - 1.0).abs() < 1e-10);
        assert_eq!(m0.first_start, Some(0));
        assert_eq!(m0.clock, 25);
        assert_eq!(m0.idle_time, 7);
        assert_eq!(m0.idle_periods, 1);
        assert_eq!(m0.priority_jobs, [2, 1, 1]);

        assert_eq!(kpi.makespan, 25);
        assert!((kpi.mean_idle_time - 7.0).abs() < 1e-10);
    }

    #[test]
    fn test_queue_marks_per_mode() {
        let single = SolutionKpi::calculate(&dispatched(false));
        assert_eq!(single.queue_high_water_marks, vec![2]);
        assert_eq!(single.max_jobs_queued, 2);

        let stratified = SolutionKpi::calculate(&dispatched(true));
        assert_eq!(stratified.queue_high_water_marks, vec![0, 1, 1]);
        assert_eq!(stratified.max_jobs_queued, 2);
        assert_eq!(stratified.late_jobs, single.late_jobs);
    }

    #[test]
    fn test_undispatched_problem() {
        let p = Problem::new(vec![job(0, 0, 3, Priority::Low)], 2, false).unwrap();
        let kpi = SolutionKpi::calculate(&p);
        assert_eq!(kpi.total_late_jobs, 0);
        assert_eq!(kpi.total_waiting_time, 0);
        assert_eq!(kpi.makespan, 0);
        assert!(kpi.machines.iter().all(|m| m.first_start.is_none()));
    }

    #[test]
    fn test_table_sections() {
        let text = SolutionKpi::calculate(&dispatched(true)).to_string();
        let queues = text.find("QUEUES").unwrap();
        let jobs = text.find("JOBS").unwrap();
        let machines = text.find("MACHINES").unwrap();
        assert!(queues < jobs && jobs < machines);
        assert!(text.contains("On time jobs: 2 (50.00%)"));
        assert!(text.contains("M.0"));
    }
}
