//! FIFO dispatching of a job stream onto a machine pool.
//!
//! Two variants share one engine:
//!
//! - **Single-queue**: one holding queue; waiting jobs are served strictly
//!   in arrival order.
//! - **Priority-stratified**: one holding queue per priority class; waiting
//!   High jobs are served before Medium, Medium before Low.
//!
//! The variant follows the problem's holding queue count.
//!
//! # Usage
//!
//! ```
//! use u_shopsim::dispatching;
//! use u_shopsim::models::{Job, Priority, Problem};
//!
//! let jobs = vec![
//!     Job::new(0, "J.0", 0, Priority::Low, vec![10]),
//!     Job::new(1, "J.1", 0, Priority::High, vec![5]),
//! ];
//! let mut problem = Problem::new(jobs, 2, false).unwrap();
//! dispatching::run(&mut problem).unwrap();
//! assert_eq!(problem.machines().makespan(), 10);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Kleinrock (1975), "Queueing Systems, Volume 1"

mod engine;

use engine::{DispatchMode, Engine};

use crate::error::{Result, SimError};
use crate::models::Problem;
use crate::validation::validate_queues;

/// Dispatches every arriving job of `problem` onto its machines.
///
/// Mutates the problem in place: job start times, machine job lists and
/// clocks, holding queue counters, and the held-jobs high-water mark.
/// Machine idle statistics are refreshed before returning.
///
/// Any internal fault aborts the run; the partially mutated problem is
/// not a valid schedule.
pub fn run(problem: &mut Problem) -> Result<()> {
    validate_queues(&problem.jobs, &problem.arrivals, &problem.holding)
        .map_err(|errors| SimError::invalid_problem(&errors))?;

    let mode = DispatchMode::for_queue_count(problem.holding.len());
    log::debug!(
        "dispatching {} jobs on {} machines ({})",
        problem.arrivals.len(),
        problem.machines.len(),
        mode
    );

    let Problem {
        jobs,
        arrivals,
        machines,
        holding,
        max_jobs_queued,
        ..
    } = &mut *problem;
    Engine::new(mode, jobs, machines, holding, max_jobs_queued).dispatch(arrivals)?;

    problem.machines.refresh_idle_stats(&problem.jobs)?;
    log::debug!(
        "dispatch finished: makespan={} idle_time={} max_jobs_queued={}",
        problem.machines.makespan(),
        problem.machines.total_idle_time(),
        problem.max_jobs_queued
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::generation::random_instance;
    use crate::models::{Job, JobId, JobQueue, MachineId, MachinePool, Priority, Time};

    fn job(id: usize, arrival: Time, duration: Time, priority: Priority) -> Job {
        Job::new(id, format!("J.{id}"), arrival, priority, vec![duration])
    }

    fn placement(problem: &Problem, id: usize) -> (MachineId, Time, Time) {
        let j = problem.job(JobId(id)).unwrap();
        (j.machine().unwrap(), j.start_time(), j.departure_time())
    }

    #[test]
    fn test_three_machines_scenario() {
        let jobs = vec![
            job(0, 0, 10, Priority::Low), // A
            job(1, 0, 5, Priority::Low),  // B
            job(2, 2, 3, Priority::Low),  // C
        ];
        let mut p = Problem::new(jobs, 3, false).unwrap();
        run(&mut p).unwrap();

        assert_eq!(placement(&p, 0), (MachineId(0), 0, 10));
        assert_eq!(placement(&p, 1), (MachineId(1), 0, 5));
        assert_eq!(placement(&p, 2), (MachineId(2), 2, 5));
        assert_eq!(p.machines().makespan(), 10);
        assert_eq!(p.machines().total_idle_time(), 2);
        assert_eq!(p.machines().total_idle_periods(), 1);
        assert_eq!(p.max_jobs_queued(), 0);
    }

    #[test]
    fn test_high_priority_drains_before_low() {
        // both machines busy until 5, then L and H wait at 0
        let jobs = vec![
            job(0, 0, 5, Priority::Low),
            job(1, 0, 5, Priority::Low),
            job(2, 0, 1, Priority::Low),  // L
            job(3, 0, 4, Priority::High), // H
        ];
        let mut p = Problem::new(jobs, 2, true).unwrap();
        run(&mut p).unwrap();

        // H is dispatched first, onto the lowest-numbered free machine
        assert_eq!(placement(&p, 3), (MachineId(0), 5, 9));
        assert_eq!(placement(&p, 2), (MachineId(1), 5, 6));
        let m0 = p.machines().machine(MachineId(0)).unwrap();
        assert_eq!(m0.jobs(), &[JobId(0), JobId(3)]);
        assert_eq!(p.max_jobs_queued(), 2);
        assert_eq!(p.holding_queue(Priority::High).unwrap().high_water_mark(), 1);
        assert_eq!(p.holding_queue(Priority::Low).unwrap().high_water_mark(), 1);
    }

    #[test]
    fn test_single_queue_keeps_arrival_order() {
        // same input without stratification: L goes first
        let jobs = vec![
            job(0, 0, 5, Priority::Low),
            job(1, 0, 5, Priority::Low),
            job(2, 0, 1, Priority::Low),
            job(3, 0, 4, Priority::High),
        ];
        let mut p = Problem::new(jobs, 2, false).unwrap();
        run(&mut p).unwrap();

        assert_eq!(placement(&p, 2), (MachineId(0), 5, 6));
        assert_eq!(placement(&p, 3), (MachineId(1), 5, 9));
        assert_eq!(p.holding_queues()[0].high_water_mark(), 2);
    }

    #[test]
    fn test_waiting_jobs_served_before_new_arrival() {
        let jobs = vec![
            job(0, 0, 10, Priority::Low),
            job(1, 1, 2, Priority::Low),
            job(2, 3, 1, Priority::Low),
            job(3, 20, 5, Priority::Low),
        ];
        let mut p = Problem::new(jobs, 1, false).unwrap();
        run(&mut p).unwrap();

        assert_eq!(placement(&p, 1), (MachineId(0), 10, 12));
        assert_eq!(placement(&p, 2), (MachineId(0), 12, 13));
        assert_eq!(placement(&p, 3), (MachineId(0), 20, 25));
        assert_eq!(p.max_jobs_queued(), 2);

        let m0 = p.machines().machine(MachineId(0)).unwrap();
        assert_eq!(m0.idle_time(), 7);
        assert_eq!(m0.idle_periods(), 1);
    }

    #[test]
    fn test_arrival_waits_behind_drained_queue() {
        let jobs = vec![
            job(0, 0, 5, Priority::Low),
            job(1, 1, 3, Priority::Low),
            job(2, 6, 2, Priority::Low),
        ];
        let mut p = Problem::new(jobs, 1, false).unwrap();
        run(&mut p).unwrap();

        // J.1 takes the machine at 5, so J.2 (ready at 6) waits until 8
        assert_eq!(placement(&p, 1), (MachineId(0), 5, 8));
        assert_eq!(placement(&p, 2), (MachineId(0), 8, 10));
        assert_eq!(p.job(JobId(2)).unwrap().waiting_time(), 2);
        assert_eq!(p.holding_queues()[0].total_late_jobs(), 2);
    }

    #[test]
    fn test_stratified_drain_during_arrivals() {
        let jobs = vec![
            job(0, 0, 10, Priority::Low),
            job(1, 1, 1, Priority::Low),
            job(2, 2, 1, Priority::High),
            job(3, 20, 1, Priority::Medium),
        ];
        let mut p = Problem::new(jobs, 1, true).unwrap();
        run(&mut p).unwrap();

        assert_eq!(placement(&p, 2), (MachineId(0), 10, 11));
        assert_eq!(placement(&p, 1), (MachineId(0), 11, 12));
        assert_eq!(placement(&p, 3), (MachineId(0), 20, 21));
        assert_eq!(p.max_jobs_queued(), 2);
        assert_eq!(p.jobs_held(), 0);
    }

    #[test]
    fn test_empty_problem_runs() {
        let mut p = Problem::new(Vec::new(), 2, true).unwrap();
        run(&mut p).unwrap();
        assert_eq!(p.machines().makespan(), 0);
        assert_eq!(p.machines().total_jobs(), 0);
        for m in p.machines().iter() {
            assert_eq!(m.idle_time(), 0);
            assert!(m.mean_idle_time().is_nan());
        }
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let jobs = vec![job(0, 0, 3, Priority::Low), job(1, 0, 3, Priority::Low)];
        let mut p = Problem::new(jobs, 1, false).unwrap();
        run(&mut p).unwrap();
        let makespan = p.machines().makespan();

        run(&mut p).unwrap();
        assert_eq!(p.machines().makespan(), makespan);
        assert_eq!(p.machines().total_jobs(), 2);
    }

    #[test]
    fn test_capacity_fault_aborts_run() {
        let jobs = vec![
            job(0, 0, 4, Priority::Low),
            job(1, 0, 4, Priority::Low),
            job(2, 0, 4, Priority::Low),
        ];
        let pool = MachinePool::new(1).unwrap();
        let mut p = Problem::with_holding_queues(jobs, pool, vec![JobQueue::bounded(1)]).unwrap();

        assert_eq!(run(&mut p), Err(SimError::CapacityExceeded { capacity: 1 }));
        // J.1 is held, J.2 was taken off the arrival queue when the hold failed
        assert_eq!(p.jobs_held(), 1);
        assert_eq!(p.max_jobs_queued(), 1);
        assert!(p.arrivals().is_empty());
        assert!(!p.job(JobId(2)).unwrap().is_assigned());
        assert_eq!(p.machines().total_jobs(), 1);
    }

    #[test]
    fn test_held_jobs_before_run_rejected() {
        let jobs = vec![job(0, 0, 2, Priority::Low), job(1, 1, 2, Priority::High)];
        let mut p = Problem::new(jobs, 1, false).unwrap();
        let stale = p.jobs[1].clone();
        p.holding[0].enqueue(&stale).unwrap();

        match run(&mut p) {
            Err(SimError::InvalidProblem(msg)) => assert!(msg.contains("Holding queue 0")),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(p.arrivals().len(), 2);
        assert_eq!(p.machines().total_jobs(), 0);
    }

    fn assert_schedule_invariants(p: &Problem) {
        // no job lost or duplicated
        assert_eq!(p.machines().total_jobs(), p.number_of_jobs());
        assert!(p.jobs().iter().all(Job::is_assigned));
        assert!(p.arrivals().is_empty());
        assert_eq!(p.jobs_held(), 0);

        for m in p.machines().iter() {
            let mut clock = 0;
            for id in m.jobs() {
                let j = p.job(*id).unwrap();
                assert_eq!(j.machine(), Some(m.id()));
                assert!(j.start_time() >= j.expected_arrival_time());
                assert!(j.start_time() >= clock);
                clock = j.departure_time();
            }
            assert_eq!(m.clock(), clock);
        }
    }

    #[test]
    fn test_generated_single_queue_invariants() {
        let config = SimulationConfig::default().with_seed(11);
        let mut p = random_instance(&config).unwrap();
        run(&mut p).unwrap();
        assert_schedule_invariants(&p);
    }

    #[test]
    fn test_generated_stratified_invariants() {
        let config = SimulationConfig::default()
            .with_seed(3)
            .with_machines(2)
            .with_priority_queues(true);
        let mut p = random_instance(&config).unwrap();
        run(&mut p).unwrap();
        assert_schedule_invariants(&p);
        assert!(p.max_jobs_queued() > 0);
    }

    #[test]
    fn test_run_is_deterministic() {
        let config = SimulationConfig::default().with_seed(5).with_priority_queues(true);
        let mut a = random_instance(&config).unwrap();
        let mut b = random_instance(&config).unwrap();
        run(&mut a).unwrap();
        run(&mut b).unwrap();

        let starts = |p: &Problem| -> Vec<(Option<MachineId>, Time)> {
            p.jobs().iter().map(|j| (j.machine(), j.start_time())).collect()
        };
        assert_eq!(starts(&a), starts(&b));
    }
}
