//! Job-shop dispatching simulator.
//!
//! Simulates a stream of prioritized jobs arriving at a pool of identical
//! parallel machines and dispatched greedily in FIFO order, optionally
//! stratified by priority class. A run produces a concrete schedule and
//! the statistics derived from it: waiting time, tardiness, machine idle
//! time, and makespan.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Job`, `Machine`, `MachinePool`,
//!   `JobQueue`, `Problem`
//! - **`dispatching`**: The FIFO dispatcher, single-queue or stratified
//! - **`generation`**: Seeded random problem instances
//! - **`config`**: `SimulationConfig` with defaults and validation
//! - **`report`**: Schedule extraction, KPIs, and text tables
//! - **`validation`**: Input integrity checks (job ids, arrival order, queues)
//! - **`error`**: `SimError` and the crate `Result`
//!
//! # Example
//!
//! ```
//! use u_shopsim::config::SimulationConfig;
//! use u_shopsim::report::SolutionKpi;
//! use u_shopsim::{dispatching, generation};
//!
//! let config = SimulationConfig::default().with_jobs(20).with_seed(7);
//! let mut problem = generation::random_instance(&config).unwrap();
//! dispatching::run(&mut problem).unwrap();
//!
//! let kpi = SolutionKpi::calculate(&problem);
//! assert_eq!(kpi.machines.iter().map(|m| m.jobs).sum::<usize>(), 20);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Kleinrock (1975), "Queueing Systems, Volume 1"

pub mod config;
pub mod dispatching;
pub mod error;
pub mod generation;
pub mod models;
pub mod report;
pub mod validation;

pub use error::{Result, SimError};
