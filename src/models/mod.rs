//! Simulation domain models.
//!
//! Provides the entities of a dispatching run and their invariants.
//! Jobs live in an arena owned by the [`Problem`]; queues and machines
//! refer to them by [`JobId`].
//!
//! # Domain Mappings
//!
//! | u-shopsim | Manufacturing | Computing | Service desk |
//! |-----------|---------------|-----------|--------------|
//! | Job | Work order | Batch job | Ticket |
//! | Machine | Workstation | Worker node | Agent |
//! | Holding queue | Buffer | Run queue | Backlog |
//! | Problem | Shift plan | Workload trace | Day of tickets |

mod job;
mod machine;
mod pool;
mod problem;
mod queue;

pub use job::{Job, JobId, Priority, Time};
pub use machine::{Machine, MachineId};
pub use pool::MachinePool;
pub use problem::Problem;
pub use queue::JobQueue;
