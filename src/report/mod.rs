//! Reporting on problems and dispatch results.
//!
//! - [`ProblemSummary`]: input shape per priority class
//! - [`Schedule`]: flattened job-to-machine assignments
//! - [`SolutionKpi`]: queue, waiting, tardiness, and idle metrics
//! - [`JobListing`]: one row per job
//!
//! The summary, KPI, and listing types implement `Display` as text
//! tables. Writing them anywhere is left to the caller.

mod kpi;
mod schedule;
mod summary;

pub use kpi::{MachineKpi, SolutionKpi};
pub use schedule::{Assignment, Schedule};
pub use summary::{JobListing, PriorityMix, ProblemSummary};
