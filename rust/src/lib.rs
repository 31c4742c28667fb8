//! Dependency-aware minimum-worker task scheduler.
//!
//! Given tasks with fixed time windows and prerequisite sets, computes the
//! fewest interchangeable workers that can run every task without overlap on
//! any worker and without starting a task before its prerequisites finish,
//! and produces the concrete worker-to-task assignment.
//!
//! Pipeline, leaf-first:
//! 1. [`registry`] validates the input and builds the dependency graph
//! 2. [`resolver`] orders tasks topologically (Kahn's algorithm, ties by [`ordering`])
//! 3. [`critical_path`] computes dependency-adjusted earliest starts and slack
//! 4. [`allocator`] greedily packs tasks onto workers (interval partitioning)
//! 5. [`scheduler`] assembles the [`ScheduleResult`] and optionally runs [`verify`]
//!
//! Python bindings are available behind the `python` feature.

pub mod allocator;
pub mod config;
pub mod critical_path;
pub mod index;
pub mod logging;
pub mod models;
pub mod ordering;
pub mod registry;
pub mod resolver;
pub mod scheduler;
pub mod verify;

#[cfg(feature = "python")]
mod python;

pub use allocator::{WorkerSelection, WorkerTimeline};
pub use config::{ConfigError, SchedulerConfig};
pub use critical_path::{CriticalPathResult, TaskTiming};
pub use models::{Diagnostics, Placement, ScheduleResult, Task, TaskId, Time, WorkerId};
pub use ordering::TieBreak;
pub use registry::{DependencyGraph, MalformedInput, TaskRegistry};
pub use resolver::CyclicDependency;
pub use scheduler::{find_minimum_workers, ScheduleError, Scheduler};
pub use verify::{verify_schedule, Violation};
