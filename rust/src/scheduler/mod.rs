//! End-to-end scheduling pipeline.
//!
//! Validates the task set, resolves a topological order, estimates the
//! critical path and allocates workers, producing a fresh [`ScheduleResult`]
//! per call.
//!
//! [`ScheduleResult`]: crate::models::ScheduleResult

mod core;

pub use core::{find_minimum_workers, ScheduleError, Scheduler};
