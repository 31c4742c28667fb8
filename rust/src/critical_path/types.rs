//! Types for critical path estimation.

use crate::models::Time;

/// Per-task timing information from the forward and backward passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskTiming {
    /// Earliest possible start (from forward pass).
    pub earliest_start: Time,
    /// Earliest possible finish (from forward pass).
    pub earliest_finish: Time,
    /// Latest start that keeps the makespan (from backward pass).
    pub latest_start: Time,
    /// Latest finish that keeps the makespan (from backward pass).
    pub latest_finish: Time,
    /// Slack = latest_start - earliest_start.
    pub slack: Time,
}

impl TaskTiming {
    pub fn is_critical(&self) -> bool {
        self.slack == 0
    }
}
