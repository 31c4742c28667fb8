//! Core data types for the scheduling system.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::verify::Violation;

/// Caller-assigned task identifier. Must be positive.
pub type TaskId = u64;

/// Worker identifier, allocated sequentially from 1.
pub type WorkerId = u32;

/// Integer time unit used for windows and starts.
pub type Time = i64;

/// A task to be scheduled.
///
/// Input records are never mutated by the scheduler; everything computed for a
/// task during a run lives in the [`ScheduleResult`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(alias = "start")]
    pub window_start: Time,
    #[serde(alias = "end")]
    pub window_end: Time,
    /// Tasks that must finish before this one may begin.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

impl Task {
    pub fn new(
        id: TaskId,
        window_start: Time,
        window_end: Time,
        dependencies: impl IntoIterator<Item = TaskId>,
    ) -> Self {
        Self {
            id,
            window_start,
            window_end,
            dependencies: dependencies.into_iter().collect(),
        }
    }

    /// Length of the declared window, or `None` if it does not fit in [`Time`].
    pub fn duration(&self) -> Option<Time> {
        self.window_end.checked_sub(self.window_start)
    }
}

/// Where and when a task runs, plus its critical-path timing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub task_id: TaskId,
    pub worker: WorkerId,
    pub actual_start: Time,
    pub actual_finish: Time,
    pub earliest_start: Time,
    pub earliest_finish: Time,
    pub latest_start: Time,
    pub latest_finish: Time,
    pub slack: Time,
}

/// Annotations computed alongside the schedule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Largest slack of any task.
    pub max_slack: Time,
    /// Finish time of the last task.
    pub makespan: Time,
    /// Zero-slack tasks, in processing order.
    pub critical_tasks: Vec<TaskId>,
    /// Tasks pushed past their declared window end by their dependencies.
    pub window_overruns: Vec<TaskId>,
    /// Most dependency-adjusted intervals that overlap at any single instant.
    pub overlap_lower_bound: usize,
    /// Invariant violations found by the verifier (empty when verification is off).
    pub violations: Vec<Violation>,
}

/// Result of one scheduling run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub min_workers: usize,
    /// Worker id -> task ids in execution order.
    pub assignments: BTreeMap<WorkerId, Vec<TaskId>>,
    /// Topological order the allocator consumed.
    pub task_order: Vec<TaskId>,
    pub placements: BTreeMap<TaskId, Placement>,
    pub diagnostics: Diagnostics,
}

impl ScheduleResult {
    pub fn placement(&self, task_id: TaskId) -> Option<&Placement> {
        self.placements.get(&task_id)
    }

    pub fn worker_of(&self, task_id: TaskId) -> Option<WorkerId> {
        self.placement(task_id).map(|p| p.worker)
    }

    pub fn actual_start(&self, task_id: TaskId) -> Option<Time> {
        self.placement(task_id).map(|p| p.actual_start)
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}
