//! Post-hoc invariant checks for a finished schedule.
//!
//! Works only on the public input and output types, so callers can check a
//! schedule they received (or built) independently of the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{Placement, ScheduleResult, Task, TaskId, Time, WorkerId};

/// A broken schedule invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("task {task} has no placement")]
    Unplaced { task: TaskId },
    #[error("task {task} starts at {start}, before its earliest start {earliest_start}")]
    StartsTooEarly {
        task: TaskId,
        start: Time,
        earliest_start: Time,
    },
    #[error("task {task} starts at {start}, before task {dependency} finishes at {dependency_finish}")]
    DependencyOrder {
        task: TaskId,
        dependency: TaskId,
        start: Time,
        dependency_finish: Time,
    },
    #[error("worker {worker} runs tasks {first} and {second} at overlapping times")]
    DoubleBooked {
        worker: WorkerId,
        first: TaskId,
        second: TaskId,
    },
    #[error("worker count {reported} does not match {actual} workers in use")]
    WorkerCount { reported: usize, actual: usize },
}

/// Check `result` against `tasks`, returning every violation found.
///
/// Checks: each task is placed, no task starts before its earliest start or
/// before any dependency finishes, no worker runs two tasks at once, and the
/// reported worker count matches the assignments.
pub fn verify_schedule(tasks: &[Task], result: &ScheduleResult) -> Vec<Violation> {
    let mut violations = Vec::new();

    for task in tasks {
        let Some(placement) = result.placement(task.id) else {
            violations.push(Violation::Unplaced { task: task.id });
            continue;
        };

        if placement.actual_start < placement.earliest_start
            || placement.actual_start < task.window_start
        {
            violations.push(Violation::StartsTooEarly {
                task: task.id,
                start: placement.actual_start,
                earliest_start: placement.earliest_start.max(task.window_start),
            });
        }

        for &dep_id in &task.dependencies {
            if let Some(dep) = result.placement(dep_id) {
                if dep.actual_finish > placement.actual_start {
                    violations.push(Violation::DependencyOrder {
                        task: task.id,
                        dependency: dep_id,
                        start: placement.actual_start,
                        dependency_finish: dep.actual_finish,
                    });
                }
            }
        }
    }

    let mut by_worker: BTreeMap<WorkerId, Vec<&Placement>> = BTreeMap::new();
    for placement in result.placements.values() {
        by_worker.entry(placement.worker).or_default().push(placement);
    }

    for (&worker, placements) in by_worker.iter_mut() {
        placements.sort_by_key(|p| (p.actual_start, p.task_id));
        for pair in placements.windows(2) {
            if pair[0].actual_finish > pair[1].actual_start {
                violations.push(Violation::DoubleBooked {
                    worker,
                    first: pair[0].task_id,
                    second: pair[1].task_id,
                });
            }
        }
    }

    if result.min_workers != by_worker.len() {
        violations.push(Violation::WorkerCount {
            reported: result.min_workers,
            actual: by_worker.len(),
        });
    }

    violations
}
