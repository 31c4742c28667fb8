//! Core scheduler: registry -> resolver -> critical path -> allocator -> result.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::allocator::{allocate, Allocation};
use crate::config::SchedulerConfig;
use crate::critical_path::{calculate_critical_path, CriticalPathResult};
use crate::index::TaskIdx;
use crate::models::{Diagnostics, Placement, ScheduleResult, Task, TaskId, WorkerId};
use crate::registry::{MalformedInput, TaskRegistry};
use crate::resolver::{resolve_order, CyclicDependency};
use crate::verify::verify_schedule;
use crate::{log_changes, log_checks};

/// Errors that can occur during scheduling. Both are terminal for the request.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum ScheduleError {
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),
    #[error("Cyclic dependency: {0}")]
    CyclicDependency(#[from] CyclicDependency),
}

/// Minimum-worker scheduler for tasks with time windows and dependencies.
///
/// Holds only configuration; every call to [`Scheduler::schedule`] works on
/// fresh state, so one scheduler can serve concurrent callers.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Run the scheduling algorithm.
    pub fn schedule(&self, tasks: &[Task]) -> Result<ScheduleResult, ScheduleError> {
        let verbosity = self.config.verbosity;

        if tasks.is_empty() && self.config.allow_empty {
            log_changes!(verbosity, "scheduler: empty task list, returning empty schedule");
            return Ok(ScheduleResult::default());
        }

        let registry = TaskRegistry::new(tasks)?;
        log_checks!(
            verbosity,
            "scheduler: {} tasks, {} dependency edges",
            registry.len(),
            registry.graph().edge_count()
        );

        let order = resolve_order(&registry, self.config.tie_break, verbosity)?;
        let critical_path = calculate_critical_path(&registry, &order, verbosity)?;
        let allocation = allocate(
            &registry,
            &order,
            &critical_path,
            self.config.worker_selection,
            verbosity,
        );

        let mut result = assemble_result(&registry, &order, &critical_path, &allocation);

        if self.config.verify {
            let violations = verify_schedule(tasks, &result);
            for violation in &violations {
                tracing::error!("scheduler: invariant violated: {}", violation);
            }
            result.diagnostics.violations = violations;
        }

        log_changes!(
            verbosity,
            "scheduler: {} tasks on {} workers (tie_break={}, worker_selection={}, makespan={})",
            registry.len(),
            result.min_workers,
            self.config.tie_break,
            self.config.worker_selection,
            result.diagnostics.makespan
        );

        Ok(result)
    }
}

/// Compute the minimum-worker schedule for `tasks` with the given configuration.
pub fn find_minimum_workers(
    tasks: &[Task],
    config: &SchedulerConfig,
) -> Result<ScheduleResult, ScheduleError> {
    Scheduler::new(config.clone()).schedule(tasks)
}

/// Package the allocator's output, keyed by task id.
fn assemble_result(
    registry: &TaskRegistry<'_>,
    order: &[TaskIdx],
    critical_path: &CriticalPathResult,
    allocation: &Allocation,
) -> ScheduleResult {
    let assignments: BTreeMap<WorkerId, Vec<TaskId>> = allocation
        .worker_tasks
        .iter()
        .zip(&allocation.timelines)
        .map(|(tasks, timeline)| {
            (
                timeline.worker_id,
                tasks.iter().map(|&idx| registry.id_of(idx)).collect(),
            )
        })
        .collect();

    let placements: BTreeMap<TaskId, Placement> = order
        .iter()
        .filter_map(|&idx| {
            let assignment = allocation.assignments[idx as usize]?;
            let timing = critical_path.timing(idx);
            let task_id = registry.id_of(idx);
            Some((
                task_id,
                Placement {
                    task_id,
                    worker: assignment.worker,
                    actual_start: assignment.actual_start,
                    actual_finish: assignment.actual_finish,
                    earliest_start: timing.earliest_start,
                    earliest_finish: timing.earliest_finish,
                    latest_start: timing.latest_start,
                    latest_finish: timing.latest_finish,
                    slack: timing.slack,
                },
            ))
        })
        .collect();

    ScheduleResult {
        min_workers: allocation.worker_count(),
        assignments,
        task_order: order.iter().map(|&idx| registry.id_of(idx)).collect(),
        placements,
        diagnostics: Diagnostics {
            max_slack: critical_path.max_slack(),
            makespan: critical_path.makespan,
            critical_tasks: critical_path.critical_tasks.clone(),
            window_overruns: critical_path.window_overruns.clone(),
            overlap_lower_bound: critical_path.overlap_lower_bound,
            violations: Vec::new(),
        },
    }
}
