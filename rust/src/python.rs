//! PyO3 bindings exposing the scheduler as the `crewplan` Python module.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::config::SchedulerConfig;
use crate::models::{ScheduleResult, Task, TaskId, Time, WorkerId};
use crate::scheduler::find_minimum_workers as run_scheduler;

/// A task record (PyO3 wrapper).
#[pyclass(name = "TaskSpec")]
#[derive(Clone, Debug)]
pub struct PyTaskSpec {
    #[pyo3(get, set)]
    pub id: TaskId,
    #[pyo3(get, set)]
    pub window_start: Time,
    #[pyo3(get, set)]
    pub window_end: Time,
    #[pyo3(get, set)]
    pub dependencies: Vec<TaskId>,
}

#[pymethods]
impl PyTaskSpec {
    #[new]
    #[pyo3(signature = (id, window_start, window_end, dependencies=None))]
    fn new(
        id: TaskId,
        window_start: Time,
        window_end: Time,
        dependencies: Option<Vec<TaskId>>,
    ) -> Self {
        Self {
            id,
            window_start,
            window_end,
            dependencies: dependencies.unwrap_or_default(),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "TaskSpec(id={}, window=[{}, {}), deps={:?})",
            self.id, self.window_start, self.window_end, self.dependencies
        )
    }
}

impl From<PyTaskSpec> for Task {
    fn from(task: PyTaskSpec) -> Self {
        Task::new(task.id, task.window_start, task.window_end, task.dependencies)
    }
}

/// Flattened schedule for the Python side.
#[pyclass(name = "ScheduleSummary")]
#[derive(Clone, Debug)]
pub struct PyScheduleSummary {
    #[pyo3(get)]
    pub min_workers: usize,
    #[pyo3(get)]
    pub assignments: HashMap<WorkerId, Vec<TaskId>>,
    #[pyo3(get)]
    pub task_order: Vec<TaskId>,
    #[pyo3(get)]
    pub actual_starts: HashMap<TaskId, Time>,
    #[pyo3(get)]
    pub max_slack: Time,
    #[pyo3(get)]
    pub makespan: Time,
    #[pyo3(get)]
    pub critical_tasks: Vec<TaskId>,
    #[pyo3(get)]
    pub window_overruns: Vec<TaskId>,
}

#[pymethods]
impl PyScheduleSummary {
    fn __repr__(&self) -> String {
        format!(
            "ScheduleSummary(min_workers={}, tasks={}, makespan={})",
            self.min_workers,
            self.task_order.len(),
            self.makespan
        )
    }
}

impl From<ScheduleResult> for PyScheduleSummary {
    fn from(result: ScheduleResult) -> Self {
        Self {
            min_workers: result.min_workers,
            actual_starts: result
                .placements
                .values()
                .map(|p| (p.task_id, p.actual_start))
                .collect(),
            assignments: result.assignments.into_iter().collect(),
            task_order: result.task_order,
            max_slack: result.diagnostics.max_slack,
            makespan: result.diagnostics.makespan,
            critical_tasks: result.diagnostics.critical_tasks,
            window_overruns: result.diagnostics.window_overruns,
        }
    }
}

/// Compute the minimum number of workers for a list of tasks.
///
/// # Arguments
/// * `tasks` - List of TaskSpec records
/// * `tie_break` - Ready-queue policy: "window_start", "fewest_dependents" or "task_id"
/// * `worker_selection` - Free-worker policy: "earliest_free" or "lowest_id"
/// * `allow_empty` - Return an empty schedule for an empty list instead of raising
/// * `verify` - Check schedule invariants before returning
/// * `verbosity` - Logging level (0-3)
///
/// # Raises
/// * ValueError on malformed input, a dependency cycle, or an unknown policy name
#[pyfunction]
#[pyo3(signature = (tasks, tie_break=None, worker_selection=None, allow_empty=false, verify=true, verbosity=0))]
fn find_minimum_workers(
    tasks: Vec<PyTaskSpec>,
    tie_break: Option<String>,
    worker_selection: Option<String>,
    allow_empty: bool,
    verify: bool,
    verbosity: u8,
) -> PyResult<PyScheduleSummary> {
    let config = SchedulerConfig {
        allow_empty,
        verify,
        verbosity,
        ..SchedulerConfig::from_names(tie_break.as_deref(), worker_selection.as_deref())
            .map_err(|e| PyValueError::new_err(e.to_string()))?
    };

    let tasks: Vec<Task> = tasks.into_iter().map(Task::from).collect();

    match run_scheduler(&tasks, &config) {
        Ok(result) => Ok(result.into()),
        Err(e) => Err(PyValueError::new_err(e.to_string())),
    }
}

/// The crewplan Python module.
#[pymodule]
fn crewplan(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTaskSpec>()?;
    m.add_class::<PyScheduleSummary>()?;
    m.add_function(wrap_pyfunction!(find_minimum_workers, m)?)?;
    Ok(())
}
