//! Critical path calculation using forward and backward passes.

use crate::index::TaskIdx;
use crate::models::{TaskId, Time};
use crate::registry::{MalformedInput, TaskRegistry};
use crate::{log_checks, log_debug};

use super::types::TaskTiming;

/// Result of critical path calculation over the whole task set.
#[derive(Clone, Debug)]
pub struct CriticalPathResult {
    /// Timing for each task, indexed by task index.
    pub timings: Vec<TaskTiming>,
    /// Latest earliest-finish of any task.
    pub makespan: Time,
    /// Zero-slack tasks, in processing order.
    pub critical_tasks: Vec<TaskId>,
    /// Tasks whose earliest finish lies past their declared window end.
    pub window_overruns: Vec<TaskId>,
    /// Peak number of overlapping `[earliest_start, earliest_finish)` intervals.
    pub overlap_lower_bound: usize,
}

impl CriticalPathResult {
    pub fn timing(&self, idx: TaskIdx) -> &TaskTiming {
        &self.timings[idx as usize]
    }

    pub fn max_slack(&self) -> Time {
        self.timings.iter().map(|t| t.slack).max().unwrap_or(0)
    }
}

/// Calculate earliest/latest timings for every task.
///
/// `order` must be a topological order of the registry's graph (as produced by
/// the resolver), so every dependency is evaluated before its dependents.
///
/// Fails with [`MalformedInput::WindowOverflow`] when a dependency-adjusted
/// finish does not fit in [`Time`].
pub fn calculate_critical_path(
    registry: &TaskRegistry<'_>,
    order: &[TaskIdx],
    verbosity: u8,
) -> Result<CriticalPathResult, MalformedInput> {
    let graph = registry.graph();
    let mut timings = vec![TaskTiming::default(); registry.len()];

    // Forward pass: earliest start = max(window start, finish of every dependency)
    for &idx in order {
        let task = registry.task(idx);
        let mut earliest_start = task.window_start;
        for &dep in graph.dependencies_of(idx) {
            let dep_finish = timings[dep as usize].earliest_finish;
            if dep_finish > earliest_start {
                earliest_start = dep_finish;
            }
        }

        let earliest_finish = earliest_start
            .checked_add(registry.duration(idx))
            .ok_or(MalformedInput::WindowOverflow { task: task.id })?;

        let timing = &mut timings[idx as usize];
        timing.earliest_start = earliest_start;
        timing.earliest_finish = earliest_finish;

        if earliest_start > task.window_start {
            log_checks!(
                verbosity,
                "critical path: task {} pushed from {} to {} by dependencies",
                task.id,
                task.window_start,
                earliest_start
            );
        }
    }

    let makespan = timings.iter().map(|t| t.earliest_finish).max().unwrap_or(0);

    // Backward pass: latest finish = min latest start of dependents, or makespan for sinks
    for &idx in order.iter().rev() {
        let latest_finish = graph
            .dependents_of(idx)
            .iter()
            .map(|&d| timings[d as usize].latest_start)
            .min()
            .unwrap_or(makespan);

        let duration = registry.duration(idx);
        let timing = &mut timings[idx as usize];
        timing.latest_finish = latest_finish;
        // latest_finish >= earliest_finish, so this stays above earliest_start
        timing.latest_start = latest_finish - duration;
        // Saturates at Time::MAX for tasks far from the makespan
        timing.slack = timing.latest_start.saturating_sub(timing.earliest_start);

        log_debug!(
            verbosity,
            "critical path: task {} es={} ls={} slack={}",
            registry.id_of(idx),
            timing.earliest_start,
            timing.latest_start,
            timing.slack
        );
    }

    let critical_tasks: Vec<TaskId> = order
        .iter()
        .filter(|&&idx| timings[idx as usize].is_critical())
        .map(|&idx| registry.id_of(idx))
        .collect();

    let window_overruns: Vec<TaskId> = order
        .iter()
        .filter(|&&idx| timings[idx as usize].earliest_finish > registry.task(idx).window_end)
        .map(|&idx| registry.id_of(idx))
        .collect();

    let overlap_lower_bound = max_overlap(
        timings
            .iter()
            .map(|t| (t.earliest_start, t.earliest_finish)),
    );

    Ok(CriticalPathResult {
        timings,
        makespan,
        critical_tasks,
        window_overruns,
        overlap_lower_bound,
    })
}

/// Maximum number of half-open `[start, finish)` intervals covering one instant.
///
/// An interval ending at `t` does not overlap one starting at `t`. This is the
/// clique bound of the interval graph: no schedule can use fewer workers.
pub fn max_overlap(intervals: impl IntoIterator<Item = (Time, Time)>) -> usize {
    // (time, delta): ends (-1) sort before starts (+1) at the same instant
    let mut events: Vec<(Time, i32)> = Vec::new();
    for (start, finish) in intervals {
        events.push((start, 1));
        events.push((finish, -1));
    }
    events.sort_unstable();

    let mut current: i64 = 0;
    let mut peak: i64 = 0;
    for (_, delta) in events {
        current += i64::from(delta);
        peak = peak.max(current);
    }
    peak as usize
}
