//! Dependency resolution: a time-window-first topological order.

use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use thiserror::Error;

use crate::index::TaskIdx;
use crate::models::TaskId;
use crate::ordering::{ReadyKey, TieBreak};
use crate::registry::TaskRegistry;
use crate::log_debug;

/// The dependency graph is not a DAG.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("circular dependency among tasks {cycle:?} (unresolved: {unresolved:?})")]
pub struct CyclicDependency {
    /// Every task that could not be ordered, sorted by id.
    pub unresolved: Vec<TaskId>,
    /// The subset lying on or between cycles, sorted by id. Tasks that are
    /// merely downstream of a cycle are left out.
    pub cycle: Vec<TaskId>,
}

/// Perform a topological sort using Kahn's algorithm with a priority queue.
///
/// Ready tasks are emitted in `tie_break` order. Returns task indices such
/// that every task appears after all of its dependencies.
pub fn resolve_order(
    registry: &TaskRegistry<'_>,
    tie_break: TieBreak,
    verbosity: u8,
) -> Result<Vec<TaskIdx>, CyclicDependency> {
    let graph = registry.graph();
    let mut in_degree = graph.in_degrees();

    let mut ready: BinaryHeap<Reverse<ReadyKey>> = registry
        .indices()
        .filter(|&idx| in_degree[idx as usize] == 0)
        .map(|idx| Reverse(tie_break.key(registry, idx)))
        .collect();

    let mut order: Vec<TaskIdx> = Vec::with_capacity(registry.len());

    while let Some(Reverse(key)) = ready.pop() {
        log_debug!(
            verbosity,
            "resolver: emit task {} (key {}/{}, {} still ready)",
            key.task_id,
            key.primary,
            key.secondary,
            ready.len()
        );
        order.push(key.idx);

        for &dependent in graph.dependents_of(key.idx) {
            let degree = &mut in_degree[dependent as usize];
            *degree -= 1;
            if *degree == 0 {
                ready.push(Reverse(tie_break.key(registry, dependent)));
            }
        }
    }

    if order.len() != registry.len() {
        let stuck: Vec<bool> = in_degree.iter().map(|&d| d > 0).collect();
        return Err(CyclicDependency {
            unresolved: sorted_ids(registry, &stuck),
            cycle: cycle_members(registry, stuck),
        });
    }

    Ok(order)
}

/// Strip unresolved tasks that nothing unresolved depends on, repeatedly.
/// What survives sits on a cycle or on a path between cycles.
fn cycle_members(registry: &TaskRegistry<'_>, mut live: Vec<bool>) -> Vec<TaskId> {
    let graph = registry.graph();

    let mut live_dependents: Vec<usize> = registry
        .indices()
        .map(|idx| {
            if !live[idx as usize] {
                return 0;
            }
            graph
                .dependents_of(idx)
                .iter()
                .filter(|&&d| live[d as usize])
                .count()
        })
        .collect();

    let mut leaves: Vec<TaskIdx> = registry
        .indices()
        .filter(|&idx| live[idx as usize] && live_dependents[idx as usize] == 0)
        .collect();

    while let Some(idx) = leaves.pop() {
        live[idx as usize] = false;
        for &dep in graph.dependencies_of(idx) {
            let dep = dep as usize;
            if live[dep] {
                live_dependents[dep] -= 1;
                if live_dependents[dep] == 0 {
                    leaves.push(dep as TaskIdx);
                }
            }
        }
    }

    sorted_ids(registry, &live)
}

fn sorted_ids(registry: &TaskRegistry<'_>, mask: &[bool]) -> Vec<TaskId> {
    let mut ids: Vec<TaskId> = registry
        .indices()
        .filter(|&idx| mask[idx as usize])
        .map(|idx| registry.id_of(idx))
        .collect();
    ids.sort_unstable();
    ids
}
