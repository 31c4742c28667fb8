//! Task registry: structural validation and the dependency graph.

use serde::Serialize;
use thiserror::Error;

use crate::index::{TaskIdx, TaskIndex};
use crate::models::{Task, TaskId, Time};

/// Structural problems in a raw task set.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MalformedInput {
    #[error("task list is empty")]
    Empty,
    #[error("task id must be positive, got {task}")]
    InvalidId { task: TaskId },
    #[error("duplicate task id {task}")]
    DuplicateId { task: TaskId },
    #[error("task {task} depends on unknown task {dependency}")]
    UnknownDependency { task: TaskId, dependency: TaskId },
    #[error("task {task} has non-positive duration (window {window_start}..{window_end})")]
    NonPositiveDuration {
        task: TaskId,
        window_start: Time,
        window_end: Time,
    },
    #[error("task {task} has a time outside the representable range")]
    WindowOverflow { task: TaskId },
}

/// Read-only adjacency over task indices.
///
/// Dependency lists are deduplicated, so a task's in-degree is the number of
/// distinct tasks it waits on.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    dependencies: Vec<Vec<TaskIdx>>,
    dependents: Vec<Vec<TaskIdx>>,
}

impl DependencyGraph {
    /// Tasks that `idx` waits on.
    pub fn dependencies_of(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.dependencies[idx as usize]
    }

    /// Tasks that wait on `idx`.
    pub fn dependents_of(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.dependents[idx as usize]
    }

    pub fn in_degree(&self, idx: TaskIdx) -> usize {
        self.dependencies[idx as usize].len()
    }

    /// Fresh working copy of every task's in-degree, indexed by task.
    pub fn in_degrees(&self) -> Vec<usize> {
        self.dependencies.iter().map(Vec::len).collect()
    }

    pub fn edge_count(&self) -> usize {
        self.dependencies.iter().map(Vec::len).sum()
    }
}

/// Validated task set plus its dependency graph.
///
/// Borrows the caller's tasks; index `i` refers to `tasks[i]`.
#[derive(Debug, Clone)]
pub struct TaskRegistry<'a> {
    tasks: &'a [Task],
    index: TaskIndex,
    durations: Vec<Time>,
    graph: DependencyGraph,
}

impl<'a> TaskRegistry<'a> {
    /// Validate `tasks` and build the graph.
    ///
    /// Fails on an empty set, a zero id, a duplicate id, a non-positive
    /// window, a window whose length overflows [`Time`], or a dependency
    /// naming an id outside the set.
    pub fn new(tasks: &'a [Task]) -> Result<Self, MalformedInput> {
        if tasks.is_empty() {
            return Err(MalformedInput::Empty);
        }

        let mut index = TaskIndex::with_capacity(tasks.len());
        let mut durations = Vec::with_capacity(tasks.len());
        for task in tasks {
            if task.id == 0 {
                return Err(MalformedInput::InvalidId { task: task.id });
            }
            if task.window_end <= task.window_start {
                return Err(MalformedInput::NonPositiveDuration {
                    task: task.id,
                    window_start: task.window_start,
                    window_end: task.window_end,
                });
            }
            let duration = task
                .duration()
                .ok_or(MalformedInput::WindowOverflow { task: task.id })?;
            if index.insert(task.id).is_none() {
                return Err(MalformedInput::DuplicateId { task: task.id });
            }
            durations.push(duration);
        }

        let n = tasks.len();
        let mut dependencies: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];
        let mut dependents: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];

        for (idx, task) in tasks.iter().enumerate() {
            let mut deps = Vec::with_capacity(task.dependencies.len());
            for &dep_id in &task.dependencies {
                let dep = index
                    .get(dep_id)
                    .ok_or(MalformedInput::UnknownDependency {
                        task: task.id,
                        dependency: dep_id,
                    })?;
                deps.push(dep);
            }
            deps.sort_unstable();
            deps.dedup();

            for &dep in &deps {
                dependents[dep as usize].push(idx as TaskIdx);
            }
            dependencies[idx] = deps;
        }

        Ok(Self {
            tasks,
            index,
            durations,
            graph: DependencyGraph {
                dependencies,
                dependents,
            },
        })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn task(&self, idx: TaskIdx) -> &'a Task {
        &self.tasks[idx as usize]
    }

    pub fn id_of(&self, idx: TaskIdx) -> TaskId {
        self.index.id_of(idx)
    }

    pub fn index_of(&self, id: TaskId) -> Option<TaskIdx> {
        self.index.get(id)
    }

    pub fn duration(&self, idx: TaskIdx) -> Time {
        self.durations[idx as usize]
    }

    /// All indices in input order.
    pub fn indices(&self) -> impl Iterator<Item = TaskIdx> {
        0..self.tasks.len() as TaskIdx
    }
}
