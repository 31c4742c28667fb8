//! Greedy worker allocation over dependency-adjusted start times.
//!
//! Interval partitioning ("minimum platforms") driven by the resolver's order:
//! each task starts exactly at its earliest start and goes to a free worker if
//! one exists, otherwise to a newly opened worker.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::critical_path::CriticalPathResult;
use crate::index::TaskIdx;
use crate::models::{Time, WorkerId};
use crate::registry::TaskRegistry;
use crate::{log_changes, log_checks};

/// Which free worker receives a task when several qualify.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerSelection {
    /// Smallest `busy_until`, ties to the lower worker id (min-heap).
    #[default]
    EarliestFree,
    /// Lowest worker id among free workers (linear scan).
    LowestId,
}

impl WorkerSelection {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EarliestFree => "earliest_free",
            Self::LowestId => "lowest_id",
        }
    }
}

impl fmt::Display for WorkerSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WorkerSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "earliest_free" => Ok(Self::EarliestFree),
            "lowest_id" => Ok(Self::LowestId),
            other => Err(ConfigError::UnknownWorkerSelection(other.to_string())),
        }
    }
}

/// One worker's state: the finish time of its latest task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerTimeline {
    pub worker_id: WorkerId,
    pub busy_until: Time,
}

/// Where one task landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub worker: WorkerId,
    pub actual_start: Time,
    pub actual_finish: Time,
}

/// Output of the allocator, indexed by task index.
#[derive(Clone, Debug)]
pub struct Allocation {
    pub timelines: Vec<WorkerTimeline>,
    /// Per-task assignment, indexed by task index.
    pub assignments: Vec<Option<Assignment>>,
    /// Task indices per worker (position = worker id - 1), in execution order.
    pub worker_tasks: Vec<Vec<TaskIdx>>,
}

impl Allocation {
    pub fn worker_count(&self) -> usize {
        self.timelines.len()
    }
}

/// Worker timelines plus the lookup structure for the selection policy.
///
/// Under `EarliestFree` every worker sits in the heap exactly once, except
/// between `take_free` and `occupy`.
struct WorkerPool {
    selection: WorkerSelection,
    timelines: Vec<WorkerTimeline>,
    by_busy_until: BinaryHeap<Reverse<(Time, WorkerId)>>,
}

impl WorkerPool {
    fn new(selection: WorkerSelection) -> Self {
        Self {
            selection,
            timelines: Vec::new(),
            by_busy_until: BinaryHeap::new(),
        }
    }

    /// Claim a worker that is free at `start`, if any.
    fn take_free(&mut self, start: Time) -> Option<WorkerId> {
        match self.selection {
            WorkerSelection::EarliestFree => match self.by_busy_until.peek() {
                Some(&Reverse((busy_until, worker_id))) if busy_until <= start => {
                    self.by_busy_until.pop();
                    Some(worker_id)
                }
                _ => None,
            },
            WorkerSelection::LowestId => self
                .timelines
                .iter()
                .find(|t| t.busy_until <= start)
                .map(|t| t.worker_id),
        }
    }

    fn open(&mut self) -> WorkerId {
        let worker_id = self.timelines.len() as WorkerId + 1;
        self.timelines.push(WorkerTimeline {
            worker_id,
            busy_until: Time::MIN,
        });
        worker_id
    }

    fn occupy(&mut self, worker_id: WorkerId, finish: Time) {
        self.timelines[(worker_id - 1) as usize].busy_until = finish;
        if self.selection == WorkerSelection::EarliestFree {
            self.by_busy_until.push(Reverse((finish, worker_id)));
        }
    }
}

/// Assign every task in `order` to a worker, starting it at its earliest start.
///
/// Never fails: `order` and `critical_path` come from a successful resolve.
pub fn allocate(
    registry: &TaskRegistry<'_>,
    order: &[TaskIdx],
    critical_path: &CriticalPathResult,
    selection: WorkerSelection,
    verbosity: u8,
) -> Allocation {
    let mut pool = WorkerPool::new(selection);
    let mut assignments: Vec<Option<Assignment>> = vec![None; registry.len()];
    let mut worker_tasks: Vec<Vec<TaskIdx>> = Vec::new();

    for &idx in order {
        let task_id = registry.id_of(idx);
        let timing = critical_path.timing(idx);
        let (start, finish) = (timing.earliest_start, timing.earliest_finish);

        let worker_id = match pool.take_free(start) {
            Some(worker_id) => {
                log_checks!(
                    verbosity,
                    "allocator: task {} reuses worker {} at {}",
                    task_id,
                    worker_id,
                    start
                );
                worker_id
            }
            None => {
                let worker_id = pool.open();
                worker_tasks.push(Vec::new());
                log_changes!(
                    verbosity,
                    "allocator: no worker free at {} for task {}, opened worker {}",
                    start,
                    task_id,
                    worker_id
                );
                worker_id
            }
        };

        pool.occupy(worker_id, finish);
        worker_tasks[(worker_id - 1) as usize].push(idx);
        assignments[idx as usize] = Some(Assignment {
            worker: worker_id,
            actual_start: start,
            actual_finish: finish,
        });

        log_changes!(
            verbosity,
            "allocator: task {} -> worker {} [{}, {})",
            task_id,
            worker_id,
            start,
            finish
        );
    }

    Allocation {
        timelines: pool.timelines,
        assignments,
        worker_tasks,
    }
}
