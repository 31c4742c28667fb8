//! Ready-queue ordering for the dependency resolver.
//!
//! When several tasks have all their prerequisites resolved, the policy here
//! decides which one is emitted first:
//! - `window_start`: earliest declared window start, then task id
//! - `fewest_dependents`: fewest direct dependents, then window start, then task id
//! - `task_id`: ascending task id only
//!
//! The choice changes which topological order the allocator consumes and can
//! therefore change the worker count on some inputs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::index::TaskIdx;
use crate::models::{TaskId, Time};
use crate::registry::TaskRegistry;

/// Tie-break policy among ready tasks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    #[default]
    WindowStart,
    FewestDependents,
    TaskId,
}

impl TieBreak {
    pub fn name(&self) -> &'static str {
        match self {
            Self::WindowStart => "window_start",
            Self::FewestDependents => "fewest_dependents",
            Self::TaskId => "task_id",
        }
    }

    /// Compute the queue key for a ready task.
    pub fn key(&self, registry: &TaskRegistry<'_>, idx: TaskIdx) -> ReadyKey {
        let task = registry.task(idx);
        let (primary, secondary) = match self {
            Self::WindowStart => (task.window_start, 0),
            Self::FewestDependents => (
                registry.graph().dependents_of(idx).len() as Time,
                task.window_start,
            ),
            Self::TaskId => (0, 0),
        };
        ReadyKey {
            primary,
            secondary,
            task_id: task.id,
            idx,
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TieBreak {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "window_start" => Ok(Self::WindowStart),
            "fewest_dependents" => Ok(Self::FewestDependents),
            "task_id" => Ok(Self::TaskId),
            other => Err(ConfigError::UnknownTieBreak(other.to_string())),
        }
    }
}

/// Ordering key for a ready task (lower = emitted first).
///
/// Compared field by field; `task_id` makes every key distinct, so the
/// resolver's output is fully deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReadyKey {
    pub primary: Time,
    pub secondary: Time,
    pub task_id: TaskId,
    pub idx: TaskIdx,
}
