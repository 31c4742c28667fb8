//! Configuration types for the scheduling system.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::allocator::WorkerSelection;
use crate::ordering::TieBreak;

/// Errors from parsing configuration values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown tie-break policy: {0}")]
    UnknownTieBreak(String),
    #[error("Unknown worker selection policy: {0}")]
    UnknownWorkerSelection(String),
}

/// Configuration for one scheduling run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Ordering among tasks that become ready at the same time.
    pub tie_break: TieBreak,
    /// Which free worker receives a task when several qualify.
    pub worker_selection: WorkerSelection,
    /// Return an empty schedule for an empty task list instead of failing.
    pub allow_empty: bool,
    /// Run the invariant checker over the finished schedule.
    pub verify: bool,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::default(),
            worker_selection: WorkerSelection::default(),
            allow_empty: false,
            verify: true,
            verbosity: 0,
        }
    }
}

impl SchedulerConfig {
    /// Build a config from policy names, keeping defaults for anything unset.
    pub fn from_names(
        tie_break: Option<&str>,
        worker_selection: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            tie_break: match tie_break {
                Some(name) => name.parse()?,
                None => defaults.tie_break,
            },
            worker_selection: match worker_selection {
                Some(name) => name.parse()?,
                None => defaults.worker_selection,
            },
            ..defaults
        })
    }
}
