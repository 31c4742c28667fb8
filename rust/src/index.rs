//! Dense indexing for task ids.
//!
//! Maps caller task ids to contiguous integers so per-task data can live in
//! plain vectors addressed by index.

use rustc_hash::FxHashMap;

use crate::models::TaskId;

/// Dense task index (u32 for compact storage).
pub type TaskIdx = u32;

/// Bidirectional mapping between task ids and dense indices.
#[derive(Debug, Clone)]
pub struct TaskIndex {
    to_idx: FxHashMap<TaskId, TaskIdx>,
    from_idx: Vec<TaskId>,
}

impl TaskIndex {
    /// Create a new index with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_idx: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_idx: Vec::with_capacity(capacity),
        }
    }

    /// Register an id, returning its new index.
    /// Returns `None` if the id is already present.
    pub fn insert(&mut self, id: TaskId) -> Option<TaskIdx> {
        if self.to_idx.contains_key(&id) {
            return None;
        }
        let idx = self.from_idx.len() as TaskIdx;
        self.from_idx.push(id);
        self.to_idx.insert(id, idx);
        Some(idx)
    }

    #[inline]
    pub fn get(&self, id: TaskId) -> Option<TaskIdx> {
        self.to_idx.get(&id).copied()
    }

    /// Task id for an index handed out by this map.
    #[inline]
    pub fn id_of(&self, idx: TaskIdx) -> TaskId {
        self.from_idx[idx as usize]
    }

    pub fn len(&self) -> usize {
        self.from_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_idx.is_empty()
    }
}

impl Default for TaskIndex {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
