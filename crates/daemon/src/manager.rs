// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! C3: `RunningJobManager` — the registry of all live executions.

use crate::running_execution::RunningJobExecution;
use oj_core::{Clock, JobExecutionId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Concurrent mapping from execution id to its in-memory state. `get_all()`
/// clones the value `Arc`s under the read lock so iteration (the sync loop,
/// the task-update router) cannot observe mid-flight mutations to the map
/// itself — each execution's own lock still protects its own fields (§4.3).
pub struct RunningJobManager<C: Clock> {
    executions: RwLock<HashMap<JobExecutionId, Arc<RunningJobExecution<C>>>>,
}

impl<C: Clock> Default for RunningJobManager<C> {
    fn default() -> Self {
        Self { executions: RwLock::new(HashMap::new()) }
    }
}

impl<C: Clock> RunningJobManager<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, execution: Arc<RunningJobExecution<C>>) {
        self.executions.write().insert(execution.id, execution);
    }

    pub fn remove(&self, id: JobExecutionId) -> Option<Arc<RunningJobExecution<C>>> {
        self.executions.write().remove(&id)
    }

    pub fn get(&self, id: JobExecutionId) -> Option<Arc<RunningJobExecution<C>>> {
        self.executions.read().get(&id).cloned()
    }

    /// A stable snapshot of every live execution. Copies the `Arc` list under
    /// the read lock; the caller iterates over owned clones that cannot be
    /// invalidated by a concurrent `add`/`remove`.
    pub fn get_all(&self) -> Vec<Arc<RunningJobExecution<C>>> {
        self.executions.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.executions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.executions.read().is_empty()
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
