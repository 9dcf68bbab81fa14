// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! C5: `TaskUpdateRouter` — dispatches incoming task-status updates to the
//! execution that currently owns the task.

use crate::manager::RunningJobManager;
use oj_core::{Clock, StatusUpdate};
use std::sync::Arc;

/// Locates the execution whose `current_task` matches the update's task id
/// and dispatches to it. Scans the registry's stable snapshot rather than
/// maintaining a secondary task-id index — `current_task` is already the
/// single source of truth for "what task is this execution running", so a
/// second index would just be another place the two could drift (§4.5).
pub struct TaskUpdateRouter<C: Clock> {
    manager: Arc<RunningJobManager<C>>,
}

impl<C: Clock> TaskUpdateRouter<C> {
    pub fn new(manager: Arc<RunningJobManager<C>>) -> Self {
        Self { manager }
    }

    /// Dispatch `update` to its owning execution. Updates for unknown
    /// executions (no running execution currently has this task as
    /// `current`) are dropped with a warning (§4.5).
    pub async fn route(&self, update: StatusUpdate) {
        let owner = self.manager.get_all().into_iter().find(|exe| matches!(exe.current_task(), Some(t) if t.id() == &update.task_id));

        match owner {
            Some(execution) => execution.task_update(&update).await,
            None => {
                tracing::warn!(task_id = %update.task_id, agent_id = %update.agent_id, "dropping status update for unknown task");
            }
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
