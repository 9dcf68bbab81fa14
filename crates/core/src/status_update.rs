// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! Task status updates arriving from the cluster manager.

use crate::id::TaskId;
use serde::{Deserialize, Serialize};

/// The lifecycle transition a status update carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatusKind {
    Running,
    Finished,
    Failed,
    Killed,
    Lost,
}

crate::simple_display! {
    TaskStatusKind {
        Running => "RUNNING",
        Finished => "FINISHED",
        Failed => "FAILED",
        Killed => "KILLED",
        Lost => "LOST",
    }
}

/// Reason code reported by the cluster manager alongside a FAILED/KILLED update.
pub const REASON_EXECUTOR_TERMINATED: &str = "REASON_EXECUTOR_TERMINATED";

/// A single task-status update, as delivered by the executor callback (§4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub task_id: TaskId,
    pub agent_id: String,
    pub status: TaskStatusKind,
    pub reason: Option<String>,
    pub exit_code: Option<i32>,
    pub timestamp_ms: u64,
}

impl StatusUpdate {
    pub fn new(task_id: TaskId, agent_id: impl Into<String>, status: TaskStatusKind, timestamp_ms: u64) -> Self {
        Self { task_id, agent_id: agent_id.into(), status, reason: None, exit_code: None, timestamp_ms }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }
}
