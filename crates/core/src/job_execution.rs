// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! The durable job execution row (§3).

use crate::error::ErrorCategory;
use crate::id::{JobExecutionId, JobId, JobTypeId, JobTypeRevisionId, NodeId};
use crate::resources::ScheduledResources;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobExecutionStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Canceled,
}

crate::simple_display! {
    JobExecutionStatus {
        Queued => "QUEUED",
        Running => "RUNNING",
        Completed => "COMPLETED",
        Failed => "FAILED",
        Canceled => "CANCELED",
    }
}

/// The durable job execution row the core reads/writes through
/// [`crate::JobExecutionStore`](../oj_storage) (kept abstract here; this struct
/// is the shared shape both sides agree on).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobExecution {
    pub id: JobExecutionId,
    pub node_id: Option<NodeId>,
    pub job_id: JobId,
    pub job_type_id: JobTypeId,
    pub job_type_revision_id: JobTypeRevisionId,
    pub status: JobExecutionStatus,
    pub scheduled: ScheduledResources,
    pub error_code: Option<String>,
    pub error_category: Option<ErrorCategory>,
    pub queued_at_ms: u64,
    pub started_at_ms: Option<u64>,
    pub ended_at_ms: Option<u64>,
    pub is_system: bool,
    pub num_exes: u32,
    pub max_tries: u32,
    pub docker_volumes: Vec<String>,
    /// Maps a task exit code to a job-type-specific error code, consulted by
    /// task fault classification before falling back to the built-in kinds.
    pub exit_code_errors: HashMap<i32, String>,
}

impl JobExecution {
    /// True once the execution has exhausted its configured attempt budget
    /// (§4.6 quarantine precondition).
    pub fn attempts_exhausted(&self) -> bool {
        self.num_exes >= self.max_tries
    }
}

crate::builder! {
    pub struct JobExecutionBuilder => JobExecution {
        set {
            id: JobExecutionId = JobExecutionId(1),
            node_id: Option<NodeId> = Some(NodeId(1)),
            job_id: JobId = JobId(1),
            job_type_id: JobTypeId = JobTypeId(1),
            job_type_revision_id: JobTypeRevisionId = JobTypeRevisionId(1),
            status: JobExecutionStatus = JobExecutionStatus::Running,
            scheduled: ScheduledResources = ScheduledResources::new(1.0, 256.0, 64.0, 64.0, 128.0),
            error_code: Option<String> = None,
            error_category: Option<ErrorCategory> = None,
            queued_at_ms: u64 = 1_000_000,
            started_at_ms: Option<u64> = Some(1_000_100),
            ended_at_ms: Option<u64> = None,
            is_system: bool = false,
            num_exes: u32 = 1,
            max_tries: u32 = 3,
            docker_volumes: Vec<String> = Vec::new(),
            exit_code_errors: HashMap<i32, String> = HashMap::new(),
        }
    }
}

#[cfg(test)]
#[path = "job_execution_tests.rs"]
mod tests;
