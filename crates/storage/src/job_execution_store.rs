// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! C9: the persistence boundary `RunningJobExecution` and friends consume.

use crate::error::StoreError;
use async_trait::async_trait;
use oj_core::{Error, JobExecutionId, NodeId, SchedulerSettings};
use serde::{Deserialize, Serialize};

/// A task's final metadata, as copied into the durable row at a cancellation
/// checkpoint or terminal outcome (`populateJobExeModel`, §4.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub task_id: String,
    pub agent_id: String,
    pub container_name: Option<String>,
    pub has_started: bool,
    pub has_ended: bool,
    pub started_at_ms: Option<u64>,
    pub ended_at_ms: Option<u64>,
    pub exit_code: Option<i32>,
}

/// A job execution row joined with its owning job's attempt counters, for the
/// quarantine policy's eager-join read (`get_with_job_and_job_type`, §4.9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobExecutionWithJob {
    pub execution: oj_core::JobExecution,
    pub node_id: Option<NodeId>,
}

/// The persistence boundary the scheduler runtime consumes. Implementations
/// are responsible for their own row-level locking and transaction
/// boundaries; the core never nests a durable call inside an in-memory lock
/// (§4.2, §5).
#[async_trait]
pub trait JobExecutionStore: Send + Sync {
    /// Row-level lock for updates (`SELECT ... FOR UPDATE` in a relational
    /// backend).
    async fn get_locked(&self, id: JobExecutionId) -> Result<oj_core::JobExecution, StoreError>;

    /// Atomic terminal success: marks the row COMPLETED, stamps `ended`, and
    /// persists every task's final metadata.
    async fn handle_job_completion(
        &self,
        id: JobExecutionId,
        when_ms: u64,
        tasks: &[TaskSnapshot],
    ) -> Result<(), StoreError>;

    /// Atomic terminal failure: marks the row FAILED, stamps `ended`, records
    /// the classified error, and persists every task's final metadata.
    async fn handle_job_failure(
        &self,
        id: JobExecutionId,
        when_ms: u64,
        tasks: &[TaskSnapshot],
        error: Error,
    ) -> Result<(), StoreError>;

    /// Checkpoint every task's final metadata without otherwise changing the
    /// row's terminal status (used by `execution_canceled`, §4.2 — the row is
    /// already CANCELED by the control plane before this call).
    async fn checkpoint_cancellation(
        &self,
        id: JobExecutionId,
        tasks: &[TaskSnapshot],
    ) -> Result<(), StoreError>;

    /// Eager-join read consulted by the quarantine policy (§4.6).
    async fn get_with_job_and_job_type(&self, id: JobExecutionId) -> Result<JobExecutionWithJob, StoreError>;

    /// Distinct-job count of system-category failures on `node` since `since_ms`.
    async fn count_recent_system_failures(&self, node: NodeId, since_ms: u64) -> Result<u64, StoreError>;

    /// Whether the row has exceeded its job type's configured execution
    /// timeout as of `when_ms`.
    async fn is_timed_out(&self, row: &oj_core::JobExecution, when_ms: u64) -> bool;

    /// Current live-tunable scheduler settings (§4.6).
    async fn get_scheduler_settings(&self) -> Result<SchedulerSettings, StoreError>;

    /// Persist a node pause, as triggered by the quarantine policy.
    async fn pause_node(&self, node: NodeId, reason: &str) -> Result<(), StoreError>;

    /// Whether `node` is already paused (quarantine precondition, §4.6).
    async fn is_node_paused(&self, node: NodeId) -> Result<bool, StoreError>;

    /// All durable rows still in RUNNING status, for the sync loop's
    /// reconciliation snapshot (§4.7 step 5).
    async fn list_running(&self) -> Result<Vec<oj_core::JobExecution>, StoreError>;
}
