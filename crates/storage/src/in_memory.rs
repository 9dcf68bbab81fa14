// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! In-memory reference implementation of [`JobExecutionStore`], used by
//! tests and by the `test-support` feature.

use crate::error::StoreError;
use crate::job_execution_store::{JobExecutionStore, JobExecutionWithJob, TaskSnapshot};
use async_trait::async_trait;
use oj_core::{Error, ErrorCategory, JobExecution, JobExecutionId, JobExecutionStatus, Node, NodeId, SchedulerSettings};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Inner {
    rows: HashMap<JobExecutionId, JobExecution>,
    tasks: HashMap<JobExecutionId, Vec<TaskSnapshot>>,
    nodes: HashMap<NodeId, Node>,
    deadlines_ms: HashMap<JobExecutionId, u64>,
    settings: SchedulerSettings,
}

/// A plain in-memory store, useful for unit tests exercising `RunningJobExecution`
/// without a real database. Not intended for production use — there is no
/// durability and no row-level locking beyond the process mutex.
#[derive(Default)]
pub struct InMemoryJobExecutionStore {
    inner: Mutex<Inner>,
}

impl InMemoryJobExecutionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_execution(&self, execution: JobExecution) {
        self.inner.lock().rows.insert(execution.id, execution);
    }

    pub fn insert_node(&self, node: Node) {
        self.inner.lock().nodes.insert(node.id, node);
    }

    pub fn set_settings(&self, settings: SchedulerSettings) {
        self.inner.lock().settings = settings;
    }

    /// Configure an absolute deadline (ms) beyond which `is_timed_out` reports true.
    pub fn set_deadline(&self, id: JobExecutionId, deadline_ms: u64) {
        self.inner.lock().deadlines_ms.insert(id, deadline_ms);
    }

    pub fn tasks_for(&self, id: JobExecutionId) -> Vec<TaskSnapshot> {
        self.inner.lock().tasks.get(&id).cloned().unwrap_or_default()
    }

    pub fn node(&self, id: NodeId) -> Option<Node> {
        self.inner.lock().nodes.get(&id).cloned()
    }

    pub fn execution(&self, id: JobExecutionId) -> Option<JobExecution> {
        self.inner.lock().rows.get(&id).cloned()
    }
}

#[async_trait]
impl JobExecutionStore for InMemoryJobExecutionStore {
    async fn get_locked(&self, id: JobExecutionId) -> Result<JobExecution, StoreError> {
        self.inner.lock().rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn handle_job_completion(
        &self,
        id: JobExecutionId,
        when_ms: u64,
        tasks: &[TaskSnapshot],
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let row = inner.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        row.status = JobExecutionStatus::Completed;
        row.ended_at_ms = Some(when_ms);
        inner.tasks.insert(id, tasks.to_vec());
        Ok(())
    }

    async fn handle_job_failure(
        &self,
        id: JobExecutionId,
        when_ms: u64,
        tasks: &[TaskSnapshot],
        error: Error,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let row = inner.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        row.status = JobExecutionStatus::Failed;
        row.ended_at_ms = Some(when_ms);
        row.error_code = Some(error.code);
        row.error_category = Some(error.category);
        inner.tasks.insert(id, tasks.to_vec());
        Ok(())
    }

    async fn checkpoint_cancellation(&self, id: JobExecutionId, tasks: &[TaskSnapshot]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if !inner.rows.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        inner.tasks.insert(id, tasks.to_vec());
        Ok(())
    }

    async fn get_with_job_and_job_type(&self, id: JobExecutionId) -> Result<JobExecutionWithJob, StoreError> {
        let inner = self.inner.lock();
        let execution = inner.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))?;
        let node_id = execution.node_id;
        Ok(JobExecutionWithJob { execution, node_id })
    }

    async fn count_recent_system_failures(&self, node: NodeId, since_ms: u64) -> Result<u64, StoreError> {
        let inner = self.inner.lock();
        let mut seen_jobs = std::collections::HashSet::new();
        let count = inner
            .rows
            .values()
            .filter(|row| {
                row.node_id == Some(node)
                    && row.status == JobExecutionStatus::Failed
                    && row.error_category == Some(ErrorCategory::System)
                    && row.ended_at_ms.is_some_and(|ended| ended >= since_ms)
            })
            .filter(|row| seen_jobs.insert(row.job_id))
            .count();
        Ok(count as u64)
    }

    async fn is_timed_out(&self, row: &JobExecution, when_ms: u64) -> bool {
        let inner = self.inner.lock();
        match inner.deadlines_ms.get(&row.id) {
            Some(deadline) => when_ms >= *deadline,
            None => false,
        }
    }

    async fn get_scheduler_settings(&self) -> Result<SchedulerSettings, StoreError> {
        Ok(self.inner.lock().settings)
    }

    async fn pause_node(&self, node: NodeId, reason: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let n = inner.nodes.get_mut(&node).ok_or_else(|| StoreError::Query(format!("unknown node {node}")))?;
        n.is_paused = true;
        n.is_paused_errors = true;
        n.pause_reason = Some(reason.to_string());
        Ok(())
    }

    async fn is_node_paused(&self, node: NodeId) -> Result<bool, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.nodes.get(&node).map(|n| n.is_paused).unwrap_or(false))
    }

    async fn list_running(&self) -> Result<Vec<JobExecution>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.rows.values().filter(|r| r.status == JobExecutionStatus::Running).cloned().collect())
    }
}

#[cfg(test)]
#[path = "in_memory_tests.rs"]
mod tests;
