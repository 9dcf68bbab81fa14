// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! C2: `RunningJobExecution` — owns the ordered task list for one job
//! execution and serializes external events against it.
//!
//! Lock discipline (§5): the `parking_lot::Mutex` below protects only
//! `current`/`remaining`/per-task mutable flags. Every method that must also
//! touch the durable store follows snapshot-under-lock → release → I/O →
//! re-acquire-to-publish; no durable call is ever made while the lock is held.

use crate::error::RuntimeError;
use crate::quarantine::NodeQuarantinePolicy;
use crate::task::{Task, TaskTransition};
use oj_core::{codes, Clock, JobExecutionId, JobTypeId, NodeId, Resources, StatusUpdate, TaskId, TaskStatusKind};
use oj_storage::{with_db_retry, ErrorCatalog, JobExecutionStore, TaskSnapshot, TerminalEventSink};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

struct Inner {
    remaining: VecDeque<Task>,
    current: Option<Task>,
    /// Metadata of every task that has already reported a terminal outcome
    /// for this execution, accumulated until the whole execution finishes
    /// (the completion/failure report always carries every task, §4.2).
    completed: Vec<TaskSnapshot>,
}

impl Inner {
    fn is_finished(&self) -> bool {
        self.current.is_none() && self.remaining.is_empty()
    }
}

/// One running attempt of a job. Constructed once the durable row is RUNNING
/// (§3); `all_tasks` is exactly [Pre, Job, Post] for a non-system job or
/// [Job] for a system job (invariant 4), supplied by the caller in that order.
pub struct RunningJobExecution<C: Clock> {
    pub id: JobExecutionId,
    pub job_type_id: JobTypeId,
    pub node_id: Option<NodeId>,
    pub docker_volumes: Vec<String>,
    /// The owning job type's exit-code → error-code mapping
    /// (`JobExecution::exit_code_errors`), snapshotted once at construction and
    /// consulted by fault classification ahead of the generic fallback (§3, §4.1).
    exit_code_errors: HashMap<i32, String>,
    inner: Mutex<Inner>,
    store: Arc<dyn JobExecutionStore>,
    catalog: Arc<dyn ErrorCatalog>,
    quarantine: Arc<NodeQuarantinePolicy<C>>,
    clock: C,
}

impl<C: Clock> RunningJobExecution<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: JobExecutionId,
        job_type_id: JobTypeId,
        node_id: Option<NodeId>,
        docker_volumes: Vec<String>,
        exit_code_errors: HashMap<i32, String>,
        all_tasks: Vec<Task>,
        store: Arc<dyn JobExecutionStore>,
        catalog: Arc<dyn ErrorCatalog>,
        quarantine: Arc<NodeQuarantinePolicy<C>>,
        clock: C,
    ) -> Self {
        Self {
            id,
            job_type_id,
            node_id,
            docker_volumes,
            exit_code_errors,
            inner: Mutex::new(Inner { remaining: all_tasks.into(), current: None, completed: Vec::new() }),
            store,
            catalog,
            quarantine,
            clock,
        }
    }

    /// Current task, if one is in flight (invariant 1).
    pub fn current_task(&self) -> Option<Task> {
        self.inner.lock().current.clone()
    }

    /// Invariant 3: finished iff no current task and nothing left to run.
    pub fn is_finished(&self) -> bool {
        self.inner.lock().is_finished()
    }

    pub fn is_next_task_ready(&self) -> bool {
        let inner = self.inner.lock();
        inner.current.is_none() && !inner.remaining.is_empty()
    }

    pub fn next_task_resources(&self) -> Option<Resources> {
        self.inner.lock().remaining.front().map(Task::resources)
    }

    /// Pop the head of `remaining` into `current`, atomically, only if no
    /// task is currently running.
    pub fn start_next_task(&self) -> Option<Task> {
        let mut inner = self.inner.lock();
        if inner.current.is_some() {
            return None;
        }
        let next = inner.remaining.pop_front()?;
        inner.current = Some(next.clone());
        Some(next)
    }

    /// Dispatch a status update to the matching private handler. Updates
    /// whose `task_id` doesn't match the current task are silently dropped
    /// (P4) — the cluster manager is the source of sequencing truth (§5).
    pub async fn task_update(&self, u: &StatusUpdate) {
        let transition = TaskTransition { reason: u.reason.as_deref(), exit_code: u.exit_code, timestamp_ms: u.timestamp_ms };
        match u.status {
            TaskStatusKind::Running => self.on_running(&u.task_id, transition),
            TaskStatusKind::Finished => self.on_finished(&u.task_id, transition).await,
            TaskStatusKind::Lost => self.on_lost(&u.task_id, transition),
            TaskStatusKind::Failed | TaskStatusKind::Killed => self.on_failed(&u.task_id, transition).await,
        }
    }

    fn on_running(&self, task_id: &TaskId, transition: TaskTransition<'_>) {
        let mut inner = self.inner.lock();
        if let Some(task) = inner.current.as_mut() {
            if task.id() == task_id {
                task.update(transition);
            }
        }
    }

    async fn on_finished(&self, task_id: &TaskId, transition: TaskTransition<'_>) {
        // Snapshot by cloning, not taking: `current` stays populated until we
        // re-acquire the lock below, so a concurrent `start_next_task()`
        // cannot pop the next task into `current` while we may still be
        // awaiting I/O (mirrors `execution_canceled`/`report_terminal_failure`).
        let current_snapshot = self.inner.lock().current.clone();
        let mut task = match current_snapshot {
            Some(t) if t.id() == task_id => t,
            _ => return,
        };

        let needs_refresh = task.complete(transition);
        let snapshot = task.populate_job_exe_model();

        let remaining_empty = {
            let mut inner = self.inner.lock();
            if !matches!(&inner.current, Some(t) if t.id() == task_id) {
                return; // superseded while we computed the completion above
            }
            if !inner.completed.iter().any(|s| s.task_id == snapshot.task_id) {
                inner.completed.push(snapshot.clone());
            }
            inner.remaining.is_empty()
        };

        if !remaining_empty {
            if needs_refresh {
                match with_db_retry(|| self.store.get_locked(self.id)).await {
                    Ok(row) => {
                        let mut inner = self.inner.lock();
                        for task in inner.remaining.iter_mut() {
                            task.refresh_cached_values(&row);
                        }
                    }
                    Err(e) => tracing::warn!(job_execution_id = %self.id, error = %e, "failed to refresh durable row after pre-task completion"),
                }
            }
            // Open the slot for the next task only now that any refresh has
            // settled, re-checking the id in case a concurrent terminal event
            // already claimed it.
            let mut inner = self.inner.lock();
            if matches!(&inner.current, Some(t) if t.id() == task_id) {
                inner.current = None;
            }
            return;
        }

        // Terminal completion: `current` still holds this task while the
        // durable write is in flight, so `start_next_task()` has nothing to
        // pop (`remaining` is already empty) and the execution still reads
        // as owned until the outcome is durable.
        let tasks = self.inner.lock().completed.clone();
        if let Err(e) = with_db_retry(|| self.store.complete(self.id, transition.timestamp_ms, &tasks)).await {
            tracing::warn!(job_execution_id = %self.id, error = %e, "failed to record job execution completion");
            return;
        }

        let mut inner = self.inner.lock();
        if matches!(&inner.current, Some(t) if t.id() == task_id) {
            inner.current = None;
            inner.remaining.clear();
        }
    }

    fn on_lost(&self, task_id: &TaskId, transition: TaskTransition<'_>) {
        let mut inner = self.inner.lock();
        let mut task = match inner.current.take() {
            Some(t) if t.id() == task_id => t,
            other => {
                inner.current = other;
                return;
            }
        };
        task.update(transition);
        inner.remaining.push_front(task);
    }

    async fn on_failed(&self, task_id: &TaskId, transition: TaskTransition<'_>) {
        // As in `on_finished`: snapshot by cloning, not taking, so `current`
        // stays populated (and `remaining` untouched) across the durable
        // write below, and a concurrent `start_next_task()` cannot race
        // ahead of a failure report that might still fail to persist.
        let current_snapshot = self.inner.lock().current.clone();
        let mut task = match current_snapshot {
            Some(t) if t.id() == task_id => t,
            _ => return,
        };

        let code = task.determine_error(transition, &self.exit_code_errors).unwrap_or_else(|| codes::UNKNOWN.to_string());
        task.end_with_failure(transition);
        let snapshot = task.populate_job_exe_model();

        let mut tasks = {
            let inner = self.inner.lock();
            if !matches!(&inner.current, Some(t) if t.id() == task_id) {
                return; // superseded while we computed the failure above
            }
            inner.completed.clone()
        };
        tasks.push(snapshot);
        tasks.sort_by(|a, b| a.task_id.cmp(&b.task_id));

        let error = self.catalog.get(&code);
        if let Err(e) = with_db_retry(|| self.store.fail(self.id, transition.timestamp_ms, &tasks, error.clone())).await {
            tracing::warn!(job_execution_id = %self.id, error = %e, "failed to record job execution failure");
            return;
        }

        {
            let mut inner = self.inner.lock();
            if matches!(&inner.current, Some(t) if t.id() == task_id) {
                inner.current = None;
                inner.remaining.clear();
            }
        }

        if let Err(e) = self.quarantine.evaluate_after_failure(self.id, &error).await {
            tracing::warn!(job_execution_id = %self.id, error = %e, "node quarantine check failed");
        }
    }

    /// Durable-checkpoint every task's final metadata, then clear in-memory.
    /// Returns the task that was current before the clear, for the caller to
    /// kill (§4.2). The durable row's status is already CANCELED by the
    /// control plane before this is called.
    pub async fn execution_canceled(&self) -> Result<Option<Task>, RuntimeError> {
        let (prior_current, tasks) = {
            let inner = self.inner.lock();
            let mut tasks = inner.completed.clone();
            if let Some(t) = &inner.current {
                tasks.push(t.populate_job_exe_model());
            }
            (inner.current.clone(), tasks)
        };

        with_db_retry(|| self.store.checkpoint_cancellation(self.id, &tasks)).await?;

        let mut inner = self.inner.lock();
        inner.current = None;
        inner.remaining.clear();
        Ok(prior_current)
    }

    /// Report failure with error `node-lost`, clear in-memory. Returns the
    /// prior current task for the caller to kill. Wired by a node manager
    /// (out of scope, Design Notes §9 open question); this crate exposes the
    /// method and a direct unit test.
    pub async fn execution_lost(&self, when_ms: u64) -> Result<Option<Task>, RuntimeError> {
        self.report_terminal_failure(when_ms, codes::NODE_LOST).await
    }

    /// Report failure with error `timeout`, clear in-memory. Returns the
    /// prior current task for the caller to kill (§4.7 step 5).
    pub async fn execution_timed_out(&self, when_ms: u64) -> Result<Option<Task>, RuntimeError> {
        self.report_terminal_failure(when_ms, codes::TIMEOUT).await
    }

    async fn report_terminal_failure(&self, when_ms: u64, code: &'static str) -> Result<Option<Task>, RuntimeError> {
        let (prior_current, tasks) = {
            let inner = self.inner.lock();
            let mut tasks = inner.completed.clone();
            if let Some(t) = &inner.current {
                tasks.push(t.populate_job_exe_model());
            }
            (inner.current.clone(), tasks)
        };

        let error = self.catalog.get(code);
        with_db_retry(|| self.store.fail(self.id, when_ms, &tasks, error.clone())).await?;

        let mut inner = self.inner.lock();
        inner.current = None;
        inner.remaining.clear();
        Ok(prior_current)
    }

    /// Current wall time, for callers that need to stamp `when_ms` without
    /// holding their own clock handle.
    pub fn now_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }

    /// Every task's metadata recorded so far, including tasks that finished
    /// before the execution itself reached a terminal outcome. Retained even
    /// after the execution is finished (the cleanup manager reads this to
    /// learn which agents/containers it ran on, §4.4).
    pub fn task_snapshots(&self) -> Vec<TaskSnapshot> {
        self.inner.lock().completed.clone()
    }
}

#[cfg(test)]
#[path = "running_execution_tests.rs"]
mod tests;
