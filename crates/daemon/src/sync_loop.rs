// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! C7: `DatabaseSyncLoop` — the periodic reconciliation tick: cancellations,
//! timeouts, completion drainage, plus the four read-only catalog refreshes.

use crate::cleanup::CleanupManager;
use crate::manager::RunningJobManager;
use oj_adapters::{ExecutorDriver, JobTypeSync, NodeRosterSync, SchedulerSettingsSync, WorkspaceSync};
use oj_core::{Clock, JobExecution, JobExecutionId, JobExecutionStatus};
use oj_storage::JobExecutionStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Throttle floor between successive ticks (§4.7): if a tick overruns this,
/// the next one starts immediately rather than waiting further.
pub const THROTTLE_FLOOR: Duration = Duration::from_secs(10);

pub struct DatabaseSyncLoop<C: Clock> {
    manager: Arc<RunningJobManager<C>>,
    store: Arc<dyn JobExecutionStore>,
    executor: Arc<dyn ExecutorDriver>,
    cleanup: Arc<CleanupManager>,
    scheduler_settings: Arc<dyn SchedulerSettingsSync>,
    job_types: Arc<dyn JobTypeSync>,
    workspaces: Arc<dyn WorkspaceSync>,
    nodes: Arc<dyn NodeRosterSync>,
    clock: C,
    throttle: Duration,
    master_host: String,
    master_port: u16,
}

#[allow(clippy::too_many_arguments)]
impl<C: Clock> DatabaseSyncLoop<C> {
    pub fn new(
        manager: Arc<RunningJobManager<C>>,
        store: Arc<dyn JobExecutionStore>,
        executor: Arc<dyn ExecutorDriver>,
        cleanup: Arc<CleanupManager>,
        scheduler_settings: Arc<dyn SchedulerSettingsSync>,
        job_types: Arc<dyn JobTypeSync>,
        workspaces: Arc<dyn WorkspaceSync>,
        nodes: Arc<dyn NodeRosterSync>,
        clock: C,
        master_host: impl Into<String>,
        master_port: u16,
        throttle: Duration,
    ) -> Self {
        Self {
            manager,
            store,
            executor,
            cleanup,
            scheduler_settings,
            job_types,
            workspaces,
            nodes,
            clock,
            throttle: throttle.max(THROTTLE_FLOOR),
            master_host: master_host.into(),
            master_port,
        }
    }

    /// Run until `shutdown` is cancelled. In-flight iteration always
    /// completes before returning (§4.7 Shutdown).
    pub async fn run(&self, shutdown: CancellationToken) {
        loop {
            if shutdown.is_cancelled() {
                return;
            }
            let started = Instant::now();
            self.tick().await;
            let elapsed = started.elapsed();
            if elapsed < self.throttle {
                tokio::select! {
                    _ = tokio::time::sleep(self.throttle - elapsed) => {}
                    () = shutdown.cancelled() => return,
                }
            }
        }
    }

    /// One reconciliation pass. Every collaborator's failure is logged and
    /// the tick proceeds — a transient catalog or database error never stops
    /// the loop (§4.7 Exception discipline, §7.3).
    pub async fn tick(&self) {
        if let Err(e) = self.scheduler_settings.sync_with_database().await {
            tracing::error!(error = %e, "scheduler settings sync failed");
        }
        if let Err(e) = self.job_types.sync_with_database().await {
            tracing::error!(error = %e, "job type catalog sync failed");
        }
        if let Err(e) = self.workspaces.sync_with_database().await {
            tracing::error!(error = %e, "workspace sync failed");
        }
        if let Err(e) = self.nodes.sync_with_database(&self.master_host, self.master_port).await {
            tracing::error!(error = %e, "node roster sync failed");
        }
        self.reconcile_running_executions().await;
    }

    async fn reconcile_running_executions(&self) {
        let now = self.clock.epoch_ms();
        let registered = self.manager.get_all();
        if registered.is_empty() {
            return;
        }

        // Bulk-snapshot every durably RUNNING row up front (§4.7 step 5: "snapshot
        // the running-execution registry into a map keyed by id"); this covers the
        // common case in one query. A registered execution absent from that
        // snapshot has moved on (e.g. to CANCELED) since it started, so it falls
        // back to an individual locked read to pick up its current row.
        let running_rows: HashMap<JobExecutionId, JobExecution> = match self.store.list_running().await {
            Ok(rows) => rows.into_iter().map(|r| (r.id, r)).collect(),
            Err(e) => {
                tracing::error!(error = %e, "failed to list running job execution rows during sync");
                HashMap::new()
            }
        };

        for execution in registered {
            let row = match running_rows.get(&execution.id) {
                Some(row) => row.clone(),
                None => match self.store.get_locked(execution.id).await {
                    Ok(row) => row,
                    Err(e) => {
                        tracing::error!(job_execution_id = %execution.id, error = %e, "failed to load job execution row during sync");
                        continue;
                    }
                },
            };

            let killed_task = if row.status == JobExecutionStatus::Canceled {
                match execution.execution_canceled().await {
                    Ok(task) => task,
                    Err(e) => {
                        tracing::error!(job_execution_id = %execution.id, error = %e, "failed to checkpoint cancellation");
                        continue;
                    }
                }
            } else if self.store.is_timed_out(&row, now).await {
                match execution.execution_timed_out(now).await {
                    Ok(task) => task,
                    Err(e) => {
                        tracing::error!(job_execution_id = %execution.id, error = %e, "failed to record timeout");
                        continue;
                    }
                }
            } else {
                None
            };

            if let Some(task) = killed_task {
                if let Err(e) = self.executor.kill_task(task.id()).await {
                    tracing::warn!(task_id = %task.id(), error = %e, "kill-task request failed");
                }
            }

            if execution.is_finished() {
                self.manager.remove(execution.id);
                self.cleanup.enqueue_finished(&execution);
            }
        }
    }
}

#[cfg(test)]
#[path = "sync_loop_tests.rs"]
mod tests;
