// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! The scheduler runtime (C1-C7): `Task` variants, `RunningJobExecution`,
//! `RunningJobManager`, `CleanupManager`, `TaskUpdateRouter`,
//! `NodeQuarantinePolicy`, and the `DatabaseSyncLoop` that ties them
//! together against the abstract `JobExecutionStore`/`ExecutorDriver`
//! boundaries (oj-storage, oj-adapters).

mod cleanup;
mod config;
mod error;
mod manager;
mod quarantine;
mod router;
mod running_execution;
mod sync_loop;
mod task;

pub use cleanup::CleanupManager;
pub use config::{cluster_master, default_max_node_errors, default_node_error_period_minutes, framework_id, sync_throttle};
pub use error::RuntimeError;
pub use manager::RunningJobManager;
pub use quarantine::NodeQuarantinePolicy;
pub use router::TaskUpdateRouter;
pub use running_execution::RunningJobExecution;
pub use sync_loop::{DatabaseSyncLoop, THROTTLE_FLOOR};
pub use task::{category_of, classify_or_unknown, CleanupCommand, Task, TaskBase, TaskKind, TaskTransition};

use oj_adapters::{ExecutorDriver, JobTypeSync, NodeRosterSync, SchedulerSettingsSync, WorkspaceSync};
use oj_core::{Clock, JobExecutionId, JobTypeId, NodeId};
use oj_storage::{ErrorCatalog, JobExecutionStore};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Everything the scheduler runtime needs to run, assembled by the
/// deployment wrapper (§1: the core never constructs its own collaborators,
/// only the abstractions it consumes). The intake path that decides *when*
/// to call [`Self::register_execution`] — resource-offer matching, job-queue
/// draining — lives outside this crate (§1 Non-goals); this type exposes the
/// seam it plugs into.
pub struct SchedulerRuntime<C: Clock> {
    pub manager: Arc<RunningJobManager<C>>,
    pub router: Arc<TaskUpdateRouter<C>>,
    pub cleanup: Arc<CleanupManager>,
    pub sync_loop: Arc<DatabaseSyncLoop<C>>,
    store: Arc<dyn JobExecutionStore>,
    catalog: Arc<dyn ErrorCatalog>,
    quarantine: Arc<NodeQuarantinePolicy<C>>,
    clock: C,
}

impl<C: Clock + 'static> SchedulerRuntime<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn JobExecutionStore>,
        catalog: Arc<dyn ErrorCatalog>,
        executor: Arc<dyn ExecutorDriver>,
        scheduler_settings: Arc<dyn SchedulerSettingsSync>,
        job_types: Arc<dyn JobTypeSync>,
        workspaces: Arc<dyn WorkspaceSync>,
        nodes: Arc<dyn NodeRosterSync>,
        clock: C,
        master_host: impl Into<String>,
        master_port: u16,
        sync_throttle: Duration,
    ) -> Self {
        let manager = Arc::new(RunningJobManager::new());
        let router = Arc::new(TaskUpdateRouter::new(Arc::clone(&manager)));
        let cleanup = Arc::new(CleanupManager::new());
        let quarantine = Arc::new(NodeQuarantinePolicy::new(Arc::clone(&store), clock.clone()));
        let sync_loop = Arc::new(DatabaseSyncLoop::new(
            Arc::clone(&manager),
            Arc::clone(&store),
            executor,
            Arc::clone(&cleanup),
            scheduler_settings,
            job_types,
            workspaces,
            nodes,
            clock.clone(),
            master_host,
            master_port,
            sync_throttle,
        ));
        Self { manager, router, cleanup, sync_loop, store, catalog, quarantine, clock }
    }

    /// Construct a [`RunningJobExecution`] for a durable row that just
    /// transitioned to RUNNING, register it in the manager, and hand back
    /// the shared handle (§3 Lifecycle).
    #[allow(clippy::too_many_arguments)]
    pub fn register_execution(
        &self,
        id: JobExecutionId,
        job_type_id: JobTypeId,
        node_id: Option<NodeId>,
        docker_volumes: Vec<String>,
        exit_code_errors: HashMap<i32, String>,
        tasks: Vec<Task>,
    ) -> Arc<RunningJobExecution<C>> {
        let execution = Arc::new(RunningJobExecution::new(
            id,
            job_type_id,
            node_id,
            docker_volumes,
            exit_code_errors,
            tasks,
            Arc::clone(&self.store),
            Arc::clone(&self.catalog),
            Arc::clone(&self.quarantine),
            self.clock.clone(),
        ));
        self.manager.add(Arc::clone(&execution));
        execution
    }

    /// Run the sync loop until `shutdown` is cancelled.
    pub async fn run(&self, shutdown: CancellationToken) {
        self.sync_loop.run(shutdown).await;
    }
}
