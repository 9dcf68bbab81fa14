// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! Test doubles for the adapter traits, gated behind `test-support`.

use crate::error::{ExecutorDriverError, SyncError};
use crate::executor_driver::ExecutorDriver;
use crate::sync::{JobTypeSync, NodeRosterSync, SchedulerSettingsSync, WorkspaceSync};
use async_trait::async_trait;
use oj_core::TaskId;
use parking_lot::Mutex;

/// Records every kill request it receives, for assertions in daemon tests.
#[derive(Default)]
pub struct FakeExecutorDriver {
    killed: Mutex<Vec<TaskId>>,
}

impl FakeExecutorDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn killed_tasks(&self) -> Vec<TaskId> {
        self.killed.lock().clone()
    }
}

#[async_trait]
impl ExecutorDriver for FakeExecutorDriver {
    async fn kill_task(&self, task_id: &TaskId) -> Result<(), ExecutorDriverError> {
        self.killed.lock().push(task_id.clone());
        Ok(())
    }
}

/// A catalog-sync stub that always succeeds and does nothing, for exercising
/// the sync loop's steps 1-4 without a real catalog source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCatalogSync;

#[async_trait]
impl SchedulerSettingsSync for NoopCatalogSync {
    async fn sync_with_database(&self) -> Result<(), SyncError> {
        Ok(())
    }
}

#[async_trait]
impl JobTypeSync for NoopCatalogSync {
    async fn sync_with_database(&self) -> Result<(), SyncError> {
        Ok(())
    }
}

#[async_trait]
impl WorkspaceSync for NoopCatalogSync {
    async fn sync_with_database(&self) -> Result<(), SyncError> {
        Ok(())
    }
}

#[async_trait]
impl NodeRosterSync for NoopCatalogSync {
    async fn sync_with_database(&self, _master_host: &str, _master_port: u16) -> Result<(), SyncError> {
        Ok(())
    }
}
