// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! §4.7 steps 1-4: the four read-only collaborators the sync loop refreshes
//! before reconciling running executions. Each is a thin trait so the daemon
//! can depend on a catalog source without owning its refresh logic — real
//! implementations (HTTP/DB-backed) live outside this crate's scope (§1).

use crate::error::SyncError;
use async_trait::async_trait;

/// Refreshes global scheduler settings (§4.6's live-tunable
/// `node_error_period`/`max_node_errors`, among others).
#[async_trait]
pub trait SchedulerSettingsSync: Send + Sync {
    async fn sync_with_database(&self) -> Result<(), SyncError>;
}

/// Refreshes the job-type catalog (definitions, revisions, error interfaces).
#[async_trait]
pub trait JobTypeSync: Send + Sync {
    async fn sync_with_database(&self) -> Result<(), SyncError>;
}

/// Refreshes workspace definitions consulted by pre/post task construction.
#[async_trait]
pub trait WorkspaceSync: Send + Sync {
    async fn sync_with_database(&self) -> Result<(), SyncError>;
}

/// Refreshes the cluster agent node roster against the cluster master.
#[async_trait]
pub trait NodeRosterSync: Send + Sync {
    async fn sync_with_database(&self, master_host: &str, master_port: u16) -> Result<(), SyncError>;
}
