// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! C8: `ExecutorDriver` — the abstraction for killing tasks in the cluster
//! resource manager.

use crate::error::ExecutorDriverError;
use async_trait::async_trait;
use oj_core::TaskId;

/// Cluster-driver kill surface the sync loop calls on cancellation and
/// timeout (§4.7 step 5, §6). Best-effort: a kill request may be issued more
/// than once for the same task id, and the implementation must tolerate that
/// rather than treat a repeat as an error (the core relies on the driver's
/// own idempotency, §1).
#[async_trait]
pub trait ExecutorDriver: Send + Sync {
    async fn kill_task(&self, task_id: &TaskId) -> Result<(), ExecutorDriverError>;
}

/// Production `ExecutorDriver` that logs the kill request and reports success.
///
/// Stands in for the real wire-encoding driver (out of scope, §1): the
/// reconciliation loop only needs a best-effort send, never a confirmation
/// that the kill reached the agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingExecutorDriver;

#[async_trait]
impl ExecutorDriver for LoggingExecutorDriver {
    async fn kill_task(&self, task_id: &TaskId) -> Result<(), ExecutorDriverError> {
        tracing::info!(task_id = %task_id, "sending kill-task request to cluster manager");
        Ok(())
    }
}
