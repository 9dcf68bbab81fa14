// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! Inverts the original's `from queue.models import Queue` lazy-import
//! workaround (Design Notes §9): rather than `RunningJobExecution` reaching
//! up into a queue-layer module to report terminal outcomes, it depends on
//! this narrow, outbound-only trait. `JobExecutionStore` already exposes the
//! two calls this needs, so every store gets the trait for free.

use crate::error::StoreError;
use crate::job_execution_store::{JobExecutionStore, TaskSnapshot};
use async_trait::async_trait;
use oj_core::{Error, JobExecutionId};

/// The outbound surface `RunningJobExecution` reports terminal outcomes
/// through, named the way the original's queue-layer callback was shaped.
#[async_trait]
pub trait TerminalEventSink: Send + Sync {
    async fn complete(&self, id: JobExecutionId, when_ms: u64, tasks: &[TaskSnapshot]) -> Result<(), StoreError>;

    async fn fail(
        &self,
        id: JobExecutionId,
        when_ms: u64,
        tasks: &[TaskSnapshot],
        error: Error,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: JobExecutionStore + ?Sized> TerminalEventSink for T {
    async fn complete(&self, id: JobExecutionId, when_ms: u64, tasks: &[TaskSnapshot]) -> Result<(), StoreError> {
        self.handle_job_completion(id, when_ms, tasks).await
    }

    async fn fail(
        &self,
        id: JobExecutionId,
        when_ms: u64,
        tasks: &[TaskSnapshot],
        error: Error,
    ) -> Result<(), StoreError> {
        self.handle_job_failure(id, when_ms, tasks, error).await
    }
}
