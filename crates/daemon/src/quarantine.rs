// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! C6: `NodeQuarantinePolicy` — pauses a node that has exceeded its recent
//! systemic-failure budget.

use crate::error::RuntimeError;
use oj_core::{Clock, Error, JobExecutionId, PAUSE_REASON_SYSTEM_FAILURE_RATE};
use oj_storage::JobExecutionStore;
use std::sync::Arc;

/// Read-mostly policy consulted after any system-category task failure whose
/// execution has exhausted its attempt budget (§4.6). The only write it ever
/// performs is the single node-pause call, and only once the count crosses
/// the configured threshold.
pub struct NodeQuarantinePolicy<C: Clock> {
    store: Arc<dyn JobExecutionStore>,
    clock: C,
}

impl<C: Clock> NodeQuarantinePolicy<C> {
    pub fn new(store: Arc<dyn JobExecutionStore>, clock: C) -> Self {
        Self { store, clock }
    }

    /// Evaluate quarantine for the execution that just failed with `error`.
    /// A no-op unless the error is system-category, the execution has
    /// exhausted its tries, the execution has a known node, and that node
    /// isn't already paused (§4.6, P6).
    pub async fn evaluate_after_failure(&self, execution_id: JobExecutionId, error: &Error) -> Result<(), RuntimeError> {
        if !error.is_system() {
            return Ok(());
        }

        let with_job = self.store.get_with_job_and_job_type(execution_id).await?;
        if !with_job.execution.attempts_exhausted() {
            return Ok(());
        }
        let Some(node) = with_job.node_id else {
            return Ok(());
        };
        if self.store.is_node_paused(node).await? {
            return Ok(());
        }

        let settings = self.store.get_scheduler_settings().await?;
        if !settings.policy_enabled() {
            return Ok(());
        }

        let period_ms = (settings.node_error_period_minutes as u64).saturating_mul(60_000);
        let since_ms = self.clock.epoch_ms().saturating_sub(period_ms);
        let count = self.store.count_recent_system_failures(node, since_ms).await?;

        if count >= settings.max_node_errors as u64 {
            tracing::warn!(node_id = %node, count, max = settings.max_node_errors, "quarantining node: system failure rate too high");
            self.store.pause_node(node, PAUSE_REASON_SYSTEM_FAILURE_RATE).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "quarantine_tests.rs"]
mod tests;
