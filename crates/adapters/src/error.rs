// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! Errors from the cluster-manager and external-collaborator adapters.

use thiserror::Error;

/// Errors from [`crate::ExecutorDriver`] operations.
#[derive(Debug, Error)]
pub enum ExecutorDriverError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("kill request failed: {0}")]
    KillFailed(String),
}

/// Errors from the external-collaborator sync adapters (§4.7 steps 1-4).
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("sync source unreachable: {0}")]
    Unreachable(String),
    #[error("sync source returned an invalid response: {0}")]
    InvalidResponse(String),
}
