// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! Errors raised by the durable store boundary.

use oj_core::JobExecutionId;
use thiserror::Error;

/// Failure modes surfaced by [`crate::JobExecutionStore`](crate::job_execution_store::JobExecutionStore).
///
/// `Transient` variants are the ones [`crate::retry::with_db_retry`] retries;
/// anything else is returned to the caller immediately.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job execution {0} not found")]
    NotFound(JobExecutionId),

    #[error("job execution {0} is locked by another writer")]
    Conflict(JobExecutionId),

    #[error("database connection error: {0}")]
    Connection(String),

    #[error("database query timed out")]
    QueryTimeout,

    #[error("database query failed: {0}")]
    Query(String),
}

impl StoreError {
    /// Whether this failure is worth retrying with backoff (§4.8). Mirrors the
    /// original's `@retry_database_query` decorator, which retries on any
    /// `django.db.Error` but never on application-level conditions like
    /// "not found".
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Connection(_) | StoreError::QueryTimeout | StoreError::Query(_))
    }
}
