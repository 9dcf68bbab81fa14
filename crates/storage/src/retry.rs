// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! Bounded exponential-backoff retry for durable writes (§4.8).
//!
//! Stands in for the original's `@retry_database_query` decorator, which wraps
//! every database-touching call on `RunningJobExecution` and retries on any
//! `django.db.Error`. Here the decorator becomes an explicit helper the
//! caller wraps each store call in.

use crate::error::StoreError;
use std::future::Future;

const BACKOFF_MS: [u64; 3] = [50, 200, 800];

/// Retry `op` up to `BACKOFF_MS.len() + 1` times, sleeping with exponential
/// backoff between attempts, as long as the error is [`StoreError::is_transient`].
/// A non-transient error returns immediately without retrying.
pub async fn with_db_retry<T, F, Fut>(mut op: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut attempt = 0usize;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if e.is_transient() && attempt < BACKOFF_MS.len() => {
                let delay = BACKOFF_MS[attempt];
                tracing::warn!(attempt, delay_ms = delay, error = %e, "database query failed, retrying");
                tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
