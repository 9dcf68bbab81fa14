// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

#[tokio::test(start_paused = true)]
async fn succeeds_without_retry() {
    let calls = AtomicUsize::new(0);
    let result = with_db_retry(|| async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, StoreError>(42)
    })
    .await;
    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn retries_transient_errors_until_success() {
    let calls = AtomicUsize::new(0);
    let result = with_db_retry(|| async {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        if n < 2 {
            Err(StoreError::Connection("reset".into()))
        } else {
            Ok(())
        }
    })
    .await;
    assert!(result.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn gives_up_after_exhausting_backoff_schedule() {
    let calls = AtomicUsize::new(0);
    let result: Result<(), StoreError> = with_db_retry(|| async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::QueryTimeout)
    })
    .await;
    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), BACKOFF_MS.len() + 1);
}

#[tokio::test(start_paused = true)]
async fn does_not_retry_non_transient_errors() {
    let calls = AtomicUsize::new(0);
    let result: Result<(), StoreError> = with_db_retry(|| async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::NotFound(oj_core::JobExecutionId::new(7)))
    })
    .await;
    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
