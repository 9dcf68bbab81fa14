// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! `oj_daemon::RuntimeError` — wraps `StoreError` for the handful of call
//! sites that must propagate after retries are exhausted (§4.8, §4.10).

use oj_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
