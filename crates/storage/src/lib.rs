// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! The persistence boundary (C9/C10): `JobExecutionStore`, `ErrorCatalog`,
//! and the retry discipline that wraps durable writes (§4.8, §4.9).

mod error;
mod error_catalog;
mod job_execution_store;
mod retry;
mod terminal_event_sink;

#[cfg(any(test, feature = "test-support"))]
mod in_memory;

pub use error::StoreError;
pub use error_catalog::{BuiltinErrorCatalog, ErrorCatalog};
pub use job_execution_store::{JobExecutionStore, JobExecutionWithJob, TaskSnapshot};
pub use retry::with_db_retry;
pub use terminal_event_sink::TerminalEventSink;

#[cfg(any(test, feature = "test-support"))]
pub use in_memory::InMemoryJobExecutionStore;
