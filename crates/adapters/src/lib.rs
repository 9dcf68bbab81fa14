// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! External collaborator boundaries (§6, §4.7 steps 1-4): the cluster-driver
//! kill surface and the four read-only catalog-sync adapters the sync loop
//! refreshes before reconciling running executions.

mod error;
mod executor_driver;
mod sync;

#[cfg(any(test, feature = "test-support"))]
mod fakes;

pub use error::{ExecutorDriverError, SyncError};
pub use executor_driver::{ExecutorDriver, LoggingExecutorDriver};
pub use sync::{JobTypeSync, NodeRosterSync, SchedulerSettingsSync, WorkspaceSync};

#[cfg(any(test, feature = "test-support"))]
pub use fakes::{FakeExecutorDriver, NoopCatalogSync};
