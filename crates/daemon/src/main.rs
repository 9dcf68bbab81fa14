// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! Reference binary entrypoint.
//!
//! Wires the scheduler runtime against the in-memory reference store and
//! adapters (`oj_storage::InMemoryJobExecutionStore`, `oj_adapters::fakes`)
//! rather than a real cluster/database backend — those are out of scope for
//! this crate (§1). A production deployment links `oj_daemon` as a library
//! and supplies its own `JobExecutionStore`/`ExecutorDriver`/sync adapters.

use oj_adapters::{LoggingExecutorDriver, NoopCatalogSync};
use oj_core::{SchedulerSettings, SystemClock};
use oj_daemon::SchedulerRuntime;
use oj_storage::{BuiltinErrorCatalog, InMemoryJobExecutionStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let in_memory_store = InMemoryJobExecutionStore::new();
    // Seed the settings a real deployment would otherwise only pick up once
    // `get_scheduler_settings` is reachable against a live database; the
    // in-memory reference store never talks to one, so these env-derived
    // defaults are all it ever sees (§4.6, §4.11).
    in_memory_store.set_settings(SchedulerSettings::new(
        oj_daemon::default_node_error_period_minutes(),
        oj_daemon::default_max_node_errors(),
    ));
    let store: Arc<dyn oj_storage::JobExecutionStore> = Arc::new(in_memory_store);
    let catalog: Arc<dyn oj_storage::ErrorCatalog> = Arc::new(BuiltinErrorCatalog);
    let executor: Arc<dyn oj_adapters::ExecutorDriver> = Arc::new(LoggingExecutorDriver);
    let catalog_sync = Arc::new(NoopCatalogSync);

    let (master_host, master_port) = oj_daemon::cluster_master();

    tracing::info!(framework_id = %oj_daemon::framework_id(), "starting scheduler runtime");

    let runtime = SchedulerRuntime::new(
        store,
        catalog,
        executor,
        catalog_sync.clone(),
        catalog_sync.clone(),
        catalog_sync.clone(),
        catalog_sync,
        SystemClock,
        master_host,
        master_port,
        oj_daemon::sync_throttle(),
    );

    tracing::warn!("running with the in-memory reference store; no state survives a restart");

    let shutdown = CancellationToken::new();
    let shutdown_signal = shutdown.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown signal received");
        shutdown_signal.cancel();
    });

    runtime.run(shutdown).await;
}
