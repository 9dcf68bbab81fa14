// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

use super::*;
use crate::quarantine::NodeQuarantinePolicy;
use crate::task::Task;
use oj_core::{FakeClock, JobExecutionId, JobTypeId, Resources, StatusUpdate, TaskId, TaskStatusKind};
use oj_storage::{BuiltinErrorCatalog, InMemoryJobExecutionStore};
use std::collections::HashMap;
use std::sync::Arc;

fn registered_execution(manager: &RunningJobManager<FakeClock>, id: u64, task_id: &str) {
    let store: Arc<dyn oj_storage::JobExecutionStore> = Arc::new(InMemoryJobExecutionStore::new());
    let clock = FakeClock::new();
    let quarantine = Arc::new(NodeQuarantinePolicy::new(store.clone(), clock.clone()));
    let task = Task::job(TaskId::from(task_id), "agent-1", Resources::new(1.0, 1.0, 1.0));
    let execution = Arc::new(RunningJobExecution::new(
        JobExecutionId::new(id),
        JobTypeId::new(1),
        None,
        vec![],
        HashMap::new(),
        vec![task],
        store,
        Arc::new(BuiltinErrorCatalog),
        quarantine,
        clock,
    ));
    execution.start_next_task();
    manager.add(execution);
}

#[tokio::test]
async fn routes_an_update_to_the_execution_whose_current_task_matches() {
    let manager = Arc::new(RunningJobManager::new());
    registered_execution(&manager, 1, "scale_job_fw_1");
    registered_execution(&manager, 2, "scale_job_fw_2");
    let router = TaskUpdateRouter::new(manager.clone());

    router.route(StatusUpdate::new(TaskId::from("scale_job_fw_2"), "agent-1", TaskStatusKind::Running, 10)).await;

    let execution = manager.get(JobExecutionId::new(2)).unwrap();
    let current = execution.current_task().unwrap();
    assert!(current.base.has_started);

    let untouched = manager.get(JobExecutionId::new(1)).unwrap();
    assert!(!untouched.current_task().unwrap().base.has_started, "the update must not leak to a different execution");
}

#[tokio::test]
async fn updates_for_an_unknown_task_are_dropped_without_panicking() {
    let manager = Arc::new(RunningJobManager::new());
    registered_execution(&manager, 1, "scale_job_fw_1");
    let router = TaskUpdateRouter::new(manager.clone());

    router.route(StatusUpdate::new(TaskId::from("scale_job_fw_999"), "agent-1", TaskStatusKind::Running, 10)).await;

    let execution = manager.get(JobExecutionId::new(1)).unwrap();
    assert!(!execution.current_task().unwrap().base.has_started, "the unmatched update must have no effect");
}
