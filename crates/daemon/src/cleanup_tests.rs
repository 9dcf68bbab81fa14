// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

use super::*;
use crate::quarantine::NodeQuarantinePolicy;
use oj_core::{AtomicCounterIdGen, FakeClock, JobExecutionId, JobTypeId, Resources, StatusUpdate, TaskId, TaskStatusKind};
use oj_storage::{BuiltinErrorCatalog, InMemoryJobExecutionStore};
use std::collections::HashMap;
use std::sync::Arc;

fn finished_execution(id: u64, agent: &str, container: &str, volumes: Vec<String>) -> RunningJobExecution<FakeClock> {
    let store: Arc<dyn oj_storage::JobExecutionStore> = Arc::new(InMemoryJobExecutionStore::new());
    let clock = FakeClock::new();
    let quarantine = Arc::new(NodeQuarantinePolicy::new(store.clone(), clock.clone()));
    let task_id = TaskId::from(format!("scale_job_fw_{id}"));
    let mut task = Task::job(task_id, agent, Resources::new(1.0, 1.0, 1.0));
    task.base.container_name = Some(container.to_string());
    RunningJobExecution::new(
        JobExecutionId::new(id),
        JobTypeId::new(1),
        None,
        volumes,
        HashMap::new(),
        vec![task],
        store,
        Arc::new(BuiltinErrorCatalog),
        quarantine,
        clock,
    )
}

async fn run_to_completion(execution: &RunningJobExecution<FakeClock>, task_id: &str, agent: &str) {
    execution.start_next_task();
    execution.task_update(&StatusUpdate::new(TaskId::from(task_id), agent, TaskStatusKind::Finished, 10)).await;
}

#[tokio::test]
async fn first_task_for_an_agent_is_always_initial() {
    let manager = CleanupManager::new();
    let exe = finished_execution(1, "agent-1", "cont-1", vec!["vol-1".into()]);
    run_to_completion(&exe, "scale_job_fw_1", "agent-1").await;
    manager.enqueue_finished(&exe);

    let id_gen = AtomicCounterIdGen::new();
    let tasks = manager.drain_cleanup_tasks(&id_gen, "fw");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].cleanup_command().unwrap(), CleanupCommand::initial().as_str());
}

#[tokio::test]
async fn second_task_for_an_agent_is_targeted() {
    let manager = CleanupManager::new();
    let exe1 = finished_execution(1, "agent-1", "cont-1", vec!["vol-1".into()]);
    run_to_completion(&exe1, "scale_job_fw_1", "agent-1").await;
    manager.enqueue_finished(&exe1);
    let id_gen = AtomicCounterIdGen::new();
    let _ = manager.drain_cleanup_tasks(&id_gen, "fw"); // consumes the initial cleanup

    let exe2 = finished_execution(2, "agent-1", "cont-2", vec!["vol-2".into()]);
    run_to_completion(&exe2, "scale_job_fw_2", "agent-1").await;
    manager.enqueue_finished(&exe2);
    let tasks = manager.drain_cleanup_tasks(&id_gen, "fw");
    assert_eq!(tasks.len(), 1);
    let command = tasks[0].cleanup_command().unwrap();
    assert!(command.contains("-e cont-2"));
    assert!(command.contains("-e vol-2"));
}

#[tokio::test]
async fn mark_completed_clears_pending_and_suppresses_further_drains() {
    let manager = CleanupManager::new();
    let exe = finished_execution(1, "agent-1", "cont-1", vec![]);
    run_to_completion(&exe, "scale_job_fw_1", "agent-1").await;
    manager.enqueue_finished(&exe);
    let id_gen = AtomicCounterIdGen::new();
    manager.drain_cleanup_tasks(&id_gen, "fw"); // initial, needs_initial -> false, pending still populated

    manager.mark_completed("agent-1");
    assert!(!manager.has_pending_for("agent-1"));
    assert!(manager.drain_cleanup_tasks(&id_gen, "fw").is_empty());
}

#[tokio::test]
async fn one_cleanup_task_per_agent_with_pending_work() {
    let manager = CleanupManager::new();
    let exe1 = finished_execution(1, "agent-1", "cont-1", vec![]);
    run_to_completion(&exe1, "scale_job_fw_1", "agent-1").await;
    manager.enqueue_finished(&exe1);

    let exe2 = finished_execution(2, "agent-2", "cont-2", vec![]);
    run_to_completion(&exe2, "scale_job_fw_2", "agent-2").await;
    manager.enqueue_finished(&exe2);

    let id_gen = AtomicCounterIdGen::new();
    let tasks = manager.drain_cleanup_tasks(&id_gen, "fw");
    assert_eq!(tasks.len(), 2);
}
