// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

use super::*;
use oj_core::{JobExecutionBuilder, JobId, NodeId};

fn sample(id: u64, node: u64, job: u64) -> JobExecution {
    JobExecution::builder()
        .id(JobExecutionId::new(id))
        .node_id(Some(NodeId::new(node)))
        .job_id(JobId::new(job))
        .build()
}

#[tokio::test]
async fn get_locked_returns_not_found_for_unknown_id() {
    let store = InMemoryJobExecutionStore::new();
    let err = store.get_locked(JobExecutionId::new(1)).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn handle_job_completion_marks_row_terminal() {
    let store = InMemoryJobExecutionStore::new();
    store.insert_execution(sample(1, 1, 1));
    store.handle_job_completion(JobExecutionId::new(1), 500, &[]).await.unwrap();
    let row = store.get_locked(JobExecutionId::new(1)).await.unwrap();
    assert_eq!(row.status, JobExecutionStatus::Completed);
    assert_eq!(row.ended_at_ms, Some(500));
}

#[tokio::test]
async fn handle_job_failure_records_error_and_tasks() {
    let store = InMemoryJobExecutionStore::new();
    store.insert_execution(sample(1, 1, 1));
    let snap = TaskSnapshot {
        task_id: "scale_job_fw_1".into(),
        agent_id: "agent-1".into(),
        container_name: None,
        has_started: true,
        has_ended: true,
        started_at_ms: Some(1),
        ended_at_ms: Some(2),
        exit_code: Some(137),
    };
    let error = Error::new("docker-terminated", "Docker Terminated", ErrorCategory::System);
    store.handle_job_failure(JobExecutionId::new(1), 600, std::slice::from_ref(&snap), error).await.unwrap();
    let row = store.get_locked(JobExecutionId::new(1)).await.unwrap();
    assert_eq!(row.status, JobExecutionStatus::Failed);
    assert_eq!(row.error_code.as_deref(), Some("docker-terminated"));
    assert_eq!(store.tasks_for(JobExecutionId::new(1)), vec![snap]);
}

#[tokio::test]
async fn count_recent_system_failures_is_distinct_by_job() {
    let store = InMemoryJobExecutionStore::new();
    for (exe_id, job_id) in [(1, 10), (2, 10), (3, 20)] {
        let mut row = sample(exe_id, 1, job_id);
        row.status = JobExecutionStatus::Failed;
        row.error_category = Some(ErrorCategory::System);
        row.ended_at_ms = Some(1_000);
        store.insert_execution(row);
    }
    let count = store.count_recent_system_failures(NodeId::new(1), 0).await.unwrap();
    assert_eq!(count, 2, "two distinct jobs failed, even though job 10 failed twice");
}

#[tokio::test]
async fn count_recent_system_failures_excludes_old_and_non_system() {
    let store = InMemoryJobExecutionStore::new();
    let mut old = sample(1, 1, 10);
    old.status = JobExecutionStatus::Failed;
    old.error_category = Some(ErrorCategory::System);
    old.ended_at_ms = Some(100);
    store.insert_execution(old);

    let mut algorithmic = sample(2, 1, 20);
    algorithmic.status = JobExecutionStatus::Failed;
    algorithmic.error_category = Some(ErrorCategory::Algorithm);
    algorithmic.ended_at_ms = Some(5_000);
    store.insert_execution(algorithmic);

    let count = store.count_recent_system_failures(NodeId::new(1), 1_000).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn pause_node_sets_all_three_fields() {
    let store = InMemoryJobExecutionStore::new();
    store.insert_node(Node::new(NodeId::new(1), "agent-1.example"));
    store.pause_node(NodeId::new(1), oj_core::PAUSE_REASON_SYSTEM_FAILURE_RATE).await.unwrap();
    let node = store.node(NodeId::new(1)).unwrap();
    assert!(node.is_paused);
    assert!(node.is_paused_errors);
    assert_eq!(node.pause_reason.as_deref(), Some(oj_core::PAUSE_REASON_SYSTEM_FAILURE_RATE));
}

#[tokio::test]
async fn is_timed_out_respects_configured_deadline() {
    let store = InMemoryJobExecutionStore::new();
    let row = sample(1, 1, 1);
    store.insert_execution(row.clone());
    store.set_deadline(JobExecutionId::new(1), 10_000);
    assert!(!store.is_timed_out(&row, 9_999).await);
    assert!(store.is_timed_out(&row, 10_000).await);
}
