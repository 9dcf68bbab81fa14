// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

use super::*;
use oj_core::{
    Error, ErrorCategory, FakeClock, JobExecutionBuilder, JobExecutionId, JobExecutionStatus, JobId, Node, NodeId,
    SchedulerSettings,
};
use oj_storage::InMemoryJobExecutionStore;

const NODE: NodeId = NodeId(1);

fn system_error() -> Error {
    Error::new("node-lost", "Node Lost", ErrorCategory::System)
}

fn algorithm_error() -> Error {
    Error::new("unknown", "Unknown Error", ErrorCategory::Algorithm)
}

fn exhausted_execution(id: u64) -> oj_core::JobExecution {
    JobExecutionBuilder::default()
        .id(JobExecutionId::new(id))
        .node_id(Some(NODE))
        .num_exes(3)
        .max_tries(3)
        .build()
}

fn seed_failed_row(store: &InMemoryJobExecutionStore, id: u64, ended_at_ms: u64) {
    let row = JobExecutionBuilder::default()
        .id(JobExecutionId::new(id))
        .job_id(JobId::new(id))
        .node_id(Some(NODE))
        .status(JobExecutionStatus::Failed)
        .error_category(Some(ErrorCategory::System))
        .ended_at_ms(Some(ended_at_ms))
        .build();
    store.insert_execution(row);
}

fn harness(max_node_errors: u32, period_minutes: i64) -> (Arc<InMemoryJobExecutionStore>, FakeClock, NodeQuarantinePolicy<FakeClock>) {
    let store = Arc::new(InMemoryJobExecutionStore::new());
    store.insert_node(Node::new(NODE, "agent-host-1"));
    store.set_settings(SchedulerSettings::new(period_minutes, max_node_errors));
    let clock = FakeClock::new();
    let policy = NodeQuarantinePolicy::new(store.clone() as Arc<dyn oj_storage::JobExecutionStore>, clock.clone());
    (store, clock, policy)
}

#[tokio::test]
async fn pauses_the_node_once_the_failure_count_crosses_the_threshold() {
    let (store, clock, policy) = harness(5, 1);
    store.insert_execution(exhausted_execution(1));
    for id in 2..=6 {
        seed_failed_row(&store, id, clock.epoch_ms());
    }

    policy.evaluate_after_failure(JobExecutionId::new(1), &system_error()).await.unwrap();

    let node = store.node(NODE).unwrap();
    assert!(node.is_paused);
    assert!(node.is_paused_errors);
    assert_eq!(node.pause_reason.as_deref(), Some(oj_core::PAUSE_REASON_SYSTEM_FAILURE_RATE));
}

#[tokio::test]
async fn non_system_errors_never_trigger_quarantine() {
    let (store, clock, policy) = harness(5, 1);
    store.insert_execution(exhausted_execution(1));
    for id in 2..=6 {
        seed_failed_row(&store, id, clock.epoch_ms());
    }

    policy.evaluate_after_failure(JobExecutionId::new(1), &algorithm_error()).await.unwrap();

    assert!(!store.node(NODE).unwrap().is_paused);
}

#[tokio::test]
async fn policy_disabled_when_error_period_is_not_positive() {
    let (store, clock, policy) = harness(5, 0);
    store.insert_execution(exhausted_execution(1));
    for id in 2..=6 {
        seed_failed_row(&store, id, clock.epoch_ms());
    }

    policy.evaluate_after_failure(JobExecutionId::new(1), &system_error()).await.unwrap();

    assert!(!store.node(NODE).unwrap().is_paused);
}

#[tokio::test]
async fn skips_executions_that_have_not_exhausted_their_attempts() {
    let (store, clock, policy) = harness(5, 1);
    let row = JobExecutionBuilder::default().id(JobExecutionId::new(1)).node_id(Some(NODE)).num_exes(1).max_tries(3).build();
    store.insert_execution(row);
    for id in 2..=6 {
        seed_failed_row(&store, id, clock.epoch_ms());
    }

    policy.evaluate_after_failure(JobExecutionId::new(1), &system_error()).await.unwrap();

    assert!(!store.node(NODE).unwrap().is_paused);
}

#[tokio::test]
async fn does_not_pause_below_the_configured_threshold() {
    let (store, clock, policy) = harness(5, 1);
    store.insert_execution(exhausted_execution(1));
    for id in 2..=4 {
        seed_failed_row(&store, id, clock.epoch_ms());
    }

    policy.evaluate_after_failure(JobExecutionId::new(1), &system_error()).await.unwrap();

    assert!(!store.node(NODE).unwrap().is_paused);
}

#[tokio::test]
async fn an_already_paused_node_is_left_alone() {
    let (store, clock, policy) = harness(5, 1);
    store.insert_execution(exhausted_execution(1));
    for id in 2..=6 {
        seed_failed_row(&store, id, clock.epoch_ms());
    }
    {
        let mut node = store.node(NODE).unwrap();
        node.is_paused = true;
        node.pause_reason = Some("already paused for another reason".to_string());
        store.insert_node(node);
    }

    policy.evaluate_after_failure(JobExecutionId::new(1), &system_error()).await.unwrap();

    assert_eq!(store.node(NODE).unwrap().pause_reason.as_deref(), Some("already paused for another reason"));
}
