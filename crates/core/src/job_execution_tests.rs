// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

use super::*;

#[test]
fn status_display_matches_wire_strings() {
    assert_eq!(JobExecutionStatus::Queued.to_string(), "QUEUED");
    assert_eq!(JobExecutionStatus::Running.to_string(), "RUNNING");
    assert_eq!(JobExecutionStatus::Completed.to_string(), "COMPLETED");
    assert_eq!(JobExecutionStatus::Failed.to_string(), "FAILED");
    assert_eq!(JobExecutionStatus::Canceled.to_string(), "CANCELED");
}

#[test]
fn attempts_exhausted_when_num_exes_reaches_max_tries() {
    let exe = JobExecution::builder().num_exes(2).max_tries(3).build();
    assert!(!exe.attempts_exhausted());

    let exe = JobExecution::builder().num_exes(3).max_tries(3).build();
    assert!(exe.attempts_exhausted());

    let exe = JobExecution::builder().num_exes(4).max_tries(3).build();
    assert!(exe.attempts_exhausted());
}

#[test]
fn builder_defaults_produce_a_running_execution() {
    let exe = JobExecution::builder().build();
    assert_eq!(exe.status, JobExecutionStatus::Running);
    assert!(exe.node_id.is_some());
    assert!(!exe.is_system);
}
