// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! C1: `Task` — the leaf state machine for one containerized step.
//!
//! A tagged variant with a shared capability set (Design Notes §9) rather
//! than an inheritance hierarchy: `TaskBase` carries everything every
//! variant needs, and `TaskKind` tags which of Pre/Job/Post/Cleanup this is.
//! Variant-specific behavior (fault classification overrides, the refresh
//! hook, the `complete` refresh-policy) is a match on the tag, not a vtable.

use oj_core::{codes, Error, ErrorCategory, JobExecution, Resources, TaskId, REASON_EXECUTOR_TERMINATED};
use oj_storage::TaskSnapshot;
use std::collections::HashMap;

/// Which pipeline step this task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Pre,
    Job,
    Post,
    Cleanup,
}

/// Shell command a [`CleanupTask`] carries, built once at construction time
/// and never reassigned (§4.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupCommand(String);

const INITIAL_CLEANUP_COMMAND: &str = "for cont in `docker ps -f status=created -f status=dead -f status=exited --format '{{.Names}}'`; do docker rm $cont; done; for vol in `docker volume ls -f dangling=true -q`; do docker volume rm $vol; done";

impl CleanupCommand {
    /// The broad, agent-wide cleanup issued as an agent's first cleanup task.
    pub fn initial() -> Self {
        Self(INITIAL_CLEANUP_COMMAND.to_string())
    }

    /// A targeted cleanup enumerating exactly the containers/volumes of the
    /// executions this cleanup was built for (§6).
    pub fn targeted(container_names: &[String], volume_names: &[String]) -> Self {
        let mut names: Vec<&str> = Vec::with_capacity(container_names.len() + volume_names.len());
        names.extend(container_names.iter().map(String::as_str));
        names.extend(volume_names.iter().map(String::as_str));
        if names.is_empty() {
            // Nothing to filter on; fall back to the broad sweep rather than
            // emit a grep with no patterns (which would match everything).
            return Self::initial();
        }
        let grep: Vec<String> = names.iter().map(|n| format!("-e {n}")).collect();
        let grep = grep.join(" ");
        Self(format!(
            "for cont in `docker ps -f status=created -f status=dead -f status=exited --format '{{{{.Names}}}}' | grep {grep}`; do docker rm $cont; done; for vol in `docker volume ls -f dangling=true -q | grep {grep}`; do docker volume rm $vol; done"
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fields shared by every task variant (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct TaskBase {
    pub id: TaskId,
    pub name: String,
    pub agent_id: String,
    pub container_name: Option<String>,
    pub uses_docker: bool,
    pub has_started: bool,
    pub has_ended: bool,
    pub started_at_ms: Option<u64>,
    pub ended_at_ms: Option<u64>,
    pub last_status_update_ms: Option<u64>,
    pub exit_code: Option<i32>,
    pub resources: Resources,
}

impl TaskBase {
    pub fn new(id: TaskId, name: impl Into<String>, agent_id: impl Into<String>, resources: Resources) -> Self {
        Self {
            id,
            name: name.into(),
            agent_id: agent_id.into(),
            container_name: None,
            uses_docker: true,
            has_started: false,
            has_ended: false,
            started_at_ms: None,
            ended_at_ms: None,
            last_status_update_ms: None,
            exit_code: None,
            resources,
        }
    }

    pub fn with_container_name(mut self, name: impl Into<String>) -> Self {
        self.container_name = Some(name.into());
        self
    }
}

/// Minimal status-update shape the task state machine consumes; equal to
/// `oj_core::StatusUpdate` but decoupled so `Task::update`/`complete` don't
/// need the router's routing fields.
#[derive(Debug, Clone, Copy)]
pub struct TaskTransition<'a> {
    pub reason: Option<&'a str>,
    pub exit_code: Option<i32>,
    pub timestamp_ms: u64,
}

/// One containerized step, or a housekeeping cleanup command (§3, §4.1).
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub base: TaskBase,
    pub kind: TaskKind,
    cleanup_command: Option<CleanupCommand>,
}

impl Task {
    pub fn pre(id: TaskId, agent_id: impl Into<String>, resources: Resources) -> Self {
        Self { base: TaskBase::new(id, "Pre Task", agent_id, resources), kind: TaskKind::Pre, cleanup_command: None }
    }

    pub fn job(id: TaskId, agent_id: impl Into<String>, resources: Resources) -> Self {
        Self { base: TaskBase::new(id, "Job Task", agent_id, resources), kind: TaskKind::Job, cleanup_command: None }
    }

    pub fn post(id: TaskId, agent_id: impl Into<String>, resources: Resources) -> Self {
        Self { base: TaskBase::new(id, "Post Task", agent_id, resources), kind: TaskKind::Post, cleanup_command: None }
    }

    /// Construct a cleanup task for one agent. `command` is fixed for the
    /// lifetime of the task (§4.1).
    pub fn cleanup(id: TaskId, agent_id: impl Into<String>, command: CleanupCommand) -> Self {
        Self {
            base: TaskBase::new(id, "Cleanup Task", agent_id, Resources::cleanup()),
            kind: TaskKind::Cleanup,
            cleanup_command: Some(command),
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.base.id
    }

    pub fn agent_id(&self) -> &str {
        &self.base.agent_id
    }

    pub fn container_name(&self) -> Option<&str> {
        self.base.container_name.as_deref()
    }

    pub fn resources(&self) -> Resources {
        self.base.resources
    }

    pub fn cleanup_command(&self) -> Option<&str> {
        self.cleanup_command.as_ref().map(CleanupCommand::as_str)
    }

    /// Apply a non-terminal RUNNING transition. Idempotent on repeat RUNNING
    /// updates (§4.1): only the first call stamps `started_at_ms`.
    pub fn update(&mut self, t: TaskTransition<'_>) {
        if !self.base.has_started {
            self.base.has_started = true;
            self.base.started_at_ms = Some(t.timestamp_ms);
        }
        self.base.last_status_update_ms = Some(t.timestamp_ms);
    }

    /// Apply a terminal success transition. Idempotent: a repeat completion
    /// for an already-ended task is a no-op other than timestamp bookkeeping.
    ///
    /// Returns whether successors must re-read durable job-execution fields
    /// before running (Open Question, SPEC_FULL §4 resolution): only
    /// [`TaskKind::Pre`] returns `true`, since a pre-task may rewrite the
    /// job's scheduled disk sizes or input mounts; `Job`/`Post`/`Cleanup`
    /// keep the base `false`.
    pub fn complete(&mut self, t: TaskTransition<'_>) -> bool {
        if !self.base.has_started {
            self.base.has_started = true;
            self.base.started_at_ms = Some(t.timestamp_ms);
        }
        if !self.base.has_ended {
            self.base.has_ended = true;
            self.base.ended_at_ms = Some(t.timestamp_ms);
            self.base.exit_code = t.exit_code;
        }
        self.base.last_status_update_ms = Some(t.timestamp_ms);
        matches!(self.kind, TaskKind::Pre)
    }

    /// Apply a terminal fault transition (FAILED/KILLED). Unlike `complete`,
    /// this carries no refresh-policy meaning — the owning execution is
    /// terminating regardless, so there are no successors to refresh.
    pub fn end_with_failure(&mut self, t: TaskTransition<'_>) {
        if !self.base.has_started {
            self.base.has_started = true;
            self.base.started_at_ms = Some(t.timestamp_ms);
        }
        if !self.base.has_ended {
            self.base.has_ended = true;
            self.base.ended_at_ms = Some(t.timestamp_ms);
            self.base.exit_code = t.exit_code;
        }
        self.base.last_status_update_ms = Some(t.timestamp_ms);
    }

    /// Variant-specific fault classification with the shared fallback (§4.1).
    ///
    /// `exit_code_errors` is the owning job type's exit-code → error-code
    /// mapping (`JobExecution::exit_code_errors`); a job-type-specific mapping
    /// for this transition's exit code is consulted first, ahead of the
    /// generic launch/executor-terminated fallback, mirroring the original's
    /// `_error_mapping` lookup ahead of `_consider_general_error`.
    pub fn determine_error(&self, t: TaskTransition<'_>, exit_code_errors: &HashMap<i32, String>) -> Option<String> {
        if let Some(exit_code) = t.exit_code {
            if let Some(mapped) = exit_code_errors.get(&exit_code) {
                return Some(mapped.clone());
            }
        }
        if !self.base.has_started {
            return Some((if self.base.uses_docker { codes::DOCKER_TASK_LAUNCH } else { codes::TASK_LAUNCH }).to_string());
        }
        if self.base.uses_docker && t.reason == Some(REASON_EXECUTOR_TERMINATED) {
            return Some(codes::DOCKER_TERMINATED.to_string());
        }
        None
    }

    /// Copy task timings, exit code, and std-stream references into the
    /// durable row at a cancellation checkpoint or terminal outcome (§4.1).
    pub fn populate_job_exe_model(&self) -> TaskSnapshot {
        TaskSnapshot {
            task_id: self.base.id.as_str().to_string(),
            agent_id: self.base.agent_id.clone(),
            container_name: self.base.container_name.clone(),
            has_started: self.base.has_started,
            has_ended: self.base.has_ended,
            started_at_ms: self.base.started_at_ms,
            ended_at_ms: self.base.ended_at_ms,
            exit_code: self.base.exit_code,
        }
    }

    /// Re-read mutable, scheduled inputs from the persistent row. Default is
    /// a no-op; [`TaskKind::Job`] and [`TaskKind::Post`] pick up resource
    /// changes a completed pre-task may have made (SPEC_FULL §4 resolution).
    pub fn refresh_cached_values(&mut self, row: &JobExecution) {
        match self.kind {
            TaskKind::Job => self.base.resources.cpus = row.scheduled.cpus,
            TaskKind::Post => self.base.resources.disk = row.scheduled.disk_out,
            TaskKind::Pre | TaskKind::Cleanup => {}
        }
    }
}

/// Substitutes `unknown` when [`Task::determine_error`] yields no classification.
pub fn classify_or_unknown(code: Option<String>) -> String {
    code.unwrap_or_else(|| codes::UNKNOWN.to_string())
}

/// Whether an error code is system-category, for the quarantine precondition
/// (§4.6). All built-in task-launch/lost/timeout codes are system failures;
/// `unknown` is not, absent a job-type error-interface reclassification.
pub fn category_of(code: &str) -> ErrorCategory {
    match code {
        codes::NODE_LOST | codes::TIMEOUT | codes::TASK_LAUNCH | codes::DOCKER_TASK_LAUNCH | codes::DOCKER_TERMINATED => {
            ErrorCategory::System
        }
        _ => ErrorCategory::Algorithm,
    }
}

pub(crate) fn error_for(code: &'static str, catalog: &dyn oj_storage::ErrorCatalog) -> Error {
    catalog.get(code)
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
