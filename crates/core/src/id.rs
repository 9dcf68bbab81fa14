// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! Identifiers: durable-row integer keys and the cluster-facing task id encoding.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

crate::define_int_id! {
    /// Primary key of a durable job execution row.
    pub struct JobExecutionId;
}

crate::define_int_id! {
    /// Primary key of the job this execution belongs to.
    pub struct JobId;
}

crate::define_int_id! {
    /// Primary key of the job type catalog entry.
    pub struct JobTypeId;
}

crate::define_int_id! {
    /// Primary key of the job type revision referenced by an execution.
    pub struct JobTypeRevisionId;
}

crate::define_int_id! {
    /// Primary key of a cluster agent node.
    pub struct NodeId;
}

/// Kind of task within a job execution, used as the task-id prefix.
///
/// Encoding: `<prefix>_<framework_id>_<counter>`, matching the cluster-facing
/// convention `scale_pre` / `scale_job` / `scale_post` / `scale_cleanup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPrefix {
    Pre,
    Job,
    Post,
    Cleanup,
}

crate::simple_display! {
    TaskPrefix {
        Pre => "scale_pre",
        Job => "scale_job",
        Post => "scale_post",
        Cleanup => "scale_cleanup",
    }
}

/// Unique identifier for a task, stable across the task's lifetime.
///
/// Formatted as `<prefix>_<framework_id>_<counter>`. The counter is monotonic and
/// process-wide; counters are never reused within a process lifetime (§6).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(prefix: TaskPrefix, framework_id: &str, counter: u64) -> Self {
        Self(format!("{}_{}_{}", prefix, framework_id, counter))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Generates task ids. Injected so tests can seed a deterministic counter
/// (Design Notes §9: the original's module-level `AtomicCounter` singleton is
/// inverted into an injected service).
pub trait TaskIdGenerator: Send + Sync {
    fn next(&self, prefix: TaskPrefix, framework_id: &str) -> TaskId;
}

/// Process-wide monotonic counter, the production `TaskIdGenerator`.
#[derive(Clone, Default)]
pub struct AtomicCounterIdGen {
    counter: Arc<AtomicU64>,
}

impl AtomicCounterIdGen {
    pub fn new() -> Self {
        Self { counter: Arc::new(AtomicU64::new(0)) }
    }

    /// Start the counter at a specific value (e.g. when seeding tests).
    pub fn starting_at(value: u64) -> Self {
        Self { counter: Arc::new(AtomicU64::new(value)) }
    }
}

impl TaskIdGenerator for AtomicCounterIdGen {
    fn next(&self, prefix: TaskPrefix, framework_id: &str) -> TaskId {
        let counter = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        TaskId::new(prefix, framework_id, counter)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
