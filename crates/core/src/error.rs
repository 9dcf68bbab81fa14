// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! Built-in error kinds and their classification.
//!
//! Mirrors the Scale `error.models.Error` catalog: a small, fixed set of
//! infrastructure-level errors the scheduler itself raises, as opposed to the
//! much larger per-job-type error taxonomy (out of scope, §1).

use serde::{Deserialize, Serialize};

/// Broad classification used by the node-quarantine policy (§4.6): only
/// `System` category failures count toward a node's error budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    System,
    Algorithm,
}

crate::simple_display! {
    ErrorCategory {
        System => "SYSTEM",
        Algorithm => "ALGORITHM",
    }
}

/// A classified failure, attached to a terminal job execution outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Error {
    pub code: String,
    pub name: String,
    pub category: ErrorCategory,
}

impl Error {
    pub fn new(code: impl Into<String>, name: impl Into<String>, category: ErrorCategory) -> Self {
        Self { code: code.into(), name: name.into(), category }
    }

    pub fn is_system(&self) -> bool {
        matches!(self.category, ErrorCategory::System)
    }
}

/// Built-in error codes the core itself raises (§6).
pub mod codes {
    pub const NODE_LOST: &str = "node-lost";
    pub const TIMEOUT: &str = "timeout";
    pub const TASK_LAUNCH: &str = "task-launch";
    pub const DOCKER_TASK_LAUNCH: &str = "docker-task-launch";
    pub const DOCKER_TERMINATED: &str = "docker-terminated";
    pub const UNKNOWN: &str = "unknown";
}
