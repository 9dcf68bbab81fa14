// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! Cluster agent node record (read by the quarantine policy, §4.6).

use crate::id::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub hostname: String,
    pub is_paused: bool,
    pub is_paused_errors: bool,
    pub pause_reason: Option<String>,
}

impl Node {
    pub fn new(id: NodeId, hostname: impl Into<String>) -> Self {
        Self { id, hostname: hostname.into(), is_paused: false, is_paused_errors: false, pause_reason: None }
    }
}

/// Reason text used when the quarantine policy pauses a node (§4.6).
pub const PAUSE_REASON_SYSTEM_FAILURE_RATE: &str = "System Failure Rate Too High";
