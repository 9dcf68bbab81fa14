// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! Live-tunable scheduler settings consulted by the node-quarantine policy.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSettings {
    /// Minutes of lookback for counting recent system failures. `<= 0` disables
    /// the quarantine policy entirely (§4.6).
    pub node_error_period_minutes: i64,
    /// Number of distinct system-category job failures on a node within the
    /// lookback window that triggers quarantine.
    pub max_node_errors: u32,
}

impl SchedulerSettings {
    pub fn new(node_error_period_minutes: i64, max_node_errors: u32) -> Self {
        Self { node_error_period_minutes, max_node_errors }
    }

    pub fn policy_enabled(&self) -> bool {
        self.node_error_period_minutes > 0
    }
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self { node_error_period_minutes: 0, max_node_errors: 0 }
    }
}
