// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! Resource quantities for tasks and job executions.

use serde::{Deserialize, Serialize};

/// Resources required to run a single task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub cpus: f64,
    pub mem: f64,
    pub disk: f64,
}

impl Resources {
    pub fn new(cpus: f64, mem: f64, disk: f64) -> Self {
        Self { cpus, mem, disk }
    }

    /// Resources reserved for a [`CleanupTask`](crate) — fixed and resource-light.
    pub const fn cleanup() -> Self {
        Self { cpus: 0.1, mem: 32.0, disk: 0.0 }
    }
}

/// Resources scheduled for an entire job execution at queue time (durable row).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledResources {
    pub cpus: f64,
    pub mem: f64,
    pub disk_in: f64,
    pub disk_out: f64,
    pub disk_total: f64,
}

impl ScheduledResources {
    pub fn new(cpus: f64, mem: f64, disk_in: f64, disk_out: f64, disk_total: f64) -> Self {
        Self { cpus, mem, disk_in, disk_out, disk_total }
    }
}
