// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Contributors

//! C4: `CleanupManager` — queues finished executions for cleanup and emits
//! one `CleanupTask` per agent that still has pending work.

use crate::running_execution::RunningJobExecution;
use crate::task::{CleanupCommand, Task};
use oj_core::{Clock, TaskIdGenerator, TaskPrefix};
use parking_lot::Mutex;
use std::collections::HashMap;

/// What one finished execution contributes to an agent's targeted cleanup.
struct FinishedExecutionInfo {
    container_names: Vec<String>,
    volume_names: Vec<String>,
}

struct AgentState {
    /// True until the first cleanup task has been emitted for this agent.
    needs_initial: bool,
    pending: Vec<FinishedExecutionInfo>,
}

impl AgentState {
    fn new() -> Self {
        Self { needs_initial: true, pending: Vec::new() }
    }

    fn has_pending_work(&self) -> bool {
        self.needs_initial || !self.pending.is_empty()
    }
}

/// Tracks per-agent cleanup state across finished executions (§4.4).
#[derive(Default)]
pub struct CleanupManager {
    agents: Mutex<HashMap<String, AgentState>>,
}

impl CleanupManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a finished execution's cleanup needs, grouped by the agents its
    /// tasks ran on.
    pub fn enqueue_finished<C: Clock>(&self, execution: &RunningJobExecution<C>) {
        let snapshots = execution.task_snapshots();
        let mut containers_by_agent: HashMap<String, Vec<String>> = HashMap::new();
        for snapshot in &snapshots {
            let entry = containers_by_agent.entry(snapshot.agent_id.clone()).or_default();
            if let Some(name) = &snapshot.container_name {
                entry.push(name.clone());
            }
        }

        let mut agents = self.agents.lock();
        for (agent_id, container_names) in containers_by_agent {
            let state = agents.entry(agent_id).or_insert_with(AgentState::new);
            state.pending.push(FinishedExecutionInfo { container_names, volume_names: execution.docker_volumes.clone() });
        }
    }

    /// Emit exactly one `CleanupTask` per agent that still has pending work.
    pub fn drain_cleanup_tasks(&self, id_gen: &dyn TaskIdGenerator, framework_id: &str) -> Vec<Task> {
        let mut agents = self.agents.lock();
        let mut tasks = Vec::new();
        for (agent_id, state) in agents.iter_mut() {
            if !state.has_pending_work() {
                continue;
            }
            let command = if state.needs_initial {
                state.needs_initial = false;
                CleanupCommand::initial()
            } else {
                let containers: Vec<String> = state.pending.iter().flat_map(|p| p.container_names.clone()).collect();
                let volumes: Vec<String> = state.pending.iter().flat_map(|p| p.volume_names.clone()).collect();
                CleanupCommand::targeted(&containers, &volumes)
            };
            let id = id_gen.next(TaskPrefix::Cleanup, framework_id);
            tasks.push(Task::cleanup(id, agent_id.clone(), command));
        }
        tasks
    }

    /// After a cleanup task completes successfully, the agent's pending list
    /// is cleared (§4.4).
    pub fn mark_completed(&self, agent_id: &str) {
        if let Some(state) = self.agents.lock().get_mut(agent_id) {
            state.pending.clear();
        }
    }

    pub fn has_pending_for(&self, agent_id: &str) -> bool {
        self.agents.lock().get(agent_id).map(AgentState::has_pending_work).unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
