use std::{
    collections::VecDeque,
    sync::{Arc, RwLock},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    ShareLock,
    model::{Workflow, WorkflowExecution},
    utils::{self, time::duration_millis},
};

/// Summary of one past execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub execution_id: String,
    pub workflow_id: String,
    pub workflow_name: String,
    pub success: bool,
    /// Number of steps that actually ran.
    pub step_count: usize,
    #[serde(with = "duration_millis")]
    pub total_duration: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: i64,
}

impl HistoryEntry {
    pub fn new(
        workflow: &Workflow,
        execution: &WorkflowExecution,
    ) -> Self {
        Self {
            id: utils::longid(),
            execution_id: execution.execution_id.clone(),
            workflow_id: workflow.id.clone(),
            workflow_name: workflow.name.clone(),
            success: execution.success,
            step_count: execution.results.len(),
            total_duration: execution.total_duration,
            error: execution.error().map(str::to_string),
            timestamp: utils::time::time_millis(),
        }
    }
}

/// Bounded execution history, oldest entries dropped first.
pub struct HistoryStore {
    capacity: usize,
    entries: ShareLock<VecDeque<HistoryEntry>>,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
        }
    }

    pub fn record(
        &self,
        entry: HistoryEntry,
    ) {
        trace!("history::record({})", entry.execution_id);
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.write().unwrap();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Entries newest first.
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.entries.read().unwrap().iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}
