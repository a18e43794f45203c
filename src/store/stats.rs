use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{ShareLock, utils::time::duration_millis};

/// Usage counters of one tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolUsage {
    pub runs: u64,
    pub failures: u64,
    #[serde(with = "duration_millis")]
    pub total_duration: Duration,
    /// Timestamp in milliseconds of the last run.
    pub last_used: i64,
}

/// Tool usage keyed by tool id. Unsupported ids are counted too.
pub struct StatsStore {
    usage: ShareLock<HashMap<String, ToolUsage>>,
}

impl Default for StatsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsStore {
    pub fn new() -> Self {
        Self {
            usage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn record(
        &self,
        tool_id: &str,
        success: bool,
        duration: Duration,
        timestamp: i64,
    ) {
        let mut usage = self.usage.write().unwrap();
        let entry = usage.entry(tool_id.to_string()).or_default();
        entry.runs += 1;
        if !success {
            entry.failures += 1;
        }
        entry.total_duration += duration;
        entry.last_used = timestamp;
    }

    pub fn get(
        &self,
        tool_id: &str,
    ) -> Option<ToolUsage> {
        self.usage.read().unwrap().get(tool_id).cloned()
    }

    pub fn snapshot(&self) -> HashMap<String, ToolUsage> {
        self.usage.read().unwrap().clone()
    }

    /// Total runs across all tools.
    pub fn total_runs(&self) -> u64 {
        self.usage.read().unwrap().values().map(|u| u.runs).sum()
    }
}
