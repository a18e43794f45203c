use std::sync::Arc;

use tracing::trace;

use crate::{
    Result, ToolkitError,
    model::Workflow,
    store::{HistoryStore, StatsStore, WorkflowStore},
};

pub struct Store {
    workflows: Arc<WorkflowStore>,
    history: Arc<HistoryStore>,
    stats: Arc<StatsStore>,
}

impl Store {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            workflows: Arc::new(WorkflowStore::new()),
            history: Arc::new(HistoryStore::new(history_capacity)),
            stats: Arc::new(StatsStore::new()),
        }
    }

    pub fn workflows(&self) -> Arc<WorkflowStore> {
        self.workflows.clone()
    }

    pub fn history(&self) -> Arc<HistoryStore> {
        self.history.clone()
    }

    pub fn stats(&self) -> Arc<StatsStore> {
        self.stats.clone()
    }

    /// Create or replace a workflow definition. Replacing keeps the stored run count.
    pub fn deploy(
        &self,
        workflow: &Workflow,
    ) -> Result<bool> {
        trace!("store::deploy({})", workflow.id);
        if workflow.id.is_empty() {
            return Err(ToolkitError::Workflow("missing id in workflow".into()));
        }
        self.workflows.upsert(workflow)
    }
}
