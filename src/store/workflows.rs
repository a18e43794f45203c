use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tracing::trace;

use crate::{Result, ShareLock, ToolkitError, model::Workflow, store::PageData};

/// Workflow definitions keyed by id.
pub struct WorkflowStore {
    workflows: ShareLock<HashMap<String, Workflow>>,
}

impl Default for WorkflowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowStore {
    pub fn new() -> Self {
        Self {
            workflows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn exists(
        &self,
        id: &str,
    ) -> bool {
        self.workflows.read().unwrap().contains_key(id)
    }

    pub fn find(
        &self,
        id: &str,
    ) -> Result<Workflow> {
        self.workflows.read().unwrap().get(id).cloned().ok_or_else(|| ToolkitError::Store(format!("workflow {} not found", id)))
    }

    pub fn create(
        &self,
        workflow: &Workflow,
    ) -> Result<bool> {
        trace!("workflows::create({})", workflow.id);
        let mut workflows = self.workflows.write().unwrap();
        if workflows.contains_key(&workflow.id) {
            return Err(ToolkitError::Store(format!("workflow {} already exists", workflow.id)));
        }
        workflows.insert(workflow.id.clone(), workflow.clone());
        Ok(true)
    }

    pub fn update(
        &self,
        workflow: &Workflow,
    ) -> Result<bool> {
        trace!("workflows::update({})", workflow.id);
        let mut workflows = self.workflows.write().unwrap();
        match workflows.get_mut(&workflow.id) {
            Some(existing) => {
                *existing = workflow.clone();
                Ok(true)
            }
            None => Err(ToolkitError::Store(format!("workflow {} not found", workflow.id))),
        }
    }

    /// Insert `workflow`, or replace the stored one while keeping its run count.
    pub fn upsert(
        &self,
        workflow: &Workflow,
    ) -> Result<bool> {
        trace!("workflows::upsert({})", workflow.id);
        let mut workflows = self.workflows.write().unwrap();
        let run_count = workflows.get(&workflow.id).map(|w| w.run_count).unwrap_or(workflow.run_count);
        workflows.insert(workflow.id.clone(), Workflow {
            run_count,
            ..workflow.clone()
        });
        Ok(true)
    }

    pub fn delete(
        &self,
        id: &str,
    ) -> Result<bool> {
        trace!("workflows::delete({})", id);
        Ok(self.workflows.write().unwrap().remove(id).is_some())
    }

    /// All workflows ordered by name, then id.
    pub fn list(&self) -> Vec<Workflow> {
        let mut workflows: Vec<Workflow> = self.workflows.read().unwrap().values().cloned().collect();
        workflows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        workflows
    }

    pub fn query(
        &self,
        page_num: usize,
        page_size: usize,
    ) -> PageData<Workflow> {
        PageData::paginate(self.list(), page_num, page_size)
    }

    /// Bump the run counter and return the new value.
    pub fn increment_run_count(
        &self,
        id: &str,
    ) -> Result<u64> {
        let mut workflows = self.workflows.write().unwrap();
        let workflow = workflows.get_mut(id).ok_or_else(|| ToolkitError::Store(format!("workflow {} not found", id)))?;
        workflow.run_count += 1;
        Ok(workflow.run_count)
    }
}
