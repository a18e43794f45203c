use serde::{Deserialize, Serialize};

use crate::{
    Result, ToolkitError,
    model::{StepId, WorkflowStep},
    utils,
};

/// A user-authored pipeline definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
    #[serde(default)]
    pub run_count: u64,
}

impl Workflow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: utils::uuid(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(
        mut self,
        description: impl Into<String>,
    ) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a step and return its id.
    pub fn add_step(
        &mut self,
        tool_id: impl Into<String>,
        tool_name: impl Into<String>,
        config: Option<serde_json::Value>,
    ) -> StepId {
        let step = WorkflowStep::new(tool_id, tool_name, config);
        let sid = step.id.clone();
        self.steps.push(step);
        sid
    }

    /// Remove a step, returning it if it was present.
    pub fn remove_step(
        &mut self,
        sid: &str,
    ) -> Option<WorkflowStep> {
        let pos = self.steps.iter().position(|s| s.id == sid)?;
        Some(self.steps.remove(pos))
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let workflow = serde_json::from_str::<Workflow>(s);
        match workflow {
            Ok(v) => Ok(v),
            Err(e) => Err(ToolkitError::Workflow(format!("{}", e))),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
