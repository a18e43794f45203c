use serde::{Deserialize, Serialize};

use crate::utils;

/// step id
pub type StepId = String;

/// One stage of a workflow.
///
/// `tool_id` stays a plain string: ids the executor does not know are
/// reported when the step runs, not when the workflow is loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: StepId,
    pub tool_id: String,
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl WorkflowStep {
    pub fn new(
        tool_id: impl Into<String>,
        tool_name: impl Into<String>,
        config: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: utils::uuid(),
            tool_id: tool_id.into(),
            tool_name: tool_name.into(),
            config,
        }
    }
}
