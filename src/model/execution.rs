use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{model::StepId, utils::time::duration_millis};

/// Execution record of one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResult {
    pub step_id: StepId,
    pub tool_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl WorkflowResult {
    pub fn succeeded(
        step_id: StepId,
        tool_id: String,
        output: String,
        duration: Duration,
    ) -> Self {
        Self {
            step_id,
            tool_id,
            success: true,
            output: Some(output),
            error: None,
            duration,
        }
    }

    /// A failed result. An empty message is replaced so `error` is never blank.
    pub fn failed(
        step_id: StepId,
        tool_id: String,
        error: String,
        duration: Duration,
    ) -> Self {
        let error = if error.trim().is_empty() { format!("step using '{}' failed", tool_id) } else { error };
        Self {
            step_id,
            tool_id,
            success: false,
            output: None,
            error: Some(error),
            duration,
        }
    }
}

/// Aggregate outcome of one workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecution {
    pub execution_id: String,
    pub workflow_id: String,
    pub results: Vec<WorkflowResult>,
    #[serde(with = "duration_millis")]
    pub total_duration: Duration,
    pub success: bool,
    /// Output of the last step, present only when every step succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl WorkflowExecution {
    /// The result of the step that stopped the run, if any.
    pub fn failed_step(&self) -> Option<&WorkflowResult> {
        self.results.iter().find(|r| !r.success)
    }

    pub fn error(&self) -> Option<&str> {
        self.failed_step().and_then(|r| r.error.as_deref())
    }
}
