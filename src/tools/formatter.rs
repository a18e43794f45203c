use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    Result, ToolkitError,
    model::StepId,
    runtime::Context,
    tools::{Tool, ToolOutput, ToolType, json, parse_config},
};

fn default_indent() -> usize {
    2
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JsonFormatterTool {
    #[serde(default = "default_indent")]
    indent: usize,
    #[serde(default)]
    sort_keys: bool,
}

impl JsonFormatterTool {
    pub fn format(
        &self,
        input: &str,
    ) -> Result<String> {
        let value = json::parse(input)?;
        let value = if self.sort_keys { json::sort_keys(value) } else { value };
        json::to_pretty(&value, self.indent)
    }
}

#[async_trait]
impl Tool for JsonFormatterTool {
    fn create(config: Option<serde_json::Value>) -> Result<Self> {
        parse_config(config, &Self::schema())
    }

    fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "indent": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 8,
                    "description": "Spaces per indentation level"
                },
                "sortKeys": {
                    "type": "boolean",
                    "description": "Sort object keys alphabetically"
                }
            },
            "additionalProperties": false
        })
    }

    fn tool_type(&self) -> ToolType {
        ToolType::JsonFormatter
    }

    async fn run(
        &self,
        _: Arc<Context>,
        _: StepId,
        input: &str,
    ) -> Result<ToolOutput> {
        match self.format(input) {
            Ok(output) => Ok(ToolOutput::success(output)),
            Err(e @ ToolkitError::InvalidJson(_)) => Ok(ToolOutput::failed(e.to_string())),
            Err(e) => Err(e),
        }
    }
}
