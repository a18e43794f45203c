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

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JsonMinifyTool;

#[async_trait]
impl Tool for JsonMinifyTool {
    fn create(config: Option<serde_json::Value>) -> Result<Self> {
        parse_config::<serde_json::Value>(config, &Self::schema())?;
        Ok(JsonMinifyTool)
    }

    fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "additionalProperties": false
        })
    }

    fn tool_type(&self) -> ToolType {
        ToolType::JsonMinify
    }

    async fn run(
        &self,
        _: Arc<Context>,
        _: StepId,
        input: &str,
    ) -> Result<ToolOutput> {
        let value = match json::parse(input) {
            Ok(v) => v,
            Err(e @ ToolkitError::InvalidJson(_)) => return Ok(ToolOutput::failed(e.to_string())),
            Err(e) => return Err(e),
        };
        Ok(ToolOutput::success(serde_json::to_string(&value)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ToolStatus, tests::run_tool};

    #[test]
    fn test_minify() {
        let output = run_tool(ToolType::JsonMinify, None, "{\n  \"a\": [1, 2],\n  \"b\": \"x y\"\n}").unwrap();
        assert_eq!(output.output.unwrap(), r#"{"a":[1,2],"b":"x y"}"#);
    }

    #[test]
    fn test_minify_invalid() {
        let output = run_tool(ToolType::JsonMinify, None, "[1,,2]").unwrap();
        assert_eq!(output.status, ToolStatus::Failed);
    }
}
