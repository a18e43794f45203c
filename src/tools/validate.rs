use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::{
    Result, ToolkitError,
    model::StepId,
    runtime::Context,
    tools::{Tool, ToolOutput, ToolType, json, parse_config},
};

#[derive(Deserialize)]
struct ValidateParams {
    #[serde(default)]
    schema: Option<serde_json::Value>,
}

/// Checks the input is JSON and passes it through unchanged.
pub struct JsonValidateTool {
    validator: Option<jsonschema::Validator>,
}

#[async_trait]
impl Tool for JsonValidateTool {
    fn create(config: Option<serde_json::Value>) -> Result<Self> {
        let params: ValidateParams = parse_config(config, &Self::schema())?;
        let validator = match params.schema {
            Some(schema) => Some(jsonschema::validator_for(&schema).map_err(|e| ToolkitError::Tool(format!("invalid schema: {}", e)))?),
            None => None,
        };
        Ok(Self {
            validator,
        })
    }

    fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "schema": {
                    "type": ["object", "boolean"],
                    "description": "JSON Schema the document must satisfy"
                }
            },
            "additionalProperties": false
        })
    }

    fn tool_type(&self) -> ToolType {
        ToolType::JsonValidate
    }

    async fn run(
        &self,
        ctx: Arc<Context>,
        sid: StepId,
        input: &str,
    ) -> Result<ToolOutput> {
        let value = match json::parse(input) {
            Ok(v) => v,
            Err(e @ ToolkitError::InvalidJson(_)) => return Ok(ToolOutput::failed(e.to_string())),
            Err(e) => return Err(e),
        };

        if let Some(validator) = &self.validator {
            let violations: Vec<String> = validator.iter_errors(&value).map(|e| e.to_string()).collect();
            if !violations.is_empty() {
                return Ok(ToolOutput::failed(format!("Schema validation failed: {}", violations.join("; "))));
            }
        }

        ctx.emit_log(sid, "JSON is valid".to_string());
        Ok(ToolOutput::success(input.to_string()))
    }
}
