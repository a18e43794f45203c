//! Tools that can run as workflow steps.
//!
//! Each tool is a pure text transformation: it is created from an optional
//! JSON config, validated against the tool's schema, then run against the
//! output of the previous step.

pub mod formatter;
mod json;
pub mod minify;
pub mod typescript;
pub mod validate;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Result, model::StepId, runtime::Context};

pub use formatter::JsonFormatterTool;
pub use minify::JsonMinifyTool;
pub use typescript::JsonToTypescriptTool;
pub use validate::JsonValidateTool;

/// The tools a workflow step may use. The kebab-case form is the tool id.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ToolType {
    JsonFormatter,
    JsonMinify,
    JsonValidate,
    JsonToTypescript,
}

impl ToolType {
    /// Human readable name, used as the default step name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ToolType::JsonFormatter => "JSON Formatter",
            ToolType::JsonMinify => "JSON Minify",
            ToolType::JsonValidate => "JSON Validator",
            ToolType::JsonToTypescript => "JSON to TypeScript",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolType::JsonFormatter => "Pretty-print JSON with configurable indentation",
            ToolType::JsonMinify => "Strip all insignificant whitespace from JSON",
            ToolType::JsonValidate => "Check that the input is JSON, optionally against a JSON Schema",
            ToolType::JsonToTypescript => "Generate TypeScript interfaces from a JSON sample",
        }
    }

    /// JSON schema of the tool's step config.
    pub fn schema(&self) -> serde_json::Value {
        match self {
            ToolType::JsonFormatter => JsonFormatterTool::schema(),
            ToolType::JsonMinify => JsonMinifyTool::schema(),
            ToolType::JsonValidate => JsonValidateTool::schema(),
            ToolType::JsonToTypescript => JsonToTypescriptTool::schema(),
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    /// Creates a new instance of the tool from the step config.
    ///
    /// # Arguments
    ///
    /// * `config` - The optional [`serde_json::Value`] config of the step.
    ///
    /// # Returns
    ///
    /// Returns a [`Result`] containing the created tool, or an error when
    /// the config does not match [`Tool::schema`].
    fn create(config: Option<serde_json::Value>) -> Result<Self>
    where
        Self: Sized;

    /// Returns the JSON schema of the tool's config.
    fn schema() -> serde_json::Value
    where
        Self: Sized;

    fn tool_type(&self) -> ToolType;

    /// Runs the tool against the output of the previous step.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The [`Context`] of the execution.
    /// * `sid` - The id of the step.
    /// * `input` - The text to transform.
    ///
    /// # Returns
    ///
    /// Returns a [`Result<ToolOutput>`]. Bad input is a failed
    /// [`ToolOutput`]; errors are reserved for exceptional conditions.
    async fn run(
        &self,
        ctx: Arc<Context>,
        sid: StepId,
        input: &str,
    ) -> Result<ToolOutput>;
}

/// Build the tool for a step.
pub fn create_tool(
    tool_type: ToolType,
    config: Option<serde_json::Value>,
) -> Result<Box<dyn Tool>> {
    match tool_type {
        ToolType::JsonFormatter => Ok(Box::new(JsonFormatterTool::create(config)?)),
        ToolType::JsonMinify => Ok(Box::new(JsonMinifyTool::create(config)?)),
        ToolType::JsonValidate => Ok(Box::new(JsonValidateTool::create(config)?)),
        ToolType::JsonToTypescript => Ok(Box::new(JsonToTypescriptTool::create(config)?)),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ToolStatus {
    Succeeded,
    Failed,
}

/// Output returned by a tool's run method
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub status: ToolStatus,
    pub output: Option<String>,
    pub error: Option<String>,
}

impl ToolOutput {
    pub fn success(output: String) -> Self {
        Self {
            status: ToolStatus::Succeeded,
            output: Some(output),
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            status: ToolStatus::Failed,
            output: None,
            error: Some(error),
        }
    }
}

/// Validate a step config against a tool schema and deserialize it.
/// A missing config is treated as an empty object.
pub(crate) fn parse_config<T: serde::de::DeserializeOwned>(
    config: Option<serde_json::Value>,
    schema: &serde_json::Value,
) -> Result<T> {
    let params = config.unwrap_or_else(|| serde_json::json!({}));
    jsonschema::validate(schema, &params)?;
    Ok(serde_json::from_value::<T>(params)?)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{str::FromStr, sync::Arc};

    use strum::IntoEnumIterator;
    use tokio::runtime::Runtime;

    use super::*;
    use crate::{ToolkitError, runtime::Channel};

    pub(crate) fn create_test_context() -> (Arc<Runtime>, Arc<Context>) {
        let runtime = Arc::new(Runtime::new().unwrap());
        let channel = Arc::new(Channel::new(runtime.clone()));
        (runtime, Arc::new(Context::new("test-eid".to_string(), "test-wid".to_string(), channel)))
    }

    pub(crate) fn run_tool(
        tool_type: ToolType,
        config: Option<serde_json::Value>,
        input: &str,
    ) -> Result<ToolOutput> {
        let (runtime, ctx) = create_test_context();
        let tool = create_tool(tool_type, config)?;
        runtime.block_on(tool.run(ctx, "step".to_string(), input))
    }

    #[test]
    fn test_tool_ids() {
        assert_eq!(ToolType::JsonFormatter.as_ref(), "json-formatter");
        assert_eq!(ToolType::JsonMinify.as_ref(), "json-minify");
        assert_eq!(ToolType::JsonValidate.as_ref(), "json-validate");
        assert_eq!(ToolType::JsonToTypescript.as_ref(), "json-to-typescript");
        assert_eq!(ToolType::from_str("json-to-typescript").unwrap(), ToolType::JsonToTypescript);
        assert!(ToolType::from_str("base64-encode").is_err());
        assert!(ToolType::from_str("JSON-FORMATTER").is_err());
    }

    #[test]
    fn test_every_tool_accepts_missing_config() {
        for tool_type in ToolType::iter() {
            let tool = create_tool(tool_type, None).unwrap();
            assert_eq!(tool.tool_type(), tool_type);
        }
    }

    #[test]
    fn test_unknown_config_property_rejected() {
        for tool_type in ToolType::iter() {
            let result = create_tool(tool_type, Some(serde_json::json!({ "bogus": true })));
            assert!(matches!(result, Err(ToolkitError::Tool(_))), "{:?}", tool_type);
        }
    }

    #[test]
    fn test_serde_matches_tool_id() {
        assert_eq!(serde_json::to_value(ToolType::JsonMinify).unwrap(), "json-minify");
    }
}
