//! Error types for DevToolkit.
//!
//! All errors are represented by the `ToolkitError` enum. Inside a workflow
//! run they never escape: the executor turns them into failed step results.

use std::{io::ErrorKind, string::FromUtf8Error};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all DevToolkit operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum ToolkitError {
    /// Engine-level errors (startup, shutdown, runtime).
    #[error("{0}")]
    Engine(String),

    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// Data conversion errors.
    #[error("{0}")]
    Convert(String),

    /// Workflow definition errors.
    #[error("{0}")]
    Workflow(String),

    /// Step definition errors.
    #[error("{0}")]
    Step(String),

    /// Tool creation or execution errors.
    #[error("{0}")]
    Tool(String),

    /// The tool id is not one the executor can dispatch.
    #[error("tool '{0}' is not supported in workflows")]
    Unsupported(String),

    /// Input could not be parsed as JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Storage operation errors.
    #[error("{0}")]
    Store(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),
}

impl From<ToolkitError> for String {
    fn from(val: ToolkitError) -> Self {
        val.to_string()
    }
}

impl From<std::io::Error> for ToolkitError {
    fn from(error: std::io::Error) -> Self {
        ToolkitError::IoError(error.to_string())
    }
}

impl From<ToolkitError> for std::io::Error {
    fn from(val: ToolkitError) -> Self {
        #[allow(clippy::io_other_error)]
        std::io::Error::new(ErrorKind::Other, val.to_string())
    }
}

impl From<FromUtf8Error> for ToolkitError {
    fn from(_: FromUtf8Error) -> Self {
        ToolkitError::Convert("Error with utf-8 string convert".to_string())
    }
}

impl From<serde_json::Error> for ToolkitError {
    fn from(error: serde_json::Error) -> Self {
        ToolkitError::Convert(error.to_string())
    }
}

impl From<toml::de::Error> for ToolkitError {
    fn from(error: toml::de::Error) -> Self {
        ToolkitError::Config(error.to_string())
    }
}

impl From<jsonschema::ValidationError<'_>> for ToolkitError {
    fn from(error: jsonschema::ValidationError<'_>) -> Self {
        ToolkitError::Tool(error.to_string())
    }
}
