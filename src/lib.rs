//! # DevToolkit
//!
//! DevToolkit chains JSON tools into reusable workflows and runs them
//! against an input string, one step after another.
//!
//! ## Core Features
//!
//! - **Sequential Workflows**: each step's output feeds the next step; the first failure stops the run
//! - **JSON Tools**: formatter, minifier, validator (with optional JSON Schema) and TypeScript generator
//! - **Event-Driven Monitoring**: execution and step events on a broadcast channel, with per-tool usage stats
//! - **Execution History**: bounded, newest-first record of past runs
//! - **Code Analysis**: best-effort heuristics for language detection, metrics and common issues
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use devtoolkit::{EngineBuilder, Workflow};
//!
//! let engine = EngineBuilder::new().build()?;
//! engine.launch();
//!
//! let workflow = Workflow::from_json(json_str)?;
//! engine.deploy(&workflow)?;
//! let execution = engine.run(&workflow.id, r#"{"a":1}"#)?;
//! println!("{:?}", execution.output);
//! ```

pub mod analyzer;
mod builder;
mod common;
mod config;
mod engine;
mod error;
pub mod events;
mod executor;
mod model;
mod runtime;
pub mod store;
pub mod tools;
mod utils;

use std::sync::{Arc, RwLock};

pub use builder::EngineBuilder;
pub use config::{Config, HistoryConfig};
pub use engine::Engine;
pub use error::ToolkitError;
pub use executor::{Executor, ProgressHandle};
pub use model::*;
pub use runtime::{Channel, ChannelEvent, ChannelOptions, Context};
pub use tools::{Tool, ToolOutput, ToolStatus, ToolType, create_tool};

/// Result type alias for DevToolkit operations.
pub type Result<T> = std::result::Result<T, ToolkitError>;

/// Thread-safe shared lock wrapper using Arc<RwLock<T>>.
pub(crate) type ShareLock<T> = Arc<RwLock<T>>;
