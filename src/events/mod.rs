//! Event types for workflow execution.
//!
//! Events are emitted while a workflow runs to notify subscribers
//! about step progress, completion, failures and tool logs.

mod execution;
mod step;

pub use execution::*;
pub use step::*;

use crate::model::StepId;

/// Generic event wrapper.
#[derive(Debug, Clone)]
pub struct Event<T> {
    inner: T,
}

/// Top-level event type.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Execution-level events (start, succeeded, failed).
    Execution(ExecutionEvent),
    /// Step-level events (running, succeeded, failed).
    Step(StepEvent),
}

/// Event message with its execution context.
#[derive(Debug, Clone)]
pub struct Message {
    /// Execution id that generated this event.
    pub eid: String,
    /// Workflow id being executed.
    pub wid: String,
    /// Step id that generated this event (empty for execution events).
    pub sid: StepId,
    /// Tool id of the step (empty for execution events).
    pub tool_id: String,
    pub event: PipelineEvent,
}

/// Log line emitted by a tool.
#[derive(Debug, Clone)]
pub struct Log {
    pub eid: String,
    pub wid: String,
    pub sid: StepId,
    pub content: String,
    /// Timestamp in milliseconds.
    pub timestamp: i64,
}

impl<T> std::ops::Deref for Event<T>
where
    T: std::fmt::Debug + Clone,
{
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> Event<T>
where
    T: std::fmt::Debug + Clone,
{
    pub fn new(inner: &T) -> Self {
        Self {
            inner: inner.clone(),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl PipelineEvent {
    pub fn is_complete(&self) -> bool {
        matches!(self, PipelineEvent::Execution(ExecutionEvent::Succeeded))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PipelineEvent::Execution(ExecutionEvent::Failed(_)))
    }
}
