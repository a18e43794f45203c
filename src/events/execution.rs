use crate::model::StepId;

#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    Start(ExecutionStartEvent),
    Succeeded,
    Failed(ExecutionFailedEvent),
}

impl ExecutionEvent {
    pub fn str(&self) -> &str {
        match self {
            ExecutionEvent::Start(_) => "Running",
            ExecutionEvent::Succeeded => "Succeeded",
            ExecutionEvent::Failed(_) => "Failed",
        }
    }
}

/// Event emitted when an execution starts
#[derive(Debug, Clone)]
pub struct ExecutionStartEvent {
    /// Step ids in execution order
    pub step_ids: Vec<StepId>,
}

#[derive(Debug, Clone)]
pub struct ExecutionFailedEvent {
    /// Step that stopped the run
    pub sid: StepId,
    pub error: String,
}
