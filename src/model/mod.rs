mod execution;
mod step;
mod workflow;

pub use execution::{WorkflowExecution, WorkflowResult};
pub use step::{StepId, WorkflowStep};
pub use workflow::Workflow;
