//! Sequential workflow executor.
//!
//! The executor runs the steps of a workflow strictly in order, feeding each
//! step's output to the next one. The first failing step ends the run; the
//! results of the steps before it are kept.

use std::{
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{debug, info, warn};

use crate::{
    Result, ToolkitError,
    common::MemCache,
    events::{ExecutionEvent, ExecutionFailedEvent, ExecutionStartEvent, PipelineEvent, StepEvent},
    model::{Workflow, WorkflowExecution, WorkflowResult, WorkflowStep},
    runtime::{Channel, Context},
    tools::{Tool, ToolOutput, ToolStatus, ToolType, create_tool},
    utils,
};

/// Called after each step with the step index (0-based), the step count and the step's result.
pub type ProgressHandle = Arc<dyn Fn(usize, usize, &WorkflowResult) + Send + Sync>;

const TOOL_CACHE_SIZE: usize = 256;

pub struct Executor {
    /// Channel receiving execution and step events.
    channel: Arc<Channel>,
    /// Built tools keyed by tool id and step config.
    tools: MemCache<String, Arc<dyn Tool>>,
}

impl Executor {
    pub fn new(channel: Arc<Channel>) -> Self {
        Self {
            channel,
            tools: MemCache::new(TOOL_CACHE_SIZE),
        }
    }

    /// Runs `workflow` against `input`.
    ///
    /// Never fails as a whole: step errors are recorded in the returned
    /// [`WorkflowExecution`].
    pub async fn execute(
        &self,
        workflow: &Workflow,
        input: &str,
        progress: Option<ProgressHandle>,
    ) -> WorkflowExecution {
        let ctx = Arc::new(Context::new(utils::longid(), workflow.id.clone(), self.channel.clone()));
        let started = Instant::now();
        let total = workflow.steps.len();

        ctx.emit(
            String::new(),
            String::new(),
            PipelineEvent::Execution(ExecutionEvent::Start(ExecutionStartEvent {
                step_ids: workflow.steps.iter().map(|s| s.id.clone()).collect(),
            })),
        );

        let mut results: Vec<WorkflowResult> = Vec::with_capacity(total);
        let mut buffer = input.to_string();

        for (index, step) in workflow.steps.iter().enumerate() {
            debug!(workflow = %workflow.id, step = %step.id, tool = %step.tool_id, "running step {}/{}", index + 1, total);
            let result = self.execute_step(&ctx, step, &buffer).await;

            if let Some(handle) = &progress {
                handle(index, total, &result);
            }

            let succeeded = result.success;
            if let Some(output) = &result.output {
                buffer = output.clone();
            }
            results.push(result);

            if !succeeded {
                break;
            }
        }

        let success = results.iter().all(|r| r.success);
        let execution = WorkflowExecution {
            execution_id: ctx.eid().to_string(),
            workflow_id: workflow.id.clone(),
            output: if success { results.last().and_then(|r| r.output.clone()) } else { None },
            results,
            total_duration: started.elapsed(),
            success,
        };

        match execution.failed_step() {
            None => {
                info!(workflow = %workflow.id, steps = execution.results.len(), "workflow succeeded in {:?}", execution.total_duration);
                ctx.emit(String::new(), String::new(), PipelineEvent::Execution(ExecutionEvent::Succeeded));
            }
            Some(failed) => {
                let error = failed.error.clone().unwrap_or_default();
                warn!(workflow = %workflow.id, step = %failed.step_id, "workflow failed: {}", error);
                ctx.emit(
                    String::new(),
                    String::new(),
                    PipelineEvent::Execution(ExecutionEvent::Failed(ExecutionFailedEvent {
                        sid: failed.step_id.clone(),
                        error,
                    })),
                );
            }
        }

        execution
    }

    /// Executes one step, converting every failure into a failed result.
    async fn execute_step(
        &self,
        ctx: &Arc<Context>,
        step: &WorkflowStep,
        input: &str,
    ) -> WorkflowResult {
        ctx.emit(step.id.clone(), step.tool_id.clone(), PipelineEvent::Step(StepEvent::Running(utils::time::time_millis())));

        let started = Instant::now();
        let output = self.run_tool(ctx, step, input).await;
        let duration = started.elapsed();

        let result = Self::to_result(step, output, duration);
        let event = match &result.error {
            None => StepEvent::Succeeded(duration),
            Some(error) => {
                warn!(step = %step.id, tool = %step.tool_id, "step failed: {}", error);
                StepEvent::Failed {
                    error: error.clone(),
                    duration,
                }
            }
        };
        ctx.emit(step.id.clone(), step.tool_id.clone(), PipelineEvent::Step(event));

        result
    }

    async fn run_tool(
        &self,
        ctx: &Arc<Context>,
        step: &WorkflowStep,
        input: &str,
    ) -> Result<ToolOutput> {
        let tool = self.tool(step)?;
        tool.run(ctx.clone(), step.id.clone(), input).await
    }

    /// The tool for `step`, built on first use. Steps with the same tool id
    /// and config share one instance, so a JSON Schema is compiled once.
    fn tool(
        &self,
        step: &WorkflowStep,
    ) -> Result<Arc<dyn Tool>> {
        let tool_type = ToolType::from_str(&step.tool_id).map_err(|_| ToolkitError::Unsupported(step.tool_id.clone()))?;
        let key = match &step.config {
            Some(config) => format!("{}:{}", step.tool_id, config),
            None => format!("{}:", step.tool_id),
        };
        if let Some(tool) = self.tools.get(&key) {
            return Ok(tool);
        }

        let tool: Arc<dyn Tool> = Arc::from(create_tool(tool_type, step.config.clone())?);
        self.tools.set(key, tool.clone());
        Ok(tool)
    }

    fn to_result(
        step: &WorkflowStep,
        output: Result<ToolOutput>,
        duration: Duration,
    ) -> WorkflowResult {
        match output {
            Ok(ToolOutput {
                status: ToolStatus::Succeeded,
                output,
                ..
            }) => WorkflowResult::succeeded(step.id.clone(), step.tool_id.clone(), output.unwrap_or_default(), duration),
            Ok(ToolOutput {
                error,
                ..
            }) => WorkflowResult::failed(step.id.clone(), step.tool_id.clone(), error.unwrap_or_default(), duration),
            Err(e) => WorkflowResult::failed(step.id.clone(), step.tool_id.clone(), e.to_string(), duration),
        }
    }
}
