//! Workflow engine - the main entry point for DevToolkit.
//!
//! The engine manages the lifecycle of workflow definitions and their runs:
//! - Deploying workflow definitions
//! - Running them against an input and counting runs
//! - Keeping the execution history and tool usage stats
//! - Broadcasting execution events

mod monitor;

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use tokio::runtime::Runtime;
use tracing::{debug, warn};

use crate::{
    Config, EngineBuilder, Result, ToolkitError,
    common::Shutdown,
    executor::{Executor, ProgressHandle},
    model::{Workflow, WorkflowExecution},
    runtime::Channel,
    store::{HistoryEntry, Store, ToolUsage},
};

use monitor::Monitor;

/// The workflow engine.
///
/// # Example
///
/// ```rust,ignore
/// let engine = EngineBuilder::new().build()?;
/// engine.launch();
///
/// let mut workflow = Workflow::new("pretty");
/// workflow.add_step("json-formatter", "JSON Formatter", None);
/// engine.deploy(&workflow)?;
///
/// let execution = engine.run(&workflow.id, r#"{"a":1}"#)?;
/// assert!(execution.success);
///
/// engine.shutdown();
/// ```
///
/// `run` blocks on the engine's runtime and must not be called from async
/// code; use `run_async` there.
pub struct Engine {
    /// Event channel for broadcasting execution events.
    channel: Arc<Channel>,
    /// Workflow definitions, history and stats.
    store: Arc<Store>,
    /// Background monitor collecting tool usage.
    monitor: Monitor,
    executor: Executor,

    /// Flag indicating if the engine is running.
    running: Arc<AtomicBool>,
    /// Tokio runtime for async task execution.
    runtime: Arc<Runtime>,
    /// Shutdown coordinator for the background tasks.
    shutdown: Arc<Shutdown>,
}

impl Engine {
    pub(crate) fn new(
        runtime: Arc<Runtime>,
        history_capacity: usize,
    ) -> Self {
        let store = Arc::new(Store::new(history_capacity));
        let channel = Arc::new(Channel::new(runtime.clone()));
        let shutdown = Arc::new(Shutdown::new());
        let monitor = Monitor::new(store.clone(), channel.clone(), runtime.clone(), shutdown.clone());
        let executor = Executor::new(channel.clone());

        Self {
            channel,
            store,
            monitor,
            executor,
            running: Arc::new(AtomicBool::new(false)),
            runtime,
            shutdown,
        }
    }

    /// Creates an engine from a loaded [`Config`].
    pub fn new_with_config(config: Config) -> Result<Self> {
        EngineBuilder::from_config(&config).build()
    }

    /// Starts the event listener and the usage monitor.
    ///
    /// An engine that has been shut down cannot be launched again.
    pub fn launch(&self) {
        if self.shutdown.is_terminated() {
            warn!("engine has been shut down and cannot be relaunched");
            return;
        }
        if self.running.swap(true, Ordering::Relaxed) {
            return;
        }

        // Register the monitor first, then start listening
        self.monitor.monitor();
        self.channel.listen();
    }

    /// Stops the background tasks. Runs are refused afterwards.
    pub fn shutdown(&self) {
        if !self.running.swap(false, Ordering::Relaxed) {
            return;
        }

        self.shutdown.shutdown();
        self.channel.shutdown();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Deploys a workflow definition, replacing any with the same id.
    pub fn deploy(
        &self,
        workflow: &Workflow,
    ) -> Result<bool> {
        self.store.deploy(workflow)
    }

    pub fn workflow(
        &self,
        wid: &str,
    ) -> Result<Workflow> {
        self.store.workflows().find(wid)
    }

    pub fn workflows(&self) -> Vec<Workflow> {
        self.store.workflows().list()
    }

    pub fn remove(
        &self,
        wid: &str,
    ) -> Result<bool> {
        self.store.workflows().delete(wid)
    }

    /// Runs a deployed workflow, blocking until it finishes.
    pub fn run(
        &self,
        wid: &str,
        input: &str,
    ) -> Result<WorkflowExecution> {
        self.runtime.block_on(self.run_async(wid, input, None))
    }

    /// Like [`Engine::run`], calling `progress` after each step.
    pub fn run_with_progress(
        &self,
        wid: &str,
        input: &str,
        progress: ProgressHandle,
    ) -> Result<WorkflowExecution> {
        self.runtime.block_on(self.run_async(wid, input, Some(progress)))
    }

    /// Runs a deployed workflow, increments its run count and records the
    /// run in the history. Failed runs count as runs.
    pub async fn run_async(
        &self,
        wid: &str,
        input: &str,
        progress: Option<ProgressHandle>,
    ) -> Result<WorkflowExecution> {
        if !self.is_running() {
            return Err(ToolkitError::Engine("Engine is not running".to_string()));
        }
        let workflow = self.store.workflows().find(wid)?;

        let execution = self.executor.execute(&workflow, input, progress).await;

        let run_count = self.store.workflows().increment_run_count(wid)?;
        debug!(workflow = %wid, run_count, "run recorded");
        self.store.history().record(HistoryEntry::new(&workflow, &execution));

        Ok(execution)
    }

    /// Past runs, newest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.store.history().list()
    }

    pub fn clear_history(&self) {
        self.store.history().clear();
    }

    /// Tool usage keyed by tool id.
    pub fn stats(&self) -> HashMap<String, ToolUsage> {
        self.store.stats().snapshot()
    }

    /// Returns a reference to the event channel.
    pub fn channel(&self) -> Arc<Channel> {
        self.channel.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Mutex, mpsc},
        time::{Duration, Instant},
    };

    use super::*;
    use crate::{ChannelEvent, ChannelOptions, model::WorkflowResult};

    fn create_engine() -> Engine {
        let engine = EngineBuilder::new().async_worker_thread_number(2).history_capacity(3).build().unwrap();
        engine.launch();
        engine
    }

    fn deploy(
        engine: &Engine,
        tool_ids: &[&str],
    ) -> Workflow {
        let mut workflow = Workflow::new("test workflow");
        for tool_id in tool_ids {
            workflow.add_step(*tool_id, *tool_id, None);
        }
        engine.deploy(&workflow).unwrap();
        workflow
    }

    fn wait_until(f: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if f() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        f()
    }

    #[test]
    fn test_run_deployed_workflow() {
        let engine = create_engine();
        let workflow = deploy(&engine, &["json-formatter"]);

        let execution = engine.run(&workflow.id, r#"{"a":1}"#).unwrap();
        assert!(execution.success);
        assert_eq!(execution.workflow_id, workflow.id);
        assert_eq!(execution.output.as_deref(), Some("{\n  \"a\": 1\n}"));
        engine.shutdown();
    }

    #[test]
    fn test_run_count_incremented_on_success_and_failure() {
        let engine = create_engine();
        let workflow = deploy(&engine, &["json-validate"]);

        assert!(engine.run(&workflow.id, "{}").unwrap().success);
        assert!(!engine.run(&workflow.id, "{bad json").unwrap().success);
        assert_eq!(engine.workflow(&workflow.id).unwrap().run_count, 2);
        engine.shutdown();
    }

    #[test]
    fn test_run_unknown_workflow() {
        let engine = create_engine();
        assert!(matches!(engine.run("missing", "{}"), Err(ToolkitError::Store(_))));
        engine.shutdown();
    }

    #[test]
    fn test_run_requires_launch() {
        let engine = EngineBuilder::new().async_worker_thread_number(1).build().unwrap();
        let workflow = deploy(&engine, &["json-minify"]);
        assert!(matches!(engine.run(&workflow.id, "{}"), Err(ToolkitError::Engine(_))));

        engine.launch();
        assert!(engine.run(&workflow.id, "{}").is_ok());

        engine.shutdown();
        assert!(!engine.is_running());
        assert!(matches!(engine.run(&workflow.id, "{}"), Err(ToolkitError::Engine(_))));
        engine.launch();
        assert!(!engine.is_running());
    }

    #[test]
    fn test_history_bounded_newest_first() {
        let engine = create_engine();
        let workflow = deploy(&engine, &["json-minify"]);

        for input in ["1", "2", "nope", "4"] {
            engine.run(&workflow.id, input).unwrap();
        }

        let history = engine.history();
        assert_eq!(history.len(), 3);
        assert!(history[0].success);
        assert!(!history[1].success);
        assert!(history[1].error.as_deref().unwrap().contains("Invalid JSON"));
        assert_eq!(history[2].workflow_name, "test workflow");

        engine.clear_history();
        assert!(engine.history().is_empty());
        engine.shutdown();
    }

    #[test]
    fn test_stats_collected_from_events() {
        let engine = create_engine();
        let workflow = deploy(&engine, &["json-formatter", "json-minify", "json-to-typescript"]);

        engine.run(&workflow.id, "[1]").unwrap();
        engine.run(&workflow.id, "oops").unwrap();

        assert!(wait_until(|| engine.stats().values().map(|u| u.runs).sum::<u64>() == 4));
        let stats = engine.stats();
        assert_eq!(stats["json-formatter"].runs, 2);
        assert_eq!(stats["json-formatter"].failures, 1);
        assert_eq!(stats["json-minify"].runs, 1);
        assert_eq!(stats["json-to-typescript"].runs, 1);
        engine.shutdown();
    }

    #[test]
    fn test_progress_and_events() {
        let engine = create_engine();
        let workflow = deploy(&engine, &["json-validate", "json-minify"]);

        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        ChannelEvent::channel(engine.channel(), ChannelOptions::with_wid(workflow.id.clone())).unwrap().on_complete(move |eid| {
            let _ = tx.lock().unwrap().send(eid);
        });

        let steps = Arc::new(Mutex::new(Vec::new()));
        let recorded = steps.clone();
        let execution = engine
            .run_with_progress(
                &workflow.id,
                "{}",
                Arc::new(move |index: usize, total: usize, _: &WorkflowResult| {
                    recorded.lock().unwrap().push((index, total));
                }),
            )
            .unwrap();

        assert_eq!(*steps.lock().unwrap(), vec![(0, 2), (1, 2)]);
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), execution.execution_id);
        engine.shutdown();
    }

    #[test]
    fn test_deploy_list_remove() {
        let engine = create_engine();
        let workflow = deploy(&engine, &[]);
        assert_eq!(engine.workflows().len(), 1);

        assert!(engine.remove(&workflow.id).unwrap());
        assert!(engine.workflows().is_empty());
        engine.shutdown();
    }

    #[test]
    fn test_new_with_config() {
        let config = Config::load_from_str("async_worker_thread_number = 1\n[history]\ncapacity = 1").unwrap();
        let engine = Engine::new_with_config(config).unwrap();
        engine.launch();
        let workflow = deploy(&engine, &["json-minify"]);
        engine.run(&workflow.id, "{}").unwrap();
        engine.run(&workflow.id, "[]").unwrap();
        assert_eq!(engine.history().len(), 1);
        engine.shutdown();
    }
}
