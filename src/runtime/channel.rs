use std::sync::{Arc, RwLock};

use futures::future::BoxFuture;
use tokio::runtime::Runtime;

use crate::{
    Result, ShareLock, ToolkitError,
    common::{BroadcastQueue, Shutdown},
    events::{Event, Log, Message},
};

macro_rules! dispatch_event {
    ($handles:expr, $(&$item:ident), +) => {
        let handlers = $handles.read().unwrap();
        for handle in handlers.iter() {
            (handle)($(&$item),+);
        }
    };
}

macro_rules! dispatch_event_async {
    ($handles:expr, $(&$item:ident), +) => {
        let handles = $handles.clone();

        tokio::spawn(async move {
            let handlers = handles.read().unwrap().clone();
            for handle in handlers.iter() {
                (handle)($(&$item),+).await;
            }
        });
    };
}

const EVENT_QUEUE_SIZE: usize = 2048;
const LOG_QUEUE_SIZE: usize = 4096;

pub type PipelineEventHandle = Arc<dyn Fn(&Event<Message>) + Send + Sync>;
pub type PipelineLogHandle = Arc<dyn Fn(&Event<Log>) + Send + Sync>;
pub type PipelineEventHandleAsync = Arc<dyn Fn(&Event<Message>) -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ChannelOptions {
    /// use the glob pattern to match the workflow id
    /// eg. wf-*
    pub wid: String,

    /// use the glob pattern to match the step id
    /// eg. step1*
    pub sid: String,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            wid: "*".to_string(),
            sid: "*".to_string(),
        }
    }
}

#[allow(unused)]
impl ChannelOptions {
    pub fn new(
        wid: String,
        sid: String,
    ) -> Self {
        Self {
            wid,
            sid,
        }
    }

    pub fn with_wid(wid: String) -> Self {
        Self {
            wid,
            sid: "*".to_string(),
        }
    }

    pub fn with_sid(sid: String) -> Self {
        Self {
            wid: "*".to_string(),
            sid,
        }
    }
}

/// Event bus shared by the executor and its subscribers.
#[derive(Clone)]
pub struct Channel {
    event_queue: Arc<BroadcastQueue<Event<Message>>>,
    log_queue: Arc<BroadcastQueue<Event<Log>>>,

    events: ShareLock<Vec<PipelineEventHandle>>,
    logs: ShareLock<Vec<PipelineLogHandle>>,
    events_async: ShareLock<Vec<PipelineEventHandleAsync>>,

    runtime: Arc<Runtime>,
    shutdown: Arc<Shutdown>,
}

impl Channel {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self {
            event_queue: BroadcastQueue::new(EVENT_QUEUE_SIZE),
            log_queue: BroadcastQueue::new(LOG_QUEUE_SIZE),
            events: Arc::new(RwLock::new(Vec::new())),
            logs: Arc::new(RwLock::new(Vec::new())),
            events_async: Arc::new(RwLock::new(Vec::new())),
            runtime,
            shutdown: Arc::new(Shutdown::new()),
        }
    }

    pub(crate) fn log_queue(&self) -> Arc<BroadcastQueue<Event<Log>>> {
        self.log_queue.clone()
    }

    pub(crate) fn event_queue(&self) -> Arc<BroadcastQueue<Event<Message>>> {
        self.event_queue.clone()
    }

    /// Publish an event. Without subscribers the event is dropped.
    pub(crate) fn emit(
        &self,
        message: Message,
    ) {
        let _ = self.event_queue.send(Event::new(&message));
    }

    /// Start dispatching queued events to registered handlers.
    pub fn listen(&self) {
        // subscribe before spawning so nothing sent after `listen` returns is missed
        let mut event_queue = self.event_queue.subscribe();
        let mut log_queue = self.log_queue.subscribe();
        let events = self.events.clone();
        let logs = self.logs.clone();
        let events_async = self.events_async.clone();

        let shutdown = self.shutdown.clone();
        self.runtime.spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.wait() => break,
                    Ok(e) = event_queue.recv() => {
                        let evt = e.clone();
                        dispatch_event!(events, &evt);
                        dispatch_event_async!(events_async, &e);
                    }
                    Ok(log) = log_queue.recv() => {
                        dispatch_event!(logs, &log);
                    }
                }
            }
        });
    }

    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }
}

/// Filtered subscription to a [`Channel`].
#[derive(Clone)]
pub struct ChannelEvent {
    channel: Arc<Channel>,

    glob: (globset::GlobMatcher, globset::GlobMatcher),
}

#[allow(unused)]
impl ChannelEvent {
    pub fn channel(
        channel: Arc<Channel>,
        options: ChannelOptions,
    ) -> Result<Self> {
        Ok(Self {
            channel,
            glob: (compile_glob(&options.wid)?, compile_glob(&options.sid)?),
        })
    }

    /// Called with the execution id when a run succeeds.
    pub fn on_complete(
        &self,
        f: impl Fn(String) + Send + Sync + 'static,
    ) {
        let glob = self.glob.clone();

        self.channel.events.write().unwrap().push(Arc::new(move |e| {
            if e.event.is_complete() && is_match(&glob, &e.wid, &e.sid) {
                f(e.eid.clone());
            }
        }));
    }

    pub fn on_error(
        &self,
        f: impl Fn(&Event<Message>) + Send + Sync + 'static,
    ) {
        let glob = self.glob.clone();

        self.channel.events.write().unwrap().push(Arc::new(move |e| {
            if e.event.is_error() && is_match(&glob, &e.wid, &e.sid) {
                f(e);
            }
        }));
    }

    pub fn on_event(
        &self,
        f: impl Fn(&Event<Message>) + Send + Sync + 'static,
    ) {
        let glob = self.glob.clone();

        self.channel.events.write().unwrap().push(Arc::new(move |e| {
            if is_match(&glob, &e.wid, &e.sid) {
                f(e);
            }
        }));
    }

    pub fn on_log(
        &self,
        f: impl Fn(&Event<Log>) + Send + Sync + 'static,
    ) {
        let glob = self.glob.clone();

        self.channel.logs.write().unwrap().push(Arc::new(move |e| {
            if is_match(&glob, &e.wid, &e.sid) {
                f(e);
            }
        }));
    }

    pub fn on_event_async<F>(
        &self,
        f: F,
    ) where
        F: Fn(&Event<Message>) -> BoxFuture<'static, ()> + Send + Sync + 'static,
    {
        let glob = self.glob.clone();

        self.channel.events_async.write().unwrap().push(Arc::new(move |e| {
            if is_match(&glob, &e.wid, &e.sid) {
                f(e)
            } else {
                Box::pin(async {})
            }
        }));
    }
}

fn compile_glob(pattern: &str) -> Result<globset::GlobMatcher> {
    globset::Glob::new(pattern).map(|g| g.compile_matcher()).map_err(|e| ToolkitError::Config(format!("invalid channel pattern '{}': {}", pattern, e)))
}

fn is_match(
    glob: &(globset::GlobMatcher, globset::GlobMatcher),
    wid: &str,
    sid: &str,
) -> bool {
    let (pat_wid, pat_sid) = glob;
    pat_wid.is_match(wid) && pat_sid.is_match(sid)
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Mutex, mpsc},
        time::Duration,
    };

    use super::*;
    use crate::events::{ExecutionEvent, PipelineEvent, StepEvent};

    fn message(
        wid: &str,
        sid: &str,
        event: PipelineEvent,
    ) -> Message {
        Message {
            eid: "e1".to_string(),
            wid: wid.to_string(),
            sid: sid.to_string(),
            tool_id: String::new(),
            event,
        }
    }

    fn create_channel() -> Arc<Channel> {
        let runtime = Arc::new(Runtime::new().unwrap());
        Arc::new(Channel::new(runtime))
    }

    #[test]
    fn test_on_complete_filters_by_workflow() {
        let channel = create_channel();
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        ChannelEvent::channel(channel.clone(), ChannelOptions::with_wid("wf-a*".to_string())).unwrap().on_complete(move |eid| {
            let _ = tx.lock().unwrap().send(eid);
        });
        channel.listen();

        channel.emit(message("wf-b", "", PipelineEvent::Execution(ExecutionEvent::Succeeded)));
        channel.emit(message("wf-a1", "", PipelineEvent::Execution(ExecutionEvent::Succeeded)));

        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "e1");
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        channel.shutdown();
    }

    #[test]
    fn test_on_event_filters_by_step() {
        let channel = create_channel();
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        ChannelEvent::channel(channel.clone(), ChannelOptions::with_sid("s2".to_string())).unwrap().on_event(move |e| {
            let _ = tx.lock().unwrap().send(e.event.clone());
        });
        channel.listen();

        channel.emit(message("wf", "s1", PipelineEvent::Step(StepEvent::Running(0))));
        channel.emit(message("wf", "s2", PipelineEvent::Step(StepEvent::Succeeded(Duration::from_millis(1)))));

        let event = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(event, PipelineEvent::Step(StepEvent::Succeeded(_))));
        channel.shutdown();
    }

    #[test]
    fn test_on_event_async() {
        let channel = create_channel();
        let (tx, rx) = mpsc::channel();
        let tx = Arc::new(Mutex::new(tx));
        ChannelEvent::channel(channel.clone(), ChannelOptions::default()).unwrap().on_event_async(move |e| {
            let tx = tx.clone();
            let eid = e.eid.clone();
            Box::pin(async move {
                let _ = tx.lock().unwrap().send(eid);
            })
        });
        channel.listen();

        channel.emit(message("wf", "", PipelineEvent::Execution(ExecutionEvent::Succeeded)));

        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "e1");
        channel.shutdown();
    }

    #[test]
    fn test_invalid_pattern() {
        let channel = create_channel();
        let result = ChannelEvent::channel(channel, ChannelOptions::with_wid("[".to_string()));
        assert!(matches!(result, Err(ToolkitError::Config(_))));
    }
}
