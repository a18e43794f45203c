use std::sync::Arc;

use tokio::{runtime::Runtime, sync::broadcast::error::RecvError};
use tracing::warn;

use crate::{
    common::Shutdown,
    events::{PipelineEvent, StepEvent},
    runtime::Channel,
    store::Store,
    utils,
};

/// Folds step events into the tool usage stats.
pub struct Monitor {
    store: Arc<Store>,
    channel: Arc<Channel>,

    runtime: Arc<Runtime>,
    shutdown: Arc<Shutdown>,
}

impl Monitor {
    pub fn new(
        store: Arc<Store>,
        channel: Arc<Channel>,
        runtime: Arc<Runtime>,
        shutdown: Arc<Shutdown>,
    ) -> Self {
        Self {
            store,
            channel,
            runtime,
            shutdown,
        }
    }

    pub fn monitor(&self) {
        let stats = self.store.stats();
        let mut event_queue = self.channel.event_queue().subscribe();
        let shutdown = self.shutdown.clone();

        self.runtime.spawn(async move {
            loop {
                let received = tokio::select! {
                    _ = shutdown.wait() => break,
                    received = event_queue.recv() => received,
                };
                let event = match received {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("usage monitor lagged, {} events skipped", skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                if let PipelineEvent::Step(step) = &event.event {
                    match step {
                        StepEvent::Running(_) => {}
                        StepEvent::Succeeded(duration) => stats.record(&event.tool_id, true, *duration, utils::time::time_millis()),
                        StepEvent::Failed {
                            duration,
                            ..
                        } => stats.record(&event.tool_id, false, *duration, utils::time::time_millis()),
                    }
                }
            }
        });
    }
}
