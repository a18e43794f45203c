use std::sync::Arc;

use crate::{
    events::{Event, Log, Message, PipelineEvent},
    model::StepId,
    runtime::Channel,
    utils,
};

/// State shared by the steps of one execution.
#[derive(Clone)]
pub struct Context {
    eid: String,
    wid: String,
    channel: Arc<Channel>,
}

impl Context {
    pub fn new(
        eid: String,
        wid: String,
        channel: Arc<Channel>,
    ) -> Self {
        Self {
            eid,
            wid,
            channel,
        }
    }

    pub fn eid(&self) -> &str {
        &self.eid
    }

    pub fn wid(&self) -> &str {
        &self.wid
    }

    pub fn channel(&self) -> Arc<Channel> {
        self.channel.clone()
    }

    pub fn emit(
        &self,
        sid: StepId,
        tool_id: String,
        event: PipelineEvent,
    ) {
        self.channel.emit(Message {
            eid: self.eid.clone(),
            wid: self.wid.clone(),
            sid,
            tool_id,
            event,
        });
    }

    pub fn emit_log(
        &self,
        sid: StepId,
        content: String,
    ) {
        let log = Log {
            eid: self.eid.clone(),
            wid: self.wid.clone(),
            sid,
            content,
            timestamp: utils::time::time_millis(),
        };
        let _ = self.channel.log_queue().send(Event::new(&log));
    }
}
