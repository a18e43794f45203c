use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::{Config, Engine, Result, ToolkitError};

pub struct EngineBuilder {
    async_worker_thread_number: u16,
    history_capacity: usize,
    rt: Option<Arc<Runtime>>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        let config = Config::default();
        Self {
            async_worker_thread_number: config.async_worker_thread_number,
            history_capacity: config.history.capacity,
            rt: None,
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            async_worker_thread_number: config.async_worker_thread_number,
            history_capacity: config.history.capacity,
            rt: None,
        }
    }

    pub fn async_worker_thread_number(
        mut self,
        n: u16,
    ) -> Self {
        self.async_worker_thread_number = n;
        self
    }

    pub fn history_capacity(
        mut self,
        capacity: usize,
    ) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn runtime(
        mut self,
        runtime: Arc<Runtime>,
    ) -> Self {
        self.rt = Some(runtime);
        self
    }

    pub fn build(&self) -> Result<Engine> {
        let runtime = match &self.rt {
            Some(rt) => rt.clone(),
            None => {
                if self.async_worker_thread_number == 0 {
                    return Err(ToolkitError::Engine("async_worker_thread_number must be at least 1".to_string()));
                }
                Arc::new(Builder::new_multi_thread().worker_threads(self.async_worker_thread_number.into()).enable_all().build()?)
            }
        };

        Ok(Engine::new(runtime, self.history_capacity))
    }
}
