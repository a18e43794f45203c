use std::{fs, path::Path};

use serde::Deserialize;

use crate::{Result, ToolkitError};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// number of async worker threads, range [1, 32768), defaults to 4
    pub async_worker_thread_number: u16,
    /// execution history config
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// maximum number of executions kept, oldest are dropped first
    pub capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            async_worker_thread_number: 4,
            history: HistoryConfig::default(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref()).map_err(|e| ToolkitError::Config(format!("failed to load config file {:?}: {}", path.as_ref(), e)))?;

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(toml_str)?;
        if config.async_worker_thread_number == 0 {
            return Err(ToolkitError::Config("async_worker_thread_number must be at least 1".to_string()));
        }
        Ok(config)
    }
}
