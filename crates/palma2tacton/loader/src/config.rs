// Palma2Tacton
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Loader configuration

use crate::error::{LoadError, LoadResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How modules are handed to the configurator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleUpload {
    /// Synchronous upserts in fixed-size batches
    #[default]
    Batched,
    /// One asynchronous job polled until it settles
    AsyncJob,
}

/// Upload settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub module_upload: ModuleUpload,
    /// Modules per synchronous upsert
    pub module_batch_size: usize,
    pub poll_interval_ms: u64,
    /// Status polls before an async job counts as timed out
    pub max_polls: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            module_upload: ModuleUpload::Batched,
            module_batch_size: 50,
            poll_interval_ms: 2000,
            max_polls: 150,
        }
    }
}

impl LoaderConfig {
    /// Validate the configuration
    pub fn validate(&self) -> LoadResult<()> {
        if self.module_batch_size == 0 {
            return Err(LoadError::invalid_configuration("module_batch_size must be greater than zero"));
        }
        if self.module_upload == ModuleUpload::AsyncJob && self.max_polls == 0 {
            return Err(LoadError::invalid_configuration("max_polls must be greater than zero for async uploads"));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.module_batch_size, 50);
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let config = LoaderConfig { module_batch_size: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = LoaderConfig {
            module_upload: ModuleUpload::AsyncJob,
            max_polls: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialization() {
        let config: LoaderConfig = serde_json::from_str(r#"{ "module_upload": "async_job" }"#).unwrap();
        assert_eq!(config.module_upload, ModuleUpload::AsyncJob);
        assert_eq!(config.max_polls, 150);
    }
}
