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

//! Error handling for model uploads

use thiserror::Error;

/// Errors that can occur while uploading a Tacton model
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Transport error during {operation}: {details}")]
    Transport { operation: &'static str, details: String },

    #[error("Module upload job {id} failed: {}", error.as_deref().unwrap_or("no details"))]
    JobFailed { id: String, error: Option<String> },

    #[error("Module upload job {id} still running after {polls} status polls")]
    JobTimedOut { id: String, polls: u32 },

    #[error("Invalid loader configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LoadError {
    pub fn transport(operation: &'static str, details: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            details: details.into(),
        }
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Whether the failure happened on the remote side rather than locally
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::JobFailed { .. } | Self::JobTimedOut { .. })
    }
}

/// Result type for upload operations
pub type LoadResult<T> = Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let error = LoadError::JobFailed { id: "42".into(), error: None };
        assert_eq!(error.to_string(), "Module upload job 42 failed: no details");

        let error = LoadError::transport("upsertDomains", "connection reset");
        assert_eq!(error.to_string(), "Transport error during upsertDomains: connection reset");
        assert!(error.is_remote());
        assert!(!LoadError::invalid_configuration("zero batch size").is_remote());
    }
}
