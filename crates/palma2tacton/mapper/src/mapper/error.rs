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

//! Error handling for the mapping engine
//!
//! Every error aborts the whole transformation; there is no partial output.

use thiserror::Error;

/// Errors that can occur while mapping a Palma document
#[derive(Error, Debug)]
pub enum MappingError {
    // Reference Errors
    #[error("Property not found: {uid}")]
    MissingPropertyReference { uid: String },

    #[error("Module not found: {uid}")]
    MissingModuleReference { uid: String },

    #[error("Node {node} has variable quantity but its controlling property {} cannot be resolved", uid.as_deref().unwrap_or("<none>"))]
    MissingQuantityControl { node: String, uid: Option<String> },

    #[error("Attribute {attribute} is shown in tab {category} but is not present on the root assembly")]
    UncategorizedAttribute { attribute: String, category: String },

    // Configuration Errors
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    // Input Errors
    #[error("Invalid input document: {0}")]
    InvalidInput(#[from] serde_json::Error),
}

impl MappingError {
    pub fn missing_property(uid: impl Into<String>) -> Self {
        Self::MissingPropertyReference { uid: uid.into() }
    }

    pub fn missing_module(uid: impl Into<String>) -> Self {
        Self::MissingModuleReference { uid: uid.into() }
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput(_) => ErrorCategory::Input,
            Self::MissingPropertyReference { .. } | Self::MissingModuleReference { .. } | Self::MissingQuantityControl { .. } | Self::UncategorizedAttribute { .. } => {
                ErrorCategory::Reference
            }
            Self::InvalidConfiguration(_) => ErrorCategory::Configuration,
        }
    }
}

/// Error categories for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Reference,
    Configuration,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Reference => "reference",
            Self::Configuration => "configuration",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;
