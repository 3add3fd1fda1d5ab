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

pub mod check;
pub mod convert;
pub mod plan;

use crate::config::CliConfig;
use anyhow::{Context, Result};
use palma2tacton_mapper::{Document, MappingConfig, MappingEngine};
use std::path::Path;

/// Shared state for command execution
pub struct CommandContext {
    pub config: CliConfig,
}

impl CommandContext {
    pub fn new(config: CliConfig) -> Self {
        Self { config }
    }

    pub fn engine(&self, mapping: MappingConfig) -> Result<MappingEngine> {
        Ok(MappingEngine::new(mapping)?)
    }
}

/// Read and parse a Palma export
pub fn read_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Document::from_json(&content).with_context(|| format!("{} is not a valid Palma document", path.display()))
}
