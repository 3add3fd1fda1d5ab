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

//! Input indexing stage
//!
//! Builds UID lookup tables once per run so the recursive processors never
//! scan the property or module lists.

use super::PipelineStage;
use crate::mapper::{
    config::MappingConfig,
    error::{MappingError, MappingResult},
};
use crate::model::palma::{ConfigurationIntent, Document, Module, Node, Property};
use std::collections::HashMap;
use tracing::debug;

/// UID lookups over one input document
#[derive(Debug)]
pub struct InputIndex<'a> {
    document: &'a Document,
    properties: HashMap<&'a str, &'a Property>,
    modules: HashMap<&'a str, &'a Module>,
}

impl<'a> InputIndex<'a> {
    /// Index a document; system properties shadow product properties with the same UID
    pub fn new(document: &'a Document) -> Self {
        let intent = &document.configuration_intent;
        let properties = intent
            .properties
            .iter()
            .chain(&intent.system_properties)
            .map(|property| (property.uid.as_str(), property))
            .collect();
        let modules = intent.modules.iter().map(|module| (module.uid.as_str(), module)).collect();

        Self { document, properties, modules }
    }

    pub fn intent(&self) -> &'a ConfigurationIntent {
        &self.document.configuration_intent
    }

    pub fn property_by_uid(&self, uid: &str) -> MappingResult<&'a Property> {
        self.properties.get(uid).copied().ok_or_else(|| MappingError::missing_property(uid))
    }

    pub fn module_by_uid(&self, uid: &str) -> MappingResult<&'a Module> {
        self.modules.get(uid).copied().ok_or_else(|| MappingError::missing_module(uid))
    }

    /// Module realized by a module-position node
    pub fn realized_module(&self, node: &Node) -> MappingResult<&'a Module> {
        match node.realization.as_deref() {
            Some(uid) => self.module_by_uid(uid),
            None => Err(MappingError::missing_module("")),
        }
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

/// Stage producing the [`InputIndex`]
#[derive(Debug, Default)]
pub struct Indexer;

impl Indexer {
    pub fn new(_config: &MappingConfig) -> MappingResult<Self> {
        Ok(Self)
    }
}

impl<'a> PipelineStage<'a> for Indexer {
    type Input = &'a Document;
    type Output = InputIndex<'a>;

    fn execute(&mut self, input: Self::Input, _config: &MappingConfig) -> MappingResult<Self::Output> {
        let index = InputIndex::new(input);
        debug!(properties = index.property_count(), modules = index.module_count(), "indexed input");
        Ok(index)
    }

    fn name(&self) -> &'static str {
        "index"
    }
}
