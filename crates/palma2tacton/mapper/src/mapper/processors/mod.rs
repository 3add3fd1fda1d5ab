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

//! Processing components for the parts of the Tacton model

pub mod assembly_processor;
pub mod attribute_processor;
pub mod catalog_processor;
pub mod module_processor;
pub mod position_processor;
pub mod rule_processor;

// Re-export processors
pub use assembly_processor::AssemblyProcessor;
pub use attribute_processor::{AttributeProcessor, group_attributes};
pub use catalog_processor::CatalogProcessor;
pub use module_processor::ModuleProcessor;
pub use position_processor::PositionProcessor;
pub use rule_processor::RuleProcessor;

use super::pipeline::{InheritanceContext, InputIndex};

/// Read-only state shared by the per-node processors
#[derive(Debug, Clone, Copy)]
pub struct MappingScope<'a> {
    pub index: &'a InputIndex<'a>,
    pub inheritance: &'a InheritanceContext<'a>,
}

impl<'a> MappingScope<'a> {
    pub fn new(index: &'a InputIndex<'a>, inheritance: &'a InheritanceContext<'a>) -> Self {
        Self { index, inheritance }
    }
}
