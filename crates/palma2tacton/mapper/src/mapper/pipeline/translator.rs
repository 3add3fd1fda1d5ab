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

//! Translation stage
//!
//! Turns the indexed product structure into assemblies.

use super::PipelineStage;
use crate::mapper::{
    config::MappingConfig,
    error::MappingResult,
    processors::{AssemblyProcessor, MappingScope},
};
use crate::model::tacton::Assembly;
use tracing::debug;

/// Translator stage
pub struct Translator {
    assemblies: AssemblyProcessor,
}

impl Translator {
    /// Create a new translator
    pub fn new(config: &MappingConfig) -> MappingResult<Self> {
        Ok(Self {
            assemblies: AssemblyProcessor::new(config)?,
        })
    }
}

impl<'a> PipelineStage<'a> for Translator {
    type Input = MappingScope<'a>;
    type Output = Vec<Assembly>;

    fn execute(&mut self, input: Self::Input, _config: &MappingConfig) -> MappingResult<Self::Output> {
        let forest = &input.index.intent().product_structure;
        let assemblies = self.assemblies.process_forest(forest, input)?;
        debug!(assemblies = assemblies.len(), "translated product structure");
        Ok(assemblies)
    }

    fn name(&self) -> &'static str {
        "translate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::pipeline::{InheritanceContext, InputIndex};
    use crate::model::palma::Document;
    use serde_json::json;

    #[test]
    fn test_translator_covers_every_tree() {
        let document = Document::from_value(json!({
            "configurationIntent": {
                "productStructure": [
                    { "type": "Root", "name": "First" },
                    { "type": "Root", "name": "Second", "nodes": [{ "type": "ModuleSetNode", "uid": "x", "name": "Part" }] }
                ]
            }
        }))
        .unwrap();
        let config = MappingConfig::default();
        let index = InputIndex::new(&document);
        let inheritance = InheritanceContext::build(&document.configuration_intent.product_structure);

        let mut translator = Translator::new(&config).unwrap();
        let assemblies = translator.execute(MappingScope::new(&index, &inheritance), &config).unwrap();

        let names: Vec<_> = assemblies.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["palma_first_assembly", "palma_second_assembly", "palma_x_part_assembly"]);
        assert_eq!(translator.name(), "translate");
    }
}
