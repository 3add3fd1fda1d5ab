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

//! Optimization passes for generated assemblies

pub mod dead_attributes;

pub use dead_attributes::{AssemblyGraph, DeadAttributeEliminator, EliminationStats, build_assembly_graph};

use crate::mapper::{
    config::MappingConfig,
    error::MappingResult,
    pipeline::PipelineStage,
};
use crate::model::tacton::Assembly;

/// Optimizer stage that coordinates the attribute passes
pub struct AttributeOptimizer {
    eliminator: DeadAttributeEliminator,
}

impl AttributeOptimizer {
    /// Create a new optimizer for the given configuration
    pub fn new(config: &MappingConfig) -> Self {
        Self {
            eliminator: DeadAttributeEliminator::new(&config.naming.technical_category_name),
        }
    }

    /// Optimize a complete list of assemblies
    pub fn optimize(&mut self, assemblies: Vec<Assembly>) -> Vec<Assembly> {
        self.eliminator.eliminate(assemblies)
    }

    /// Get statistics of the last run
    pub fn stats(&self) -> &EliminationStats {
        self.eliminator.stats()
    }
}

impl<'a> PipelineStage<'a> for AttributeOptimizer {
    type Input = Vec<Assembly>;
    type Output = Vec<Assembly>;

    fn execute(&mut self, input: Self::Input, _config: &MappingConfig) -> MappingResult<Self::Output> {
        Ok(self.optimize(input))
    }

    fn name(&self) -> &'static str {
        "optimize"
    }
}
