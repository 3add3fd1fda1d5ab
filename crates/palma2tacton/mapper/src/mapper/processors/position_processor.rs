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

//! Position extraction

use super::MappingScope;
use crate::mapper::{
    config::{MappingConfig, NamingScheme},
    error::MappingResult,
};
use crate::model::palma::Node;
use crate::model::tacton::{NamedRef, Position};

/// Processor turning child position nodes into positions
pub struct PositionProcessor {
    naming: NamingScheme,
}

impl PositionProcessor {
    /// Create a new position processor
    pub fn new(config: &MappingConfig) -> MappingResult<Self> {
        Ok(Self { naming: config.naming.clone() })
    }

    /// Positions for the direct position children of `node`, in child order
    pub fn process_positions(&self, node: &Node, scope: MappingScope<'_>) -> MappingResult<Vec<Position>> {
        node.nodes.iter().filter(|child| child.is_position()).map(|child| self.process_position(child, scope)).collect()
    }

    pub fn process_position(&self, node: &Node, scope: MappingScope<'_>) -> MappingResult<Position> {
        let module = if node.is_module_position() {
            Some(NamedRef::new(self.naming.module_name_from_module(scope.index.realized_module(node)?)))
        } else {
            None
        };
        let assembly = node.is_assembly_position().then(|| NamedRef::new(self.naming.assembly_name_from_node(node)));

        Ok(Position {
            name: self.naming.position_name_from_node(node),
            description: node.name.clone(),
            module,
            assembly,
            qty_min: self.min_quantity(node, scope),
            qty_max: self.max_quantity(node),
        })
    }

    pub fn min_quantity(&self, node: &Node, scope: MappingScope<'_>) -> u32 {
        if scope.inheritance.is_optional(node) || node.is_variable() {
            return 0;
        }
        node.cases.iter().map(|case| case.quantity).min().unwrap_or(node.quantity)
    }

    pub fn max_quantity(&self, node: &Node) -> u32 {
        if node.is_variable() {
            return self.naming.unbounded_quantity;
        }
        node.cases.iter().map(|case| case.quantity).max().unwrap_or(node.quantity)
    }
}
