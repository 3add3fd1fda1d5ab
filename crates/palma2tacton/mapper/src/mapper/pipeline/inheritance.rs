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

//! Inheritance propagation stage
//!
//! Derives per-node facts (parent, inherited optionality, depth) in a side
//! table keyed by node identity. The input tree is never modified.

use super::PipelineStage;
use crate::mapper::{config::MappingConfig, error::MappingResult};
use crate::model::palma::Node;
use std::collections::HashMap;
use tracing::debug;

/// Identity of a node within one borrowed document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(usize);

impl NodeKey {
    pub fn of(node: &Node) -> Self {
        Self(node as *const Node as usize)
    }
}

/// Facts derived for a single node
#[derive(Debug, Clone, Copy)]
pub struct NodeFacts<'a> {
    pub parent: Option<&'a Node>,
    /// An ancestor is optional
    pub optional_inherited: bool,
    pub depth: usize,
}

/// Traversal-scoped facts for every node of a forest
#[derive(Debug, Default)]
pub struct InheritanceContext<'a> {
    facts: HashMap<NodeKey, NodeFacts<'a>>,
}

impl<'a> InheritanceContext<'a> {
    /// Walk the forest in pre-order, top-level nodes first
    pub fn build(forest: &'a [Node]) -> Self {
        let mut context = Self::default();
        for node in forest {
            context.visit(node, None, false, 0);
        }
        context
    }

    fn visit(&mut self, node: &'a Node, parent: Option<&'a Node>, optional_inherited: bool, depth: usize) {
        self.facts.insert(NodeKey::of(node), NodeFacts { parent, optional_inherited, depth });

        let children_inherit = optional_inherited || node.optional;
        for child in &node.nodes {
            self.visit(child, Some(node), children_inherit, depth + 1);
        }
    }

    pub fn facts(&self, node: &Node) -> Option<&NodeFacts<'a>> {
        self.facts.get(&NodeKey::of(node))
    }

    pub fn parent(&self, node: &Node) -> Option<&'a Node> {
        self.facts(node).and_then(|facts| facts.parent)
    }

    /// A node without a parent starts a tree
    pub fn is_root(&self, node: &Node) -> bool {
        self.parent(node).is_none()
    }

    /// Optional by its own flag or through an ancestor
    pub fn is_optional(&self, node: &Node) -> bool {
        node.optional || self.facts(node).is_some_and(|facts| facts.optional_inherited)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// Stage producing the [`InheritanceContext`]
#[derive(Debug, Default)]
pub struct InheritancePropagator;

impl InheritancePropagator {
    pub fn new(_config: &MappingConfig) -> MappingResult<Self> {
        Ok(Self)
    }
}

impl<'a> PipelineStage<'a> for InheritancePropagator {
    type Input = &'a [Node];
    type Output = InheritanceContext<'a>;

    fn execute(&mut self, input: Self::Input, _config: &MappingConfig) -> MappingResult<Self::Output> {
        let context = InheritanceContext::build(input);
        debug!(nodes = context.len(), "propagated inheritance");
        Ok(context)
    }

    fn name(&self) -> &'static str {
        "inheritance"
    }
}
