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

//! Dead attribute elimination
//!
//! Removes technical attributes nothing depends on. An attribute survives
//! when it aggregates more than one source, when an upper assembly
//! aggregates it, when a rule of its own assembly mentions it, or when it
//! belongs to a user-facing category.
//!
//! Precondition: assemblies are filtered top-down starting from the
//! assemblies no position refers to. The "aggregated by an upper assembly"
//! check reads the uppers' already filtered attribute lists, so visiting a
//! child before its parent keeps attributes the parent is about to drop.

use crate::model::tacton::{Assembly, Attribute, Rule};
use petgraph::Directed;
use petgraph::Direction::{Incoming, Outgoing};
use petgraph::graph::{Graph, NodeIndex};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Assembly containment graph; an edge points from an assembly to one it positions
pub type AssemblyGraph = Graph<usize, (), Directed>;

/// Build the containment graph over `assemblies`; node weights are indices into the slice
pub fn build_assembly_graph(assemblies: &[Assembly]) -> AssemblyGraph {
    let mut graph = AssemblyGraph::new();
    let nodes: Vec<NodeIndex> = (0..assemblies.len()).map(|index| graph.add_node(index)).collect();

    let mut by_name: HashMap<&str, Vec<NodeIndex>> = HashMap::new();
    for (index, assembly) in assemblies.iter().enumerate() {
        by_name.entry(assembly.name.as_str()).or_default().push(nodes[index]);
    }

    for (index, assembly) in assemblies.iter().enumerate() {
        for position in &assembly.positions {
            let Some(reference) = &position.assembly else { continue };
            for &lower in by_name.get(reference.name.as_str()).into_iter().flatten() {
                graph.update_edge(nodes[index], lower, ());
            }
        }
    }
    graph
}

/// Statistics about eliminated attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EliminationStats {
    /// Assembly visits, counting shared sub-assemblies once per parent
    pub assemblies_visited: usize,
    pub attributes_removed: usize,
    pub attributes_kept: usize,
}

/// Dead attribute eliminator for assemblies
pub struct DeadAttributeEliminator {
    technical_category: String,
    stats: EliminationStats,
}

impl DeadAttributeEliminator {
    /// Create a new eliminator; attributes outside `technical_category` are always kept
    pub fn new(technical_category: impl Into<String>) -> Self {
        Self {
            technical_category: technical_category.into(),
            stats: EliminationStats::default(),
        }
    }

    /// Eliminate dead attributes from a complete list of assemblies
    pub fn eliminate(&mut self, mut assemblies: Vec<Assembly>) -> Vec<Assembly> {
        self.stats = EliminationStats::default();
        let graph = build_assembly_graph(&assemblies);

        let roots: Vec<NodeIndex> = graph.node_indices().filter(|&node| graph.neighbors_directed(node, Incoming).next().is_none()).collect();
        let mut path = HashSet::new();
        for root in roots {
            self.visit(root, &graph, &mut assemblies, &mut path);
        }

        self.stats.attributes_kept = assemblies.iter().map(|assembly| assembly.attributes.len()).sum();
        assemblies
    }

    fn visit(&mut self, node: NodeIndex, graph: &AssemblyGraph, assemblies: &mut [Assembly], path: &mut HashSet<NodeIndex>) {
        if !path.insert(node) {
            return;
        }

        let index = graph[node];
        let uppers: Vec<&Assembly> = graph.neighbors_directed(node, Incoming).map(|upper| &assemblies[graph[upper]]).collect();
        let keep: Vec<bool> = assemblies[index].attributes.iter().map(|attribute| self.is_needed(attribute, &assemblies[index], &uppers)).collect();

        let assembly = &mut assemblies[index];
        let before = assembly.attributes.len();
        let mut keep = keep.into_iter();
        assembly.attributes.retain(|_| keep.next().unwrap_or(true));

        let removed = before - assembly.attributes.len();
        self.stats.assemblies_visited += 1;
        self.stats.attributes_removed += removed;
        if removed > 0 {
            debug!(assembly = %assembly.name, removed, "dropped unused attributes");
        }

        let lowers: Vec<NodeIndex> = graph.neighbors_directed(node, Outgoing).collect();
        for lower in lowers {
            self.visit(lower, graph, assemblies, path);
        }
        path.remove(&node);
    }

    fn is_needed(&self, attribute: &Attribute, assembly: &Assembly, uppers: &[&Assembly]) -> bool {
        let aggregates_several = attribute.aggregate_list.len() > 1;
        let aggregated_by_upper = uppers.iter().flat_map(|upper| &upper.attributes).flat_map(|upper| &upper.aggregate_list).any(|entry| entry.attribute_name() == Some(attribute.name.as_str()));
        let used_in_rules = assembly.rules.iter().any(|rule| match rule {
            Rule::Constraint { constraint, .. } => constraint.contains(&attribute.name),
            Rule::Combination { combination, .. } => combination.columns.iter().any(|column| *column == attribute.name),
        });
        let user_facing = attribute.category.name != self.technical_category;

        aggregates_several || aggregated_by_upper || used_in_rules || user_facing
    }

    /// Get elimination statistics of the last run
    pub fn stats(&self) -> &EliminationStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tacton::{AggregateEntry, AggregationStrategy, Combination, NamedRef, Position, Variant};

    const TECHNICAL: &str = "palma_remaining_attributes_category";

    fn attribute(name: &str, aggregate_list: Vec<AggregateEntry>) -> Attribute {
        Attribute {
            name: name.into(),
            description: None,
            domain: NamedRef::new("d"),
            io: true,
            aggregation_strategy: AggregationStrategy::None,
            aggregate_list,
            category: NamedRef::new(TECHNICAL),
        }
    }

    fn assembly(name: &str, attributes: Vec<Attribute>, lowers: &[&str], rules: Vec<Rule>) -> Assembly {
        Assembly {
            name: name.into(),
            description: name.into(),
            attributes,
            positions: lowers
                .iter()
                .map(|lower| Position {
                    name: format!("{lower}_position"),
                    description: String::new(),
                    module: None,
                    assembly: Some(NamedRef::new(*lower)),
                    qty_min: 1,
                    qty_max: 1,
                })
                .collect(),
            rules,
            variant_enabled: true,
            virtual_variant: Variant {
                name: format!("{name}_variant"),
                description: name.into(),
                values: vec![],
            },
        }
    }

    fn names(assembly: &Assembly) -> Vec<&str> {
        assembly.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_graph_edges() {
        let assemblies = vec![assembly("top", vec![], &["mid"], vec![]), assembly("mid", vec![], &["leaf", "ghost"], vec![]), assembly("leaf", vec![], &[], vec![])];
        let graph = build_assembly_graph(&assemblies);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains_edge(NodeIndex::new(0), NodeIndex::new(1)));
        assert!(graph.contains_edge(NodeIndex::new(1), NodeIndex::new(2)));
    }

    #[test]
    fn test_keep_rules() {
        let mut user_facing = attribute("shown_attribute", vec![]);
        user_facing.category = NamedRef::new("palma_looks_category");

        let assemblies = vec![assembly(
            "top",
            vec![
                attribute("unused_attribute", vec![AggregateEntry::feature("p", "f")]),
                attribute("several_attribute", vec![AggregateEntry::feature("p1", "f"), AggregateEntry::feature("p2", "f")]),
                attribute("ruled_attribute", vec![]),
                attribute("column_attribute", vec![]),
                user_facing,
            ],
            &[],
            vec![
                Rule::constraint("Palma (cases qty)", "(x in {No} and ruled_attribute in {a})->p.qty=1"),
                Rule::Combination {
                    rule_group: "Palma (combinations)".into(),
                    combination: Combination { columns: vec!["column_attribute".into()], rows: vec![] },
                },
            ],
        )];

        let mut eliminator = DeadAttributeEliminator::new(TECHNICAL);
        let optimized = eliminator.eliminate(assemblies);

        assert_eq!(names(&optimized[0]), vec!["several_attribute", "ruled_attribute", "column_attribute", "shown_attribute"]);
        assert_eq!(eliminator.stats().attributes_removed, 1);
        assert_eq!(eliminator.stats().attributes_kept, 4);
    }

    #[test]
    fn test_upper_aggregation_is_read_after_filtering() {
        // top drops its own copy of `color_attribute`, so mid's copy is no longer aggregated
        let assemblies = vec![
            assembly("top", vec![attribute("color_attribute", vec![AggregateEntry::attribute("mid_position", "color_attribute")])], &["mid"], vec![]),
            assembly(
                "mid",
                vec![
                    attribute("color_attribute", vec![AggregateEntry::attribute("leaf_position", "color_attribute")]),
                    attribute("size_attribute", vec![]),
                ],
                &["leaf"],
                vec![],
            ),
            assembly("leaf", vec![attribute("color_attribute", vec![])], &[], vec![]),
        ];

        let optimized = DeadAttributeEliminator::new(TECHNICAL).eliminate(assemblies);
        assert!(optimized.iter().all(|a| a.attributes.is_empty()));
    }

    #[test]
    fn test_upper_aggregation_keeps_lower_attribute() {
        let assemblies = vec![
            assembly(
                "top",
                vec![attribute("color_attribute", vec![AggregateEntry::attribute("mid_position", "color_attribute")])],
                &["mid"],
                vec![Rule::constraint("Palma (cases qty)", "(color_attribute in {red})->mid_position.qty=1")],
            ),
            assembly("mid", vec![attribute("color_attribute", vec![]), attribute("size_attribute", vec![])], &[], vec![]),
        ];

        let optimized = DeadAttributeEliminator::new(TECHNICAL).eliminate(assemblies);
        assert_eq!(names(&optimized[0]), vec!["color_attribute"]);
        assert_eq!(names(&optimized[1]), vec!["color_attribute"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let assemblies = vec![
            assembly("top", vec![], &["a"], vec![]),
            assembly("a", vec![attribute("x_attribute", vec![])], &["b"], vec![]),
            assembly("b", vec![attribute("y_attribute", vec![])], &["a"], vec![]),
        ];

        let mut eliminator = DeadAttributeEliminator::new(TECHNICAL);
        let optimized = eliminator.eliminate(assemblies);
        assert!(optimized.iter().all(|a| a.attributes.is_empty()));
        assert_eq!(eliminator.stats().assemblies_visited, 3);
    }
}
