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

//! Assembly building
//!
//! Composes positions, attributes and rules into one assembly per assembly
//! node. A parent needs the complete assemblies of its assembly-position
//! children for upward aggregation, so children are built first and every
//! assembly is built exactly once.

use super::{AttributeProcessor, MappingScope, PositionProcessor, RuleProcessor};
use crate::mapper::{
    config::{MappingConfig, NamingScheme},
    error::MappingResult,
    pipeline::NodeKey,
};
use crate::model::palma::Node;
use crate::model::tacton::{Assembly, FeatureValue, Variant};
use std::collections::HashMap;
use tracing::debug;

/// Processor for assemblies
pub struct AssemblyProcessor {
    naming: NamingScheme,
    positions: PositionProcessor,
    attributes: AttributeProcessor,
    rules: RuleProcessor,
}

impl AssemblyProcessor {
    /// Create a new assembly processor
    pub fn new(config: &MappingConfig) -> MappingResult<Self> {
        Ok(Self {
            naming: config.naming.clone(),
            positions: PositionProcessor::new(config)?,
            attributes: AttributeProcessor::new(config)?,
            rules: RuleProcessor::new(config)?,
        })
    }

    /// Assemblies for every assembly node of the forest
    ///
    /// Output order is level-wise: the assembly nodes of one sibling list,
    /// then the descendants of each sibling in turn.
    pub fn process_forest(&self, forest: &[Node], scope: MappingScope<'_>) -> MappingResult<Vec<Assembly>> {
        let mut order = Vec::new();
        collect_assembly_nodes(forest, &mut order);

        let mut built = HashMap::with_capacity(order.len());
        for node in &order {
            self.build(node, &mut built, scope)?;
        }

        Ok(order.iter().filter_map(|node| built.remove(&NodeKey::of(node))).collect())
    }

    fn build(&self, node: &Node, built: &mut HashMap<NodeKey, Assembly>, scope: MappingScope<'_>) -> MappingResult<()> {
        if built.contains_key(&NodeKey::of(node)) {
            return Ok(());
        }

        let children: Vec<&Node> = node.nodes.iter().filter(|child| child.is_assembly_position()).collect();
        for child in &children {
            self.build(child, built, scope)?;
        }

        let child_assemblies: Vec<&Assembly> = children.iter().filter_map(|child| built.get(&NodeKey::of(child))).collect();
        let assembly = self.process_assembly(node, &child_assemblies, scope)?;
        debug!(
            assembly = %assembly.name,
            attributes = assembly.attributes.len(),
            positions = assembly.positions.len(),
            rules = assembly.rules.len(),
            "built assembly"
        );

        built.insert(NodeKey::of(node), assembly);
        Ok(())
    }

    /// Assembly for a single node given its children's assemblies
    pub fn process_assembly(&self, node: &Node, child_assemblies: &[&Assembly], scope: MappingScope<'_>) -> MappingResult<Assembly> {
        Ok(Assembly {
            name: self.naming.assembly_name_from_node(node),
            description: node.name.clone(),
            attributes: self.attributes.process_attributes(node, child_assemblies, scope)?,
            positions: self.positions.process_positions(node, scope)?,
            rules: self.rules.process_rules(node, scope)?,
            variant_enabled: true,
            virtual_variant: self.virtual_variant(node),
        })
    }

    fn virtual_variant(&self, node: &Node) -> Variant {
        Variant {
            name: self.naming.assembly_virtual_variant_name(&node.name),
            description: node.name.clone(),
            values: vec![
                FeatureValue::new(&self.naming.non_standard_feature_name, "No"),
                FeatureValue::new(&self.naming.reference_feature_name, &self.naming.none_element),
            ],
        }
    }
}

fn collect_assembly_nodes<'n>(nodes: &'n [Node], into: &mut Vec<&'n Node>) {
    into.extend(nodes.iter().filter(|node| node.is_assembly()));
    for node in nodes {
        collect_assembly_nodes(&node.nodes, into);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::pipeline::{InheritanceContext, InputIndex};
    use crate::model::palma::Document;
    use crate::model::tacton::{AggregateEntry, NamedRef};
    use serde_json::json;

    fn document() -> Document {
        Document::from_value(json!({
            "configurationIntent": {
                "productStructure": [{
                    "type": "Root",
                    "uid": "root",
                    "name": "Cabinet",
                    "nodes": [
                        { "type": "ModuleSetNode", "uid": "a", "code": "A", "name": "Body", "quantity": 1, "nodes": [
                            { "type": "LibraryInstanceNode", "uid": "a1", "code": "A1", "name": "Drawer", "quantity": 2, "nodes": [
                                { "type": "ModuleInstanceNode", "uid": "k", "code": "K", "name": "Knob", "realization": "knob", "quantity": 1 },
                                { "type": "ModuleInstanceNode", "uid": "k2", "code": "K2", "name": "Knob 2", "realization": "knob", "quantity": 1 }
                            ]}
                        ]},
                        { "type": "Folder", "uid": "folder", "name": "Extras", "nodes": [
                            { "type": "ModuleSetNode", "uid": "b", "code": "B", "name": "Lid" }
                        ]}
                    ]
                }],
                "properties": [{ "uid": "color", "name": "Color", "unifier": true }],
                "modules": [{ "uid": "knob", "name": "Knob", "propertyRelations": [{ "propertyUid": "color" }] }]
            }
        }))
        .unwrap()
    }

    fn assemblies(document: &Document) -> Vec<Assembly> {
        let index = InputIndex::new(document);
        let inheritance = InheritanceContext::build(&document.configuration_intent.product_structure);
        let processor = AssemblyProcessor::new(&MappingConfig::default()).unwrap();
        processor.process_forest(&document.configuration_intent.product_structure, MappingScope::new(&index, &inheritance)).unwrap()
    }

    #[test]
    fn test_level_wise_order() {
        let document = document();
        let names: Vec<_> = assemblies(&document).into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["palma_cabinet_assembly", "palma_a_body_assembly", "palma_a1_drawer_assembly", "palma_b_lid_assembly"]);
    }

    #[test]
    fn test_virtual_variant() {
        let document = document();
        let assemblies = assemblies(&document);
        let body = &assemblies[1];

        assert!(body.variant_enabled);
        assert_eq!(body.virtual_variant.name, "body_variant");
        assert_eq!(body.virtual_variant.description, "Body");
        assert_eq!(body.virtual_variant.values, vec![FeatureValue::new("isNonStandard", "No"), FeatureValue::new("reference_feature", "none")]);
    }

    #[test]
    fn test_attributes_flow_upward() {
        let document = document();
        let assemblies = assemblies(&document);

        let drawer = &assemblies[2];
        let color = drawer.attribute("color_attribute").unwrap();
        assert_eq!(color.aggregate_list.len(), 2);

        let body = &assemblies[1];
        let color = body.attribute("color_attribute").unwrap();
        assert_eq!(color.aggregate_list, vec![AggregateEntry::attribute("a1_drawer_position", "color_attribute")]);
        assert_eq!(body.position("a1_drawer_position").unwrap().assembly, Some(NamedRef::new("palma_a1_drawer_assembly")));

        let root = &assemblies[0];
        let color = root.attribute("color_attribute").unwrap();
        assert!(color.aggregate_list.contains(&AggregateEntry::attribute("a_body_position", "color_attribute")));
    }

    #[test]
    fn test_folder_children_are_not_root_positions() {
        let document = document();
        let assemblies = assemblies(&document);
        let root = &assemblies[0];

        let positions: Vec<_> = root.positions.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(positions, vec!["a_body_position"]);
    }
}
