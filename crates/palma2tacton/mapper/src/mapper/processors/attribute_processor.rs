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

//! Attribute extraction
//!
//! The attributes visible at an assembly node come from six sources:
//! root-level system attributes, module features shared by sibling module
//! positions, properties referenced by child cases, properties controlling
//! variable quantities, the prune attribute, and io attributes re-exposed
//! from child assemblies. They are grouped by name and, at the root,
//! assigned to the configurator tab that shows them.

use super::MappingScope;
use crate::mapper::{
    config::{MappingConfig, NamingScheme},
    error::{MappingError, MappingResult},
};
use crate::model::palma::{Module, Node, Property};
use crate::model::tacton::{AggregateEntry, AggregationStrategy, Assembly, Attribute, NamedRef};
use std::collections::{BTreeMap, HashSet};

/// Processor for assembly attributes
pub struct AttributeProcessor {
    naming: NamingScheme,
}

impl AttributeProcessor {
    /// Create a new attribute processor
    pub fn new(config: &MappingConfig) -> MappingResult<Self> {
        Ok(Self { naming: config.naming.clone() })
    }

    /// Attributes of the assembly built for `node`
    ///
    /// `child_assemblies` are the complete assemblies of the node's
    /// assembly-position children, in child order.
    pub fn process_attributes(&self, node: &Node, child_assemblies: &[&Assembly], scope: MappingScope<'_>) -> MappingResult<Vec<Attribute>> {
        let mut attributes = self.system_attributes(node, scope);
        attributes.extend(self.module_feature_attributes(node, scope)?);
        attributes.extend(self.case_attributes(node, scope)?);
        attributes.extend(self.quantity_control_attributes(node, scope)?);
        attributes.push(self.prune_attribute());
        attributes.extend(self.upward_attributes(child_assemblies));

        let mut attributes = group_attributes(attributes);
        if node.is_root() {
            self.categorize(&mut attributes, scope)?;
        }
        Ok(attributes)
    }

    fn technical_attribute(&self, property: &Property, io: bool, aggregate_list: Vec<AggregateEntry>) -> Attribute {
        Attribute {
            name: self.naming.attribute_name(&property.name),
            description: Some(property.name.clone()),
            domain: NamedRef::new(self.naming.domain_name(&property.name)),
            io,
            aggregation_strategy: if aggregate_list.is_empty() { AggregationStrategy::None } else { AggregationStrategy::Equal },
            aggregate_list,
            category: NamedRef::new(&self.naming.technical_category_name),
        }
    }

    fn system_attributes(&self, node: &Node, scope: MappingScope<'_>) -> Vec<Attribute> {
        if !node.is_root() {
            return Vec::new();
        }
        let intent = scope.index.intent();
        intent
            .system_properties
            .iter()
            .chain(&intent.properties)
            .map(|property| self.technical_attribute(property, true, Vec::new()))
            .collect()
    }

    fn module_feature_attributes(&self, node: &Node, scope: MappingScope<'_>) -> MappingResult<Vec<Attribute>> {
        let positions: Vec<(&Node, &Module)> = node
            .nodes
            .iter()
            .filter(|child| child.is_module_position())
            .map(|child| scope.index.realized_module(child).map(|module| (child, module)))
            .collect::<MappingResult<_>>()?;

        let mut seen = HashSet::new();
        let mut properties = Vec::new();
        for (_, module) in &positions {
            for relation in &module.property_relations {
                if seen.insert(relation.property_uid.as_str()) {
                    properties.push(scope.index.property_by_uid(&relation.property_uid)?);
                }
            }
        }

        Ok(properties
            .into_iter()
            .map(|property| {
                let aggregate_list = if property.unifier {
                    positions
                        .iter()
                        .filter(|(_, module)| module.has_property(&property.uid))
                        .map(|(child, _)| AggregateEntry::feature(self.naming.position_name_from_node(child), self.naming.feature_name(&property.name)))
                        .collect()
                } else {
                    Vec::new()
                };
                self.technical_attribute(property, property.unifier, aggregate_list)
            })
            .collect())
    }

    fn case_attributes(&self, node: &Node, scope: MappingScope<'_>) -> MappingResult<Vec<Attribute>> {
        node.nodes
            .iter()
            .flat_map(|child| &child.cases)
            .flat_map(|case| &case.property_relations)
            .map(|relation| scope.index.property_by_uid(&relation.property_uid).map(|property| self.technical_attribute(property, true, Vec::new())))
            .collect()
    }

    fn quantity_control_attributes(&self, node: &Node, scope: MappingScope<'_>) -> MappingResult<Vec<Attribute>> {
        node.nodes
            .iter()
            .filter(|child| child.is_variable())
            .map(|child| quantity_property(child, scope).map(|property| self.technical_attribute(property, true, Vec::new())))
            .collect()
    }

    fn prune_attribute(&self) -> Attribute {
        Attribute {
            name: self.naming.prune_attribute_name.clone(),
            description: None,
            domain: NamedRef::new("Boolean"),
            io: true,
            aggregation_strategy: AggregationStrategy::None,
            aggregate_list: Vec::new(),
            category: NamedRef::new(&self.naming.technical_category_name),
        }
    }

    fn upward_attributes(&self, child_assemblies: &[&Assembly]) -> Vec<Attribute> {
        let mut attributes = Vec::new();
        for assembly in child_assemblies {
            let position = self.naming.assembly_to_position_name(&assembly.name);
            for attribute in assembly.attributes.iter().filter(|a| a.io && a.name != self.naming.prune_attribute_name) {
                attributes.push(Attribute {
                    aggregation_strategy: AggregationStrategy::Equal,
                    aggregate_list: vec![AggregateEntry::attribute(position.clone(), attribute.name.clone())],
                    category: NamedRef::new(&self.naming.technical_category_name),
                    ..attribute.clone()
                });
            }
        }
        attributes
    }

    /// Move every attribute shown in a configurator tab into that tab's category
    fn categorize(&self, attributes: &mut [Attribute], scope: MappingScope<'_>) -> MappingResult<()> {
        for tab in scope.index.intent().tabs() {
            let category = self.naming.category_name(&tab.name);
            for property_uid in tab.field_property_uids() {
                let property = scope.index.property_by_uid(property_uid)?;
                let name = self.naming.attribute_name(&property.name);
                let attribute = attributes.iter_mut().find(|attribute| attribute.name == name).ok_or_else(|| MappingError::UncategorizedAttribute {
                    attribute: name.clone(),
                    category: category.clone(),
                })?;
                attribute.category = NamedRef::new(category.clone());
            }
        }
        Ok(())
    }
}

/// Property controlling the quantity of a variable node
pub(crate) fn quantity_property<'a>(node: &Node, scope: MappingScope<'a>) -> MappingResult<&'a Property> {
    let missing = || MappingError::MissingQuantityControl {
        node: node.uid.clone(),
        uid: node.qty_property_uid.clone(),
    };
    let uid = node.qty_property_uid.as_deref().ok_or_else(missing)?;
    scope.index.property_by_uid(uid).map_err(|_| missing())
}

/// Merge attributes sharing a name, sorted by name
///
/// The first attribute of a group supplies every field except the aggregate
/// list, which becomes the duplicate-free union of the whole group. The
/// strategy is `Equal` exactly when that union is non-empty.
pub fn group_attributes(attributes: Vec<Attribute>) -> Vec<Attribute> {
    let mut groups: BTreeMap<String, Attribute> = BTreeMap::new();

    for mut attribute in attributes {
        let entries = std::mem::take(&mut attribute.aggregate_list);
        let group = groups.entry(attribute.name.clone()).or_insert(attribute);
        for entry in entries {
            if !group.aggregate_list.contains(&entry) {
                group.aggregate_list.push(entry);
            }
        }
    }

    groups
        .into_values()
        .map(|mut attribute| {
            attribute.aggregation_strategy = if attribute.aggregate_list.is_empty() { AggregationStrategy::None } else { AggregationStrategy::Equal };
            attribute
        })
        .collect()
}
