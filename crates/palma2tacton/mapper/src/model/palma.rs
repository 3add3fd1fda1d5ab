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

//! Palma input model
//!
//! A Palma export describes a product as a tree of nodes. Assembly nodes
//! group positions, module-position nodes realize a [`Module`], and cases
//! attach quantity scenarios to a node.

use super::de::{null_as_default, opt_string_or_number};
use serde::Deserialize;

/// Root of a Palma export
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub configuration_intent: ConfigurationIntent,
}

impl Document {
    /// Parse a document from its JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a document from a JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationIntent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_structure: Vec<Node>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Vec<Property>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub system_properties: Vec<Property>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub modules: Vec<Module>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub configurator_user_interface: Vec<UiNode>,
}

impl ConfigurationIntent {
    /// Configurator tabs in pre-order, nested tabs included
    pub fn tabs(&self) -> Vec<&UiNode> {
        let mut tabs = Vec::new();
        collect_ui_nodes(&self.configurator_user_interface, &mut |node| node.is_tab(), &mut tabs);
        tabs
    }
}

/// Kind of a product-structure node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum NodeType {
    Root,
    ModuleSetNode,
    LibraryInstanceNode,
    ModuleInstanceNode,
    #[default]
    #[serde(other)]
    Other,
}

/// A node of the product structure tree
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<Node>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cases: Vec<Case>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_relations: Vec<PropertyRelation>,
    /// UID of the realized module, set on module-position nodes only
    #[serde(default)]
    pub realization: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub optional: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variable: bool,
    #[serde(default)]
    pub qty_property_uid: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: u32,
}

impl Node {
    pub fn is_root(&self) -> bool {
        self.node_type == NodeType::Root
    }

    /// A position filled by a sub-assembly
    pub fn is_assembly_position(&self) -> bool {
        matches!(self.node_type, NodeType::ModuleSetNode | NodeType::LibraryInstanceNode)
    }

    /// A position filled by a module
    pub fn is_module_position(&self) -> bool {
        self.node_type == NodeType::ModuleInstanceNode
    }

    pub fn is_position(&self) -> bool {
        self.is_assembly_position() || self.is_module_position()
    }

    /// Nodes that produce an assembly of their own
    pub fn is_assembly(&self) -> bool {
        self.is_root() || self.is_assembly_position()
    }

    pub fn has_cases(&self) -> bool {
        !self.cases.is_empty()
    }

    /// Variable quantity needs both the flag and a controlling property
    pub fn is_variable(&self) -> bool {
        self.variable && self.qty_property_uid.is_some()
    }
}

/// A quantity scenario of a node
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_relations: Vec<PropertyRelation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRelation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value_relations: Vec<ValueRelation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValueRelation {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PropertyType {
    #[serde(rename = "LIST")]
    List,
    #[serde(rename = "DISCRETE")]
    Discrete,
    #[serde(rename = "YESNO")]
    YesNo,
    #[serde(rename = "RANGE")]
    Range,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub integer: bool,
    /// Aggregates across sibling module positions
    #[serde(default, deserialize_with = "null_as_default")]
    pub unifier: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<PropertyValue>,
    /// Dependent properties, used for combination tables
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_relations: Vec<PropertyRelation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValue {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub value: Option<String>,
    #[serde(default)]
    pub min_value: Option<serde_json::Number>,
    #[serde(default)]
    pub max_value: Option<serde_json::Number>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_relations: Vec<PropertyRelation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Properties exposed as features
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_relations: Vec<PropertyRelation>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variants: Vec<Variant>,
}

impl Module {
    pub fn has_property(&self, property_uid: &str) -> bool {
        self.property_relations.iter().any(|relation| relation.property_uid == property_uid)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_relations: Vec<PropertyRelation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum UiNodeType {
    ConfiguratorTab,
    ConfiguratorField,
    #[default]
    #[serde(other)]
    Other,
}

/// A node of the configurator user interface tree
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiNode {
    #[serde(rename = "type", default)]
    pub node_type: UiNodeType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<UiNode>,
    #[serde(default)]
    pub content: Option<UiContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiContent {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub content_type: String,
    #[serde(default)]
    pub property_uid: Option<String>,
}

impl UiNode {
    pub fn is_tab(&self) -> bool {
        self.node_type == UiNodeType::ConfiguratorTab
    }

    /// Property UID shown by this node, if it is a property field
    pub fn field_property_uid(&self) -> Option<&str> {
        if self.node_type != UiNodeType::ConfiguratorField {
            return None;
        }
        let content = self.content.as_ref()?;
        if content.content_type != "Property" {
            return None;
        }
        content.property_uid.as_deref()
    }

    /// Property UIDs of every field below this node, in pre-order
    pub fn field_property_uids(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        collect_ui_nodes(&self.nodes, &mut |node| node.field_property_uid().is_some(), &mut fields);
        fields.into_iter().filter_map(UiNode::field_property_uid).collect()
    }
}

fn collect_ui_nodes<'a>(nodes: &'a [UiNode], accept: &mut impl FnMut(&UiNode) -> bool, into: &mut Vec<&'a UiNode>) {
    for node in nodes {
        if accept(node) {
            into.push(node);
        }
        collect_ui_nodes(&node.nodes, accept, into);
    }
}
