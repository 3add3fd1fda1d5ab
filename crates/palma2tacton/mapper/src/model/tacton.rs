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

//! Tacton output model
//!
//! The shape handed to the upload collaborator. Serialized in camelCase with
//! absent optionals omitted.

use serde::{Deserialize, Serialize};

/// Complete mapping result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TactonModel {
    pub domains: Vec<Domain>,
    pub categories: Vec<Category>,
    pub global_features: Vec<GlobalFeature>,
    pub modules: Vec<Module>,
    pub assemblies: Vec<Assembly>,
}

impl TactonModel {
    pub fn assembly(&self, name: &str) -> Option<&Assembly> {
        self.assemblies.iter().find(|assembly| assembly.name == name)
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|module| module.name == name)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Reference to another entity by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

impl NamedRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainType {
    Enum,
    Boolean,
    Integer,
    Float,
    String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub domain_type: DomainType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_element_list: Option<Vec<EnumElement>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_yes: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_no: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integer_range: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float_range: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<DomainType>,
}

impl Domain {
    /// A domain with no type-specific payload
    pub fn new(name: impl Into<String>, description: impl Into<String>, domain_type: DomainType) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            domain_type,
            enum_element_list: None,
            boolean_yes: None,
            boolean_no: None,
            integer_range: None,
            float_range: None,
            value_type: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumElement {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<serde_json::Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalFeature {
    pub name: String,
    pub description: String,
    pub domain: NamedRef,
    pub initial_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub description: String,
    pub features: Vec<Feature>,
    pub variants: Vec<Variant>,
}

impl Module {
    pub fn has_feature(&self, name: &str) -> bool {
        self.features.iter().any(|feature| feature.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub description: String,
    pub domain: NamedRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub description: String,
    pub values: Vec<FeatureValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureValue {
    pub feature: NamedRef,
    pub value: String,
}

impl FeatureValue {
    pub fn new(feature: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            feature: NamedRef::new(feature),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assembly {
    pub name: String,
    pub description: String,
    pub attributes: Vec<Attribute>,
    pub positions: Vec<Position>,
    pub rules: Vec<Rule>,
    pub variant_enabled: bool,
    pub virtual_variant: Variant,
}

impl Assembly {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    pub fn position(&self, name: &str) -> Option<&Position> {
        self.positions.iter().find(|position| position.name == name)
    }

    /// Constraint texts, in rule order
    pub fn constraints(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().filter_map(|rule| match rule {
            Rule::Constraint { constraint, .. } => Some(constraint.as_str()),
            Rule::Combination { .. } => None,
        })
    }
}

/// A slot filled by a module or a sub-assembly, never both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assembly: Option<NamedRef>,
    pub qty_min: u32,
    pub qty_max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AggregationStrategy {
    #[default]
    None,
    Equal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub domain: NamedRef,
    pub io: bool,
    pub aggregation_strategy: AggregationStrategy,
    pub aggregate_list: Vec<AggregateEntry>,
    pub category: NamedRef,
}

/// One position contributing to an aggregated attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub position: NamedRef,
    #[serde(flatten)]
    pub source: AggregateSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateSource {
    Attribute(NamedRef),
    Feature(NamedRef),
}

impl AggregateEntry {
    pub fn attribute(position: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            position: NamedRef::new(position),
            source: AggregateSource::Attribute(NamedRef::new(attribute)),
        }
    }

    pub fn feature(position: impl Into<String>, feature: impl Into<String>) -> Self {
        Self {
            position: NamedRef::new(position),
            source: AggregateSource::Feature(NamedRef::new(feature)),
        }
    }

    /// Name of the aggregated attribute, if this entry aggregates one
    pub fn attribute_name(&self) -> Option<&str> {
        match &self.source {
            AggregateSource::Attribute(attribute) => Some(&attribute.name),
            AggregateSource::Feature(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Rule {
    Constraint {
        #[serde(rename = "ruleGroup")]
        rule_group: String,
        constraint: String,
    },
    Combination {
        #[serde(rename = "ruleGroup")]
        rule_group: String,
        combination: Combination,
    },
}

impl Rule {
    pub fn constraint(rule_group: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::Constraint {
            rule_group: rule_group.into(),
            constraint: constraint.into(),
        }
    }

    pub fn rule_group(&self) -> &str {
        match self {
            Self::Constraint { rule_group, .. } | Self::Combination { rule_group, .. } => rule_group,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub columns: Vec<String>,
    pub rows: Vec<CombinationRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationRow {
    pub values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_aggregate_entry_shape() {
        let entry = AggregateEntry::feature("left_position", "width_feature");
        assert_eq!(serde_json::to_value(&entry).unwrap(), json!({ "position": { "name": "left_position" }, "feature": { "name": "width_feature" } }));
        assert_eq!(entry.attribute_name(), None);

        let entry = AggregateEntry::attribute("frame_position", "width_attribute");
        assert_eq!(entry.attribute_name(), Some("width_attribute"));
    }

    #[test]
    fn test_rule_is_tagged() {
        let rule = Rule::constraint("Palma (prune control)", "_prune_attribute in {No}");
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({ "type": "Constraint", "ruleGroup": "Palma (prune control)", "constraint": "_prune_attribute in {No}" })
        );
    }

    #[test]
    fn test_position_omits_absent_reference() {
        let position = Position {
            name: "door_position".into(),
            description: "Door".into(),
            module: Some(NamedRef::new("palma_door_module")),
            assembly: None,
            qty_min: 0,
            qty_max: 1,
        };
        let value = serde_json::to_value(&position).unwrap();
        assert!(value.get("assembly").is_none());
        assert_eq!(value["qtyMax"], json!(1));
    }
}
