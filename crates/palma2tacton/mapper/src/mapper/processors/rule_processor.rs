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

//! Rule synthesis
//!
//! Produces the constraint texts and combination tables of one assembly.
//! Rules appear in a fixed order: combination tables, variable quantities,
//! case quantities, none variants, prune control.

use super::MappingScope;
use super::attribute_processor::quantity_property;
use crate::mapper::{
    config::{MappingConfig, NamingScheme},
    error::MappingResult,
};
use crate::model::palma::{Case, Module, Node, Property};
use crate::model::tacton::{Combination, CombinationRow, Rule};

const COMBINATIONS: &str = "combinations";
const VARIABLE_QTY: &str = "variable qty";
const CASES_QTY: &str = "cases qty";
const NONE_VARIANTS: &str = "none variants";
const PRUNE_CONTROL: &str = "prune control";

/// Processor for assembly rules
pub struct RuleProcessor {
    naming: NamingScheme,
}

impl RuleProcessor {
    /// Create a new rule processor
    pub fn new(config: &MappingConfig) -> MappingResult<Self> {
        Ok(Self { naming: config.naming.clone() })
    }

    /// Rules of the assembly built for `node`
    pub fn process_rules(&self, node: &Node, scope: MappingScope<'_>) -> MappingResult<Vec<Rule>> {
        let mut rules = Vec::new();

        if node.is_root() {
            rules.extend(self.combination_rules(scope)?);
        }

        let group = self.naming.rule_group(VARIABLE_QTY);
        for child in node.nodes.iter().filter(|child| child.is_variable()) {
            rules.push(Rule::constraint(&group, self.variable_quantity_constraint(child, scope)?));
        }

        let group = self.naming.rule_group(CASES_QTY);
        for child in node.nodes.iter().filter(|child| child.has_cases() && !child.variable) {
            for constraint in self.case_constraints(child, scope)? {
                rules.push(Rule::constraint(&group, constraint));
            }
        }

        let group = self.naming.rule_group(NONE_VARIANTS);
        for child in node.nodes.iter().filter(|child| child.is_module_position() && scope.inheritance.is_optional(child)) {
            let position = self.naming.position_name_from_node(child);
            rules.push(Rule::constraint(&group, format!("{position}.variant in {{{}}}<->{position}.qty=0", self.naming.none_variant_name)));
        }

        let group = self.naming.rule_group(PRUNE_CONTROL);
        for constraint in self.optionality_constraints(node, scope) {
            rules.push(Rule::constraint(&group, constraint));
        }

        Ok(rules)
    }

    fn variable_quantity_constraint(&self, node: &Node, scope: MappingScope<'_>) -> MappingResult<String> {
        let property = quantity_property(node, scope)?;
        let position = self.naming.position_name_from_node(node);
        Ok(format!("{position}.qty=0 or {position}.qty={}.number", self.naming.attribute_name(&property.name)))
    }

    /// One constraint per case that has at least one valued property relation
    pub fn case_constraints(&self, node: &Node, scope: MappingScope<'_>) -> MappingResult<Vec<String>> {
        let module = if node.is_module_position() { Some(scope.index.realized_module(node)?) } else { None };
        let position = self.naming.position_name_from_node(node);

        let mut constraints = Vec::new();
        for case in &node.cases {
            if let Some(conditions) = self.case_conditions(case, &position, module, scope)? {
                constraints.push(format!("({} in {{No}} and {conditions})->{position}.qty={}", self.naming.prune_attribute_name, case.quantity));
            }
        }
        Ok(constraints)
    }

    fn case_conditions(&self, case: &Case, position: &str, module: Option<&Module>, scope: MappingScope<'_>) -> MappingResult<Option<String>> {
        let mut terms = Vec::new();
        for relation in case.property_relations.iter().filter(|relation| !relation.value_relations.is_empty()) {
            let property = scope.index.property_by_uid(&relation.property_uid)?;
            let subject = if module.is_some_and(|module| module.has_property(&relation.property_uid)) {
                format!("{position}.{}", self.naming.feature_name(&property.name))
            } else {
                self.naming.attribute_name(&property.name)
            };
            // An absent value standardizes to the missing token and is kept in the text
            let values: Vec<String> = relation.value_relations.iter().map(|value| self.naming.domain_element_name(value.value.as_deref())).collect();
            terms.push(format!("{subject} in {{{}}}", values.join(",")));
        }
        Ok((!terms.is_empty()).then(|| terms.join(" and ")))
    }

    /// Prune-control constraints for every position child of `node`
    pub fn optionality_constraints(&self, node: &Node, scope: MappingScope<'_>) -> Vec<String> {
        let prune = &self.naming.prune_attribute_name;
        let mut constraints = Vec::new();

        for child in node.nodes.iter().filter(|child| child.is_position()) {
            let position = self.naming.position_name_from_node(child);
            let operator = if child.optional || child.variable { "->" } else { "<->" };
            constraints.push(format!("{prune} in {{Yes}}{operator}{position}.qty=0"));

            let fixed = !child.is_variable() && !child.has_cases() && !scope.inheritance.is_optional(child);
            if fixed {
                constraints.push(format!("{prune} in {{No}}<->{position}.qty={}", child.quantity));
            }
            if child.is_assembly_position() {
                constraints.push(format!("{position}.{prune} in {{Yes}}<->{position}.qty=0"));
            }
        }

        if scope.inheritance.is_root(node) {
            constraints.push(format!("{prune} in {{No}}"));
        }
        constraints
    }

    /// Combination tables for system properties that declare related properties
    pub fn combination_rules(&self, scope: MappingScope<'_>) -> MappingResult<Vec<Rule>> {
        let group = self.naming.rule_group(COMBINATIONS);
        scope
            .index
            .intent()
            .system_properties
            .iter()
            .filter(|property| !property.property_relations.is_empty())
            .map(|property| {
                Ok(Rule::Combination {
                    rule_group: group.clone(),
                    combination: self.combination(property, scope)?,
                })
            })
            .collect()
    }

    fn combination(&self, property: &Property, scope: MappingScope<'_>) -> MappingResult<Combination> {
        let mut columns = vec![self.naming.attribute_name(&scope.index.property_by_uid(&property.uid)?.name)];
        for relation in &property.property_relations {
            columns.push(self.naming.attribute_name(&scope.index.property_by_uid(&relation.property_uid)?.name));
        }

        let rows = property
            .values
            .iter()
            .map(|value| {
                let mut values = vec![self.naming.domain_element_name(value.value.as_deref())];
                for relation in &property.property_relations {
                    let related = value
                        .property_relations
                        .iter()
                        .find(|candidate| candidate.property_uid == relation.property_uid)
                        .map(|related| {
                            related
                                .value_relations
                                .iter()
                                .map(|value| match value.value.as_deref() {
                                    Some(text) if !text.is_empty() => self.naming.domain_element_name(Some(text)),
                                    _ => self.naming.unspecified_value.clone(),
                                })
                                .collect::<Vec<_>>()
                                .join(";")
                        })
                        .filter(|joined| !joined.is_empty());
                    values.push(related.unwrap_or_else(|| self.naming.unspecified_value.clone()));
                }
                CombinationRow { values }
            })
            .collect();

        Ok(Combination { columns, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::pipeline::{InheritanceContext, InputIndex};
    use crate::model::palma::Document;
    use serde_json::json;

    fn rules_for(document: &Document, select: impl Fn(&[Node]) -> &Node) -> MappingResult<Vec<Rule>> {
        let index = InputIndex::new(document);
        let inheritance = InheritanceContext::build(&document.configuration_intent.product_structure);
        let processor = RuleProcessor::new(&MappingConfig::default())?;
        processor.process_rules(select(&document.configuration_intent.product_structure), MappingScope::new(&index, &inheritance))
    }

    fn constraints(rules: &[Rule], group: &str) -> Vec<String> {
        rules
            .iter()
            .filter_map(|rule| match rule {
                Rule::Constraint { rule_group, constraint } if rule_group == group => Some(constraint.clone()),
                _ => None,
            })
            .collect()
    }

    fn product() -> Document {
        Document::from_value(json!({
            "configurationIntent": {
                "productStructure": [{
                    "type": "Root",
                    "uid": "root",
                    "name": "Product",
                    "nodes": [
                        { "type": "ModuleInstanceNode", "uid": "d", "code": "D", "name": "Door", "realization": "door", "quantity": 2 },
                        { "type": "ModuleInstanceNode", "uid": "h", "code": "H", "name": "Handle", "realization": "handle", "optional": true },
                        { "type": "ModuleInstanceNode", "uid": "s", "code": "S", "name": "Shelf", "realization": "shelf",
                          "variable": true, "qtyPropertyUid": "shelves" },
                        { "type": "ModuleInstanceNode", "uid": "l", "code": "L", "name": "Leg", "realization": "leg",
                          "cases": [
                              { "quantity": 4, "propertyRelations": [
                                  { "propertyUid": "height", "valueRelations": [{ "value": "Tall" }, { "value": "Extra Tall" }] },
                                  { "propertyUid": "finish", "valueRelations": [{ "value": "Oak" }] }
                              ]},
                              { "quantity": 3, "propertyRelations": [{ "propertyUid": "height", "valueRelations": [] }] },
                              { "quantity": 2, "propertyRelations": [{ "propertyUid": "height", "valueRelations": [{}] }] }
                          ]},
                        { "type": "ModuleSetNode", "uid": "f", "code": "F", "name": "Frame", "nodes": [
                            { "type": "ModuleInstanceNode", "uid": "p", "code": "P", "name": "Panel", "realization": "door", "quantity": 1 }
                        ]}
                    ]
                }],
                "properties": [
                    { "uid": "height", "name": "Height" },
                    { "uid": "finish", "name": "Finish" },
                    { "uid": "shelves", "name": "Shelves" }
                ],
                "modules": [
                    { "uid": "door", "name": "Door" },
                    { "uid": "handle", "name": "Handle" },
                    { "uid": "shelf", "name": "Shelf" },
                    { "uid": "leg", "name": "Leg", "propertyRelations": [{ "propertyUid": "finish" }] }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_rule_order() {
        let document = product();
        let rules = rules_for(&document, |forest| &forest[0]).unwrap();
        let groups: Vec<_> = rules.iter().map(Rule::rule_group).collect();
        let first_of = |group: &str| groups.iter().position(|g| *g == group).unwrap();

        assert!(first_of("Palma (variable qty)") < first_of("Palma (cases qty)"));
        assert!(first_of("Palma (cases qty)") < first_of("Palma (none variants)"));
        assert!(first_of("Palma (none variants)") < first_of("Palma (prune control)"));
    }

    #[test]
    fn test_variable_quantity_rule() {
        let document = product();
        let rules = rules_for(&document, |forest| &forest[0]).unwrap();
        assert_eq!(constraints(&rules, "Palma (variable qty)"), vec!["s_shelf_position.qty=0 or s_shelf_position.qty=shelves_attribute.number"]);
    }

    #[test]
    fn test_case_rules() {
        let document = product();
        let rules = rules_for(&document, |forest| &forest[0]).unwrap();
        assert_eq!(
            constraints(&rules, "Palma (cases qty)"),
            vec![
                "(_prune_attribute in {No} and height_attribute in {tall,extra_tall} and l_leg_position.finish_feature in {oak})->l_leg_position.qty=4",
                "(_prune_attribute in {No} and height_attribute in {_missing})->l_leg_position.qty=2",
            ]
        );
    }

    #[test]
    fn test_none_variant_rule() {
        let document = product();
        let rules = rules_for(&document, |forest| &forest[0]).unwrap();
        assert_eq!(constraints(&rules, "Palma (none variants)"), vec!["h_handle_position.variant in {none}<->h_handle_position.qty=0"]);
    }

    #[test]
    fn test_optionality_rules_at_root() {
        let document = product();
        let rules = rules_for(&document, |forest| &forest[0]).unwrap();
        assert_eq!(
            constraints(&rules, "Palma (prune control)"),
            vec![
                "_prune_attribute in {Yes}<->d_door_position.qty=0",
                "_prune_attribute in {No}<->d_door_position.qty=2",
                "_prune_attribute in {Yes}->h_handle_position.qty=0",
                "_prune_attribute in {Yes}->s_shelf_position.qty=0",
                "_prune_attribute in {Yes}<->l_leg_position.qty=0",
                "_prune_attribute in {Yes}<->f_frame_position.qty=0",
                "_prune_attribute in {No}<->f_frame_position.qty=0",
                "f_frame_position._prune_attribute in {Yes}<->f_frame_position.qty=0",
                "_prune_attribute in {No}",
            ]
        );
    }

    #[test]
    fn test_nested_node_is_not_root() {
        let document = product();
        let rules = rules_for(&document, |forest| &forest[0].nodes[4]).unwrap();
        assert_eq!(
            constraints(&rules, "Palma (prune control)"),
            vec!["_prune_attribute in {Yes}<->p_panel_position.qty=0", "_prune_attribute in {No}<->p_panel_position.qty=1"]
        );
    }

    #[test]
    fn test_inherited_optional_suppresses_fixed_rule() {
        let document = Document::from_value(json!({
            "configurationIntent": {
                "productStructure": [{ "type": "Root", "nodes": [
                    { "type": "ModuleSetNode", "uid": "o", "code": "O", "name": "Options", "optional": true, "nodes": [
                        { "type": "ModuleInstanceNode", "uid": "x", "code": "X", "name": "Extra", "realization": "m", "quantity": 1 }
                    ]}
                ]}],
                "modules": [{ "uid": "m", "name": "Extra" }]
            }
        }))
        .unwrap();
        let rules = rules_for(&document, |forest| &forest[0].nodes[0]).unwrap();

        assert_eq!(constraints(&rules, "Palma (none variants)"), vec!["x_extra_position.variant in {none}<->x_extra_position.qty=0"]);
        assert_eq!(constraints(&rules, "Palma (prune control)"), vec!["_prune_attribute in {Yes}<->x_extra_position.qty=0"]);
    }

    #[test]
    fn test_combination_table() {
        let document = Document::from_value(json!({
            "configurationIntent": {
                "productStructure": [{ "type": "Root", "name": "Product" }],
                "properties": [{ "uid": "voltage", "name": "Voltage" }, { "uid": "plug", "name": "Plug" }],
                "systemProperties": [
                    {
                        "uid": "market",
                        "name": "Market",
                        "propertyRelations": [{ "propertyUid": "voltage" }, { "propertyUid": "plug" }],
                        "values": [
                            { "value": "EU", "propertyRelations": [
                                { "propertyUid": "voltage", "valueRelations": [{ "value": 230 }] },
                                { "propertyUid": "plug", "valueRelations": [{ "value": "Type C" }, { "value": "Type F" }] }
                            ]},
                            { "value": "US", "propertyRelations": [
                                { "propertyUid": "voltage", "valueRelations": [{ "value": "" }] }
                            ]}
                        ]
                    },
                    { "uid": "lang", "name": "Language", "values": [{ "value": "EN" }] }
                ]
            }
        }))
        .unwrap();
        let rules = rules_for(&document, |forest| &forest[0]).unwrap();

        let combinations: Vec<_> = rules
            .iter()
            .filter_map(|rule| match rule {
                Rule::Combination { rule_group, combination } => Some((rule_group.as_str(), combination)),
                Rule::Constraint { .. } => None,
            })
            .collect();
        assert_eq!(combinations.len(), 1);

        let (group, table) = combinations[0];
        assert_eq!(group, "Palma (combinations)");
        assert_eq!(table.columns, vec!["market_attribute", "voltage_attribute", "plug_attribute"]);
        assert_eq!(table.rows[0].values, vec!["eu", "230", "type_c;type_f"]);
        assert_eq!(table.rows[1].values, vec!["us", "unspecified", "unspecified"]);
        assert!(matches!(rules[0], Rule::Combination { .. }));
    }
}
