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

//! Identifier generation
//!
//! Tacton identifiers are lower-case, with runs of characters outside
//! `[A-Za-z0-9.]` collapsed to a single underscore and a fixed suffix per
//! entity kind. Downstream imports match on these names, so the rules here
//! must stay stable.

use super::config::NamingScheme;
use crate::model::palma::{Module, Node, Property, PropertyType, Variant};
use crate::model::tacton::DomainType;
use regex::Regex;
use std::sync::LazyLock;

static SEPARATOR_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9.]+").expect("separator pattern is valid"));

/// Standardize a raw name into identifier form
///
/// The missing token is a fixed point, so standardizing twice yields the
/// same name.
pub fn standardize_name(name: &str, missing_token: &str) -> String {
    if name == missing_token {
        return name.to_string();
    }

    let name = if name.is_empty() { "-" } else { name };
    let replaced = name.replace('+', "plus").replace('<', "lt").replace('>', "gt");
    let collapsed = SEPARATOR_RUN.replace_all(&replaced, "_");
    let trimmed = collapsed.trim_end_matches('_').trim_start_matches('_');

    if trimmed.is_empty() { missing_token.to_string() } else { trimmed.to_ascii_lowercase() }
}

fn is_meaningful_code(code: &str) -> bool {
    !code.is_empty() && !code.eq_ignore_ascii_case("n/a")
}

impl NamingScheme {
    pub fn standardize(&self, name: &str) -> String {
        standardize_name(name, &self.missing_token)
    }

    pub fn domain_name(&self, name: &str) -> String {
        format!("{}{}_domain", self.prefix, self.standardize(name))
    }

    /// Domain element for a raw value; `Yes` and `No` are kept verbatim
    pub fn domain_element_name(&self, value: Option<&str>) -> String {
        match value {
            Some(value @ ("Yes" | "No")) => value.to_string(),
            Some(value) => self.standardize(value),
            None => self.standardize(""),
        }
    }

    pub fn reference_value(&self, value: &str) -> String {
        value.trim().to_string()
    }

    pub fn domain_type(&self, property: &Property) -> DomainType {
        match property.property_type {
            PropertyType::List | PropertyType::Discrete => DomainType::Enum,
            PropertyType::YesNo => DomainType::Boolean,
            PropertyType::Range if property.integer => DomainType::Integer,
            PropertyType::Range => DomainType::Float,
            PropertyType::Other => DomainType::String,
        }
    }

    pub fn module_name(&self, name: &str) -> String {
        format!("{}{}_module", self.prefix, self.standardize(name))
    }

    /// Module name including its code, when the module has a meaningful one
    pub fn module_name_from_module(&self, module: &Module) -> String {
        format!("{}{}{}_module", self.prefix, self.optional_code_part(module.code.as_deref()), self.standardize(&module.name))
    }

    pub fn feature_name(&self, name: &str) -> String {
        format!("{}_feature", self.standardize(name))
    }

    pub fn variant_name(&self, name: &str) -> String {
        format!("{}_variant", self.standardize(name))
    }

    pub fn variant_name_from_variant(&self, variant: &Variant) -> String {
        format!("{}{}_variant", self.optional_code_part(variant.code.as_deref()), self.standardize(&variant.name))
    }

    pub fn assembly_name(&self, name: &str) -> String {
        format!("{}{}_assembly", self.prefix, self.standardize(name))
    }

    pub fn assembly_name_from_node(&self, node: &Node) -> String {
        format!("{}{}{}_assembly", self.prefix, self.node_code_part(node), self.standardize(&node.name))
    }

    pub fn assembly_virtual_variant_name(&self, name: &str) -> String {
        self.variant_name(name)
    }

    pub fn position_name(&self, name: &str) -> String {
        format!("{}_position", self.standardize(name))
    }

    pub fn position_name_from_node(&self, node: &Node) -> String {
        format!("{}{}_position", self.node_code_part(node), self.standardize(&node.name))
    }

    pub fn attribute_name(&self, name: &str) -> String {
        format!("{}_attribute", self.standardize(name))
    }

    pub fn category_name(&self, name: &str) -> String {
        format!("{}{}_category", self.prefix, self.standardize(name))
    }

    /// Name of the position that holds an assembly, derived from the assembly name
    pub fn assembly_to_position_name(&self, assembly_name: &str) -> String {
        let position = match assembly_name.strip_suffix("_assembly") {
            Some(stem) => format!("{stem}_position"),
            None => assembly_name.to_string(),
        };
        if self.prefix.is_empty() { position } else { position.replacen(&self.prefix, "", 1) }
    }

    pub fn rule_group(&self, kind: &str) -> String {
        format!("{} ({kind})", self.rule_group_label)
    }

    fn optional_code_part(&self, code: Option<&str>) -> String {
        match code {
            Some(code) if is_meaningful_code(code) => format!("{}_", self.standardize(code)),
            _ => String::new(),
        }
    }

    /// Disambiguating part of node-derived names; the root has none
    fn node_code_part(&self, node: &Node) -> String {
        if node.is_root() {
            return String::new();
        }
        let code = match node.code.as_deref() {
            Some(code) if is_meaningful_code(code) => code.chars().filter(|c| !c.is_whitespace()).collect(),
            _ => node.uid.clone(),
        };
        format!("{}_", self.standardize(&code))
    }
}
