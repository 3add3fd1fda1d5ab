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

//! Configuration for the mapping engine

use super::error::{MappingError, MappingResult};
use serde::{Deserialize, Serialize};

/// Fixed literals used when generating Tacton identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingScheme {
    /// Prefix of domain, module, assembly and category names
    pub prefix: String,
    /// Replacement for names that standardize to nothing
    pub missing_token: String,
    /// Name of the boolean attribute that gates pruning
    pub prune_attribute_name: String,
    pub technical_category_name: String,
    pub technical_category_description: String,
    pub reference_domain_name: String,
    pub reference_domain_description: String,
    /// Reference domain element meaning "no reference"
    pub none_element: String,
    pub none_variant_name: String,
    pub none_variant_description: String,
    pub reference_feature_name: String,
    pub reference_feature_description: String,
    pub non_standard_feature_name: String,
    /// Value used where no feature value is known
    pub unspecified_value: String,
    /// Upper quantity of variable positions
    pub unbounded_quantity: u32,
    pub rule_group_label: String,
}

impl Default for NamingScheme {
    fn default() -> Self {
        Self {
            prefix: "palma_".to_string(),
            missing_token: "_missing".to_string(),
            prune_attribute_name: "_prune_attribute".to_string(),
            technical_category_name: "palma_remaining_attributes_category".to_string(),
            technical_category_description: "Remaining attributes".to_string(),
            reference_domain_name: "palma_reference_domain".to_string(),
            reference_domain_description: "Reference".to_string(),
            none_element: "none".to_string(),
            none_variant_name: "none".to_string(),
            none_variant_description: "None".to_string(),
            reference_feature_name: "reference_feature".to_string(),
            reference_feature_description: "Reference".to_string(),
            non_standard_feature_name: "isNonStandard".to_string(),
            unspecified_value: "unspecified".to_string(),
            unbounded_quantity: 999_999,
            rule_group_label: "Palma".to_string(),
        }
    }
}

impl NamingScheme {
    /// Validate the scheme
    pub fn validate(&self) -> MappingResult<()> {
        let literals = [
            ("missing_token", &self.missing_token),
            ("prune_attribute_name", &self.prune_attribute_name),
            ("technical_category_name", &self.technical_category_name),
            ("reference_domain_name", &self.reference_domain_name),
            ("none_element", &self.none_element),
            ("none_variant_name", &self.none_variant_name),
            ("reference_feature_name", &self.reference_feature_name),
            ("non_standard_feature_name", &self.non_standard_feature_name),
            ("unspecified_value", &self.unspecified_value),
        ];
        if let Some((field, _)) = literals.iter().find(|(_, value)| value.is_empty()) {
            return Err(MappingError::invalid_configuration(format!("naming.{field} must not be empty")));
        }

        // Standardized names are lowercase, so an uppercase token would break idempotence
        if self.missing_token.to_lowercase() != self.missing_token {
            return Err(MappingError::invalid_configuration("naming.missing_token must be lowercase"));
        }

        if self.unbounded_quantity == 0 {
            return Err(MappingError::invalid_configuration("naming.unbounded_quantity must be greater than 0"));
        }

        Ok(())
    }
}

/// Configuration for one mapping run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub naming: NamingScheme,
    /// Drop technical attributes nothing refers to
    pub optimize: bool,
    /// Log aggregate-list entries that point at nothing
    pub check_aggregations: bool,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            naming: NamingScheme::default(),
            optimize: true,
            check_aggregations: true,
        }
    }
}

impl MappingConfig {
    /// Configuration that keeps every generated attribute
    pub fn unoptimized() -> Self {
        Self {
            optimize: false,
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> MappingResult<()> {
        self.naming.validate()
    }
}
