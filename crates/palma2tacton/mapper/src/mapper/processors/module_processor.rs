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

//! Module and variant extraction

use super::MappingScope;
use crate::mapper::{
    config::{MappingConfig, NamingScheme},
    error::MappingResult,
};
use crate::model::palma;
use crate::model::tacton::{Feature, FeatureValue, Module, NamedRef, Variant};

/// Processor for modules
pub struct ModuleProcessor {
    naming: NamingScheme,
}

impl ModuleProcessor {
    /// Create a new module processor
    pub fn new(config: &MappingConfig) -> MappingResult<Self> {
        Ok(Self { naming: config.naming.clone() })
    }

    pub fn process_modules(&self, scope: MappingScope<'_>) -> MappingResult<Vec<Module>> {
        scope.index.intent().modules.iter().map(|module| self.process_module(module, scope)).collect()
    }

    pub fn process_module(&self, module: &palma::Module, scope: MappingScope<'_>) -> MappingResult<Module> {
        let mut features = Vec::with_capacity(module.property_relations.len());
        for relation in &module.property_relations {
            let property = scope.index.property_by_uid(&relation.property_uid)?;
            features.push(Feature {
                name: self.naming.feature_name(&property.name),
                description: property.name.clone(),
                domain: NamedRef::new(self.naming.domain_name(&property.name)),
            });
        }

        let mut variants = vec![self.none_variant(&features)];
        for variant in &module.variants {
            variants.push(self.process_variant(variant, module, &features, scope)?);
        }

        Ok(Module {
            name: self.naming.module_name_from_module(module),
            description: module.name.clone(),
            features,
            variants,
        })
    }

    /// Synthetic variant standing for "not installed"
    fn none_variant(&self, features: &[Feature]) -> Variant {
        let mut values: Vec<FeatureValue> = features.iter().map(|feature| FeatureValue::new(&feature.name, &self.naming.unspecified_value)).collect();
        values.push(FeatureValue::new(&self.naming.reference_feature_name, &self.naming.unspecified_value));
        values.push(FeatureValue::new(&self.naming.non_standard_feature_name, &self.naming.unspecified_value));

        Variant {
            name: self.naming.none_variant_name.clone(),
            description: self.naming.none_variant_description.clone(),
            values,
        }
    }

    fn process_variant(&self, variant: &palma::Variant, module: &palma::Module, features: &[Feature], scope: MappingScope<'_>) -> MappingResult<Variant> {
        let mut values = Vec::new();

        for relation in &variant.property_relations {
            let property = scope.index.property_by_uid(&relation.property_uid)?;
            let value = relation
                .value_relations
                .iter()
                .map(|value| match value.value.as_deref() {
                    Some(text) if !text.is_empty() => self.naming.domain_element_name(Some(text)),
                    _ => self.naming.unspecified_value.clone(),
                })
                .collect::<Vec<_>>()
                .join(";");
            let value = if value.is_empty() { self.naming.unspecified_value.clone() } else { value };
            values.push(FeatureValue::new(self.naming.feature_name(&property.name), value));
        }

        let mentioned = |uid: &str| variant.property_relations.iter().any(|relation| relation.property_uid == uid);
        for (relation, feature) in module.property_relations.iter().zip(features) {
            if !mentioned(&relation.property_uid) {
                values.push(FeatureValue::new(&feature.name, &self.naming.unspecified_value));
            }
        }

        let reference = variant.reference.as_deref().map(|reference| self.naming.reference_value(reference)).filter(|reference| !reference.is_empty());
        values.push(FeatureValue::new(&self.naming.reference_feature_name, reference.unwrap_or_else(|| self.naming.none_element.clone())));
        values.push(FeatureValue::new(&self.naming.non_standard_feature_name, &self.naming.unspecified_value));

        Ok(Variant {
            name: self.naming.variant_name_from_variant(variant),
            description: variant.name.clone(),
            values,
        })
    }
}
