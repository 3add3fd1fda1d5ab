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

//! Domains, attribute categories and global features

use super::MappingScope;
use crate::mapper::{
    config::{MappingConfig, NamingScheme},
    error::MappingResult,
};
use crate::model::palma::Property;
use crate::model::tacton::{Category, Domain, DomainType, EnumElement, GlobalFeature, NamedRef, Range};

/// Processor for the non-recursive catalog parts of the model
pub struct CatalogProcessor {
    naming: NamingScheme,
}

impl CatalogProcessor {
    /// Create a new catalog processor
    pub fn new(config: &MappingConfig) -> MappingResult<Self> {
        Ok(Self { naming: config.naming.clone() })
    }

    /// System domains, then product domains, then the reference domain
    pub fn process_domains(&self, scope: MappingScope<'_>) -> Vec<Domain> {
        let intent = scope.index.intent();
        let mut domains: Vec<Domain> = intent.system_properties.iter().map(|property| self.system_domain(property)).collect();
        domains.extend(intent.properties.iter().map(|property| self.product_domain(property)));
        domains.push(self.reference_domain(scope));
        domains
    }

    fn system_domain(&self, property: &Property) -> Domain {
        let elements = property
            .values
            .iter()
            .map(|value| EnumElement {
                name: self.naming.domain_element_name(value.value.as_deref()),
                description: value.value.clone(),
                value: None,
            })
            .collect();

        Domain {
            enum_element_list: Some(elements),
            ..Domain::new(self.naming.domain_name(&property.name), &property.name, DomainType::Enum)
        }
    }

    fn product_domain(&self, property: &Property) -> Domain {
        let domain_type = self.naming.domain_type(property);
        let mut domain = Domain::new(self.naming.domain_name(&property.name), &property.name, domain_type);

        match domain_type {
            DomainType::Enum => {
                domain.enum_element_list = Some(
                    property
                        .values
                        .iter()
                        .map(|value| EnumElement {
                            name: self.naming.domain_element_name(value.value.as_deref()),
                            description: value.value.clone(),
                            value: if property.integer { value.value.clone() } else { None },
                        })
                        .collect(),
                );
                if property.integer {
                    domain.value_type = Some(DomainType::Integer);
                }
            }
            DomainType::Boolean => {
                domain.boolean_yes = Some(NamedRef::new("Yes"));
                domain.boolean_no = Some(NamedRef::new("No"));
            }
            DomainType::Integer => domain.integer_range = Some(first_value_range(property)),
            DomainType::Float => domain.float_range = Some(first_value_range(property)),
            DomainType::String => {}
        }
        domain
    }

    /// The none element followed by every distinct variant reference
    fn reference_domain(&self, scope: MappingScope<'_>) -> Domain {
        let mut references = vec![self.naming.none_element.clone()];
        let declared = scope.index.intent().modules.iter().flat_map(|module| &module.variants).filter_map(|variant| variant.reference.as_deref());
        for reference in declared {
            let reference = self.naming.reference_value(reference);
            if !reference.is_empty() && !references.contains(&reference) {
                references.push(reference);
            }
        }

        let elements = references.into_iter().map(|name| EnumElement { name, description: None, value: None }).collect();
        Domain {
            enum_element_list: Some(elements),
            ..Domain::new(&self.naming.reference_domain_name, &self.naming.reference_domain_description, DomainType::Enum)
        }
    }

    /// One category per configurator tab, then the technical category
    pub fn process_categories(&self, scope: MappingScope<'_>) -> Vec<Category> {
        let mut categories: Vec<Category> = scope
            .index
            .intent()
            .tabs()
            .into_iter()
            .map(|tab| Category {
                name: self.naming.category_name(&tab.name),
                description: tab.name.clone(),
            })
            .collect();
        categories.push(Category {
            name: self.naming.technical_category_name.clone(),
            description: self.naming.technical_category_description.clone(),
        });
        categories
    }

    pub fn process_global_features(&self) -> Vec<GlobalFeature> {
        vec![GlobalFeature {
            name: self.naming.reference_feature_name.clone(),
            description: self.naming.reference_feature_description.clone(),
            domain: NamedRef::new(&self.naming.reference_domain_name),
            initial_value: self.naming.unspecified_value.clone(),
        }]
    }
}

fn first_value_range(property: &Property) -> Range {
    let first = property.values.first();
    Range {
        min: first.and_then(|value| value.min_value.clone()),
        max: first.and_then(|value| value.max_value.clone()),
    }
}
