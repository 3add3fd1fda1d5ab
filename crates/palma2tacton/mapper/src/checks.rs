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

//! Aggregation consistency checks
//!
//! Every aggregate entry names a position of its own assembly and an
//! attribute or feature that the position's realizer must carry. These
//! checks find entries the upload would reject.

use crate::model::tacton::{AggregateEntry, AggregateSource, Assembly, TactonModel};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// An aggregate entry whose source cannot be found
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationIssue {
    pub assembly: String,
    pub attribute: String,
    pub entry: AggregateEntry,
    /// Module or assembly realizing the entry's position, when it resolves
    pub realized_by: Option<String>,
}

impl fmt::Display for AggregationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, name) = match &self.entry.source {
            AggregateSource::Attribute(source) => ("attribute", &source.name),
            AggregateSource::Feature(source) => ("feature", &source.name),
        };
        write!(f, "{}.{} aggregates {kind} {name} over position {}", self.assembly, self.attribute, self.entry.position.name)?;
        match &self.realized_by {
            Some(realizer) => write!(f, ", which {realizer} does not provide"),
            None => write!(f, ", which cannot be resolved"),
        }
    }
}

/// Find every aggregate entry whose position realizer lacks the aggregated source
pub fn check_aggregations(model: &TactonModel) -> Vec<AggregationIssue> {
    let assemblies: HashMap<&str, &Assembly> = model.assemblies.iter().map(|assembly| (assembly.name.as_str(), assembly)).collect();
    let modules: HashMap<&str, _> = model.modules.iter().map(|module| (module.name.as_str(), module)).collect();

    let mut issues = Vec::new();
    for assembly in &model.assemblies {
        for attribute in &assembly.attributes {
            for entry in &attribute.aggregate_list {
                let realized_by = assembly.position(&entry.position.name).and_then(|position| match &entry.source {
                    AggregateSource::Attribute(_) => position.assembly.as_ref(),
                    AggregateSource::Feature(_) => position.module.as_ref(),
                });

                let provided = match (&entry.source, realized_by) {
                    (AggregateSource::Attribute(source), Some(realizer)) => assemblies.get(realizer.name.as_str()).is_some_and(|lower| lower.attribute(&source.name).is_some()),
                    (AggregateSource::Feature(source), Some(realizer)) => modules.get(realizer.name.as_str()).is_some_and(|module| module.has_feature(&source.name)),
                    (_, None) => false,
                };

                if !provided {
                    issues.push(AggregationIssue {
                        assembly: assembly.name.clone(),
                        attribute: attribute.name.clone(),
                        entry: entry.clone(),
                        realized_by: realized_by.map(|realizer| realizer.name.clone()),
                    });
                }
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model() -> TactonModel {
        serde_json::from_value(json!({
            "domains": [],
            "categories": [],
            "globalFeatures": [],
            "modules": [{
                "name": "palma_knob_module",
                "description": "Knob",
                "features": [{ "name": "color_feature", "description": "Color", "domain": { "name": "palma_color_domain" } }],
                "variants": []
            }],
            "assemblies": [
                {
                    "name": "palma_top_assembly",
                    "description": "Top",
                    "attributes": [{
                        "name": "color_attribute",
                        "domain": { "name": "palma_color_domain" },
                        "io": true,
                        "aggregationStrategy": "Equal",
                        "aggregateList": [
                            { "position": { "name": "knob_position" }, "feature": { "name": "color_feature" } },
                            { "position": { "name": "knob_position" }, "feature": { "name": "size_feature" } },
                            { "position": { "name": "body_position" }, "attribute": { "name": "color_attribute" } },
                            { "position": { "name": "ghost_position" }, "attribute": { "name": "color_attribute" } }
                        ],
                        "category": { "name": "palma_remaining_attributes_category" }
                    }],
                    "positions": [
                        { "name": "knob_position", "description": "Knob", "module": { "name": "palma_knob_module" }, "qtyMin": 1, "qtyMax": 1 },
                        { "name": "body_position", "description": "Body", "assembly": { "name": "palma_body_assembly" }, "qtyMin": 1, "qtyMax": 1 }
                    ],
                    "rules": [],
                    "variantEnabled": true,
                    "virtualVariant": { "name": "top_variant", "description": "Top", "values": [] }
                },
                {
                    "name": "palma_body_assembly",
                    "description": "Body",
                    "attributes": [],
                    "positions": [],
                    "rules": [],
                    "variantEnabled": true,
                    "virtualVariant": { "name": "body_variant", "description": "Body", "values": [] }
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_reports_missing_sources() {
        let issues = check_aggregations(&model());
        assert_eq!(issues.len(), 3);

        assert_eq!(issues[0].entry, AggregateEntry::feature("knob_position", "size_feature"));
        assert_eq!(issues[0].realized_by.as_deref(), Some("palma_knob_module"));

        assert_eq!(issues[1].entry, AggregateEntry::attribute("body_position", "color_attribute"));
        assert_eq!(issues[1].realized_by.as_deref(), Some("palma_body_assembly"));

        assert_eq!(issues[2].realized_by, None);
        assert!(issues[2].to_string().ends_with("cannot be resolved"));
    }

    #[test]
    fn test_consistent_model_has_no_issues() {
        let mut model = model();
        let top = &mut model.assemblies[0];
        top.attributes[0].aggregate_list.truncate(1);
        assert!(check_aggregations(&model).is_empty());
    }

    #[test]
    fn test_issue_message() {
        let issues = check_aggregations(&model());
        assert_eq!(
            issues[0].to_string(),
            "palma_top_assembly.color_attribute aggregates feature size_feature over position knob_position, which palma_knob_module does not provide"
        );
    }
}
