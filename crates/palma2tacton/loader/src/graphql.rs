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

//! GraphQL documents for the configurator import API

use crate::error::LoadResult;
use palma2tacton_mapper::model::tacton::{Assembly, Category, Domain, GlobalFeature, Module};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

const UPSERT_DOMAINS: &str = r#"mutation($domains: [DomainInput]!) {
    upsertDomains(domains: $domains) {
        id
    }
}"#;

const UPSERT_ATTRIBUTE_CATEGORIES: &str = r#"mutation($categories: [AssemblyAttributeCategoryInput]!) {
    upsertAttributeCategories(categories: $categories) {
        name
    }
}"#;

const UPSERT_GLOBAL_FEATURES: &str = r#"mutation($globalFeatures: [FeatureInput]!) {
    upsertGlobalFeatures(features: $globalFeatures) {
        id
    }
}"#;

const UPSERT_MODULES: &str = r#"mutation($modules: [ModuleInput]!) {
    upsertModules(modules: $modules) {
        id
    }
}"#;

const UPSERT_MODULES_ASYNC: &str = r#"mutation($modules: [ModuleInput]!) {
    upsertModulesAsync(modules: $modules)
}"#;

const UPSERT_ASSEMBLIES: &str = r#"mutation($assemblies: [AssemblyInput]!) {
    upsertAssemblies(assemblies: $assemblies) {
        id
    }
}"#;

const JOB: &str = r#"query($id: ID!) {
    job(id: $id) {
        id
        status
        error
    }
}"#;

/// Operations of the import API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    UpsertDomains,
    UpsertAttributeCategories,
    UpsertGlobalFeatures,
    UpsertModules,
    UpsertModulesAsync,
    UpsertAssemblies,
    Job,
}

impl Operation {
    /// Field name of the operation in the API schema
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpsertDomains => "upsertDomains",
            Self::UpsertAttributeCategories => "upsertAttributeCategories",
            Self::UpsertGlobalFeatures => "upsertGlobalFeatures",
            Self::UpsertModules => "upsertModules",
            Self::UpsertModulesAsync => "upsertModulesAsync",
            Self::UpsertAssemblies => "upsertAssemblies",
            Self::Job => "job",
        }
    }

    pub fn document(&self) -> &'static str {
        match self {
            Self::UpsertDomains => UPSERT_DOMAINS,
            Self::UpsertAttributeCategories => UPSERT_ATTRIBUTE_CATEGORIES,
            Self::UpsertGlobalFeatures => UPSERT_GLOBAL_FEATURES,
            Self::UpsertModules => UPSERT_MODULES,
            Self::UpsertModulesAsync => UPSERT_MODULES_ASYNC,
            Self::UpsertAssemblies => UPSERT_ASSEMBLIES,
            Self::Job => JOB,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request body as sent to the GraphQL endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlRequest {
    #[serde(skip)]
    pub operation: Operation,
    pub query: &'static str,
    pub variables: Value,
}

impl GraphqlRequest {
    fn new(operation: Operation, variables: Value) -> Self {
        Self {
            operation,
            query: operation.document(),
            variables,
        }
    }

    pub fn upsert_domains(domains: &[Domain]) -> LoadResult<Self> {
        Ok(Self::new(Operation::UpsertDomains, json!({ "domains": serde_json::to_value(domains)? })))
    }

    pub fn upsert_attribute_categories(categories: &[Category]) -> LoadResult<Self> {
        Ok(Self::new(Operation::UpsertAttributeCategories, json!({ "categories": serde_json::to_value(categories)? })))
    }

    pub fn upsert_global_features(features: &[GlobalFeature]) -> LoadResult<Self> {
        Ok(Self::new(Operation::UpsertGlobalFeatures, json!({ "globalFeatures": serde_json::to_value(features)? })))
    }

    pub fn upsert_modules(modules: &[Module]) -> LoadResult<Self> {
        Ok(Self::new(Operation::UpsertModules, json!({ "modules": serde_json::to_value(modules)? })))
    }

    pub fn upsert_modules_async(modules: &[Module]) -> LoadResult<Self> {
        Ok(Self::new(Operation::UpsertModulesAsync, json!({ "modules": serde_json::to_value(modules)? })))
    }

    pub fn upsert_assemblies(assemblies: &[Assembly]) -> LoadResult<Self> {
        Ok(Self::new(Operation::UpsertAssemblies, json!({ "assemblies": serde_json::to_value(assemblies)? })))
    }

    pub fn job(id: &str) -> Self {
        Self::new(Operation::Job, json!({ "id": id }))
    }

    /// Number of entities carried by an upsert, zero for queries
    pub fn entity_count(&self) -> usize {
        self.variables.as_object().and_then(|variables| variables.values().next()).and_then(Value::as_array).map_or(0, Vec::len)
    }
}
