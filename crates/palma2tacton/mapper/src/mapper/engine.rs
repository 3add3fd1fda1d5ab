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

//! Mapping engine
//!
//! Runs the pipeline stages in order and assembles the complete Tacton
//! model. The caller's document is only ever borrowed.

use super::{
    config::MappingConfig,
    error::MappingResult,
    pipeline::{Indexer, InheritancePropagator, PipelineContext, PipelineStage, Translator},
    processors::{CatalogProcessor, MappingScope, ModuleProcessor},
};
use crate::checks::check_aggregations;
use crate::model::{palma::Document, tacton::TactonModel};
use crate::optimizer::AttributeOptimizer;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Mapping engine using the pipeline architecture
pub struct MappingEngine {
    config: MappingConfig,
    indexer: Indexer,
    inheritance: InheritancePropagator,
    translator: Translator,
    optimizer: AttributeOptimizer,
    catalog: CatalogProcessor,
    modules: ModuleProcessor,
    context: PipelineContext,
}

impl MappingEngine {
    /// Create a new mapping engine with the given configuration
    pub fn new(config: MappingConfig) -> MappingResult<Self> {
        config.validate()?;

        Ok(Self {
            indexer: Indexer::new(&config)?,
            inheritance: InheritancePropagator::new(&config)?,
            translator: Translator::new(&config)?,
            optimizer: AttributeOptimizer::new(&config),
            catalog: CatalogProcessor::new(&config)?,
            modules: ModuleProcessor::new(&config)?,
            context: PipelineContext::new(),
            config,
        })
    }

    /// Map a Palma document to a Tacton model
    pub fn map(&mut self, document: &Document) -> MappingResult<TactonModel> {
        self.context = PipelineContext::new();
        let config = &self.config;
        let context = &mut self.context;

        let index = run_stage(context, config, &mut self.indexer, document, |index| index.property_count() + index.module_count())?;
        let product_structure = &document.configuration_intent.product_structure;
        let inheritance = run_stage(context, config, &mut self.inheritance, product_structure.as_slice(), |inheritance| inheritance.len())?;
        let scope = MappingScope::new(&index, &inheritance);

        let mut assemblies = run_stage(context, config, &mut self.translator, scope, |assemblies| assemblies.len())?;
        if config.optimize {
            assemblies = run_stage(context, config, &mut self.optimizer, assemblies, |assemblies| assemblies.len())?;
            let stats = self.optimizer.stats();
            debug!(removed = stats.attributes_removed, kept = stats.attributes_kept, "attribute optimization");
        } else {
            context.add_warning("Skipping stage: optimize");
        }

        let start = Instant::now();
        let model = TactonModel {
            domains: self.catalog.process_domains(scope),
            categories: self.catalog.process_categories(scope),
            global_features: self.catalog.process_global_features(),
            modules: self.modules.process_modules(scope)?,
            assemblies,
        };
        context.record_stage_time("extract", start.elapsed());
        context.metrics.record_processed_items("extract", model.domains.len() + model.modules.len());

        if config.check_aggregations {
            for issue in check_aggregations(&model) {
                warn!(%issue, "inconsistent aggregation");
                context.add_warning(issue.to_string());
            }
        }

        info!(
            domains = model.domains.len(),
            modules = model.modules.len(),
            assemblies = model.assemblies.len(),
            elapsed_ms = context.total_time().as_millis() as u64,
            "mapping finished"
        );
        Ok(model)
    }

    /// Parse and map a Palma JSON document
    pub fn map_json(&mut self, json: &str) -> MappingResult<TactonModel> {
        let document = Document::from_json(json)?;
        self.map(&document)
    }

    /// Get the engine configuration
    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Get metrics and warnings of the last mapping
    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Get warnings from the last mapping
    pub fn warnings(&self) -> &[String] {
        &self.context.warnings
    }
}

fn run_stage<'a, S: PipelineStage<'a>>(
    context: &mut PipelineContext,
    config: &MappingConfig,
    stage: &mut S,
    input: S::Input,
    count: impl FnOnce(&S::Output) -> usize,
) -> MappingResult<S::Output> {
    let start = Instant::now();
    let output = stage.execute(input, config)?;
    let elapsed = start.elapsed();
    let items = count(&output);

    context.record_stage_time(stage.name(), elapsed);
    context.metrics.record_processed_items(stage.name(), items);
    info!(stage = stage.name(), items, elapsed_us = elapsed.as_micros() as u64, "stage finished");
    Ok(output)
}

/// Map a document with the default configuration
pub fn palma_to_tacton(document: &Document) -> MappingResult<TactonModel> {
    MappingEngine::new(MappingConfig::default())?.map(document)
}
