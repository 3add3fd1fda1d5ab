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

//! Pipeline architecture for mapping
//!
//! A mapping run passes the document through indexing, inheritance
//! propagation, translation into assemblies and attribute optimization.
//! Each step is a [`PipelineStage`] so the engine can time and log it
//! uniformly.

pub mod indexer;
pub mod inheritance;
pub mod translator;

use super::{config::MappingConfig, error::MappingResult};
use std::collections::HashMap;
use std::time::Duration;

pub use indexer::{Indexer, InputIndex};
pub use inheritance::{InheritanceContext, InheritancePropagator, NodeFacts, NodeKey};
pub use translator::Translator;

/// Trait for pipeline stages
pub trait PipelineStage<'a> {
    /// The input type for this stage
    type Input;
    /// The output type for this stage
    type Output;

    /// Execute this pipeline stage
    fn execute(&mut self, input: Self::Input, config: &MappingConfig) -> MappingResult<Self::Output>;

    /// Get the name of this stage for logging
    fn name(&self) -> &'static str;
}

/// Pipeline context for sharing run data between stages
#[derive(Debug, Clone, Default)]
pub struct PipelineContext {
    /// Performance metrics
    pub metrics: PipelineMetrics,
    /// Warnings collected during processing
    pub warnings: Vec<String>,
}

impl PipelineContext {
    /// Create a new pipeline context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Record stage execution time
    pub fn record_stage_time(&mut self, stage: &str, duration: Duration) {
        self.metrics.stage_times.insert(stage.to_string(), duration);
    }

    /// Get total execution time
    pub fn total_time(&self) -> Duration {
        self.metrics.stage_times.values().sum()
    }
}

/// Performance metrics for the pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineMetrics {
    /// Execution time for each stage
    pub stage_times: HashMap<String, Duration>,
    /// Number of processed items per stage
    pub processed_items: HashMap<String, usize>,
}

impl PipelineMetrics {
    /// Record number of processed items
    pub fn record_processed_items(&mut self, stage: &str, count: usize) {
        self.processed_items.insert(stage.to_string(), count);
    }

    /// Get processing rate for a stage (items per second)
    pub fn processing_rate(&self, stage: &str) -> Option<f64> {
        let items = self.processed_items.get(stage)?;
        let time = self.stage_times.get(stage)?;

        if time.as_secs_f64() > 0.0 { Some(*items as f64 / time.as_secs_f64()) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_totals() {
        let mut context = PipelineContext::new();
        context.record_stage_time("index", Duration::from_millis(2));
        context.record_stage_time("translate", Duration::from_millis(5));
        context.add_warning("dangling aggregate");

        assert_eq!(context.total_time(), Duration::from_millis(7));
        assert_eq!(context.warnings, vec!["dangling aggregate".to_string()]);
    }

    #[test]
    fn test_processing_rate() {
        let mut metrics = PipelineMetrics::default();
        metrics.stage_times.insert("translate".into(), Duration::from_secs(2));
        metrics.record_processed_items("translate", 10);

        assert_eq!(metrics.processing_rate("translate"), Some(5.0));
        assert_eq!(metrics.processing_rate("optimize"), None);
    }
}
