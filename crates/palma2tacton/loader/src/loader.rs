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

//! Upload sequencing
//!
//! Entities are upserted in dependency order: domains, attribute
//! categories, global features, modules, assemblies. The first failure
//! aborts the upload; nothing is retried.

use crate::config::{LoaderConfig, ModuleUpload};
use crate::error::{LoadError, LoadResult};
use crate::transport::{JobId, JobState, TactonTransport};
use palma2tacton_mapper::model::tacton::{Module, TactonModel};
use std::time::Instant;
use tracing::{debug, info};

/// Summary of a completed upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub domains: usize,
    pub categories: usize,
    pub global_features: usize,
    pub modules: usize,
    pub assemblies: usize,
    /// Synchronous module upserts sent
    pub module_batches: usize,
    /// Asynchronous module job, when one was used
    pub job: Option<JobId>,
    /// Job status queries sent
    pub job_polls: u32,
}

/// Uploads a mapped model through a transport
pub struct Loader<T> {
    transport: T,
    config: LoaderConfig,
}

impl<T: TactonTransport> Loader<T> {
    /// Create a new loader
    pub fn new(transport: T, config: LoaderConfig) -> LoadResult<Self> {
        config.validate()?;
        Ok(Self { transport, config })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Upload every part of the model in dependency order
    pub async fn load(&self, model: &TactonModel) -> LoadResult<LoadReport> {
        let start = Instant::now();
        let mut report = LoadReport::default();

        self.transport.upsert_domains(&model.domains).await?;
        report.domains = model.domains.len();
        debug!(count = report.domains, "domains upserted");

        self.transport.upsert_attribute_categories(&model.categories).await?;
        report.categories = model.categories.len();

        self.transport.upsert_global_features(&model.global_features).await?;
        report.global_features = model.global_features.len();

        match self.config.module_upload {
            ModuleUpload::Batched => self.load_module_batches(&model.modules, &mut report).await?,
            ModuleUpload::AsyncJob => self.load_modules_as_job(&model.modules, &mut report).await?,
        }
        report.modules = model.modules.len();

        self.transport.upsert_assemblies(&model.assemblies).await?;
        report.assemblies = model.assemblies.len();

        info!(
            domains = report.domains,
            modules = report.modules,
            assemblies = report.assemblies,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "model uploaded"
        );
        Ok(report)
    }

    async fn load_module_batches(&self, modules: &[Module], report: &mut LoadReport) -> LoadResult<()> {
        for batch in modules.chunks(self.config.module_batch_size) {
            self.transport.upsert_modules(batch).await?;
            report.module_batches += 1;
            debug!(batch = report.module_batches, size = batch.len(), "module batch upserted");
        }
        Ok(())
    }

    async fn load_modules_as_job(&self, modules: &[Module], report: &mut LoadReport) -> LoadResult<()> {
        let id = self.transport.upsert_modules_async(modules).await?;
        debug!(job = %id, modules = modules.len(), "module job submitted");
        report.job = Some(id.clone());

        for poll in 1..=self.config.max_polls {
            let status = self.transport.job(&id).await?;
            report.job_polls = poll;
            match status.status {
                JobState::Done => return Ok(()),
                JobState::Error => return Err(LoadError::JobFailed { id: id.0, error: status.error }),
                JobState::InProgress => {
                    if poll < self.config.max_polls {
                        tokio::time::sleep(self.config.poll_interval()).await;
                    }
                }
            }
        }

        Err(LoadError::JobTimedOut { id: id.0, polls: self.config.max_polls })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::Operation;
    use crate::transport::RecordingTransport;

    fn model(module_count: usize) -> TactonModel {
        TactonModel {
            modules: (0..module_count)
                .map(|i| Module {
                    name: format!("palma_m{i}_module"),
                    description: format!("M{i}"),
                    features: vec![],
                    variants: vec![],
                })
                .collect(),
            ..Default::default()
        }
    }

    fn async_config(max_polls: u32) -> LoaderConfig {
        LoaderConfig {
            module_upload: ModuleUpload::AsyncJob,
            poll_interval_ms: 1,
            max_polls,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_batched_upload_order() {
        let loader = Loader::new(RecordingTransport::new(), LoaderConfig::default()).unwrap();
        let report = loader.load(&model(120)).await.unwrap();

        assert_eq!(report.modules, 120);
        assert_eq!(report.module_batches, 3);
        assert_eq!(
            loader.transport().operations().await,
            vec![
                Operation::UpsertDomains,
                Operation::UpsertAttributeCategories,
                Operation::UpsertGlobalFeatures,
                Operation::UpsertModules,
                Operation::UpsertModules,
                Operation::UpsertModules,
                Operation::UpsertAssemblies,
            ]
        );

        let sizes: Vec<usize> = loader.transport().requests().await.iter().filter(|r| r.operation == Operation::UpsertModules).map(|r| r.entity_count()).collect();
        assert_eq!(sizes, vec![50, 50, 20]);
    }

    #[tokio::test]
    async fn test_no_modules_means_no_batches() {
        let loader = Loader::new(RecordingTransport::new(), LoaderConfig::default()).unwrap();
        let report = loader.load(&model(0)).await.unwrap();
        assert_eq!(report.module_batches, 0);
        assert!(!loader.transport().operations().await.contains(&Operation::UpsertModules));
    }

    #[tokio::test]
    async fn test_async_job_is_polled_until_done() {
        let transport = RecordingTransport::with_job_states([(JobState::InProgress, None), (JobState::InProgress, None)]);
        let loader = Loader::new(transport, async_config(10)).unwrap();
        let report = loader.load(&model(3)).await.unwrap();

        assert_eq!(report.job, Some(JobId("job-1".into())));
        assert_eq!(report.job_polls, 3);
        let operations = loader.transport().operations().await;
        assert_eq!(operations.iter().filter(|op| **op == Operation::Job).count(), 3);
        assert_eq!(operations.last(), Some(&Operation::UpsertAssemblies));
    }

    #[tokio::test]
    async fn test_failed_job_aborts_before_assemblies() {
        let transport = RecordingTransport::with_job_states([(JobState::Error, Some("duplicate module".into()))]);
        let loader = Loader::new(transport, async_config(10)).unwrap();

        let error = loader.load(&model(1)).await.unwrap_err();
        assert!(matches!(&error, LoadError::JobFailed { error: Some(message), .. } if message == "duplicate module"));
        assert!(!loader.transport().operations().await.contains(&Operation::UpsertAssemblies));
    }

    #[tokio::test]
    async fn test_job_times_out() {
        let transport = RecordingTransport::with_job_states(vec![(JobState::InProgress, None); 5]);
        let loader = Loader::new(transport, async_config(2)).unwrap();

        let error = loader.load(&model(1)).await.unwrap_err();
        assert!(matches!(error, LoadError::JobTimedOut { polls: 2, .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_aborts() {
        let transport = RecordingTransport::new().failing_on(Operation::UpsertAttributeCategories);
        let loader = Loader::new(transport, LoaderConfig::default()).unwrap();

        let error = loader.load(&model(1)).await.unwrap_err();
        assert!(error.is_remote());
        assert_eq!(loader.transport().operations().await, vec![Operation::UpsertDomains]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = LoaderConfig { module_batch_size: 0, ..Default::default() };
        assert!(Loader::new(RecordingTransport::new(), config).is_err());
    }
}
