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

//! Transport boundary to the configurator import API
//!
//! The loader only talks to a [`TactonTransport`]. Network clients live
//! outside this crate; [`RecordingTransport`] keeps every request in memory
//! for dry runs and tests.

use crate::error::{LoadError, LoadResult};
use crate::graphql::{GraphqlRequest, Operation};
use async_trait::async_trait;
use palma2tacton_mapper::model::tacton::{Assembly, Category, Domain, GlobalFeature, Module};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use tokio::sync::Mutex;

/// Identifier of an asynchronous import job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    InProgress,
    Error,
    Done,
}

/// Result of a job status query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub id: JobId,
    pub status: JobState,
    #[serde(default)]
    pub error: Option<String>,
}

/// Upsert operations of the configurator import API
#[async_trait]
pub trait TactonTransport: Send + Sync {
    async fn upsert_domains(&self, domains: &[Domain]) -> LoadResult<()>;

    async fn upsert_attribute_categories(&self, categories: &[Category]) -> LoadResult<()>;

    async fn upsert_global_features(&self, features: &[GlobalFeature]) -> LoadResult<()>;

    /// Synchronous upsert of one batch of modules
    async fn upsert_modules(&self, modules: &[Module]) -> LoadResult<()>;

    /// Submit all modules as one asynchronous job
    async fn upsert_modules_async(&self, modules: &[Module]) -> LoadResult<JobId>;

    /// Query the status of an asynchronous job
    async fn job(&self, id: &JobId) -> LoadResult<JobStatus>;

    async fn upsert_assemblies(&self, assemblies: &[Assembly]) -> LoadResult<()>;
}

/// In-memory transport that records the requests it would send
#[derive(Debug, Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<GraphqlRequest>>,
    job_states: Mutex<VecDeque<(JobState, Option<String>)>>,
    fail_on: Option<Operation>,
}

impl RecordingTransport {
    /// Create a transport whose jobs finish immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the states reported by successive job polls; once exhausted, jobs are done
    pub fn with_job_states(states: impl IntoIterator<Item = (JobState, Option<String>)>) -> Self {
        Self {
            job_states: Mutex::new(states.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Reject every request of the given operation
    pub fn failing_on(mut self, operation: Operation) -> Self {
        self.fail_on = Some(operation);
        self
    }

    /// Requests recorded so far, in send order
    pub async fn requests(&self) -> Vec<GraphqlRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn operations(&self) -> Vec<Operation> {
        self.requests.lock().await.iter().map(|request| request.operation).collect()
    }

    async fn record(&self, request: GraphqlRequest) -> LoadResult<()> {
        if self.fail_on == Some(request.operation) {
            return Err(LoadError::transport(request.operation.name(), "rejected by recording transport"));
        }
        self.requests.lock().await.push(request);
        Ok(())
    }
}

#[async_trait]
impl TactonTransport for RecordingTransport {
    async fn upsert_domains(&self, domains: &[Domain]) -> LoadResult<()> {
        self.record(GraphqlRequest::upsert_domains(domains)?).await
    }

    async fn upsert_attribute_categories(&self, categories: &[Category]) -> LoadResult<()> {
        self.record(GraphqlRequest::upsert_attribute_categories(categories)?).await
    }

    async fn upsert_global_features(&self, features: &[GlobalFeature]) -> LoadResult<()> {
        self.record(GraphqlRequest::upsert_global_features(features)?).await
    }

    async fn upsert_modules(&self, modules: &[Module]) -> LoadResult<()> {
        self.record(GraphqlRequest::upsert_modules(modules)?).await
    }

    async fn upsert_modules_async(&self, modules: &[Module]) -> LoadResult<JobId> {
        self.record(GraphqlRequest::upsert_modules_async(modules)?).await?;
        let submitted = self.requests.lock().await.iter().filter(|request| request.operation == Operation::UpsertModulesAsync).count();
        Ok(JobId(format!("job-{submitted}")))
    }

    async fn job(&self, id: &JobId) -> LoadResult<JobStatus> {
        self.record(GraphqlRequest::job(&id.0)).await?;
        let (status, error) = self.job_states.lock().await.pop_front().unwrap_or((JobState::Done, None));
        Ok(JobStatus { id: id.clone(), status, error })
    }

    async fn upsert_assemblies(&self, assemblies: &[Assembly]) -> LoadResult<()> {
        self.record(GraphqlRequest::upsert_assemblies(assemblies)?).await
    }
}
