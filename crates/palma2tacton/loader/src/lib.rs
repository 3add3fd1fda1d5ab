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

//! Upload of mapped Tacton models
//!
//! Sequences the import API's upsert operations over an abstract
//! [`TactonTransport`]. This crate performs no network I/O itself.

pub mod config;
pub mod error;
pub mod graphql;
pub mod loader;
pub mod transport;

pub use config::{LoaderConfig, ModuleUpload};
pub use error::{LoadError, LoadResult};
pub use graphql::{GraphqlRequest, Operation};
pub use loader::{LoadReport, Loader};
pub use transport::{JobId, JobState, JobStatus, RecordingTransport, TactonTransport};
