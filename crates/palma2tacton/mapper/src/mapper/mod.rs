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

//! Palma to Tacton mapping
//!
//! The mapper indexes the input document, propagates optionality through
//! the product structure, translates assembly nodes into Tacton assemblies
//! and extracts domains, categories, global features and modules.

pub mod config;
pub mod engine;
pub mod error;
pub mod naming;
pub mod pipeline;
pub mod processors;

pub use config::{MappingConfig, NamingScheme};
pub use engine::{MappingEngine, palma_to_tacton};
pub use error::{ErrorCategory, MappingError, MappingResult};
pub use naming::standardize_name;
