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

//! Palma to Tacton model mapping
//!
//! Converts a Palma product-configuration document into the Tacton
//! configurator model: domains, attribute categories, global features,
//! modules and assemblies with their positions, attributes and rules.

pub mod checks;
pub mod mapper;
pub mod model;
pub mod optimizer;

pub use checks::{AggregationIssue, check_aggregations};
pub use mapper::{ErrorCategory, MappingConfig, MappingEngine, MappingError, MappingResult, NamingScheme, palma_to_tacton};
pub use model::{Document, TactonModel};
