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

use super::{CommandContext, read_document};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

pub struct ConvertOptions<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub no_optimize: bool,
    pub compact: bool,
}

/// Map a Palma export and write the Tacton model as JSON
pub fn convert(ctx: &CommandContext, options: ConvertOptions<'_>) -> Result<()> {
    let document = read_document(options.input)?;

    let mut mapping = ctx.config.mapping.clone();
    if options.no_optimize {
        mapping.optimize = false;
    }
    let mut engine = ctx.engine(mapping)?;
    let model = engine.map(&document)?;

    let json = if options.compact { serde_json::to_string(&model)? } else { model.to_json_pretty()? };
    std::fs::write(options.output, json).with_context(|| format!("failed to write {}", options.output.display()))?;

    info!(output = %options.output.display(), assemblies = model.assemblies.len(), "model written");
    println!(
        "Converted {} -> {} ({} domains, {} modules, {} assemblies)",
        options.input.display(),
        options.output.display(),
        model.domains.len(),
        model.modules.len(),
        model.assemblies.len()
    );
    Ok(())
}
