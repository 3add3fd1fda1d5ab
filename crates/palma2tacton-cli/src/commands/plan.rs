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
use palma2tacton_loader::{GraphqlRequest, LoadReport, Loader, RecordingTransport};
use std::path::Path;

/// Dry run of the upload: map the export and show the requests it would send
pub async fn plan(ctx: &CommandContext, input: &Path, output_dir: Option<&Path>) -> Result<()> {
    let (report, requests) = record_requests(ctx, input).await?;

    match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
            for (index, request) in requests.iter().enumerate() {
                let path = dir.join(format!("{:03}_{}.json", index + 1, request.operation));
                std::fs::write(&path, serde_json::to_string_pretty(request)?).with_context(|| format!("failed to write {}", path.display()))?;
            }
            println!("Wrote {} requests to {}", requests.len(), dir.display());
        }
        None => {
            for (index, request) in requests.iter().enumerate() {
                println!("{:>3}. {} ({} entities)", index + 1, request.operation, request.entity_count());
            }
        }
    }

    println!(
        "Plan: {} domains, {} categories, {} global features, {} modules in {} batch(es), {} assemblies",
        report.domains, report.categories, report.global_features, report.modules, report.module_batches, report.assemblies
    );
    Ok(())
}

async fn record_requests(ctx: &CommandContext, input: &Path) -> Result<(LoadReport, Vec<GraphqlRequest>)> {
    let document = read_document(input)?;
    let model = ctx.engine(ctx.config.mapping.clone())?.map(&document)?;

    let loader = Loader::new(RecordingTransport::new(), ctx.config.loader.clone())?;
    let report = loader.load(&model).await?;
    let requests = loader.transport().requests().await;
    Ok((report, requests))
}
