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
use anyhow::{Result, bail};
use palma2tacton_mapper::{AggregationIssue, check_aggregations};
use std::path::Path;

/// Map a Palma export and list aggregate entries that point at nothing
pub fn check(ctx: &CommandContext, input: &Path) -> Result<()> {
    let issues = find_issues(ctx, input)?;
    if issues.is_empty() {
        println!("No aggregation issues found in {}", input.display());
        return Ok(());
    }

    for issue in &issues {
        println!("{issue}");
    }
    bail!("{} aggregation issue(s) found", issues.len())
}

fn find_issues(ctx: &CommandContext, input: &Path) -> Result<Vec<AggregationIssue>> {
    let document = read_document(input)?;
    let mut mapping = ctx.config.mapping.clone();
    // reported here instead of logged
    mapping.check_aggregations = false;

    let model = ctx.engine(mapping)?.map(&document)?;
    Ok(check_aggregations(&model))
}
