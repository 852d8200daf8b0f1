//! Per-status totals and what the filter leaves visible.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use floorview_core::{RegionState, UnitStatus};

use crate::cli::FilterArgs;
use crate::error::CliError;
use crate::output;

use super::util::Context;

#[derive(Debug, Serialize)]
struct StatusCount {
    status: UnitStatus,
    units: usize,
    visible: usize,
}

#[derive(Debug, Default, Serialize)]
struct RegionCounts {
    total: usize,
    shown: usize,
    hidden: usize,
    inert: usize,
}

#[derive(Debug, Serialize)]
struct Summary {
    statuses: Vec<StatusCount>,
    /// Present when a diagram is available.
    regions: Option<RegionCounts>,
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Units")]
    units: usize,
    #[tabled(rename = "Visible")]
    visible: usize,
}

fn detail(summary: &Summary, color: bool) -> String {
    let rows: Vec<StatusRow> = summary
        .statuses
        .iter()
        .map(|c| StatusRow {
            status: output::status_label(c.status, color),
            units: c.units,
            visible: c.visible,
        })
        .collect();
    let mut out = output::render_table(&rows);
    if let Some(regions) = &summary.regions {
        out.push_str(&format!(
            "\nRegions: {} total, {} shown, {} hidden, {} inert",
            regions.total, regions.shown, regions.hidden, regions.inert
        ));
    }
    out
}

pub async fn handle(ctx: &Context<'_>, args: &FilterArgs) -> Result<(), CliError> {
    let filter = ctx.filter(args)?;
    let registry = Arc::new(ctx.registry().await?);

    let totals = registry.count_by_status();
    let statuses = UnitStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            units: totals.get(&status).copied().unwrap_or_default(),
            visible: registry
                .iter()
                .filter(|r| r.status == status && filter.admits(r))
                .count(),
        })
        .collect();

    let regions = if ctx.sources.diagram.is_some() {
        let mut plan = ctx.floor_plan_with(Arc::clone(&registry)).await?;
        plan.set_filter(filter);
        let mut counts = RegionCounts::default();
        for region in plan.scene().regions() {
            counts.total += 1;
            match region.state {
                RegionState::Inert { .. } => counts.inert += 1,
                RegionState::Hidden { .. } => counts.hidden += 1,
                RegionState::Shown { .. } => counts.shown += 1,
            }
        }
        Some(counts)
    } else {
        None
    };

    let summary = Summary { statuses, regions };
    let out = output::render_single(
        ctx.format,
        &summary,
        |s| detail(s, ctx.color),
        |s| {
            s.statuses
                .iter()
                .map(|c| format!("{}\t{}\t{}", c.status, c.units, c.visible))
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
