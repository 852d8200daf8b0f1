//! Region listing: every coded shape and how the current pass treats it.

use serde::Serialize;
use tabled::Tabled;

use floorview_core::format::format_price;
use floorview_core::{InertReason, RegionState, RenderedRegion, UnitStatus};

use crate::cli::FilterArgs;
use crate::error::CliError;
use crate::output;

use super::util::Context;

/// Serializable view of one region joined with its scene assignment.
#[derive(Debug, Serialize)]
struct RegionView {
    index: usize,
    element: String,
    raw_code: String,
    code: Option<u32>,
    state: &'static str,
    reason: Option<InertReason>,
    status: Option<UnitStatus>,
    price: Option<f64>,
    selected: bool,
}

impl RegionView {
    fn new(element: &str, raw_code: &str, rendered: &RenderedRegion) -> Self {
        let (state, reason) = match &rendered.state {
            RegionState::Inert { reason } => ("inert", Some(*reason)),
            RegionState::Hidden { .. } => ("hidden", None),
            RegionState::Shown { .. } => ("shown", None),
        };
        let record = rendered.record();
        Self {
            index: rendered.id.index(),
            element: element.to_owned(),
            raw_code: raw_code.to_owned(),
            code: rendered.code.map(floorview_core::UnitCode::get),
            state,
            reason,
            status: record.map(|r| r.status),
            price: record.map(|r| r.price),
            selected: rendered.selected,
        }
    }
}

#[derive(Tabled)]
struct RegionRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Element")]
    element: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "State")]
    state: String,
}

fn row(view: &RegionView, color: bool) -> RegionRow {
    let state = match view.reason {
        Some(InertReason::MalformedCode) => "inert (malformed code)".into(),
        Some(InertReason::UnknownCode) => "inert (no record)".into(),
        Some(InertReason::DuplicateCode) => "inert (duplicate)".into(),
        None => view.state.to_owned(),
    };
    RegionRow {
        index: view.index,
        element: view.element.clone(),
        code: view.raw_code.clone(),
        status: view
            .status
            .map_or_else(|| "-".into(), |s| output::status_label(s, color)),
        price: view.price.map_or_else(|| "-".into(), format_price),
        state,
    }
}

pub async fn handle(ctx: &Context<'_>, args: &FilterArgs) -> Result<(), CliError> {
    let filter = ctx.filter(args)?;
    let mut plan = ctx.floor_plan().await?;
    plan.set_filter(filter);

    let Some(document) = plan.document() else {
        return Ok(());
    };
    let views: Vec<RegionView> = document
        .regions()
        .iter()
        .zip(plan.scene().regions())
        .map(|(region, rendered)| RegionView::new(&region.element, &region.raw_code, rendered))
        .collect();

    let out = output::render_list(
        ctx.format,
        &views,
        |v| row(v, ctx.color),
        |v| format!("{}\t{}\t{}", v.index, v.raw_code, v.state),
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
