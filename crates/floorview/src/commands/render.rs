//! Styled SVG output.

use tracing::warn;

use floorview_core::{PointerEvent, SelectionChange, UnitCode};

use crate::cli::RenderArgs;
use crate::error::CliError;
use crate::output;

use super::util::{self, Context};

pub async fn handle(ctx: &Context<'_>, args: RenderArgs) -> Result<(), CliError> {
    let filter = ctx.filter(&args.filter)?;
    let mut plan = ctx.floor_plan().await?;

    // Select under the default filter so a unit the filter hides still
    // carries its marker, exactly as a viewer who selected it earlier.
    if let Some(code) = args.select {
        util::find_unit(plan.registry(), code)?;
        let code = UnitCode::new(code);
        if plan.activate(code) == SelectionChange::Ignored {
            warn!(%code, "unit has no region in the diagram, nothing selected");
        }
    }
    plan.set_filter(filter);

    if let Some(code) = args.hover {
        let code = UnitCode::new(code);
        let anchor = plan
            .scene()
            .bound_region(code)
            .and_then(|id| plan.document()?.region(id))
            .and_then(|region| region.shape.label_anchor())
            .unwrap_or_default();
        if plan.hover_enter(code, PointerEvent { client: anchor }) {
            if let Some(card) = plan.tooltip().filter(|_| !ctx.quiet) {
                eprintln!(
                    "{} · {} · {}",
                    card.title(),
                    output::status_label(card.status, ctx.color),
                    card.price_label
                );
            }
        } else {
            warn!(%code, "unit is not shown, hover ignored");
        }
    }

    let svg = plan.render_svg()?.unwrap_or_default();
    match args.out {
        Some(path) => {
            tokio::fs::write(&path, svg).await?;
            if !ctx.quiet {
                eprintln!("✓ Wrote {}", path.display());
            }
        }
        None => output::print_output(&svg, ctx.quiet),
    }
    Ok(())
}
