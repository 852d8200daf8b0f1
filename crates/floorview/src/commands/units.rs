//! Unit record command handlers.

use tabled::Tabled;

use floorview_core::UnitRecord;
use floorview_core::format::format_price;

use crate::cli::{UnitsArgs, UnitsCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, Context};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UnitRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl UnitRow {
    fn new(record: &UnitRecord, color: bool) -> Self {
        Self {
            code: record.code.to_string(),
            status: output::status_label(record.status, color),
            price: format_price(record.price),
        }
    }
}

fn detail(record: &UnitRecord) -> String {
    [
        format!("Code:        {}", record.code),
        format!("Status:      {}", record.status.label()),
        format!("Price:       {}", format_price(record.price)),
        format!("Description: {}", record.description()),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context<'_>, args: UnitsArgs) -> Result<(), CliError> {
    let registry = ctx.registry().await?;

    match args.command {
        UnitsCommand::List(filter_args) => {
            let filter = ctx.filter(&filter_args)?;
            let records: Vec<UnitRecord> = registry
                .iter()
                .filter(|r| filter.admits(r))
                .cloned()
                .collect();
            let out = output::render_list(
                ctx.format,
                &records,
                |r| UnitRow::new(r, ctx.color),
                |r| r.code.to_string(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        UnitsCommand::Get { code } => {
            let record = util::find_unit(&registry, code)?;
            let out = output::render_single(ctx.format, record, detail, |r| r.code.to_string())?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }
    }
}
