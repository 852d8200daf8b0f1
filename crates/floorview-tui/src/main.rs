//! `floorview-tui` — interactive floor plan in the terminal.
//!
//! Draws the regions of an SVG floor plan on a braille canvas, colored by
//! the sale status of the unit each region represents. Filter by status and
//! price from the sidebar or the keyboard, hover for a unit card, click or
//! press Enter to select. Screens: `1` Plan, `2` Units.
//!
//! Unit records are read before the terminal is taken over, so a bad record
//! file fails fast with a normal error report. The diagram is loaded in the
//! background while the UI is already up.
//!
//! Logs go to a file (default `/tmp/floorview-tui.log`); writing to the
//! terminal would corrupt the UI.

mod action;
mod app;
mod component;
mod event;
mod loader;
mod screen;
mod screens;
mod theme;
mod tui;
mod viewport;
mod widgets;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use floorview_config::Config;
use floorview_core::UnitRegistry;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::screens::PlanOptions;

/// Terminal viewer for interactive floor plans.
#[derive(Parser, Debug)]
#[command(name = "floorview-tui", version, about)]
struct Cli {
    /// Named plan from the config file
    #[arg(short = 'p', long, env = "FLOORVIEW_PLAN")]
    plan: Option<String>,

    /// SVG floor plan (overrides the plan's diagram)
    #[arg(short = 'd', long)]
    diagram: Option<PathBuf>,

    /// Unit records as a JSON array (overrides the plan's units)
    #[arg(short = 'u', long)]
    units: Option<PathBuf>,

    /// Attribute holding the unit code on diagram regions
    #[arg(long)]
    code_attribute: Option<String>,

    /// Log file path
    #[arg(long, default_value = "/tmp/floorview-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Inputs after merging flags with the selected plan.
#[derive(Debug)]
struct Inputs {
    title: String,
    diagram: PathBuf,
    units: PathBuf,
    code_attribute: String,
}

/// File-based tracing. The returned guard flushes on drop and must live
/// as long as the app.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("floorview_tui={log_level},floorview_core={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(std::env::temp_dir, PathBuf::from);
    let log_name = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("floorview-tui.log"));

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, log_name));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();
    guard
}

/// Flags win over the named (or default) plan; a plan is only consulted
/// when a flag is missing.
fn resolve_inputs(cli: &Cli, config: &Config) -> Result<Inputs> {
    let plan = match (&cli.diagram, &cli.units, cli.plan.as_deref()) {
        (Some(_), Some(_), None) => None,
        (_, _, Some(name)) => Some(config.resolve_plan(Some(name))?),
        (_, _, None) if config.default_plan.is_some() => Some(config.resolve_plan(None)?),
        _ => None,
    };

    let diagram = cli
        .diagram
        .clone()
        .or_else(|| plan.as_ref().map(|p| p.diagram.clone()))
        .ok_or_else(|| eyre!("no diagram given: pass --diagram or configure a plan"))?;
    let units = cli
        .units
        .clone()
        .or_else(|| plan.as_ref().map(|p| p.units.clone()))
        .ok_or_else(|| eyre!("no unit data given: pass --units or configure a plan"))?;
    let code_attribute = cli
        .code_attribute
        .clone()
        .or_else(|| plan.as_ref().map(|p| p.code_attribute.clone()))
        .unwrap_or_else(|| config.defaults.code_attribute.clone());
    let title = plan
        .and_then(|p| p.name)
        .or_else(|| diagram.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "floor plan".into());

    Ok(Inputs {
        title,
        diagram,
        units,
        code_attribute,
    })
}

async fn load_registry(path: &Path) -> Result<UnitRegistry> {
    let text = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("reading unit data from {}", path.display()))?;
    UnitRegistry::from_json_str(&text)
        .wrap_err_with(|| format!("parsing unit data from {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let config = floorview_config::load_config().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config file");
        Config::default()
    });
    let inputs = resolve_inputs(&cli, &config)?;
    info!(
        diagram = %inputs.diagram.display(),
        units = %inputs.units.display(),
        "starting floorview-tui"
    );

    let registry = Arc::new(load_registry(&inputs.units).await?);
    info!(units = registry.len(), "unit data loaded");

    let [dx, dy] = config.tui.tooltip_offset;
    let options = PlanOptions {
        diagram: inputs.diagram,
        code_attribute: inputs.code_attribute,
        price_max: config.defaults.price_max,
        price_step: config.defaults.price_step,
        tooltip_offset: (f64::from(dx), f64::from(dy)),
    };
    let mut app = App::new(&registry, options, &config.tui, inputs.title);
    app.run().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use floorview_config::Plan;
    use pretty_assertions::assert_eq;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("floorview-tui").chain(args.iter().copied()))
    }

    fn config_with_plan() -> Config {
        let mut config = Config {
            default_plan: Some("ground".into()),
            ..Config::default()
        };
        config.plans.insert(
            "ground".into(),
            Plan {
                diagram: "/plans/ground.svg".into(),
                units: "/plans/units.json".into(),
                code_attribute: Some("data-unit".into()),
            },
        );
        config
    }

    #[test]
    fn flags_alone_need_no_plan() {
        let args = cli(&["-d", "a.svg", "-u", "b.json"]);
        let inputs = resolve_inputs(&args, &Config::default()).unwrap();
        assert_eq!(inputs.diagram, PathBuf::from("a.svg"));
        assert_eq!(inputs.code_attribute, "data-code");
        assert_eq!(inputs.title, "a.svg");
    }

    #[test]
    fn default_plan_fills_missing_flags() {
        let inputs = resolve_inputs(&cli(&["-d", "other.svg"]), &config_with_plan()).unwrap();
        assert_eq!(inputs.diagram, PathBuf::from("other.svg"));
        assert_eq!(inputs.units, PathBuf::from("/plans/units.json"));
        assert_eq!(inputs.code_attribute, "data-unit");
        assert_eq!(inputs.title, "ground");
    }

    #[test]
    fn missing_inputs_are_reported() {
        let err = resolve_inputs(&cli(&[]), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("--diagram"));
        assert!(resolve_inputs(&cli(&["-p", "nope"]), &config_with_plan()).is_err());
    }
}
