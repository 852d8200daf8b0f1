//! CLI configuration: thin wrapper around `floorview_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (`--diagram`, `--units`, `--code-attribute`, `--output`, `--color`).

use std::path::PathBuf;

use clap::ValueEnum;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use floorview_config::{Config, Plan, config_path, load_config_or_default, save_config};

/// Input files for one invocation, after flag overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub diagram: Option<PathBuf>,
    pub units: Option<PathBuf>,
    pub code_attribute: String,
}

impl Sources {
    pub fn require_units(&self) -> Result<&PathBuf, CliError> {
        self.units.as_ref().ok_or_else(|| CliError::MissingInput {
            what: "unit data".into(),
            flag: "--units".into(),
        })
    }

    pub fn require_diagram(&self) -> Result<&PathBuf, CliError> {
        self.diagram.as_ref().ok_or_else(|| CliError::MissingInput {
            what: "diagram".into(),
            flag: "--diagram".into(),
        })
    }
}

/// Resolve inputs: flags win over the selected (or default) plan.
///
/// A plan is only required when a flag is missing; naming a plan that
/// does not exist is always an error.
pub fn resolve_sources(global: &GlobalOpts, config: &Config) -> Result<Sources, CliError> {
    let plan = match (&global.diagram, &global.units, global.plan.as_deref()) {
        (Some(_), Some(_), None) => None,
        (_, _, Some(name)) => Some(config.resolve_plan(Some(name))?),
        (_, _, None) if config.default_plan.is_some() => Some(config.resolve_plan(None)?),
        _ => None,
    };

    let code_attribute = global
        .code_attribute
        .clone()
        .or_else(|| plan.as_ref().map(|p| p.code_attribute.clone()))
        .unwrap_or_else(|| config.defaults.code_attribute.clone());

    Ok(Sources {
        diagram: global
            .diagram
            .clone()
            .or_else(|| plan.as_ref().map(|p| p.diagram.clone())),
        units: global
            .units
            .clone()
            .or_else(|| plan.as_ref().map(|p| p.units.clone())),
        code_attribute,
    })
}

/// Output format: flag, then `defaults.output`, then table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&config.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

/// Color mode: flag, then `defaults.color`, then auto.
pub fn color_mode(global: &GlobalOpts, config: &Config) -> ColorMode {
    global
        .color
        .or_else(|| ColorMode::from_str(&config.defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto)
}
