//! Shared configuration for the floorview CLI and TUI.
//!
//! TOML defaults, named plans (diagram + unit data pairs) and the TUI's
//! presentation knobs. Both binaries depend on this crate; the CLI layers
//! its flag overrides on top of [`resolve_plan`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use floorview_core::{DEFAULT_CODE_ATTRIBUTE, PRICE_MAX};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("plan '{name}' is not defined")]
    UnknownPlan { name: String },

    #[error("no plan selected and no default_plan configured")]
    NoPlan,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Plan used when none is named on the command line.
    pub default_plan: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub tui: TuiSettings,

    /// Named floor plans.
    #[serde(default)]
    pub plans: BTreeMap<String, Plan>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Attribute carrying the unit code on diagram regions.
    #[serde(default = "default_code_attribute")]
    pub code_attribute: String,

    /// Upper bound of the price control.
    #[serde(default = "default_price_max")]
    pub price_max: f64,

    /// Increment of the price control.
    #[serde(default = "default_price_step")]
    pub price_step: f64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            code_attribute: default_code_attribute(),
            price_max: default_price_max(),
            price_step: default_price_step(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_code_attribute() -> String {
    DEFAULT_CODE_ATTRIBUTE.into()
}
fn default_price_max() -> f64 {
    PRICE_MAX
}
fn default_price_step() -> f64 {
    5_000.0
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TuiSettings {
    /// Info card offset from the pointer, in terminal cells `[dx, dy]`.
    #[serde(default = "default_tooltip_offset")]
    pub tooltip_offset: [i16; 2],

    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    #[serde(default = "default_render_rate")]
    pub render_rate_ms: u64,
}

impl Default for TuiSettings {
    fn default() -> Self {
        Self {
            tooltip_offset: default_tooltip_offset(),
            tick_rate_ms: default_tick_rate(),
            render_rate_ms: default_render_rate(),
        }
    }
}

fn default_tooltip_offset() -> [i16; 2] {
    [2, -1]
}
fn default_tick_rate() -> u64 {
    250
}
fn default_render_rate() -> u64 {
    33
}

/// A named floor plan: one diagram and its unit data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Plan {
    /// Path to the SVG diagram.
    pub diagram: PathBuf,

    /// Path to the JSON unit records.
    pub units: PathBuf,

    /// Override of `defaults.code_attribute` for this plan.
    pub code_attribute: Option<String>,
}

/// Fully resolved inputs for one floor plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSource {
    pub name: Option<String>,
    pub diagram: PathBuf,
    pub units: PathBuf,
    pub code_attribute: String,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "floorview", "floorview").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("floorview");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still honoring `FLOORVIEW_` env overrides.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FLOORVIEW_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Plan resolution ─────────────────────────────────────────────────

impl Config {
    /// Resolve a named plan, or the default plan when `name` is `None`.
    pub fn resolve_plan(&self, name: Option<&str>) -> Result<PlanSource, ConfigError> {
        let name = name
            .or(self.default_plan.as_deref())
            .ok_or(ConfigError::NoPlan)?;
        let plan = self.plans.get(name).ok_or_else(|| ConfigError::UnknownPlan {
            name: name.into(),
        })?;

        for (field, path) in [("diagram", &plan.diagram), ("units", &plan.units)] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("plans.{name}.{field}"),
                    reason: "path is empty".into(),
                });
            }
        }

        Ok(PlanSource {
            name: Some(name.into()),
            diagram: plan.diagram.clone(),
            units: plan.units.clone(),
            code_attribute: plan
                .code_attribute
                .clone()
                .unwrap_or_else(|| self.defaults.code_attribute.clone()),
        })
    }

    /// Names of every configured plan, sorted.
    pub fn plan_names(&self) -> impl Iterator<Item = &str> {
        self.plans.keys().map(String::as_str)
    }
}

/// Resolve a plan from the loaded config.
pub fn resolve_plan(name: Option<&str>) -> Result<PlanSource, ConfigError> {
    load_config()?.resolve_plan(name)
}
