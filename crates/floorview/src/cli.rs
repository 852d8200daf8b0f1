//! Clap derive structures for the `floorview` CLI.
//!
//! Defines the command tree, global flags and shared argument groups.
//! Depends on nothing but clap so `build.rs` can render man pages from it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// floorview -- inspect and render interactive SVG floor plans
#[derive(Debug, Parser)]
#[command(
    name = "floorview",
    version,
    about = "Inspect, filter and render interactive floor plans",
    long_about = "Binds unit sale records (status and price) to the regions of an SVG\n\
        floor plan, applies status/price filters and selection, and prints\n\
        the result as tables or as a styled, accessible SVG.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Named plan from the config file
    #[arg(long, short = 'p', env = "FLOORVIEW_PLAN", global = true)]
    pub plan: Option<String>,

    /// SVG diagram (overrides the plan)
    #[arg(long, short = 'd', env = "FLOORVIEW_DIAGRAM", global = true)]
    pub diagram: Option<PathBuf>,

    /// JSON unit records (overrides the plan)
    #[arg(long, short = 'u', env = "FLOORVIEW_UNITS", global = true)]
    pub units: Option<PathBuf>,

    /// Attribute carrying the unit code on diagram regions
    #[arg(long, global = true)]
    pub code_attribute: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "FLOORVIEW_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Available,
    Reserved,
    Sold,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect unit records
    #[command(alias = "u")]
    Units(UnitsArgs),

    /// List diagram regions and how they reconcile
    #[command(alias = "r")]
    Regions(FilterArgs),

    /// Write the styled SVG for a filter and selection
    Render(RenderArgs),

    /// Counts per status, total and visible under a filter
    Summary(FilterArgs),

    /// Manage the configuration file and named plans
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Filter Arguments ──────────────────────────────────────────

/// Status and price filter, shared by every reconciling command.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Statuses to show (repeatable) [default: all]
    #[arg(long = "status", short = 's', value_enum)]
    pub statuses: Vec<StatusArg>,

    /// Price ceiling, inclusive [default: the configured maximum]
    #[arg(long)]
    pub max_price: Option<f64>,
}

// ── Units ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UnitsArgs {
    #[command(subcommand)]
    pub command: UnitsCommand,
}

#[derive(Debug, Subcommand)]
pub enum UnitsCommand {
    /// List unit records passing the filter, in source order
    #[command(alias = "ls")]
    List(FilterArgs),

    /// Show one unit record
    Get {
        /// Unit code
        code: u32,
    },
}

// ── Render ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Unit to mark as selected (kept even when filtered out)
    #[arg(long)]
    pub select: Option<u32>,

    /// Unit to render with hover emphasis
    #[arg(long)]
    pub hover: Option<u32>,

    /// Write to a file instead of stdout
    #[arg(long, short = 'O')]
    pub out: Option<PathBuf>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Add a plan and make it the default (prompts for missing values)
    Init {
        /// Plan name
        #[arg(long)]
        name: Option<String>,

        /// SVG diagram path
        #[arg(long = "plan-diagram")]
        diagram: Option<PathBuf>,

        /// JSON unit records path
        #[arg(long = "plan-units")]
        units: Option<PathBuf>,
    },

    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Set the default plan
    Use {
        /// Plan name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
