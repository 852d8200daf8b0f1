//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use floorview_config::ConfigError;
use floorview_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const INPUT: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Inputs ───────────────────────────────────────────────────────
    #[error("No {what} given")]
    #[diagnostic(
        code(floorview::missing_input),
        help(
            "Pass {flag}, or configure a plan with: floorview config init\n\
             Then select it with --plan NAME or make it the default."
        )
    )]
    MissingInput { what: String, flag: String },

    #[error("Could not read {path}")]
    #[diagnostic(code(floorview::read_failed))]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Diagram is not a usable SVG document: {message}")]
    #[diagnostic(
        code(floorview::diagram),
        help("The diagram must be well-formed XML with an <svg> root element.")
    )]
    Diagram { message: String },

    #[error("Unit data is not usable: {message}")]
    #[diagnostic(
        code(floorview::units),
        help("Unit data must be a JSON array of {{\"code\", \"status\", \"price\"}} objects.")
    )]
    Units { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(floorview::not_found),
        help("Run: floorview {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(floorview::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Plan '{name}' not found in configuration")]
    #[diagnostic(
        code(floorview::plan_not_found),
        help(
            "Available plans: {available}\n\
             Create one with: floorview config init"
        )
    )]
    PlanNotFound { name: String, available: String },

    #[error("Configuration is invalid: {message}")]
    #[diagnostic(code(floorview::config), help("Check the file at: {path}"))]
    Config { message: String, path: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {message}")]
    #[diagnostic(code(floorview::serialize))]
    Serialize { message: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } | Self::PlanNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::MissingInput { .. } => exit_code::USAGE,
            Self::ReadFailed { .. } | Self::Diagram { .. } | Self::Units { .. } => {
                exit_code::INPUT
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DocumentParse { .. } | CoreError::MissingRoot => CliError::Diagram {
                message: err.to_string(),
            },
            CoreError::DocumentWrite { message } => CliError::Serialize { message },
            CoreError::RegistryParse { message } => CliError::Units { message },
            CoreError::UnitNotFound { code } => CliError::NotFound {
                resource_type: "unit".into(),
                identifier: code.to_string(),
                list_command: "units list".into(),
            },
            CoreError::Io(e) => CliError::Io(e),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let path = floorview_config::config_path().display().to_string();
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownPlan { name } => CliError::PlanNotFound {
                name,
                available: available_plans(),
            },
            ConfigError::NoPlan => CliError::MissingInput {
                what: "plan".into(),
                flag: "--diagram and --units".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => {
                CliError::Config {
                    message: other.to_string(),
                    path,
                }
            }
        }
    }
}

/// Comma-separated plan names for help text.
pub fn available_plans() -> String {
    let config = floorview_config::load_config_or_default();
    let names: Vec<&str> = config.plan_names().collect();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}
