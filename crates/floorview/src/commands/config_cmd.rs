//! Config subcommand handlers.

use std::path::PathBuf;

use dialoguer::Input;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Plan};
use crate::error::{self, CliError};
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_path(prompt: &str) -> Result<PathBuf, CliError> {
    let raw: String = Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(prompt_err)?;
    Ok(PathBuf::from(raw.trim()))
}

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to format config: {e}"))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: add a plan, prompting for what flags left out ─────
        ConfigCommand::Init {
            name,
            diagram,
            units,
        } => {
            let config_path = config::config_path();
            if !global.quiet {
                eprintln!("floorview configuration");
                eprintln!("   Config path: {}\n", config_path.display());
            }

            let name = match name {
                Some(name) => name,
                None => Input::new()
                    .with_prompt("Plan name")
                    .default("ground".into())
                    .interact_text()
                    .map_err(prompt_err)?,
            };
            let diagram = match diagram {
                Some(path) => path,
                None => prompt_path("SVG diagram path")?,
            };
            let units = match units {
                Some(path) => path,
                None => prompt_path("Unit data (JSON) path")?,
            };

            for (field, path) in [("diagram", &diagram), ("units", &units)] {
                if path.as_os_str().is_empty() {
                    return Err(CliError::Validation {
                        field: field.into(),
                        reason: "path cannot be empty".into(),
                    });
                }
            }

            let mut cfg = config::load_config_or_default();
            cfg.plans.insert(
                name.clone(),
                Plan {
                    diagram,
                    units,
                    code_attribute: global.code_attribute.clone(),
                },
            );
            cfg.default_plan = Some(name.clone());
            let written = config::save_config(&cfg)?;

            if !global.quiet {
                eprintln!("✓ Configuration written to {}", written.display());
                eprintln!("  Default plan: {name}");
                eprintln!("\n  Try it: floorview summary");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let format = config::output_format(global, &cfg);
            let out = output::render_single(format, &cfg, format_config, |c| {
                c.plan_names().collect::<Vec<_>>().join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.plans.contains_key(&name) {
                return Err(CliError::PlanNotFound {
                    name,
                    available: error::available_plans(),
                });
            }

            cfg.default_plan = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default plan set to '{name}'");
            }
            Ok(())
        }
    }
}
