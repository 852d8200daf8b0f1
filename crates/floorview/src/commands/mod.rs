//! Command dispatch: bridges CLI args -> floor plan operations -> output.

pub mod config_cmd;
pub mod regions;
pub mod render;
pub mod summary;
pub mod units;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::{Config, Sources};
use crate::error::CliError;

/// Dispatch a plan-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    sources: &Sources,
    config: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let ctx = util::Context::new(sources, config, global);
    match cmd {
        Command::Units(args) => units::handle(&ctx, args).await,
        Command::Regions(args) => regions::handle(&ctx, &args).await,
        Command::Render(args) => render::handle(&ctx, args).await,
        Command::Summary(args) => summary::handle(&ctx, &args).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
