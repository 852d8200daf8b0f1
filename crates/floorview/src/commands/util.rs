//! Shared helpers for command handlers: input loading and filter building.

use std::path::Path;
use std::sync::Arc;

use floorview_core::{
    DiagramDocument, FilterState, FloorPlan, UnitCode, UnitRecord, UnitRegistry, UnitStatus,
};

use crate::cli::{ColorMode, FilterArgs, GlobalOpts, OutputFormat, StatusArg};
use crate::config::{self, Config, Sources};
use crate::error::CliError;
use crate::output;

/// Everything a handler needs besides its own arguments.
pub struct Context<'a> {
    pub sources: &'a Sources,
    pub config: &'a Config,
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl<'a> Context<'a> {
    pub fn new(sources: &'a Sources, config: &'a Config, global: &GlobalOpts) -> Self {
        let color: ColorMode = config::color_mode(global, config);
        Self {
            sources,
            config,
            format: config::output_format(global, config),
            color: output::should_color(color),
            quiet: global.quiet,
        }
    }

    /// Build the filter from flags, clamping the ceiling to the control's range.
    pub fn filter(&self, args: &FilterArgs) -> Result<FilterState, CliError> {
        let price_max = self.config.defaults.price_max;
        let ceiling = match args.max_price {
            Some(v) if !v.is_finite() => {
                return Err(CliError::Validation {
                    field: "--max-price".into(),
                    reason: format!("expected a number, got {v}"),
                });
            }
            Some(v) => v.clamp(0.0, price_max),
            None => price_max,
        };
        let statuses: Vec<UnitStatus> = if args.statuses.is_empty() {
            UnitStatus::ALL.to_vec()
        } else {
            args.statuses.iter().copied().map(status_from_arg).collect()
        };
        Ok(FilterState::new(statuses, ceiling))
    }

    pub async fn registry(&self) -> Result<UnitRegistry, CliError> {
        let path = self.sources.require_units()?;
        let text = read_input(path).await?;
        Ok(UnitRegistry::from_json_str(&text)?)
    }

    pub async fn document(&self) -> Result<DiagramDocument, CliError> {
        let path = self.sources.require_diagram()?;
        let text = read_input(path).await?;
        Ok(DiagramDocument::parse_with(
            &text,
            &self.sources.code_attribute,
        )?)
    }

    /// Load both inputs into a floor plan reconciled under the default filter.
    pub async fn floor_plan(&self) -> Result<FloorPlan, CliError> {
        let (registry, document) = tokio::try_join!(self.registry(), self.document())?;
        let mut plan = FloorPlan::new(Arc::new(registry));
        plan.load_document(document);
        Ok(plan)
    }

    /// Like [`Context::floor_plan`], over records the caller already holds.
    pub async fn floor_plan_with(
        &self,
        registry: Arc<UnitRegistry>,
    ) -> Result<FloorPlan, CliError> {
        let document = self.document().await?;
        let mut plan = FloorPlan::new(registry);
        plan.load_document(document);
        Ok(plan)
    }
}

pub fn status_from_arg(arg: StatusArg) -> UnitStatus {
    match arg {
        StatusArg::Available => UnitStatus::Available,
        StatusArg::Reserved => UnitStatus::Reserved,
        StatusArg::Sold => UnitStatus::Sold,
    }
}

/// Look up a unit or fail with a not-found error.
pub fn find_unit(registry: &UnitRegistry, code: u32) -> Result<&UnitRecord, CliError> {
    let code = UnitCode::new(code);
    registry
        .lookup(code)
        .ok_or_else(|| floorview_core::CoreError::UnitNotFound { code }.into())
}

async fn read_input(path: &Path) -> Result<String, CliError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::ReadFailed {
            path: path.display().to_string(),
            source,
        })
}
