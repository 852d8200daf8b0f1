//! Screen implementations. Each screen is a top-level Component.

pub mod plan;
pub mod units;

use std::sync::Arc;

use floorview_core::{FilterState, UnitRegistry};

use crate::component::Component;
use crate::screen::ScreenId;

pub use plan::{PlanOptions, PlanScreen};
pub use units::UnitsScreen;

/// Build both screens over the same registry.
pub fn create_screens(
    registry: &Arc<UnitRegistry>,
    options: PlanOptions,
) -> Vec<(ScreenId, Box<dyn Component>)> {
    let filter = FilterState::new(floorview_core::UnitStatus::ALL, options.price_max);
    vec![
        (
            ScreenId::Plan,
            Box::new(PlanScreen::new(Arc::clone(registry), options)),
        ),
        (
            ScreenId::Units,
            Box::new(UnitsScreen::new(Arc::clone(registry), filter)),
        ),
    ]
}
