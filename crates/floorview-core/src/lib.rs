// floorview-core: Binds sale-status records to the regions of an SVG floor plan.

pub mod document;
pub mod error;
pub mod floorplan;
pub mod format;
pub mod model;
pub mod reconcile;
pub mod registry;
pub mod style;
pub mod tooltip;

// ── Primary re-exports ──────────────────────────────────────────────
pub use document::{DEFAULT_CODE_ATTRIBUTE, DiagramDocument, REGION_ELEMENTS, Region, RegionId};
pub use error::CoreError;
pub use floorplan::FloorPlan;
pub use reconcile::{
    Binding, InertReason, Reconciler, RegionEvent, RegionState, RenderedRegion, Scene,
    SelectionChange,
};
pub use registry::UnitRegistry;
pub use style::{Rgb, StatusStyle};
pub use tooltip::{TOOLTIP_OFFSET, Tooltip};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Bounds, FilterState, InteractionState, PRICE_MAX, Point, PointerEvent, Shape, UnitCode,
    UnitRecord, UnitStatus,
};
