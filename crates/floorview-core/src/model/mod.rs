// ── Domain model ──
//
// Records, filter state, interaction state and the small amount of plane
// geometry the reconciler needs for hit-testing.

pub mod filter;
pub mod geometry;
pub mod interaction;
pub mod unit;

// ── Re-exports ──────────────────────────────────────────────────────

pub use filter::{FilterState, PRICE_MAX};
pub use geometry::{Bounds, Point, Shape};
pub use interaction::{InteractionState, PointerEvent};
pub use unit::{UnitCode, UnitRecord, UnitStatus};
