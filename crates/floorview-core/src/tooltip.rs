// ── Hover info card ──

use serde::Serialize;

use crate::format::format_price;
use crate::model::{Point, UnitCode, UnitRecord, UnitStatus};
use crate::style::status_dot_color;

/// Card offset from the pointer, in container-local units.
pub const TOOLTIP_OFFSET: (f64, f64) = (20.0, -20.0);

/// Presentation-only card for the hovered unit. Never hit-tested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    /// Top-left corner of the card in container-local coordinates.
    pub anchor: Point,
    pub code: UnitCode,
    pub status: UnitStatus,
    pub status_label: &'static str,
    pub dot_color: &'static str,
    pub price_label: String,
}

impl Tooltip {
    pub fn new(record: &UnitRecord, pointer: Point, offset: (f64, f64)) -> Self {
        Self {
            anchor: pointer.offset(offset.0, offset.1),
            code: record.code,
            status: record.status,
            status_label: record.status.label(),
            dot_color: status_dot_color(record.status),
            price_label: format_price(record.price),
        }
    }

    pub fn title(&self) -> String {
        format!("Unit {}", self.code)
    }
}
