// ── Pointer interaction state ──

use serde::Serialize;

use super::geometry::Point;
use super::unit::UnitRecord;

/// A pointer sample in the host's global (client) coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub client: Point,
}

impl PointerEvent {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            client: Point::new(x, y),
        }
    }
}

/// Ephemeral hover/selection state owned by the reconciler.
///
/// `hovered` and `pointer` are always set and cleared together. `selected`
/// is independent of both and survives filter changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InteractionState {
    hovered: Option<UnitRecord>,
    selected: Option<UnitRecord>,
    pointer: Option<Point>,
}

impl InteractionState {
    pub fn hovered(&self) -> Option<&UnitRecord> {
        self.hovered.as_ref()
    }

    pub fn selected(&self) -> Option<&UnitRecord> {
        self.selected.as_ref()
    }

    /// Pointer position in container-local coordinates.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn is_selected(&self, record: &UnitRecord) -> bool {
        self.selected.as_ref().is_some_and(|s| s.code == record.code)
    }

    pub(crate) fn set_hover(&mut self, record: UnitRecord, pointer: Point) {
        self.hovered = Some(record);
        self.pointer = Some(pointer);
    }

    pub(crate) fn clear_hover(&mut self) {
        self.hovered = None;
        self.pointer = None;
    }

    pub(crate) fn set_selected(&mut self, record: Option<UnitRecord>) {
        self.selected = record;
    }
}
