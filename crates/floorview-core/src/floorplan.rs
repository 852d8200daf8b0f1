//! Top-level owner of a floor plan: the filter state and the reconciler.
//!
//! Front-ends hold one `FloorPlan` and forward control changes and pointer
//! events to it. Every filter or selection change runs a reconciliation
//! pass before returning.

use std::sync::Arc;

use crate::document::{DiagramDocument, RegionId};
use crate::error::CoreError;
use crate::model::{
    FilterState, InteractionState, Point, PointerEvent, UnitCode, UnitRecord, UnitStatus,
};
use crate::reconcile::{Reconciler, RegionEvent, Scene, SelectionChange};
use crate::registry::UnitRegistry;
use crate::tooltip::Tooltip;

pub struct FloorPlan {
    filter: FilterState,
    reconciler: Reconciler,
}

impl FloorPlan {
    pub fn new(registry: Arc<UnitRegistry>) -> Self {
        Self::with_filter(registry, FilterState::default())
    }

    pub fn with_filter(registry: Arc<UnitRegistry>, filter: FilterState) -> Self {
        Self {
            filter,
            reconciler: Reconciler::new(registry),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn registry(&self) -> &Arc<UnitRegistry> {
        self.reconciler.registry()
    }

    pub fn document(&self) -> Option<&DiagramDocument> {
        self.reconciler.document()
    }

    pub fn is_loaded(&self) -> bool {
        self.reconciler.document().is_some()
    }

    pub fn scene(&self) -> &Scene {
        self.reconciler.scene()
    }

    pub fn interaction(&self) -> &InteractionState {
        self.reconciler.interaction()
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn is_emphasized(&self, id: RegionId) -> bool {
        self.reconciler.is_emphasized(id)
    }

    /// Whether `record` passes the current filter.
    pub fn admits(&self, record: &UnitRecord) -> bool {
        self.filter.admits(record)
    }

    // ── Document ─────────────────────────────────────────────────────

    pub fn load_document(&mut self, document: DiagramDocument) -> &Scene {
        self.reconciler.set_document(document, &self.filter)
    }

    pub fn set_container_origin(&mut self, origin: Point) {
        self.reconciler.set_container_origin(origin);
    }

    // ── Filter protocol ──────────────────────────────────────────────

    /// Flip one status; returns the new membership.
    pub fn toggle_status(&mut self, status: UnitStatus) -> bool {
        let now = self.filter.toggle_status(status);
        self.reconciler.reconcile(&self.filter);
        now
    }

    pub fn set_price_ceiling(&mut self, ceiling: f64) {
        self.filter.set_price_ceiling(ceiling);
        self.reconciler.reconcile(&self.filter);
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.reconciler.reconcile(&self.filter);
    }

    // ── Interaction protocol ─────────────────────────────────────────

    pub fn hover_enter(&mut self, code: UnitCode, pointer: PointerEvent) -> bool {
        self.reconciler.hover_enter(code, pointer)
    }

    pub fn hover_move(&mut self, code: UnitCode, pointer: PointerEvent) -> bool {
        self.reconciler.hover_move(code, pointer)
    }

    pub fn hover_leave(&mut self, code: UnitCode) -> bool {
        self.reconciler.hover_leave(code)
    }

    pub fn activate(&mut self, code: UnitCode) -> SelectionChange {
        self.reconciler.activate(code, &self.filter)
    }

    pub fn clear_selection(&mut self) -> Option<UnitRecord> {
        self.reconciler.clear_selection(&self.filter)
    }

    pub fn dispatch(&mut self, region: RegionId, event: RegionEvent) -> Option<SelectionChange> {
        self.reconciler.dispatch(region, event, &self.filter)
    }

    /// Topmost interactive region under a point in diagram user space.
    pub fn hit_test(&self, point: Point) -> Option<(RegionId, UnitCode)> {
        self.reconciler.hit_test(point)
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        self.reconciler.tooltip()
    }

    pub fn tooltip_with_offset(&self, offset: (f64, f64)) -> Option<Tooltip> {
        self.reconciler.tooltip_with_offset(offset)
    }

    // ── Keyboard focus ───────────────────────────────────────────────

    /// Next interactive region after `current`, wrapping around.
    pub fn focus_next(&self, current: Option<RegionId>) -> Option<RegionId> {
        let order = self.scene().focus_order();
        let next = match current.and_then(|id| order.iter().position(|o| *o == id)) {
            Some(pos) => (pos + 1) % order.len(),
            None => 0,
        };
        order.get(next).copied()
    }

    /// Previous interactive region before `current`, wrapping around.
    pub fn focus_prev(&self, current: Option<RegionId>) -> Option<RegionId> {
        let order = self.scene().focus_order();
        let prev = match current.and_then(|id| order.iter().position(|o| *o == id)) {
            Some(0) | None => order.len().checked_sub(1)?,
            Some(pos) => pos - 1,
        };
        order.get(prev).copied()
    }

    // ── Output ───────────────────────────────────────────────────────

    pub fn render_svg(&self) -> Result<Option<String>, CoreError> {
        self.reconciler.render_svg()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn plan() -> FloorPlan {
        let registry = UnitRegistry::new([
            UnitRecord::new(1, UnitStatus::Available, 10.0),
            UnitRecord::new(2, UnitStatus::Reserved, 20.0),
            UnitRecord::new(3, UnitStatus::Sold, 30.0),
        ]);
        let mut plan = FloorPlan::new(Arc::new(registry));
        plan.load_document(
            DiagramDocument::parse(
                r#"<svg>
                    <rect width="1" height="1" data-code="1"/>
                    <rect x="1" width="1" height="1" data-code="2"/>
                    <rect x="2" width="1" height="1" data-code="3"/>
                </svg>"#,
            )
            .unwrap(),
        );
        plan
    }

    fn idx(id: Option<RegionId>) -> Option<usize> {
        id.map(RegionId::index)
    }

    #[test]
    fn focus_cycles_through_shown_regions() {
        let mut plan = plan();
        assert_eq!(idx(plan.focus_next(None)), Some(0));
        assert_eq!(idx(plan.focus_next(plan.focus_next(None))), Some(1));
        assert_eq!(idx(plan.focus_prev(None)), Some(2));

        plan.toggle_status(UnitStatus::Reserved);
        let first = plan.focus_next(None);
        assert_eq!(idx(plan.focus_next(first)), Some(2));
        assert_eq!(idx(plan.focus_prev(first)), Some(2));
    }

    #[test]
    fn focus_is_empty_when_nothing_shown() {
        let mut plan = plan();
        plan.set_filter(FilterState::new(Vec::<UnitStatus>::new(), 100.0));
        assert_eq!(plan.focus_next(None), None);
        assert_eq!(plan.focus_prev(None), None);
    }

    #[test]
    fn toggle_reports_membership_and_reconciles() {
        let mut plan = plan();
        let pass = plan.scene().pass();
        assert!(!plan.toggle_status(UnitStatus::Sold));
        assert_eq!(plan.scene().pass(), pass + 1);
        assert!(plan.toggle_status(UnitStatus::Sold));
    }

    #[test]
    fn unloaded_plan_renders_nothing() {
        let plan = FloorPlan::new(Arc::new(UnitRegistry::default()));
        assert!(!plan.is_loaded());
        assert_eq!(plan.render_svg().unwrap(), None);
    }
}
