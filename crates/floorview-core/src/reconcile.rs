//! Diagram reconciler.
//!
//! Every change to the document, the filter or the selection runs a full
//! pass: the immutable base document is walked in order and a fresh
//! [`Scene`] is built, replacing the previous one wholesale. Hover is the
//! exception; it only touches the emphasis overlay and the interaction
//! state, never the scene.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::document::{self, DiagramDocument, RegionId};
use crate::error::CoreError;
use crate::model::{FilterState, InteractionState, Point, PointerEvent, UnitCode, UnitRecord};
use crate::registry::UnitRegistry;
use crate::style::{StatusStyle, status_style};
use crate::tooltip::{TOOLTIP_OFFSET, Tooltip};

// ── Scene ───────────────────────────────────────────────────────────

/// Why a region takes no part in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InertReason {
    /// Code attribute is not a non-negative integer.
    MalformedCode,
    /// No record carries the code.
    UnknownCode,
    /// An earlier region already represents the code.
    DuplicateCode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RegionState {
    /// Emitted as authored: no style, no bindings.
    Inert { reason: InertReason },
    /// Matched but filtered out: not displayed, not interactive.
    Hidden { record: UnitRecord },
    /// Styled, focusable and bound to its record code.
    Shown {
        record: UnitRecord,
        style: StatusStyle,
        description: String,
    },
}

/// One region's assignment in a pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRegion {
    pub id: RegionId,
    pub code: Option<UnitCode>,
    pub state: RegionState,
    /// Carries the persistent selection marker.
    pub selected: bool,
}

impl RenderedRegion {
    pub fn record(&self) -> Option<&UnitRecord> {
        match &self.state {
            RegionState::Inert { .. } => None,
            RegionState::Hidden { record } | RegionState::Shown { record, .. } => Some(record),
        }
    }

    pub fn is_shown(&self) -> bool {
        matches!(self.state, RegionState::Shown { .. })
    }
}

/// Interaction handler attached to a shown region for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub code: UnitCode,
}

/// Pointer and keyboard events a host routes to a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionEvent {
    Enter(PointerEvent),
    Move(PointerEvent),
    Leave,
    /// Click, or Enter/Space on the focused region.
    Activate,
}

/// Result of activating a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Selected(UnitCode),
    Deselected(UnitCode),
    Moved { from: UnitCode, to: UnitCode },
    /// The code had no live binding.
    Ignored,
}

/// Output of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pass: u64,
    regions: Vec<RenderedRegion>,
    bindings: BTreeMap<RegionId, Binding>,
    #[serde(skip)]
    by_code: HashMap<UnitCode, RegionId>,
}

impl Scene {
    /// Sequence number of the pass that produced this scene.
    pub fn pass(&self) -> u64 {
        self.pass
    }

    /// Every region of the document, in document order.
    pub fn regions(&self) -> &[RenderedRegion] {
        &self.regions
    }

    pub fn region(&self, id: RegionId) -> Option<&RenderedRegion> {
        self.regions.get(id.index())
    }

    pub fn bindings(&self) -> &BTreeMap<RegionId, Binding> {
        &self.bindings
    }

    pub fn binding(&self, id: RegionId) -> Option<Binding> {
        self.bindings.get(&id).copied()
    }

    /// The region currently bound to `code`, if any.
    pub fn bound_region(&self, code: UnitCode) -> Option<RegionId> {
        self.by_code.get(&code).copied()
    }

    pub fn is_bound(&self, code: UnitCode) -> bool {
        self.by_code.contains_key(&code)
    }

    pub fn shown(&self) -> impl Iterator<Item = &RenderedRegion> {
        self.regions.iter().filter(|r| r.is_shown())
    }

    /// Regions in keyboard focus order (document order, shown only).
    pub fn focus_order(&self) -> Vec<RegionId> {
        self.bindings.keys().copied().collect()
    }

    pub fn selected_region(&self) -> Option<&RenderedRegion> {
        self.regions.iter().find(|r| r.selected)
    }
}

// ── Reconciler ──────────────────────────────────────────────────────

pub struct Reconciler {
    registry: Arc<UnitRegistry>,
    document: Option<DiagramDocument>,
    interaction: InteractionState,
    scene: Scene,
    emphasized: BTreeSet<RegionId>,
    container_origin: Point,
    passes: u64,
}

impl Reconciler {
    pub fn new(registry: Arc<UnitRegistry>) -> Self {
        Self {
            registry,
            document: None,
            interaction: InteractionState::default(),
            scene: Scene::default(),
            emphasized: BTreeSet::new(),
            container_origin: Point::default(),
            passes: 0,
        }
    }

    pub fn registry(&self) -> &Arc<UnitRegistry> {
        &self.registry
    }

    pub fn document(&self) -> Option<&DiagramDocument> {
        self.document.as_ref()
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Regions carrying the transient hover emphasis.
    pub fn emphasized(&self) -> &BTreeSet<RegionId> {
        &self.emphasized
    }

    pub fn is_emphasized(&self, id: RegionId) -> bool {
        self.emphasized.contains(&id)
    }

    /// Origin of the diagram container in client coordinates.
    pub fn set_container_origin(&mut self, origin: Point) {
        self.container_origin = origin;
    }

    pub fn container_origin(&self) -> Point {
        self.container_origin
    }

    /// Install a new base document and run a pass over it.
    ///
    /// Hover refers to the old document's regions and is dropped; the
    /// selection is kept.
    pub fn set_document(&mut self, document: DiagramDocument, filter: &FilterState) -> &Scene {
        self.document = Some(document);
        self.interaction.clear_hover();
        self.reconcile(filter)
    }

    /// Run a full pass and replace the scene.
    pub fn reconcile(&mut self, filter: &FilterState) -> &Scene {
        self.passes += 1;
        let scene = match &self.document {
            Some(document) => build_scene(
                self.passes,
                document,
                &self.registry,
                filter,
                self.interaction.selected().map(|r| r.code),
            ),
            None => Scene {
                pass: self.passes,
                ..Scene::default()
            },
        };

        debug!(
            pass = scene.pass,
            regions = scene.regions.len(),
            bound = scene.bindings.len(),
            "reconciled diagram"
        );

        self.emphasized.clear();
        self.scene = scene;

        // Hover only ever refers to a live binding.
        if let Some(hovered) = self.interaction.hovered().map(|r| r.code) {
            if !self.scene.is_bound(hovered) {
                trace!(code = %hovered, "hovered unit no longer bound");
                self.interaction.clear_hover();
            }
        }
        &self.scene
    }

    /// Route an event through the current pass's bindings.
    ///
    /// Returns the selection change for `Activate`, `None` otherwise.
    pub fn dispatch(
        &mut self,
        region: RegionId,
        event: RegionEvent,
        filter: &FilterState,
    ) -> Option<SelectionChange> {
        let Some(Binding { code }) = self.scene.binding(region) else {
            trace!(%region, "event for unbound region ignored");
            return match event {
                RegionEvent::Activate => Some(SelectionChange::Ignored),
                _ => None,
            };
        };
        match event {
            RegionEvent::Enter(pointer) => {
                self.hover_enter(code, pointer);
                None
            }
            RegionEvent::Move(pointer) => {
                self.hover_move(code, pointer);
                None
            }
            RegionEvent::Leave => {
                self.hover_leave(code);
                None
            }
            RegionEvent::Activate => Some(self.activate(code, filter)),
        }
    }

    /// Pointer entered the region bound to `code`. Returns whether it applied.
    pub fn hover_enter(&mut self, code: UnitCode, pointer: PointerEvent) -> bool {
        let Some((id, record)) = self.live(code) else {
            trace!(%code, "hover for unbound code ignored");
            return false;
        };
        // Entering a new region implies leaving any other.
        let scene = &self.scene;
        self.emphasized.retain(|other| {
            *other == id || scene.region(*other).is_some_and(|r| r.selected)
        });
        self.apply_hover(id, record, pointer);
        trace!(%code, "hover enter");
        true
    }

    pub fn hover_move(&mut self, code: UnitCode, pointer: PointerEvent) -> bool {
        let Some((id, record)) = self.live(code) else {
            return false;
        };
        self.apply_hover(id, record, pointer);
        true
    }

    pub fn hover_leave(&mut self, code: UnitCode) -> bool {
        let Some(id) = self.scene.bound_region(code) else {
            trace!(%code, "leave for unbound code ignored");
            return false;
        };
        if self.interaction.hovered().is_some_and(|r| r.code == code) {
            self.interaction.clear_hover();
        }
        let selected = self.scene.region(id).is_some_and(|r| r.selected);
        if !selected {
            self.emphasized.remove(&id);
        }
        trace!(%code, "hover leave");
        true
    }

    /// Click or keyboard activation. Toggles or moves the selection and
    /// runs a pass.
    pub fn activate(&mut self, code: UnitCode, filter: &FilterState) -> SelectionChange {
        let Some((_, record)) = self.live(code) else {
            trace!(%code, "activation for unbound code ignored");
            return SelectionChange::Ignored;
        };
        let previous = self.interaction.selected().map(|r| r.code);
        let change = match previous {
            Some(current) if current == code => {
                self.interaction.set_selected(None);
                SelectionChange::Deselected(code)
            }
            Some(from) => {
                self.interaction.set_selected(Some(record));
                SelectionChange::Moved { from, to: code }
            }
            None => {
                self.interaction.set_selected(Some(record));
                SelectionChange::Selected(code)
            }
        };
        debug!(?change, "selection changed");
        self.reconcile(filter);
        change
    }

    /// Drop the selection whether or not its region is currently shown.
    pub fn clear_selection(&mut self, filter: &FilterState) -> Option<UnitRecord> {
        let cleared = self.interaction.selected().cloned()?;
        self.interaction.set_selected(None);
        debug!(code = %cleared.code, "selection cleared");
        self.reconcile(filter);
        Some(cleared)
    }

    /// Topmost shown region under `point` (diagram user space).
    ///
    /// Later elements paint over earlier ones, so the search runs in
    /// reverse document order.
    pub fn hit_test(&self, point: Point) -> Option<(RegionId, UnitCode)> {
        let document = self.document.as_ref()?;
        document.regions().iter().rev().find_map(|region| {
            let binding = self.scene.binding(region.id)?;
            region.shape.contains(point).then_some((region.id, binding.code))
        })
    }

    /// Info card for the hovered unit at the default offset.
    pub fn tooltip(&self) -> Option<Tooltip> {
        self.tooltip_with_offset(TOOLTIP_OFFSET)
    }

    pub fn tooltip_with_offset(&self, offset: (f64, f64)) -> Option<Tooltip> {
        let record = self.interaction.hovered()?;
        let pointer = self.interaction.pointer()?;
        Some(Tooltip::new(record, pointer, offset))
    }

    /// Current scene plus hover overlay as SVG. `None` before a document
    /// has been loaded.
    pub fn render_svg(&self) -> Result<Option<String>, CoreError> {
        let Some(document) = &self.document else {
            return Ok(None);
        };
        document::write_svg(document, &self.scene, &self.emphasized).map(Some)
    }

    fn live(&self, code: UnitCode) -> Option<(RegionId, UnitRecord)> {
        let id = self.scene.bound_region(code)?;
        let record = self.scene.region(id)?.record()?.clone();
        Some((id, record))
    }

    fn apply_hover(&mut self, id: RegionId, record: UnitRecord, pointer: PointerEvent) {
        let local = pointer.client.relative_to(self.container_origin);
        let selected = self.scene.region(id).is_some_and(|r| r.selected);
        if !selected {
            self.emphasized.insert(id);
        }
        self.interaction.set_hover(record, local);
    }
}

fn build_scene(
    pass: u64,
    document: &DiagramDocument,
    registry: &UnitRegistry,
    filter: &FilterState,
    selected: Option<UnitCode>,
) -> Scene {
    let mut regions = Vec::with_capacity(document.regions().len());
    let mut bindings = BTreeMap::new();
    let mut by_code = HashMap::new();

    for region in document.regions() {
        let state = match region.code {
            None => RegionState::Inert {
                reason: InertReason::MalformedCode,
            },
            Some(_) if !document.is_primary(region) => RegionState::Inert {
                reason: InertReason::DuplicateCode,
            },
            Some(code) => match registry.lookup(code) {
                None => RegionState::Inert {
                    reason: InertReason::UnknownCode,
                },
                Some(record) if filter.admits(record) => {
                    bindings.insert(region.id, Binding { code });
                    by_code.insert(code, region.id);
                    RegionState::Shown {
                        record: record.clone(),
                        style: status_style(record.status),
                        description: record.description(),
                    }
                }
                Some(record) => RegionState::Hidden {
                    record: record.clone(),
                },
            },
        };
        let selected = match &state {
            RegionState::Inert { .. } => false,
            RegionState::Hidden { record } | RegionState::Shown { record, .. } => {
                selected == Some(record.code)
            }
        };
        regions.push(RenderedRegion {
            id: region.id,
            code: region.code,
            state,
            selected,
        });
    }

    Scene {
        pass,
        regions,
        bindings,
        by_code,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::UnitStatus;
    use pretty_assertions::assert_eq;

    const PLAN: &str = r#"<svg viewBox="0 0 300 100">
        <polygon points="0,0 100,0 100,100 0,100" data-code="101"/>
        <polygon points="100,0 200,0 200,100 100,100" data-code="102"/>
        <polygon points="200,0 300,0 300,100 200,100" data-code="999"/>
    </svg>"#;

    fn reconciler() -> Reconciler {
        let registry = UnitRegistry::new([
            UnitRecord::new(101, UnitStatus::Available, 50_000.0),
            UnitRecord::new(102, UnitStatus::Sold, 90_000.0),
        ]);
        let mut reconciler = Reconciler::new(Arc::new(registry));
        reconciler.set_document(DiagramDocument::parse(PLAN).unwrap(), &FilterState::default());
        reconciler
    }

    #[test]
    fn unknown_code_is_inert() {
        let r = reconciler();
        let third = &r.scene().regions()[2];
        assert_eq!(
            third.state,
            RegionState::Inert {
                reason: InertReason::UnknownCode
            }
        );
        assert!(!r.scene().is_bound(UnitCode::new(999)));
    }

    #[test]
    fn passes_are_numbered() {
        let mut r = reconciler();
        assert_eq!(r.scene().pass(), 1);
        r.reconcile(&FilterState::default());
        assert_eq!(r.scene().pass(), 2);
    }

    #[test]
    fn pass_without_document_is_empty() {
        let mut r = Reconciler::new(Arc::new(UnitRegistry::default()));
        assert!(r.reconcile(&FilterState::default()).regions().is_empty());
        assert_eq!(r.render_svg().unwrap(), None);
    }

    #[test]
    fn dispatch_routes_by_region() {
        let mut r = reconciler();
        let filter = FilterState::default();
        let first = r.scene().regions()[0].id;
        assert_eq!(
            r.dispatch(first, RegionEvent::Enter(PointerEvent::at(5.0, 5.0)), &filter),
            None
        );
        assert_eq!(r.interaction().hovered().unwrap().code, UnitCode::new(101));
        assert_eq!(
            r.dispatch(first, RegionEvent::Activate, &filter),
            Some(SelectionChange::Selected(UnitCode::new(101)))
        );
        let inert = r.scene().regions()[2].id;
        assert_eq!(
            r.dispatch(inert, RegionEvent::Activate, &filter),
            Some(SelectionChange::Ignored)
        );
    }

    #[test]
    fn entering_another_region_moves_emphasis() {
        let mut r = reconciler();
        r.hover_enter(UnitCode::new(101), PointerEvent::at(1.0, 1.0));
        r.hover_enter(UnitCode::new(102), PointerEvent::at(150.0, 1.0));
        let ids: Vec<usize> = r.emphasized().iter().map(|id| id.index()).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn pass_drops_hover_on_hidden_unit() {
        let mut r = reconciler();
        r.hover_enter(UnitCode::new(102), PointerEvent::at(150.0, 1.0));
        let mut filter = FilterState::default();
        filter.toggle_status(UnitStatus::Sold);
        r.reconcile(&filter);
        assert!(r.interaction().hovered().is_none());
        assert!(r.tooltip().is_none());
        assert!(r.emphasized().is_empty());
    }

    #[test]
    fn hit_test_skips_hidden_and_inert() {
        let mut r = reconciler();
        assert_eq!(
            r.hit_test(Point::new(50.0, 50.0)).map(|(_, c)| c),
            Some(UnitCode::new(101))
        );
        assert_eq!(r.hit_test(Point::new(250.0, 50.0)), None);
        r.reconcile(&FilterState::new([UnitStatus::Available], 60_000.0));
        assert_eq!(r.hit_test(Point::new(150.0, 50.0)), None);
    }

    #[test]
    fn clear_selection_works_while_hidden() {
        let mut r = reconciler();
        let mut filter = FilterState::default();
        r.activate(UnitCode::new(102), &filter);
        filter.set_price_ceiling(10_000.0);
        r.reconcile(&filter);
        assert!(r.scene().regions()[1].selected);
        let cleared = r.clear_selection(&filter).unwrap();
        assert_eq!(cleared.code, UnitCode::new(102));
        assert!(r.scene().selected_region().is_none());
        assert_eq!(r.clear_selection(&filter), None);
    }

    #[test]
    fn focus_order_follows_document() {
        let r = reconciler();
        let order: Vec<usize> = r.scene().focus_order().iter().map(|id| id.index()).collect();
        assert_eq!(order, vec![0, 1]);
    }
}
