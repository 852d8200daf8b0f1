#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::sync::Arc;

use floorview_core::{
    DiagramDocument, FilterState, FloorPlan, InertReason, Point, PointerEvent, RegionState,
    SelectionChange, UnitCode, UnitRecord, UnitRegistry, UnitStatus,
};
use pretty_assertions::assert_eq;

const PLAN: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 100">
  <g id="units">
    <polygon points="0,0 100,0 100,100 0,100" data-code="101"/>
    <polygon points="100,0 200,0 200,100 100,100" data-code="102"/>
    <rect x="0" y="90" width="10" height="10" data-code="103"/>
    <path d="M0 0" data-code="not-a-number"/>
  </g>
</svg>"#;

fn registry() -> UnitRegistry {
    UnitRegistry::new([
        UnitRecord::new(101, UnitStatus::Available, 50_000.0),
        UnitRecord::new(102, UnitStatus::Sold, 90_000.0),
        UnitRecord::new(103, UnitStatus::Reserved, 75_000.0),
    ])
}

fn loaded() -> FloorPlan {
    let mut plan = FloorPlan::new(Arc::new(registry()));
    plan.load_document(DiagramDocument::parse(PLAN).unwrap());
    plan
}

fn code(n: u32) -> UnitCode {
    UnitCode::new(n)
}

/// Codes of shown regions, in document order.
fn shown(plan: &FloorPlan) -> Vec<u32> {
    plan.scene()
        .shown()
        .filter_map(|r| r.code)
        .map(UnitCode::get)
        .collect()
}

fn selected(plan: &FloorPlan) -> Vec<u32> {
    plan.scene()
        .regions()
        .iter()
        .filter(|r| r.selected)
        .filter_map(|r| r.code)
        .map(UnitCode::get)
        .collect()
}

// ── Visibility ──────────────────────────────────────────────────────

#[test]
fn visibility_matches_filter_for_every_state() {
    let registry = registry();
    let mut plan = loaded();
    let ceilings = [0.0, 50_000.0, 60_000.0, 75_000.0, 90_000.0, 100_000.0];
    // Every subset of the three statuses.
    for mask in 0u8..8 {
        let statuses: Vec<UnitStatus> = UnitStatus::ALL
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, s)| *s)
            .collect();
        for ceiling in ceilings {
            let filter = FilterState::new(statuses.clone(), ceiling);
            plan.set_filter(filter.clone());
            let expected: Vec<u32> = [101, 102, 103]
                .into_iter()
                .filter(|c| filter.admits(registry.lookup(code(*c)).unwrap()))
                .collect();
            assert_eq!(shown(&plan), expected, "statuses {statuses:?} ceiling {ceiling}");
            assert_eq!(plan.scene().bindings().len(), expected.len());
        }
    }
}

#[test]
fn scenario_a_default_filter_styles_by_status() {
    let plan = loaded();
    assert_eq!(shown(&plan), vec![101, 102, 103]);
    let regions = plan.scene().regions();
    let RegionState::Shown { style, .. } = &regions[0].state else {
        panic!("101 should be shown");
    };
    assert_eq!((style.fill, style.stroke), ("#e6f0ff", "#3271cc"));
    let RegionState::Shown { style, .. } = &regions[1].state else {
        panic!("102 should be shown");
    };
    assert_eq!((style.fill, style.stroke), ("#ffe6e6", "#ff0000"));
}

#[test]
fn scenario_b_ceiling_hides_expensive_units() {
    let mut plan = loaded();
    plan.set_price_ceiling(60_000.0);
    assert_eq!(shown(&plan), vec![101]);
    assert!(matches!(
        plan.scene().regions()[1].state,
        RegionState::Hidden { .. }
    ));
    assert!(!plan.hover_enter(code(102), PointerEvent::at(150.0, 50.0)));
    assert_eq!(plan.activate(code(102)), SelectionChange::Ignored);
}

#[test]
fn zero_statuses_hides_everything() {
    let mut plan = loaded();
    for status in UnitStatus::ALL {
        plan.toggle_status(status);
    }
    assert!(shown(&plan).is_empty());
    assert!(plan.scene().bindings().is_empty());
}

#[test]
fn malformed_code_stays_inert() {
    let plan = loaded();
    let path = &plan.scene().regions()[3];
    assert_eq!(path.code, None);
    assert!(matches!(path.state, RegionState::Inert { .. }));
}

#[test]
fn duplicate_code_binds_only_first_region() {
    let mut plan = FloorPlan::new(Arc::new(UnitRegistry::new([UnitRecord::new(
        7,
        UnitStatus::Available,
        10_000.0,
    )])));
    plan.load_document(
        DiagramDocument::parse(
            r#"<svg viewBox="0 0 40 10">
  <polygon points="0,0 10,0 10,10 0,10" data-code="7"/>
  <polygon points="20,0 30,0 30,10 20,10" data-code="7" fill="x"/>
</svg>"#,
        )
        .unwrap(),
    );

    let [first, second] = plan.scene().regions() else {
        panic!("expected two regions");
    };
    let (first, second) = (first.id, second.id);
    assert!(plan.scene().region(first).unwrap().is_shown());
    assert_eq!(
        plan.scene().region(second).unwrap().state,
        RegionState::Inert {
            reason: InertReason::DuplicateCode
        }
    );
    assert!(plan.scene().binding(second).is_none());
    assert_eq!(plan.scene().bound_region(code(7)), Some(first));
    assert_eq!(plan.hit_test(Point::new(25.0, 5.0)), None);
    assert_eq!(plan.hit_test(Point::new(5.0, 5.0)), Some((first, code(7))));

    plan.activate(code(7));
    assert_eq!(selected(&plan), vec![7]);
    assert!(!plan.scene().region(second).unwrap().selected);

    let svg = plan.render_svg().unwrap().unwrap();
    assert!(svg.contains(r#"<polygon points="20,0 30,0 30,10 20,10" data-code="7" fill="x"/>"#));
}

// ── Hover ───────────────────────────────────────────────────────────

#[test]
fn scenario_c_hover_positions_tooltip() {
    let mut plan = loaded();
    plan.set_container_origin(Point::new(100.0, 200.0));
    assert!(plan.hover_enter(code(101), PointerEvent::at(140.0, 260.0)));

    let interaction = plan.interaction();
    assert_eq!(interaction.hovered().unwrap().code, code(101));
    assert_eq!(interaction.pointer(), Some(Point::new(40.0, 60.0)));

    let card = plan.tooltip().unwrap();
    assert_eq!(card.anchor, Point::new(60.0, 40.0));
    assert_eq!(card.status_label, "Available");
    assert_eq!(card.price_label, "$50,000");
}

#[test]
fn hover_leave_clears_tooltip() {
    let mut plan = loaded();
    plan.hover_enter(code(101), PointerEvent::at(1.0, 1.0));
    plan.hover_move(code(101), PointerEvent::at(2.0, 3.0));
    assert_eq!(plan.interaction().pointer(), Some(Point::new(2.0, 3.0)));
    assert!(plan.hover_leave(code(101)));
    assert!(plan.interaction().hovered().is_none());
    assert!(plan.interaction().pointer().is_none());
    assert!(plan.tooltip().is_none());
}

#[test]
fn hover_does_not_rebuild_scene() {
    let mut plan = loaded();
    let pass = plan.scene().pass();
    plan.hover_enter(code(101), PointerEvent::at(1.0, 1.0));
    plan.hover_leave(code(101));
    assert_eq!(plan.scene().pass(), pass);
}

#[test]
fn hover_emphasis_suppressed_on_selected_region() {
    let mut plan = loaded();
    let first = plan.scene().regions()[0].id;

    plan.hover_enter(code(101), PointerEvent::at(1.0, 1.0));
    assert!(plan.is_emphasized(first));

    plan.activate(code(101));
    assert!(!plan.is_emphasized(first));
    plan.hover_enter(code(101), PointerEvent::at(1.0, 1.0));
    assert!(!plan.is_emphasized(first));
    assert_eq!(plan.interaction().hovered().unwrap().code, code(101));

    let svg = plan.render_svg().unwrap().unwrap();
    assert!(!svg.contains("brightness(1.2)"));
}

#[test]
fn hover_emphasis_is_written_to_svg() {
    let mut plan = loaded();
    plan.hover_enter(code(102), PointerEvent::at(150.0, 50.0));
    let svg = plan.render_svg().unwrap().unwrap();
    assert_eq!(svg.matches("brightness(1.2)").count(), 1);
    plan.hover_leave(code(102));
    let svg = plan.render_svg().unwrap().unwrap();
    assert!(!svg.contains("brightness(1.2)"));
}

// ── Selection ───────────────────────────────────────────────────────

#[test]
fn scenario_d_click_moves_marker() {
    let mut plan = loaded();
    assert_eq!(plan.activate(code(101)), SelectionChange::Selected(code(101)));
    assert_eq!(
        plan.activate(code(102)),
        SelectionChange::Moved {
            from: code(101),
            to: code(102)
        }
    );
    assert_eq!(selected(&plan), vec![102]);
    assert_eq!(plan.interaction().selected().unwrap().code, code(102));
}

#[test]
fn scenario_e_click_twice_deselects() {
    let mut plan = loaded();
    plan.activate(code(101));
    assert_eq!(plan.activate(code(101)), SelectionChange::Deselected(code(101)));
    assert!(selected(&plan).is_empty());
    assert!(plan.interaction().selected().is_none());
}

#[test]
fn selection_survives_filter_that_hides_it() {
    let mut plan = loaded();
    plan.activate(code(102));
    plan.toggle_status(UnitStatus::Sold);
    assert_eq!(plan.interaction().selected().unwrap().code, code(102));
    assert!(!shown(&plan).contains(&102));

    plan.toggle_status(UnitStatus::Sold);
    assert_eq!(selected(&plan), vec![102]);
    assert!(shown(&plan).contains(&102));
}

#[test]
fn never_more_than_one_marker() {
    let mut plan = loaded();
    for c in [101, 102, 103, 103, 101, 102, 102, 101] {
        plan.activate(code(c));
        assert!(selected(&plan).len() <= 1);
    }
}

// ── Determinism ─────────────────────────────────────────────────────

#[test]
fn identical_inputs_yield_identical_assignments() {
    let mut plan = loaded();
    plan.activate(code(103));
    plan.set_price_ceiling(80_000.0);
    let first = plan.scene().clone();
    let first_svg = plan.render_svg().unwrap();

    plan.set_price_ceiling(80_000.0);
    let second = plan.scene();
    assert_ne!(first.pass(), second.pass());
    assert_eq!(first.regions(), second.regions());
    assert_eq!(first.bindings(), second.bindings());
    assert_eq!(first_svg, plan.render_svg().unwrap());
}

// ── Output ──────────────────────────────────────────────────────────

#[test]
fn renders_single_styled_region() {
    let mut plan = FloorPlan::new(Arc::new(UnitRegistry::new([UnitRecord::new(
        101,
        UnitStatus::Available,
        50_000.0,
    )])));
    plan.load_document(
        DiagramDocument::parse(
            r#"<svg viewBox="0 0 100 100"><polygon points="0,0 10,0 10,10" data-code="101"/></svg>"#,
        )
        .unwrap(),
    );
    insta::assert_snapshot!(
        plan.render_svg().unwrap().unwrap(),
        @r##"<svg viewBox="0 0 100 100"><polygon points="0,0 10,0 10,10" data-code="101" fill="#e6f0ff" stroke="#3271cc" stroke-width="1.5" role="button" tabindex="0" aria-label="Unit 101 - available - $50,000" style="display: block; transition: fill 0.3s ease, stroke 0.3s ease, filter 0.3s ease, transform 0.3s ease; cursor: pointer"/></svg>"##
    );
}

#[test]
fn hidden_and_inert_regions_in_output() {
    let mut plan = loaded();
    plan.activate(code(102));
    plan.set_price_ceiling(60_000.0);
    let svg = plan.render_svg().unwrap().unwrap();

    assert!(svg.contains(
        r#"<polygon points="100,0 200,0 200,100 100,100" data-code="102" class="selected" style="display: none"/>"#
    ));
    assert!(svg.contains(r#"<path d="M0 0" data-code="not-a-number"/>"#));
    assert!(svg.contains(r#"<g id="units">"#));
}

#[test]
fn loads_records_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"code": 101, "status": "available", "price": 50000}},
            {{"code": 102, "status": "unknown", "price": 1}},
            {{"code": 103, "status": "sold", "price": 70000.5}}
        ]"#
    )
    .unwrap();
    let reader = std::fs::File::open(file.path()).unwrap();
    let registry = UnitRegistry::from_json_reader(reader).unwrap();
    let codes: Vec<u32> = registry.iter().map(|r| r.code.get()).collect();
    assert_eq!(codes, vec![101, 103]);
}
