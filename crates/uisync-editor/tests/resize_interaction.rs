//! Integration tests: canvas interaction → commands → element tree → text.
//!
//! Drives the resize and move strategies through the sync engine against a
//! scene of absolutely positioned elements.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uisync_core::geom::{CanvasPoint, CanvasRectangle, CanvasVector};
use uisync_core::metadata::{CssPosition, ElementInstanceMetadata, ElementMetadataMap};
use uisync_core::path::ElementPath;
use uisync_core::uid::Uid;
use uisync_editor::commands::CanvasCommand;
use uisync_editor::interaction::{
    ActiveControl, CanvasState, EdgePosition, InteractionSession, InteractionState, Modifiers,
};
use uisync_editor::strategies::{
    AbsoluteResizeBoundingBoxStrategy, CanvasStrategy, StrategyId, default_strategies,
    pick_strategy,
};
use uisync_editor::{SnappingConfig, SyncEngine};

const SCENE: &str = include_str!("fixtures/absolute_scene.jsx");

// ─── Helpers ─────────────────────────────────────────────────────────────

fn path(uid: &str) -> ElementPath {
    if uid == "scene" {
        ElementPath::from_uids(&["scene"])
    } else {
        ElementPath::from_uids(&["scene", uid])
    }
}

fn element(uid: &str, frame: CanvasRectangle, style: Value) -> ElementInstanceMetadata {
    let props = json!({ "style": style });
    ElementInstanceMetadata::new(path(uid), Some(frame))
        .with_position(CssPosition::Absolute)
        .with_parent_bounds(CanvasRectangle::new(0.0, 0.0, 800.0, 600.0))
        .with_props(props.as_object().cloned().unwrap_or_default())
}

/// What the renderer would report for the fixture.
fn scene_metadata() -> ElementMetadataMap {
    let mut scene = ElementInstanceMetadata::new(
        path("scene"),
        Some(CanvasRectangle::new(0.0, 0.0, 800.0, 600.0)),
    )
    .with_position(CssPosition::Relative);
    scene.props = json!({ "style": { "position": "relative", "width": 800, "height": 600 } })
        .as_object()
        .cloned()
        .unwrap_or_default();
    [
        scene,
        element(
            "card-a",
            CanvasRectangle::new(100.0, 50.0, 200.0, 100.0),
            json!({ "position": "absolute", "left": 100, "top": 50, "width": 200, "height": 100 }),
        ),
        element(
            "card-b",
            CanvasRectangle::new(400.0, 50.0, 100.0, 100.0),
            json!({ "position": "absolute", "left": 400, "top": 50, "width": 100, "height": 100 }),
        ),
        element(
            "label",
            CanvasRectangle::new(103.0, 300.0, 50.0, 20.0),
            json!({ "position": "absolute", "left": 103, "top": 300 }),
        ),
        element(
            "anchor",
            CanvasRectangle::new(50.0, 400.0, 20.0, 20.0),
            json!({ "position": "absolute", "left": 50, "top": 400, "width": 20, "height": 20 }),
        ),
    ]
    .into_iter()
    .collect()
}

fn resize(edge: EdgePosition, dx: f64, dy: f64, modifiers: Modifiers) -> InteractionState {
    InteractionState::drag(
        CanvasPoint::new(0.0, 0.0),
        Some(CanvasVector::new(dx, dy)),
        modifiers,
        ActiveControl::ResizeHandle(edge),
    )
}

fn engine() -> SyncEngine {
    SyncEngine::from_text("/scene.jsx", SCENE).expect("fixture parses")
}

/// `(target, pin, px)` of every length adjustment.
fn adjustments(commands: &[CanvasCommand]) -> Vec<(String, String, f64)> {
    commands
        .iter()
        .filter_map(|c| match c {
            CanvasCommand::AdjustCssLengthProperty(a) => Some((
                a.target.last_uid().map(|u| u.to_string()).unwrap_or_default(),
                a.property[1].clone(),
                a.value_px,
            )),
            _ => None,
        })
        .collect()
}

fn adj(target: &str, pin: &str, px: f64) -> (String, String, f64) {
    (target.to_string(), pin.to_string(), px)
}

fn style_number(engine: &SyncEngine, uid: &str, key: &str) -> Option<f64> {
    let element = engine.parsed()?.find_element(Uid::intern(uid))?;
    element.attribute("style")?.get_property(key)?.to_json()?.as_f64()
}

// ─── Applicability ───────────────────────────────────────────────────────

#[test]
fn single_element_needs_alt_and_two_pins_per_side() {
    let engine = engine();
    let metadata = scene_metadata();
    let strategy = AbsoluteResizeBoundingBoxStrategy::default();
    let handle = resize(EdgePosition::BOTTOM_RIGHT, 1.0, 1.0, Modifiers::NONE);
    let with_alt = resize(EdgePosition::BOTTOM_RIGHT, 1.0, 1.0, Modifiers::ALT);

    let card = [path("card-a")];
    let canvas = CanvasState {
        selected_elements: &card,
        project_contents: &engine.project,
        open_file: "/scene.jsx",
        scale: 1.0,
    };
    assert!(!strategy.is_applicable(&canvas, Some(&handle), &metadata));
    assert!(strategy.is_applicable(&canvas, Some(&with_alt), &metadata));

    let label = [path("label")];
    let canvas = CanvasState {
        selected_elements: &label,
        ..canvas
    };
    assert!(!strategy.is_applicable(&canvas, Some(&with_alt), &metadata));

    let relative = [path("card-a"), path("scene")];
    let canvas = CanvasState {
        selected_elements: &relative,
        ..canvas
    };
    assert!(!strategy.is_applicable(&canvas, Some(&handle), &metadata));
}

#[test]
fn fitness_requires_a_resize_handle_drag() {
    let engine = engine();
    let session = InteractionSession::new(scene_metadata());
    let selected = [path("card-a"), path("card-b")];
    let canvas = CanvasState {
        selected_elements: &selected,
        project_contents: &engine.project,
        open_file: "/scene.jsx",
        scale: 1.0,
    };
    let strategies = default_strategies(&SnappingConfig::default());

    let handle = resize(EdgePosition::TOP, 0.0, 4.0, Modifiers::NONE);
    let picked = pick_strategy(&strategies, &canvas, &handle, &session).expect("a strategy fits");
    assert_eq!(picked.id(), StrategyId::AbsoluteResizeBoundingBox);

    let body = InteractionState::drag(
        CanvasPoint::new(0.0, 0.0),
        Some(CanvasVector::new(4.0, 0.0)),
        Modifiers::NONE,
        ActiveControl::BoundingArea,
    );
    let picked = pick_strategy(&strategies, &canvas, &body, &session).expect("a strategy fits");
    assert_eq!(picked.id(), StrategyId::AbsoluteMove);

    let resize_strategy = AbsoluteResizeBoundingBoxStrategy::default();
    assert_eq!(resize_strategy.fitness(&canvas, &body, &session), 0);
    assert_eq!(resize_strategy.fitness(&canvas, &handle, &session), 1);
}

// ─── Resizing ────────────────────────────────────────────────────────────

#[test]
fn zero_drag_emits_no_adjustments() {
    let mut engine = engine();
    let session = engine.begin_interaction(scene_metadata());
    let selected = [path("card-a"), path("card-b")];
    let commands = engine.update_interaction(
        &session,
        &resize(EdgePosition::BOTTOM_RIGHT, 0.0, 0.0, Modifiers::NONE),
        &selected,
        1.0,
    );
    assert!(adjustments(&commands).is_empty());
    assert!(matches!(
        commands.last(),
        Some(CanvasCommand::UpdateHighlightedViews { views, .. }) if views.is_empty()
    ));
    assert_eq!(
        commands
            .iter()
            .filter(|c| matches!(c, CanvasCommand::SetSnappingGuidelines { .. }))
            .count(),
        2
    );
}

#[test]
fn bottom_right_drag_only_grows_the_top_left_element() {
    let mut engine = engine();
    let session = engine.begin_interaction(scene_metadata());
    let selected = [path("card-a"), path("card-b")];
    let commands = engine.update_interaction(
        &session,
        &resize(EdgePosition::BOTTOM_RIGHT, 20.0, 10.0, Modifiers::NONE),
        &selected,
        1.0,
    );
    let card_a: Vec<_> = adjustments(&commands)
        .into_iter()
        .filter(|(t, _, _)| t == "card-a")
        .collect();
    assert_eq!(
        card_a,
        vec![adj("card-a", "width", 10.0), adj("card-a", "height", 10.0)]
    );
}

#[test]
fn top_left_drag_moves_and_grows() {
    let mut engine = engine();
    let session = engine.begin_interaction(scene_metadata());
    let selected = [path("card-a"), path("card-b")];
    let commands = engine.update_interaction(
        &session,
        &resize(EdgePosition::TOP_LEFT, -10.0, -10.0, Modifiers::NONE),
        &selected,
        1.0,
    );
    let card_a: Vec<_> = adjustments(&commands)
        .into_iter()
        .filter(|(t, _, _)| t == "card-a")
        .collect();
    assert_eq!(
        card_a,
        vec![
            adj("card-a", "top", -10.0),
            adj("card-a", "left", -10.0),
            adj("card-a", "width", 5.0),
            adj("card-a", "height", 10.0),
        ]
    );
}

#[test]
fn alt_resize_keeps_the_center() {
    let mut engine = engine();
    let session = engine.begin_interaction(scene_metadata());
    let selected = [path("card-a")];
    let commands = engine.update_interaction(
        &session,
        &resize(EdgePosition::BOTTOM_RIGHT, 10.0, 10.0, Modifiers::ALT),
        &selected,
        1.0,
    );
    assert_eq!(
        adjustments(&commands),
        vec![
            adj("card-a", "top", -10.0),
            adj("card-a", "left", -10.0),
            adj("card-a", "width", 20.0),
            adj("card-a", "height", 20.0),
        ]
    );
}

#[test]
fn left_edge_snaps_within_threshold_only() {
    let selected = [path("card-a"), path("card-b")];
    let drag = resize(EdgePosition::LEFT, -47.0, 0.0, Modifiers::NONE);

    let mut engine = engine();
    let session = engine.begin_interaction(scene_metadata());
    let at_1 = engine.update_interaction(&session, &drag, &selected, 1.0);
    assert!(adjustments(&at_1).contains(&adj("card-a", "left", -50.0)));
    assert!(engine.overlay.guidelines.iter().any(|g| g.activate_snap));

    let at_2 = engine.update_interaction(&session, &drag, &selected, 2.0);
    assert!(adjustments(&at_2).contains(&adj("card-a", "left", -47.0)));
    assert!(engine.overlay.guidelines.is_empty());
}

// ─── Sync ────────────────────────────────────────────────────────────────

#[test]
fn frames_restart_from_the_interaction_base() {
    let mut engine = engine();
    let session = engine.begin_interaction(scene_metadata());
    let selected = [path("card-a")];
    for dx in [5.0, 10.0, 15.0] {
        engine.update_interaction(
            &session,
            &resize(EdgePosition::RIGHT, dx, 0.0, Modifiers::ALT),
            &selected,
            1.0,
        );
    }
    assert_eq!(style_number(&engine, "card-a", "width"), Some(230.0));
    assert_eq!(style_number(&engine, "card-a", "left"), Some(85.0));

    engine.end_interaction();
    assert!(!engine.is_interacting());
    assert!(engine.overlay.guidelines.is_empty());
    let text = engine.current_text().to_string();
    assert!(text.contains("left: 85, top: 50, width: 230, height: 100"));

    let reparsed = SyncEngine::from_text("/scene.jsx", &text).expect("printed code parses");
    assert_eq!(style_number(&reparsed, "card-a", "width"), Some(230.0));
    assert_eq!(
        reparsed.parsed().map(|p| p.all_uids()),
        engine.parsed().map(|p| p.all_uids())
    );
}

#[test]
fn cancelled_interaction_restores_the_tree() {
    let mut engine = engine();
    let session = engine.begin_interaction(scene_metadata());
    engine.update_interaction(
        &session,
        &resize(EdgePosition::BOTTOM_RIGHT, 30.0, 30.0, Modifiers::ALT),
        &[path("card-a")],
        1.0,
    );
    assert_eq!(style_number(&engine, "card-a", "width"), Some(260.0));
    engine.cancel_interaction();
    assert_eq!(style_number(&engine, "card-a", "width"), Some(200.0));
    assert_eq!(engine.current_text(), SCENE);
}

#[test]
fn moving_the_selection_translates_pins() {
    let mut engine = engine();
    let session = engine.begin_interaction(scene_metadata());
    let selected = [path("card-b")];
    let drag = InteractionState::drag(
        CanvasPoint::new(0.0, 0.0),
        Some(CanvasVector::new(30.0, 20.0)),
        Modifiers::NONE,
        ActiveControl::BoundingArea,
    );
    let commands = engine.update_interaction(&session, &drag, &selected, 1.0);
    assert_eq!(
        adjustments(&commands),
        vec![adj("card-b", "top", 20.0), adj("card-b", "left", 30.0)]
    );
    engine.end_interaction();
    assert_eq!(style_number(&engine, "card-b", "left"), Some(430.0));
    assert_eq!(style_number(&engine, "card-b", "top"), Some(70.0));
}
