//! Canvas strategies: how a pointer interaction turns into commands.
//!
//! Every frame of an interaction, each registered strategy scores its
//! fitness for the current input; the fittest one (first registered on a
//! tie) runs. Strategies keep no state between frames: they read the
//! starting metadata of the session, the editor state and the interaction,
//! and return commands.
//!
//! ## Strategies
//!
//! | Strategy | Control | Selection |
//! |----------|---------|-----------|
//! | Absolute resize | resize handle | ≥ 2 elements, or 1 with **Alt** |
//! | Absolute move | bounding area | ≥ 1 element |
//!
//! Both require every selected element to be absolutely positioned and
//! pinned at least twice per axis in its `style` prop.

use crate::commands::{AdjustCssLengthProperty, CanvasCommand, WhenToRun, style_property};
use crate::interaction::{
    ActiveControl, CanvasState, EdgePosition, InteractionSession, InteractionState,
};
use crate::pins::{Axis, Pin, has_at_least_two_pins_per_side, style_pin_value};
use crate::snapping::{
    ResizeSnapping, SnapTargets, SnappingConfig, move_edge, snap_bounding_box, snap_moved_box,
};
use log::trace;
use uisync_core::geom::{
    CanvasRectangle, CanvasVector, all_pins_from_frame, bounding_rectangle_array,
    rectangle_difference, round_to, transform_frame_using_bounding_box,
};
use uisync_core::metadata::ElementMetadataMap;
use uisync_core::model::JsxElement;
use uisync_core::path::ElementPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyId {
    AbsoluteResizeBoundingBox,
    AbsoluteMove,
}

/// A way of handling canvas interactions.
pub trait CanvasStrategy {
    fn id(&self) -> StrategyId;

    fn name(&self) -> &'static str;

    /// Could this strategy handle the current selection at all?
    fn is_applicable(
        &self,
        canvas: &CanvasState<'_>,
        interaction: Option<&InteractionState>,
        metadata: &ElementMetadataMap,
    ) -> bool;

    /// How well the strategy fits this frame of the interaction; 0 means
    /// not at all.
    fn fitness(
        &self,
        canvas: &CanvasState<'_>,
        interaction: &InteractionState,
        session: &InteractionSession,
    ) -> u32;

    /// Commands for this frame.
    fn apply(
        &self,
        canvas: &CanvasState<'_>,
        interaction: &InteractionState,
        session: &InteractionSession,
    ) -> Vec<CanvasCommand>;
}

/// All strategies, in tie-break order.
pub fn default_strategies(snapping: &SnappingConfig) -> Vec<Box<dyn CanvasStrategy>> {
    vec![
        Box::new(AbsoluteResizeBoundingBoxStrategy {
            snapping: snapping.clone(),
        }),
        Box::new(AbsoluteMoveStrategy {
            snapping: snapping.clone(),
        }),
    ]
}

/// The fittest strategy for this frame, or `None` when none fits.
pub fn pick_strategy<'s>(
    strategies: &'s [Box<dyn CanvasStrategy>],
    canvas: &CanvasState<'_>,
    interaction: &InteractionState,
    session: &InteractionSession,
) -> Option<&'s dyn CanvasStrategy> {
    let mut best: Option<(u32, &'s dyn CanvasStrategy)> = None;
    for strategy in strategies {
        let fitness = strategy.fitness(canvas, interaction, session);
        if fitness > 0 && best.is_none_or(|(f, _)| fitness > f) {
            best = Some((fitness, strategy.as_ref()));
        }
    }
    if let Some((fitness, strategy)) = best {
        trace!("picked {} (fitness {fitness})", strategy.name());
    }
    best.map(|(_, s)| s)
}

// ─── Shared helpers ──────────────────────────────────────────────────────

/// Every selected element is absolute and pinned twice per axis.
fn all_absolute_and_pinned(selected: &[ElementPath], metadata: &ElementMetadataMap) -> bool {
    selected.iter().all(|path| {
        metadata
            .get(path)
            .is_some_and(|m| m.is_absolute() && has_at_least_two_pins_per_side(&m.props))
    })
}

/// Union of the selected elements' frames.
pub fn multiselect_bounds(
    metadata: &ElementMetadataMap,
    selected: &[ElementPath],
) -> Option<CanvasRectangle> {
    bounding_rectangle_array(selected.iter().filter_map(|path| metadata.frame(path)))
}

/// Resize `bounding_box` by dragging the handle at `edge` by `drag`.
///
/// The grabbed edge follows the drag; an axis whose handle sits mid-edge is
/// left alone. Center-based resizing moves the opposite edge the other way.
/// The result is normalized, so dragging past the opposite edge flips.
pub fn resize_bounding_box(
    bounding_box: CanvasRectangle,
    drag: CanvasVector,
    edge: EdgePosition,
    center_based: bool,
) -> CanvasRectangle {
    resize_with_handle(bounding_box, drag, edge, center_based).0
}

/// [`resize_bounding_box`], plus the handle of the result that sits under
/// the pointer. On an axis the drag flipped that is the opposite handle.
pub fn resize_with_handle(
    bounding_box: CanvasRectangle,
    drag: CanvasVector,
    edge: EdgePosition,
    center_based: bool,
) -> (CanvasRectangle, EdgePosition) {
    let (x, width) = move_edge(
        bounding_box.x,
        bounding_box.width,
        edge.x,
        drag.x,
        center_based,
    );
    let (y, height) = move_edge(
        bounding_box.y,
        bounding_box.height,
        edge.y,
        drag.y,
        center_based,
    );
    let grabbed = EdgePosition {
        x: if width < 0.0 { edge.x.opposite() } else { edge.x },
        y: if height < 0.0 { edge.y.opposite() } else { edge.y },
    };
    (CanvasRectangle::new(x, y, width, height).normalized(), grabbed)
}

/// Length adjustments that move an element from `original_frame` to
/// `new_frame`, one per pin its `style` attribute defines, in
/// [`Pin::ALL`] order. Pins that do not change are skipped.
pub fn create_resize_commands_from_frame(
    element: &JsxElement,
    target: &ElementPath,
    new_frame: CanvasRectangle,
    original_frame: CanvasRectangle,
    parent_bounds: Option<CanvasRectangle>,
) -> Vec<CanvasCommand> {
    let delta = all_pins_from_frame(rectangle_difference(original_frame, new_frame));
    Pin::ALL
        .into_iter()
        .filter_map(|pin| {
            style_pin_value(element, pin)?;
            let rounded = round_to(pin.value_in(&delta), 0);
            if rounded == 0.0 {
                return None;
            }
            let parent_dimension_px = parent_bounds.map(|b| match pin.axis() {
                Axis::Horizontal => b.width,
                Axis::Vertical => b.height,
            });
            Some(CanvasCommand::AdjustCssLengthProperty(
                AdjustCssLengthProperty {
                    when: WhenToRun::Permanent,
                    target: target.clone(),
                    property: style_property(pin.property_name()),
                    value_px: rounded * pin.direction(),
                    parent_dimension_px,
                    create_if_not_existing: true,
                },
            ))
        })
        .collect()
}

/// Commands moving each selected element along with the selection box from
/// `original_box` to `new_box`, measured against the starting metadata.
/// Elements missing from the metadata or the open file are skipped.
fn commands_for_selection(
    canvas: &CanvasState<'_>,
    session: &InteractionSession,
    new_box: CanvasRectangle,
    original_box: CanvasRectangle,
    per_element: &[CanvasCommand],
) -> Vec<CanvasCommand> {
    let mut commands = Vec::new();
    for path in canvas.selected_elements {
        let element = canvas
            .project_contents
            .find_element(canvas.open_file, path);
        let original_frame = session.starting_metadata.frame(path);
        let (Some(element), Some(original_frame)) = (element, original_frame) else {
            trace!("skipping {path}: no element or no frame");
            continue;
        };
        let new_frame = transform_frame_using_bounding_box(new_box, original_box, original_frame);
        let parent_bounds = session
            .starting_metadata
            .get(path)
            .and_then(|m| m.special_size_measurements.immediate_parent_bounds);
        commands.extend(create_resize_commands_from_frame(
            element,
            path,
            new_frame,
            original_frame,
            parent_bounds,
        ));
        commands.extend(per_element.iter().cloned());
    }
    commands.push(CanvasCommand::UpdateHighlightedViews {
        when: WhenToRun::Transient,
        views: Vec::new(),
    });
    commands
}

// ─── Absolute resize ─────────────────────────────────────────────────────

/// Resize the bounding box of the selection by a handle, scaling every
/// selected element with it.
#[derive(Debug, Clone, Default)]
pub struct AbsoluteResizeBoundingBoxStrategy {
    pub snapping: SnappingConfig,
}

impl CanvasStrategy for AbsoluteResizeBoundingBoxStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::AbsoluteResizeBoundingBox
    }

    fn name(&self) -> &'static str {
        "Absolute Resize"
    }

    fn is_applicable(
        &self,
        canvas: &CanvasState<'_>,
        interaction: Option<&InteractionState>,
        metadata: &ElementMetadataMap,
    ) -> bool {
        let selected = canvas.selected_elements;
        let alt = interaction.is_some_and(|i| i.modifiers().alt);
        (selected.len() > 1 || (!selected.is_empty() && alt))
            && all_absolute_and_pinned(selected, metadata)
    }

    fn fitness(
        &self,
        canvas: &CanvasState<'_>,
        interaction: &InteractionState,
        session: &InteractionSession,
    ) -> u32 {
        let fits = self.is_applicable(canvas, Some(interaction), &session.starting_metadata)
            && interaction.is_drag()
            && interaction.resize_handle().is_some();
        u32::from(fits)
    }

    fn apply(
        &self,
        canvas: &CanvasState<'_>,
        interaction: &InteractionState,
        session: &InteractionSession,
    ) -> Vec<CanvasCommand> {
        let (Some(drag), ActiveControl::ResizeHandle(edge_position)) =
            (interaction.drag_vector(), interaction.active_control)
        else {
            return Vec::new();
        };
        let metadata = &session.starting_metadata;
        let Some(original_box) = multiselect_bounds(metadata, canvas.selected_elements) else {
            return Vec::new();
        };
        let center_based = interaction.modifiers().alt;
        let (resized, grabbed) =
            resize_with_handle(original_box, drag, edge_position, center_based);
        let snap = snap_bounding_box(
            canvas.selected_elements,
            metadata,
            resized,
            &ResizeSnapping {
                edge_position: grabbed,
                scale: canvas.scale,
                keep_aspect_ratio: false,
                center_based,
            },
            &self.snapping,
        );
        trace!(
            "resize {original_box:?} → {resized:?}, snapped {:?}",
            snap.snapped_bounding_box
        );
        let guidelines = [CanvasCommand::SetSnappingGuidelines {
            when: WhenToRun::Transient,
            guidelines: snap.guidelines,
        }];
        commands_for_selection(
            canvas,
            session,
            snap.snapped_bounding_box,
            original_box,
            &guidelines,
        )
    }
}

// ─── Absolute move ───────────────────────────────────────────────────────

/// Drag the selection by its body, translating every selected element.
#[derive(Debug, Clone, Default)]
pub struct AbsoluteMoveStrategy {
    pub snapping: SnappingConfig,
}

impl CanvasStrategy for AbsoluteMoveStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::AbsoluteMove
    }

    fn name(&self) -> &'static str {
        "Absolute Move"
    }

    fn is_applicable(
        &self,
        canvas: &CanvasState<'_>,
        _interaction: Option<&InteractionState>,
        metadata: &ElementMetadataMap,
    ) -> bool {
        !canvas.selected_elements.is_empty()
            && all_absolute_and_pinned(canvas.selected_elements, metadata)
    }

    fn fitness(
        &self,
        canvas: &CanvasState<'_>,
        interaction: &InteractionState,
        session: &InteractionSession,
    ) -> u32 {
        let fits = self.is_applicable(canvas, Some(interaction), &session.starting_metadata)
            && interaction.is_drag()
            && interaction.active_control == ActiveControl::BoundingArea;
        u32::from(fits)
    }

    fn apply(
        &self,
        canvas: &CanvasState<'_>,
        interaction: &InteractionState,
        session: &InteractionSession,
    ) -> Vec<CanvasCommand> {
        let Some(drag) = interaction.drag_vector() else {
            return Vec::new();
        };
        if interaction.active_control != ActiveControl::BoundingArea {
            return Vec::new();
        }
        let metadata = &session.starting_metadata;
        let Some(original_box) = multiselect_bounds(metadata, canvas.selected_elements) else {
            return Vec::new();
        };
        let targets = SnapTargets::collect(canvas.selected_elements, metadata, &self.snapping);
        let snap = snap_moved_box(
            &targets,
            original_box.offset(drag),
            canvas.scale,
            &self.snapping,
        );
        let guidelines = [CanvasCommand::SetSnappingGuidelines {
            when: WhenToRun::Transient,
            guidelines: snap.guidelines,
        }];
        commands_for_selection(
            canvas,
            session,
            snap.snapped_bounding_box,
            original_box,
            &guidelines,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::Modifiers;
    use pretty_assertions::assert_eq;
    use uisync_core::geom::CanvasPoint;
    use uisync_core::model::{JsxAttribute, ObjectProperty};
    use uisync_core::uid::Uid;

    fn pinned(pins: &[(&str, f64)]) -> JsxElement {
        let content = pins
            .iter()
            .map(|(key, value)| ObjectProperty::Assignment {
                key: key.to_string(),
                value: JsxAttribute::number(*value),
                comments: Default::default(),
            })
            .collect();
        JsxElement::new("div", Uid::intern("pinned"))
            .with_attribute("style", JsxAttribute::nested_object(content))
    }

    fn adjustments(commands: &[CanvasCommand]) -> Vec<(String, f64)> {
        commands
            .iter()
            .filter_map(|c| match c {
                CanvasCommand::AdjustCssLengthProperty(a) => {
                    Some((a.property[1].clone(), a.value_px))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn bottom_right_drag_grows_size_only() {
        let bbox = CanvasRectangle::new(10.0, 20.0, 100.0, 50.0);
        let resized = resize_bounding_box(
            bbox,
            CanvasVector::new(15.0, 5.0),
            EdgePosition::BOTTOM_RIGHT,
            false,
        );
        assert_eq!(resized, CanvasRectangle::new(10.0, 20.0, 115.0, 55.0));

        let resized = resize_bounding_box(
            bbox,
            CanvasVector::new(-15.0, -5.0),
            EdgePosition::TOP_LEFT,
            false,
        );
        assert_eq!(resized, CanvasRectangle::new(-5.0, 15.0, 115.0, 55.0));
    }

    #[test]
    fn center_based_resize_keeps_center() {
        let bbox = CanvasRectangle::new(10.0, 20.0, 100.0, 50.0);
        for edge in EdgePosition::ALL {
            let resized = resize_bounding_box(bbox, CanvasVector::new(12.0, 8.0), edge, true);
            assert_eq!(resized.center(), bbox.center(), "handle {edge:?}");
        }
    }

    #[test]
    fn edge_handles_leave_the_other_axis() {
        let bbox = CanvasRectangle::new(0.0, 0.0, 100.0, 100.0);
        let resized = resize_bounding_box(
            bbox,
            CanvasVector::new(30.0, 40.0),
            EdgePosition::RIGHT,
            false,
        );
        assert_eq!(resized, CanvasRectangle::new(0.0, 0.0, 130.0, 100.0));
    }

    #[test]
    fn dragging_past_the_opposite_edge_flips() {
        let bbox = CanvasRectangle::new(0.0, 0.0, 100.0, 100.0);
        let resized = resize_bounding_box(
            bbox,
            CanvasVector::new(-150.0, 0.0),
            EdgePosition::RIGHT,
            false,
        );
        assert_eq!(resized, CanvasRectangle::new(-50.0, 0.0, 50.0, 100.0));
    }

    #[test]
    fn flipped_axis_hands_over_the_opposite_handle() {
        let bbox = CanvasRectangle::new(0.0, 0.0, 100.0, 100.0);
        let (resized, grabbed) = resize_with_handle(
            bbox,
            CanvasVector::new(-150.0, 20.0),
            EdgePosition::BOTTOM_RIGHT,
            false,
        );
        assert_eq!(resized, CanvasRectangle::new(-50.0, 0.0, 50.0, 120.0));
        assert_eq!(grabbed, EdgePosition::BOTTOM_LEFT);

        let (_, grabbed) =
            resize_with_handle(bbox, CanvasVector::new(0.0, -30.0), EdgePosition::TOP, false);
        assert_eq!(grabbed, EdgePosition::TOP);
    }

    #[test]
    fn commands_follow_pin_order_and_direction() {
        let element = pinned(&[
            ("top", 20.0),
            ("left", 10.0),
            ("width", 100.0),
            ("height", 50.0),
            ("bottom", 30.0),
            ("right", 40.0),
        ]);
        let original = CanvasRectangle::new(10.0, 20.0, 100.0, 50.0);
        let new = CanvasRectangle::new(5.0, 20.0, 110.4, 60.0);
        let commands = create_resize_commands_from_frame(
            &element,
            &ElementPath::from_uids(&["pinned"]),
            new,
            original,
            Some(CanvasRectangle::new(0.0, 0.0, 400.0, 300.0)),
        );
        assert_eq!(
            adjustments(&commands),
            vec![
                ("left".to_string(), -5.0),
                ("width".to_string(), 10.0),
                ("height".to_string(), 10.0),
                ("bottom".to_string(), -10.0),
                ("right".to_string(), -5.0),
            ]
        );
        let CanvasCommand::AdjustCssLengthProperty(width) = &commands[1] else {
            panic!("expected an adjustment");
        };
        assert_eq!(width.parent_dimension_px, Some(400.0));
        let CanvasCommand::AdjustCssLengthProperty(height) = &commands[2] else {
            panic!("expected an adjustment");
        };
        assert_eq!(height.parent_dimension_px, Some(300.0));
        assert!(commands.iter().all(|c| c.when() == WhenToRun::Permanent));
    }

    #[test]
    fn unchanged_frame_gives_no_adjustments() {
        let element = pinned(&[("top", 0.0), ("left", 0.0), ("width", 10.0), ("height", 10.0)]);
        let frame = CanvasRectangle::new(0.0, 0.0, 10.0, 10.0);
        let nearly = CanvasRectangle::new(0.3, -0.2, 10.4, 10.0);
        let path = ElementPath::from_uids(&["pinned"]);
        assert!(create_resize_commands_from_frame(&element, &path, frame, frame, None).is_empty());
        assert!(create_resize_commands_from_frame(&element, &path, nearly, frame, None).is_empty());
    }

    #[test]
    fn pick_strategy_returns_none_without_a_fit() {
        let strategies = default_strategies(&SnappingConfig::default());
        let project = uisync_core::project::ProjectContents::new();
        let canvas = CanvasState {
            selected_elements: &[],
            project_contents: &project,
            open_file: "/app.jsx",
            scale: 1.0,
        };
        let interaction = InteractionState::drag(
            CanvasPoint::new(0.0, 0.0),
            Some(CanvasVector::new(1.0, 1.0)),
            Modifiers::NONE,
            ActiveControl::ResizeHandle(EdgePosition::BOTTOM_RIGHT),
        );
        let session = InteractionSession::default();
        assert!(pick_strategy(&strategies, &canvas, &interaction, &session).is_none());
    }
}
