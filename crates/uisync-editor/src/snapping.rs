//! Snapping: align a dragged or resized box to the edges and centers of the
//! other elements on the canvas.
//!
//! Targets are collected from the starting metadata, skipping the selection
//! and everything inside it. Each axis snaps independently to the nearest
//! target within the threshold; the threshold is in screen pixels, so it
//! shrinks in canvas units as the canvas zooms in. Equally near targets
//! resolve to the one found first in canvas order.

use crate::interaction::{AxisEdge, EdgePosition};
use log::trace;
use serde::{Deserialize, Serialize};
use uisync_core::geom::{CanvasRectangle, CanvasVector};
use uisync_core::metadata::ElementMetadataMap;
use uisync_core::path::ElementPath;

/// Snap distance in screen pixels.
pub const SNAP_THRESHOLD_PX: f64 = 5.0;

// ─── Config ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnappingConfig {
    /// Default: **5** (screen pixels).
    pub threshold_px: f64,
    /// Snap to the center lines of other elements too. Default: **true**.
    pub snap_to_centers: bool,
}

impl Default for SnappingConfig {
    fn default() -> Self {
        Self {
            threshold_px: SNAP_THRESHOLD_PX,
            snap_to_centers: true,
        }
    }
}

impl SnappingConfig {
    /// Threshold in canvas units at `scale`.
    pub fn threshold(&self, scale: f64) -> f64 {
        self.threshold_px / scale
    }
}

// ─── Guidelines ──────────────────────────────────────────────────────────

/// A line something can snap to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Guideline {
    /// Vertical line at `x`, drawn from `y_top` to `y_bottom`.
    XAxis { x: f64, y_top: f64, y_bottom: f64 },
    /// Horizontal line at `y`, drawn from `x_left` to `x_right`.
    YAxis { y: f64, x_left: f64, x_right: f64 },
}

/// A guideline the box snapped to, for drawing snap lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuidelineWithSnappingVector {
    pub guideline: Guideline,
    /// How far the snap moved the grabbed edge.
    pub snapping_vector: CanvasVector,
    pub activate_snap: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub snapped_bounding_box: CanvasRectangle,
    pub guidelines: Vec<GuidelineWithSnappingVector>,
}

impl SnapResult {
    fn unsnapped(bounding_box: CanvasRectangle) -> Self {
        Self {
            snapped_bounding_box: bounding_box,
            guidelines: Vec::new(),
        }
    }
}

/// Snap targets of one axis: line position plus the extent of the element
/// it came from along the other axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Target {
    at: f64,
    from: f64,
    to: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SnapTargets {
    x: Vec<Target>,
    y: Vec<Target>,
}

impl SnapTargets {
    /// Lines of every element that is not selected or inside a selected
    /// element, in canvas order.
    pub fn collect(
        selected: &[ElementPath],
        metadata: &ElementMetadataMap,
        config: &SnappingConfig,
    ) -> Self {
        let mut targets = Self::default();
        for element in metadata.iter() {
            let path = &element.element_path;
            if selected.iter().any(|s| path.is_descendant_of_or_equal(s)) {
                continue;
            }
            let Some(frame) = element.global_frame.map(|f| f.normalized()) else {
                continue;
            };
            let mut xs = vec![frame.x];
            let mut ys = vec![frame.y];
            if config.snap_to_centers {
                xs.push(frame.x + frame.width / 2.0);
                ys.push(frame.y + frame.height / 2.0);
            }
            xs.push(frame.right());
            ys.push(frame.bottom());
            targets.x.extend(xs.into_iter().map(|at| Target {
                at,
                from: frame.y,
                to: frame.bottom(),
            }));
            targets.y.extend(ys.into_iter().map(|at| Target {
                at,
                from: frame.x,
                to: frame.right(),
            }));
        }
        targets
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.y.is_empty()
    }
}

/// Nearest target to any of `edges`, within `threshold`. Returns the
/// signed distance to move and the target. Strictly nearer wins, so the
/// first of equally near targets stays.
fn nearest(edges: &[f64], targets: &[Target], threshold: f64) -> Option<(f64, Target)> {
    let mut best: Option<(f64, Target)> = None;
    for target in targets {
        for &edge in edges {
            let delta = target.at - edge;
            if delta.abs() > threshold {
                continue;
            }
            if best.is_none_or(|(d, _)| delta.abs() < d.abs()) {
                best = Some((delta, *target));
            }
        }
    }
    best
}

fn x_guideline(
    target: Target,
    bounds: CanvasRectangle,
    delta: f64,
) -> GuidelineWithSnappingVector {
    GuidelineWithSnappingVector {
        guideline: Guideline::XAxis {
            x: target.at,
            y_top: target.from.min(bounds.y),
            y_bottom: target.to.max(bounds.bottom()),
        },
        snapping_vector: CanvasVector::new(delta, 0.0),
        activate_snap: true,
    }
}

fn y_guideline(
    target: Target,
    bounds: CanvasRectangle,
    delta: f64,
) -> GuidelineWithSnappingVector {
    GuidelineWithSnappingVector {
        guideline: Guideline::YAxis {
            y: target.at,
            x_left: target.from.min(bounds.x),
            x_right: target.to.max(bounds.right()),
        },
        snapping_vector: CanvasVector::new(0.0, delta),
        activate_snap: true,
    }
}

// ─── Resize ──────────────────────────────────────────────────────────────

/// How the box being snapped is being resized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSnapping {
    pub edge_position: EdgePosition,
    pub scale: f64,
    pub keep_aspect_ratio: bool,
    pub center_based: bool,
}

/// Move the grabbed edge of one axis by `delta`. The opposite edge stays,
/// or moves the other way when resizing around the center.
pub(crate) fn move_edge(
    start: f64,
    size: f64,
    edge: AxisEdge,
    delta: f64,
    center_based: bool,
) -> (f64, f64) {
    let (mut low, mut high) = (start, start + size);
    match edge {
        AxisEdge::Start => {
            low += delta;
            if center_based {
                high -= delta;
            }
        }
        AxisEdge::End => {
            high += delta;
            if center_based {
                low -= delta;
            }
        }
        AxisEdge::Middle => {}
    }
    (low, high - low)
}

fn grabbed_edge(start: f64, size: f64, edge: AxisEdge) -> Option<f64> {
    match edge {
        AxisEdge::Start => Some(start),
        AxisEdge::End => Some(start + size),
        AxisEdge::Middle => None,
    }
}

/// Resize one axis so it has `new_size`, keeping whatever the handle does
/// not move in place.
fn fit_axis(
    start: f64,
    size: f64,
    edge: AxisEdge,
    new_size: f64,
    center_based: bool,
) -> (f64, f64) {
    if center_based {
        let center = start + size / 2.0;
        return (center - new_size / 2.0, new_size);
    }
    match edge {
        AxisEdge::Start => (start + size - new_size, new_size),
        AxisEdge::End => (start, new_size),
        AxisEdge::Middle => (start + (size - new_size) / 2.0, new_size),
    }
}

/// Snap the grabbed edges of a box being resized.
pub fn snap_resized_box(
    targets: &SnapTargets,
    resized: CanvasRectangle,
    resize: &ResizeSnapping,
    config: &SnappingConfig,
) -> SnapResult {
    let threshold = config.threshold(resize.scale);
    let edge = resize.edge_position;

    let x_snap = grabbed_edge(resized.x, resized.width, edge.x)
        .and_then(|at| nearest(&[at], &targets.x, threshold));
    let y_snap = grabbed_edge(resized.y, resized.height, edge.y)
        .and_then(|at| nearest(&[at], &targets.y, threshold));

    if resize.keep_aspect_ratio && edge.is_corner() && resized.height != 0.0 {
        let aspect = resized.width / resized.height;
        let snap_x = match (x_snap, y_snap) {
            (Some((dx, _)), Some((dy, _))) => dx.abs() <= dy.abs(),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => return SnapResult::unsnapped(resized),
        };
        let snapped = if snap_x {
            let dx = x_snap.map_or(0.0, |(d, _)| d);
            let (x, width) = move_edge(resized.x, resized.width, edge.x, dx, resize.center_based);
            let (y, height) =
                fit_axis(resized.y, resized.height, edge.y, width / aspect, resize.center_based);
            CanvasRectangle::new(x, y, width, height)
        } else {
            let dy = y_snap.map_or(0.0, |(d, _)| d);
            let (y, height) = move_edge(resized.y, resized.height, edge.y, dy, resize.center_based);
            let (x, width) =
                fit_axis(resized.x, resized.width, edge.x, height * aspect, resize.center_based);
            CanvasRectangle::new(x, y, width, height)
        };
        let guidelines = if snap_x {
            x_snap.map(|(dx, t)| x_guideline(t, snapped, dx))
        } else {
            y_snap.map(|(dy, t)| y_guideline(t, snapped, dy))
        };
        trace!("aspect-locked snap of {resized:?} to {snapped:?}");
        return SnapResult {
            snapped_bounding_box: snapped,
            guidelines: guidelines.into_iter().collect(),
        };
    }

    let (x, width) = match x_snap {
        Some((dx, _)) => move_edge(resized.x, resized.width, edge.x, dx, resize.center_based),
        None => (resized.x, resized.width),
    };
    let (y, height) = match y_snap {
        Some((dy, _)) => move_edge(resized.y, resized.height, edge.y, dy, resize.center_based),
        None => (resized.y, resized.height),
    };
    let snapped = CanvasRectangle::new(x, y, width, height);
    let mut guidelines = Vec::new();
    if let Some((dx, target)) = x_snap {
        trace!("snapped x edge by {dx} to {}", target.at);
        guidelines.push(x_guideline(target, snapped, dx));
    }
    if let Some((dy, target)) = y_snap {
        trace!("snapped y edge by {dy} to {}", target.at);
        guidelines.push(y_guideline(target, snapped, dy));
    }
    SnapResult {
        snapped_bounding_box: snapped,
        guidelines,
    }
}

/// Snap the edges of a resized selection against everything else on the
/// canvas.
pub fn snap_bounding_box(
    selected: &[ElementPath],
    metadata: &ElementMetadataMap,
    resized: CanvasRectangle,
    resize: &ResizeSnapping,
    config: &SnappingConfig,
) -> SnapResult {
    let targets = SnapTargets::collect(selected, metadata, config);
    snap_resized_box(&targets, resized, resize, config)
}

// ─── Move ────────────────────────────────────────────────────────────────

/// Snap a box being moved: any of its edges or centers may line up.
pub fn snap_moved_box(
    targets: &SnapTargets,
    moved: CanvasRectangle,
    scale: f64,
    config: &SnappingConfig,
) -> SnapResult {
    let threshold = config.threshold(scale);
    let moved = moved.normalized();
    let mut xs = vec![moved.x, moved.right()];
    let mut ys = vec![moved.y, moved.bottom()];
    if config.snap_to_centers {
        xs.insert(1, moved.x + moved.width / 2.0);
        ys.insert(1, moved.y + moved.height / 2.0);
    }
    let x_snap = nearest(&xs, &targets.x, threshold);
    let y_snap = nearest(&ys, &targets.y, threshold);
    let snapped = moved.offset(CanvasVector::new(
        x_snap.map_or(0.0, |(d, _)| d),
        y_snap.map_or(0.0, |(d, _)| d),
    ));
    let guidelines = x_snap
        .map(|(dx, t)| x_guideline(t, snapped, dx))
        .into_iter()
        .chain(y_snap.map(|(dy, t)| y_guideline(t, snapped, dy)))
        .collect();
    SnapResult {
        snapped_bounding_box: snapped,
        guidelines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use uisync_core::metadata::ElementInstanceMetadata;

    fn metadata(frames: &[(&str, CanvasRectangle)]) -> ElementMetadataMap {
        frames
            .iter()
            .map(|(uid, frame)| {
                ElementInstanceMetadata::new(ElementPath::from_uids(&["scene", *uid]), Some(*frame))
            })
            .collect()
    }

    fn selected(uid: &str) -> Vec<ElementPath> {
        vec![ElementPath::from_uids(&["scene", uid])]
    }

    fn resize(edge_position: EdgePosition, scale: f64) -> ResizeSnapping {
        ResizeSnapping {
            edge_position,
            scale,
            keep_aspect_ratio: false,
            center_based: false,
        }
    }

    #[test]
    fn threshold_scales_with_zoom() {
        let meta = metadata(&[
            ("anchor", CanvasRectangle::new(100.0, 0.0, 50.0, 20.0)),
            ("moving", CanvasRectangle::new(103.0, 100.0, 40.0, 40.0)),
        ]);
        let candidate = CanvasRectangle::new(103.0, 100.0, 40.0, 40.0);
        let config = SnappingConfig::default();

        let at_1 = snap_bounding_box(
            &selected("moving"),
            &meta,
            candidate,
            &resize(EdgePosition::LEFT, 1.0),
            &config,
        );
        assert_eq!(
            at_1.snapped_bounding_box,
            CanvasRectangle::new(100.0, 100.0, 43.0, 40.0)
        );
        assert_eq!(at_1.guidelines.len(), 1);
        assert_eq!(
            at_1.guidelines[0].snapping_vector,
            CanvasVector::new(-3.0, 0.0)
        );

        let at_2 = snap_bounding_box(
            &selected("moving"),
            &meta,
            candidate,
            &resize(EdgePosition::LEFT, 2.0),
            &config,
        );
        assert_eq!(at_2.snapped_bounding_box, candidate);
        assert!(at_2.guidelines.is_empty());
    }

    #[test]
    fn equal_distances_pick_first_in_canvas_order() {
        let left_first = metadata(&[
            ("a", CanvasRectangle::new(97.0, 0.0, 200.0, 1.0)),
            ("b", CanvasRectangle::new(103.0, 0.0, 200.0, 1.0)),
        ]);
        let right_first = metadata(&[
            ("b", CanvasRectangle::new(103.0, 0.0, 200.0, 1.0)),
            ("a", CanvasRectangle::new(97.0, 0.0, 200.0, 1.0)),
        ]);
        let candidate = CanvasRectangle::new(100.0, 50.0, 40.0, 40.0);
        let config = SnappingConfig {
            snap_to_centers: false,
            ..SnappingConfig::default()
        };
        let snap = |meta: &ElementMetadataMap| {
            snap_bounding_box(&[], meta, candidate, &resize(EdgePosition::LEFT, 1.0), &config)
                .snapped_bounding_box
                .x
        };
        assert_eq!(snap(&left_first), 97.0);
        assert_eq!(snap(&right_first), 103.0);
    }

    #[test]
    fn middle_axis_and_selection_never_snap() {
        let meta = metadata(&[
            ("parent", CanvasRectangle::new(0.0, 0.0, 500.0, 500.0)),
            ("other", CanvasRectangle::new(300.0, 202.0, 10.0, 10.0)),
        ]);
        let inside = ElementPath::from_uids(&["scene", "parent", "child"]);
        let mut meta = meta;
        meta.insert(ElementInstanceMetadata::new(
            inside,
            Some(CanvasRectangle::new(98.0, 98.0, 5.0, 5.0)),
        ));
        // The right-edge handle leaves the vertical axis alone, and the
        // selected parent's own child offers no targets.
        let candidate = CanvasRectangle::new(0.0, 0.0, 99.0, 200.0);
        let result = snap_bounding_box(
            &selected("parent"),
            &meta,
            candidate,
            &resize(EdgePosition::RIGHT, 1.0),
            &SnappingConfig::default(),
        );
        assert_eq!(result.snapped_bounding_box, candidate);
    }

    #[test]
    fn flipped_resize_snaps_the_edge_under_the_pointer() {
        let meta = metadata(&[("anchor", CanvasRectangle::new(-52.0, 300.0, 10.0, 10.0))]);
        let (resized, grabbed) = crate::strategies::resize_with_handle(
            CanvasRectangle::new(0.0, 0.0, 100.0, 100.0),
            CanvasVector::new(-150.0, 0.0),
            EdgePosition::BOTTOM_RIGHT,
            false,
        );
        let result = snap_bounding_box(
            &[],
            &meta,
            resized,
            &resize(grabbed, 1.0),
            &SnappingConfig::default(),
        );
        assert_eq!(
            result.snapped_bounding_box,
            CanvasRectangle::new(-52.0, 0.0, 52.0, 100.0)
        );
    }

    #[test]
    fn center_based_snap_mirrors_the_opposite_edge() {
        let meta = metadata(&[("anchor", CanvasRectangle::new(0.0, 0.0, 202.0, 10.0))]);
        let candidate = CanvasRectangle::new(0.0, 50.0, 200.0, 100.0);
        let result = snap_bounding_box(
            &[],
            &meta,
            candidate,
            &ResizeSnapping {
                edge_position: EdgePosition::RIGHT,
                scale: 1.0,
                keep_aspect_ratio: false,
                center_based: true,
            },
            &SnappingConfig::default(),
        );
        assert_eq!(
            result.snapped_bounding_box,
            CanvasRectangle::new(-2.0, 50.0, 204.0, 100.0)
        );
        assert_eq!(result.snapped_bounding_box.center(), candidate.center());
    }

    #[test]
    fn aspect_ratio_snaps_the_closer_axis() {
        let meta = metadata(&[
            ("x-target", CanvasRectangle::new(0.0, 500.0, 202.0, 10.0)),
            ("y-target", CanvasRectangle::new(500.0, 0.0, 10.0, 104.0)),
        ]);
        let candidate = CanvasRectangle::new(0.0, 0.0, 200.0, 100.0);
        let result = snap_bounding_box(
            &[],
            &meta,
            candidate,
            &ResizeSnapping {
                edge_position: EdgePosition::BOTTOM_RIGHT,
                scale: 1.0,
                keep_aspect_ratio: true,
                center_based: false,
            },
            &SnappingConfig {
                snap_to_centers: false,
                ..SnappingConfig::default()
            },
        );
        assert_eq!(
            result.snapped_bounding_box,
            CanvasRectangle::new(0.0, 0.0, 202.0, 101.0)
        );
        assert_eq!(result.guidelines.len(), 1);
    }

    #[test]
    fn moved_box_snaps_any_edge() {
        let meta = metadata(&[("anchor", CanvasRectangle::new(0.0, 0.0, 100.0, 100.0))]);
        let targets = SnapTargets::collect(&[], &meta, &SnappingConfig::default());
        let moved = CanvasRectangle::new(102.0, 300.0, 50.0, 50.0);
        let result = snap_moved_box(&targets, moved, 1.0, &SnappingConfig::default());
        assert_eq!(
            result.snapped_bounding_box,
            CanvasRectangle::new(100.0, 300.0, 50.0, 50.0)
        );
        assert_eq!(
            result.guidelines[0].guideline,
            Guideline::XAxis {
                x: 100.0,
                y_top: 0.0,
                y_bottom: 350.0
            }
        );
    }
}
