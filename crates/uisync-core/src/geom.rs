//! Geometry primitives shared by the canvas strategies and the metadata
//! snapshot.
//!
//! Every value is tagged with the coordinate space it lives in. Canvas space
//! is the scene's own coordinate system; window space is what the pointer
//! reports after zoom and scroll. The two never unify: conversion goes
//! through [`canvas_to_window`] / [`window_to_canvas`] explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

// ─── Spaces ──────────────────────────────────────────────────────────────

/// Marker for canvas (scene) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CanvasSpace;

/// Marker for window (screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WindowSpace;

// ─── Point / Vector / Rectangle ──────────────────────────────────────────

/// A position in space `S`.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point<S> {
    pub x: f64,
    pub y: f64,
    #[serde(skip)]
    space: PhantomData<S>,
}

/// A displacement in space `S` (drag deltas, snapping vectors).
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector<S> {
    pub x: f64,
    pub y: f64,
    #[serde(skip)]
    space: PhantomData<S>,
}

/// An axis-aligned rectangle in space `S`.
///
/// Width and height may go negative while a drag flips the box; call
/// [`Rectangle::normalized`] before handing a rectangle to layout.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle<S> {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(skip)]
    space: PhantomData<S>,
}

pub type CanvasPoint = Point<CanvasSpace>;
pub type CanvasVector = Vector<CanvasSpace>;
pub type CanvasRectangle = Rectangle<CanvasSpace>;
pub type WindowPoint = Point<WindowSpace>;
pub type WindowVector = Vector<WindowSpace>;
pub type WindowRectangle = Rectangle<WindowSpace>;

impl<S> Point<S> {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            space: PhantomData,
        }
    }

    pub fn offset(self, by: Vector<S>) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }

    /// The vector that moves `self` onto `to`.
    pub fn vector_to(self, to: Point<S>) -> Vector<S> {
        Vector::new(to.x - self.x, to.y - self.y)
    }
}

impl<S> Vector<S> {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            space: PhantomData,
        }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl<S> Rectangle<S> {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            space: PhantomData,
        }
    }

    /// Rectangle spanning two arbitrary corner points.
    pub fn from_two_points(a: Point<S>, b: Point<S>) -> Self {
        Self::new(
            a.x.min(b.x),
            a.y.min(b.y),
            (a.x - b.x).abs(),
            (a.y - b.y).abs(),
        )
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point<S> {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn origin(&self) -> Point<S> {
        Point::new(self.x, self.y)
    }

    /// Flip negative extents so width and height are non-negative.
    pub fn normalized(&self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self::new(x, y, width, height)
    }

    pub fn offset(&self, by: Vector<S>) -> Self {
        Self::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }

    pub fn contains(&self, p: Point<S>) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        let a = self.normalized();
        let b = other.normalized();
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(
            x,
            y,
            a.right().max(b.right()) - x,
            a.bottom().max(b.bottom()) - y,
        )
    }

    /// Round every component to `precision` decimal places.
    pub fn rounded(&self, precision: i32) -> Self {
        Self::new(
            round_to(self.x, precision),
            round_to(self.y, precision),
            round_to(self.width, precision),
            round_to(self.height, precision),
        )
    }
}

impl<S> fmt::Debug for Point<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl<S> fmt::Debug for Vector<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}>", self.x, self.y)
    }
}

impl<S> fmt::Debug for Rectangle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {} {}×{}]",
            self.x, self.y, self.width, self.height
        )
    }
}

// ─── Operations ──────────────────────────────────────────────────────────

/// Component-wise `to - from`.
pub fn rectangle_difference<S>(from: Rectangle<S>, to: Rectangle<S>) -> Rectangle<S> {
    Rectangle::new(
        to.x - from.x,
        to.y - from.y,
        to.width - from.width,
        to.height - from.height,
    )
}

/// Map `frame` from `old_box` onto `new_box`, scaling and translating each
/// axis independently. A degenerate (zero-sized) old axis only translates.
pub fn transform_frame_using_bounding_box<S>(
    new_box: Rectangle<S>,
    old_box: Rectangle<S>,
    frame: Rectangle<S>,
) -> Rectangle<S> {
    let (x, width) = transform_axis(
        new_box.x,
        new_box.width,
        old_box.x,
        old_box.width,
        frame.x,
        frame.width,
    );
    let (y, height) = transform_axis(
        new_box.y,
        new_box.height,
        old_box.y,
        old_box.height,
        frame.y,
        frame.height,
    );
    Rectangle::new(x, y, width, height)
}

fn transform_axis(
    new_start: f64,
    new_size: f64,
    old_start: f64,
    old_size: f64,
    start: f64,
    size: f64,
) -> (f64, f64) {
    if old_size == 0.0 {
        return (start + (new_start - old_start), size);
    }
    let scale = new_size / old_size;
    (new_start + (start - old_start) * scale, size * scale)
}

/// Round half away from zero at `precision` decimal places.
pub fn round_to(value: f64, precision: i32) -> f64 {
    let multiplier = 10f64.powi(precision);
    (value * multiplier).round() / multiplier
}

/// Union of every rectangle, or `None` when there are none.
pub fn bounding_rectangle_array<S, I>(rects: I) -> Option<Rectangle<S>>
where
    I: IntoIterator<Item = Rectangle<S>>,
{
    rects
        .into_iter()
        .fold(None, |acc: Option<Rectangle<S>>, r| match acc {
            Some(acc) => Some(acc.union(&r)),
            None => Some(r.normalized()),
        })
}

/// The six pin values of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FramePins {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub bottom: f64,
    pub right: f64,
}

/// Derive all six pin values from a rectangle: `right = x + width`,
/// `bottom = y + height`.
pub fn all_pins_from_frame<S>(frame: Rectangle<S>) -> FramePins {
    FramePins {
        top: frame.y,
        left: frame.x,
        width: frame.width,
        height: frame.height,
        bottom: frame.y + frame.height,
        right: frame.x + frame.width,
    }
}

// ─── Space conversion ────────────────────────────────────────────────────

/// Convert a canvas-space rectangle to window space for a canvas drawn at
/// `scale` and scrolled by `canvas_offset` (in canvas units).
pub fn canvas_to_window(
    rect: CanvasRectangle,
    scale: f64,
    canvas_offset: CanvasVector,
) -> WindowRectangle {
    Rectangle::new(
        (rect.x + canvas_offset.x) * scale,
        (rect.y + canvas_offset.y) * scale,
        rect.width * scale,
        rect.height * scale,
    )
}

/// Inverse of [`canvas_to_window`].
pub fn window_to_canvas(
    rect: WindowRectangle,
    scale: f64,
    canvas_offset: CanvasVector,
) -> CanvasRectangle {
    Rectangle::new(
        rect.x / scale - canvas_offset.x,
        rect.y / scale - canvas_offset.y,
        rect.width / scale,
        rect.height / scale,
    )
}

/// Convert a window-space pointer delta into canvas units.
pub fn window_vector_to_canvas(v: WindowVector, scale: f64) -> CanvasVector {
    Vector::new(v.x / scale, v.y / scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> CanvasRectangle {
        Rectangle::new(x, y, w, h)
    }

    #[test]
    fn difference_is_componentwise() {
        let d = rectangle_difference(rect(10.0, 20.0, 100.0, 50.0), rect(5.0, 25.0, 120.0, 40.0));
        assert_eq!(d, rect(-5.0, 5.0, 20.0, -10.0));
    }

    #[test]
    fn pins_of_difference_match_direct_subtraction() {
        let samples = [
            (rect(0.0, 0.0, 10.0, 10.0), rect(3.0, -4.0, 12.5, 7.0)),
            (rect(-20.0, 15.0, 0.0, 33.0), rect(-20.0, 15.0, 0.0, 33.0)),
            (rect(100.0, 200.0, 300.0, 400.0), rect(90.5, 210.25, 280.0, 450.0)),
        ];
        for (r1, r2) in samples {
            let via_diff = all_pins_from_frame(rectangle_difference(r1, r2));
            let p1 = all_pins_from_frame(r1);
            let p2 = all_pins_from_frame(r2);
            assert_eq!(via_diff.top, p2.top - p1.top);
            assert_eq!(via_diff.left, p2.left - p1.left);
            assert_eq!(via_diff.width, p2.width - p1.width);
            assert_eq!(via_diff.height, p2.height - p1.height);
            assert_eq!(via_diff.right, p2.right - p1.right);
            assert_eq!(via_diff.bottom, p2.bottom - p1.bottom);
        }
    }

    #[test]
    fn transform_scales_per_axis() {
        let old_box = rect(0.0, 0.0, 100.0, 100.0);
        let new_box = rect(0.0, 0.0, 200.0, 50.0);
        let frame = rect(50.0, 50.0, 50.0, 50.0);
        assert_eq!(
            transform_frame_using_bounding_box(new_box, old_box, frame),
            rect(100.0, 25.0, 100.0, 25.0)
        );
    }

    #[test]
    fn transform_degenerate_axis_translates() {
        let old_box = rect(10.0, 0.0, 0.0, 100.0);
        let new_box = rect(15.0, 0.0, 30.0, 100.0);
        let frame = rect(10.0, 10.0, 0.0, 20.0);
        let out = transform_frame_using_bounding_box(new_box, old_box, frame);
        assert_eq!(out.x, 15.0);
        assert_eq!(out.width, 0.0);
    }

    #[test]
    fn round_to_precision() {
        assert_eq!(round_to(1.4999, 0), 1.0);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(1.23456, 2), 1.23);
    }

    #[test]
    fn normalize_flipped_rect() {
        assert_eq!(rect(10.0, 10.0, -4.0, -6.0).normalized(), rect(6.0, 4.0, 4.0, 6.0));
    }

    #[test]
    fn bounding_box_of_frames() {
        let frames = [rect(0.0, 0.0, 10.0, 10.0), rect(20.0, 5.0, 10.0, 30.0)];
        assert_eq!(
            bounding_rectangle_array(frames),
            Some(rect(0.0, 0.0, 30.0, 35.0))
        );
        assert_eq!(bounding_rectangle_array(Vec::<CanvasRectangle>::new()), None);
    }

    #[test]
    fn canvas_window_conversion_roundtrips() {
        let r = rect(10.0, 20.0, 30.0, 40.0);
        let offset = CanvasVector::new(5.0, -5.0);
        let w = canvas_to_window(r, 2.0, offset);
        assert_eq!(w, WindowRectangle::new(30.0, 30.0, 60.0, 80.0));
        assert_eq!(window_to_canvas(w, 2.0, offset), r);
    }
}
