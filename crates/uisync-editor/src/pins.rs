//! Pins: the six layout properties of an absolutely positioned element.
//!
//! | Pin | Axis | Property |
//! |-----|------|----------|
//! | `top` | vertical | `style.top` |
//! | `left` | horizontal | `style.left` |
//! | `width` | horizontal | `style.width` |
//! | `height` | vertical | `style.height` |
//! | `bottom` | vertical | `style.bottom` |
//! | `right` | horizontal | `style.right` |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uisync_core::geom::FramePins;
use uisync_core::model::{JsxAttribute, JsxElement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pin {
    Top,
    Left,
    Width,
    Height,
    Bottom,
    Right,
}

impl Pin {
    /// Fixed order in which resize commands are emitted.
    pub const ALL: [Pin; 6] = [
        Pin::Top,
        Pin::Left,
        Pin::Width,
        Pin::Height,
        Pin::Bottom,
        Pin::Right,
    ];

    pub fn property_name(self) -> &'static str {
        match self {
            Pin::Top => "top",
            Pin::Left => "left",
            Pin::Width => "width",
            Pin::Height => "height",
            Pin::Bottom => "bottom",
            Pin::Right => "right",
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Pin::Left | Pin::Width | Pin::Right => Axis::Horizontal,
            Pin::Top | Pin::Height | Pin::Bottom => Axis::Vertical,
        }
    }

    /// `right` and `bottom` are measured from the far edge of the parent, so
    /// a frame growing towards them shrinks their value.
    pub fn direction(self) -> f64 {
        match self {
            Pin::Bottom | Pin::Right => -1.0,
            _ => 1.0,
        }
    }

    pub fn value_in(self, pins: &FramePins) -> f64 {
        match self {
            Pin::Top => pins.top,
            Pin::Left => pins.left,
            Pin::Width => pins.width,
            Pin::Height => pins.height,
            Pin::Bottom => pins.bottom,
            Pin::Right => pins.right,
        }
    }
}

// ─── CSS lengths ─────────────────────────────────────────────────────────

/// A style length the resize commands know how to adjust.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CssLength {
    /// A bare number, `"12"` or `"12px"`.
    Px(f64),
    Percent(f64),
}

impl CssLength {
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(CssLength::Px),
            Value::String(s) => Self::parse(s),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(n) = s.strip_suffix('%') {
            return n.trim_end().parse().ok().map(CssLength::Percent);
        }
        let n = s.strip_suffix("px").unwrap_or(s);
        n.trim_end().parse().ok().map(CssLength::Px)
    }

    /// Shift by `delta_px`. Percentages need the parent's size along the
    /// pin's axis; without it they cannot be moved.
    pub fn adjusted_by(self, delta_px: f64, parent_dimension_px: Option<f64>) -> Option<Self> {
        match self {
            CssLength::Px(v) => Some(CssLength::Px(v + delta_px)),
            CssLength::Percent(p) => {
                let parent = parent_dimension_px.filter(|d| *d != 0.0)?;
                Some(CssLength::Percent(p + delta_px / parent * 100.0))
            }
        }
    }
}

/// Pins set in an element's `style`, in [`Pin::ALL`] order.
pub fn pins_in_style(style: &Map<String, Value>) -> Vec<Pin> {
    Pin::ALL
        .into_iter()
        .filter(|pin| {
            style
                .get(pin.property_name())
                .and_then(CssLength::from_json)
                .is_some()
        })
        .collect()
}

/// Does the element's `style` prop pin it at least twice on each axis?
pub fn has_at_least_two_pins_per_side(props: &Map<String, Value>) -> bool {
    let Some(style) = props.get("style").and_then(Value::as_object) else {
        return false;
    };
    let pins = pins_in_style(style);
    let count = |axis| pins.iter().filter(|p| p.axis() == axis).count();
    count(Axis::Horizontal) >= 2 && count(Axis::Vertical) >= 2
}

/// The pin's value in the element's `style` attribute, if it is written as
/// a length the resize commands can adjust.
pub fn style_pin_value(element: &JsxElement, pin: Pin) -> Option<CssLength> {
    let value = element
        .attribute("style")?
        .get_property(pin.property_name())?;
    match value {
        JsxAttribute::Value { .. } => CssLength::from_json(&value.to_json()?),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uisync_core::geom::{CanvasRectangle, all_pins_from_frame, rectangle_difference};
    use uisync_core::model::ObjectProperty;
    use uisync_core::uid::Uid;

    fn props(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn css_length_forms() {
        assert_eq!(CssLength::parse("12"), Some(CssLength::Px(12.0)));
        assert_eq!(CssLength::parse(" 12px "), Some(CssLength::Px(12.0)));
        assert_eq!(CssLength::parse("50%"), Some(CssLength::Percent(50.0)));
        assert_eq!(CssLength::parse("auto"), None);
        assert_eq!(CssLength::from_json(&json!(3.5)), Some(CssLength::Px(3.5)));
        assert_eq!(CssLength::from_json(&json!(true)), None);
    }

    #[test]
    fn percent_adjustment_uses_parent_dimension() {
        let pct = CssLength::Percent(10.0);
        assert_eq!(pct.adjusted_by(20.0, Some(200.0)), Some(CssLength::Percent(20.0)));
        assert_eq!(pct.adjusted_by(20.0, None), None);
        assert_eq!(
            CssLength::Px(5.0).adjusted_by(-2.0, None),
            Some(CssLength::Px(3.0))
        );
    }

    #[test]
    fn two_pins_per_side() {
        let full = props(json!({ "style": { "left": 0, "top": 0, "width": 10, "height": "10px" } }));
        assert!(has_at_least_two_pins_per_side(&full));

        let left_top = props(json!({ "style": { "left": 0, "top": 0 } }));
        assert!(!has_at_least_two_pins_per_side(&left_top));

        let unresolvable = props(json!({ "style": { "left": 0, "right": "auto", "top": 0, "bottom": 0 } }));
        assert!(!has_at_least_two_pins_per_side(&unresolvable));

        assert!(!has_at_least_two_pins_per_side(&Map::new()));
    }

    #[test]
    fn pin_values_from_style_attribute() {
        let style = JsxAttribute::nested_object(vec![
            ObjectProperty::Assignment {
                key: "left".into(),
                value: JsxAttribute::number(10.0),
                comments: Default::default(),
            },
            ObjectProperty::Assignment {
                key: "width".into(),
                value: JsxAttribute::string("25%"),
                comments: Default::default(),
            },
            ObjectProperty::Assignment {
                key: "top".into(),
                value: JsxAttribute::other_javascript("offset"),
                comments: Default::default(),
            },
        ]);
        let element = JsxElement::new("div", Uid::intern("pinned")).with_attribute("style", style);
        assert_eq!(style_pin_value(&element, Pin::Left), Some(CssLength::Px(10.0)));
        assert_eq!(style_pin_value(&element, Pin::Width), Some(CssLength::Percent(25.0)));
        assert_eq!(style_pin_value(&element, Pin::Top), None);
        assert_eq!(style_pin_value(&element, Pin::Right), None);
    }

    #[test]
    fn pin_deltas_from_frame_difference() {
        let from = CanvasRectangle::new(10.0, 20.0, 100.0, 50.0);
        let to = CanvasRectangle::new(5.0, 20.0, 110.0, 60.0);
        let delta = all_pins_from_frame(rectangle_difference(from, to));
        assert_eq!(Pin::Left.value_in(&delta), -5.0);
        assert_eq!(Pin::Width.value_in(&delta), 10.0);
        assert_eq!(Pin::Right.value_in(&delta), 5.0);
        assert_eq!(Pin::Top.value_in(&delta), 0.0);
        assert_eq!(Pin::Bottom.value_in(&delta), 10.0);
    }
}
