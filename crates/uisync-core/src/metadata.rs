//! Read-only snapshot of measured element instances, as reported by the
//! renderer after each frame.

use crate::geom::CanvasRectangle;
use crate::path::ElementPath;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// CSS `position` of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CssPosition {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

impl CssPosition {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "static" => Some(Self::Static),
            "relative" => Some(Self::Relative),
            "absolute" => Some(Self::Absolute),
            "fixed" => Some(Self::Fixed),
            "sticky" => Some(Self::Sticky),
            _ => None,
        }
    }
}

/// Layout system of the parent that places this element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutSystem {
    #[default]
    Flow,
    Flex,
    Grid,
}

/// Measurements the renderer takes besides the frame itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecialSizeMeasurements {
    pub position: CssPosition,
    /// Content box of the immediate parent, in canvas coordinates.
    pub immediate_parent_bounds: Option<CanvasRectangle>,
    /// Bounds of the element's containing block (the box `left`/`top`
    /// are measured from).
    pub coordinate_system_bounds: Option<CanvasRectangle>,
    pub parent_layout_system: LayoutSystem,
}

/// One rendered element instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementInstanceMetadata {
    pub element_path: ElementPath,
    /// `None` when the element did not render a box (e.g. `display: none`).
    pub global_frame: Option<CanvasRectangle>,
    pub special_size_measurements: SpecialSizeMeasurements,
    /// Current props of the instance as plain JSON values.
    #[serde(default)]
    pub props: Map<String, Value>,
}

impl ElementInstanceMetadata {
    pub fn new(element_path: ElementPath, global_frame: Option<CanvasRectangle>) -> Self {
        Self {
            element_path,
            global_frame,
            special_size_measurements: SpecialSizeMeasurements::default(),
            props: Map::new(),
        }
    }

    pub fn with_position(mut self, position: CssPosition) -> Self {
        self.special_size_measurements.position = position;
        self
    }

    pub fn with_parent_bounds(mut self, bounds: CanvasRectangle) -> Self {
        self.special_size_measurements.immediate_parent_bounds = Some(bounds);
        self
    }

    pub fn with_props(mut self, props: Map<String, Value>) -> Self {
        self.props = props;
        self
    }

    /// The `style` prop, when it is an object.
    pub fn style(&self) -> Option<&Map<String, Value>> {
        self.props.get("style").and_then(Value::as_object)
    }

    /// Absolute positioning as measured, falling back to the `style` prop.
    pub fn is_absolute(&self) -> bool {
        if self.special_size_measurements.position == CssPosition::Absolute {
            return true;
        }
        self.style()
            .and_then(|s| s.get("position"))
            .and_then(Value::as_str)
            .and_then(CssPosition::parse)
            == Some(CssPosition::Absolute)
    }
}

/// All element instances of a frame, in canvas (traversal) order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ElementInstanceMetadata>", into = "Vec<ElementInstanceMetadata>")]
pub struct ElementMetadataMap {
    elements: Vec<ElementInstanceMetadata>,
    index: HashMap<ElementPath, usize>,
}

impl ElementMetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the end of canvas order, or replace in place when the path
    /// is already present.
    pub fn insert(&mut self, metadata: ElementInstanceMetadata) {
        match self.index.get(&metadata.element_path) {
            Some(&i) => self.elements[i] = metadata,
            None => {
                self.index
                    .insert(metadata.element_path.clone(), self.elements.len());
                self.elements.push(metadata);
            }
        }
    }

    pub fn get(&self, path: &ElementPath) -> Option<&ElementInstanceMetadata> {
        self.index.get(path).map(|&i| &self.elements[i])
    }

    pub fn frame(&self, path: &ElementPath) -> Option<CanvasRectangle> {
        self.get(path).and_then(|m| m.global_frame)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementInstanceMetadata> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl From<Vec<ElementInstanceMetadata>> for ElementMetadataMap {
    fn from(elements: Vec<ElementInstanceMetadata>) -> Self {
        let mut map = Self::new();
        for m in elements {
            map.insert(m);
        }
        map
    }
}

impl From<ElementMetadataMap> for Vec<ElementInstanceMetadata> {
    fn from(map: ElementMetadataMap) -> Self {
        map.elements
    }
}

impl FromIterator<ElementInstanceMetadata> for ElementMetadataMap {
    fn from_iter<T: IntoIterator<Item = ElementInstanceMetadata>>(iter: T) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Rectangle;
    use serde_json::json;

    fn meta(path: &str, x: f64) -> ElementInstanceMetadata {
        ElementInstanceMetadata::new(
            path.parse().expect("path"),
            Some(Rectangle::new(x, 0.0, 10.0, 10.0)),
        )
    }

    #[test]
    fn keeps_canvas_order_and_replaces_in_place() {
        let mut map = ElementMetadataMap::new();
        map.insert(meta("a", 0.0));
        map.insert(meta("a/b", 10.0));
        map.insert(meta("a", 50.0));
        let order: Vec<String> = map.iter().map(|m| m.element_path.to_string()).collect();
        assert_eq!(order, vec!["a", "a/b"]);
        assert_eq!(map.frame(&"a".parse().expect("path")).map(|f| f.x), Some(50.0));
    }

    #[test]
    fn absolute_from_style_prop() {
        let props = json!({ "style": { "position": "absolute", "left": 10 } });
        let m = meta("a", 0.0).with_props(props.as_object().cloned().unwrap_or_default());
        assert!(m.is_absolute());
        assert!(!meta("b", 0.0).is_absolute());
        assert!(meta("c", 0.0).with_position(CssPosition::Absolute).is_absolute());
    }

    #[test]
    fn serde_preserves_order() {
        let map: ElementMetadataMap = vec![meta("z", 0.0), meta("a", 1.0)].into();
        let text = serde_json::to_string(&map).expect("serialize");
        let back: ElementMetadataMap = serde_json::from_str(&text).expect("deserialize");
        let order: Vec<String> = back.iter().map(|m| m.element_path.to_string()).collect();
        assert_eq!(order, vec!["z", "a"]);
    }
}
