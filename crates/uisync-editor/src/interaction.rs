//! Interaction input model.
//!
//! A canvas interaction is described fresh on every frame: what kind of
//! input is in progress, which modifier keys are held, and which control
//! (if any) the pointer grabbed. The metadata measured when the interaction
//! started is captured once in an [`InteractionSession`] and never updated,
//! so every frame of a drag computes its deltas against the same baseline.

use serde::{Deserialize, Serialize};
use uisync_core::geom::{CanvasPoint, CanvasVector};
use uisync_core::metadata::ElementMetadataMap;
use uisync_core::path::ElementPath;
use uisync_core::project::ProjectContents;

/// Modifier keys held during an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub cmd: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        cmd: false,
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
}

// ─── Edge positions ──────────────────────────────────────────────────────

/// Where along one axis a resize handle sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisEdge {
    /// Left or top edge.
    Start,
    /// Midpoint of the perpendicular edge; the axis is not resized.
    Middle,
    /// Right or bottom edge.
    End,
}

impl AxisEdge {
    pub fn weight(self) -> f64 {
        match self {
            AxisEdge::Start => 0.0,
            AxisEdge::Middle => 0.5,
            AxisEdge::End => 1.0,
        }
    }

    /// The edge across the axis. `Middle` stays.
    pub fn opposite(self) -> Self {
        match self {
            AxisEdge::Start => AxisEdge::End,
            AxisEdge::Middle => AxisEdge::Middle,
            AxisEdge::End => AxisEdge::Start,
        }
    }

    pub fn from_weight(weight: f64) -> Option<Self> {
        if weight == 0.0 {
            Some(AxisEdge::Start)
        } else if weight == 0.5 {
            Some(AxisEdge::Middle)
        } else if weight == 1.0 {
            Some(AxisEdge::End)
        } else {
            None
        }
    }
}

/// A resize handle: one of the four corners or four edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgePosition {
    pub x: AxisEdge,
    pub y: AxisEdge,
}

impl EdgePosition {
    pub const TOP_LEFT: Self = Self::at(AxisEdge::Start, AxisEdge::Start);
    pub const TOP: Self = Self::at(AxisEdge::Middle, AxisEdge::Start);
    pub const TOP_RIGHT: Self = Self::at(AxisEdge::End, AxisEdge::Start);
    pub const RIGHT: Self = Self::at(AxisEdge::End, AxisEdge::Middle);
    pub const BOTTOM_RIGHT: Self = Self::at(AxisEdge::End, AxisEdge::End);
    pub const BOTTOM: Self = Self::at(AxisEdge::Middle, AxisEdge::End);
    pub const BOTTOM_LEFT: Self = Self::at(AxisEdge::Start, AxisEdge::End);
    pub const LEFT: Self = Self::at(AxisEdge::Start, AxisEdge::Middle);

    pub const ALL: [Self; 8] = [
        Self::TOP_LEFT,
        Self::TOP,
        Self::TOP_RIGHT,
        Self::RIGHT,
        Self::BOTTOM_RIGHT,
        Self::BOTTOM,
        Self::BOTTOM_LEFT,
        Self::LEFT,
    ];

    const fn at(x: AxisEdge, y: AxisEdge) -> Self {
        Self { x, y }
    }

    /// From `{x, y}` weights in {0, 0.5, 1}. The box center `(0.5, 0.5)`
    /// is not a handle.
    pub fn from_weights(x: f64, y: f64) -> Option<Self> {
        let position = Self {
            x: AxisEdge::from_weight(x)?,
            y: AxisEdge::from_weight(y)?,
        };
        (position.x != AxisEdge::Middle || position.y != AxisEdge::Middle).then_some(position)
    }

    pub fn is_corner(self) -> bool {
        self.x != AxisEdge::Middle && self.y != AxisEdge::Middle
    }
}

// ─── Interaction state ───────────────────────────────────────────────────

/// The control the pointer grabbed when the interaction started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActiveControl {
    /// The body of the selection (move).
    BoundingArea,
    ResizeHandle(EdgePosition),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InteractionData {
    Drag {
        drag_start: CanvasPoint,
        /// `None` until the pointer has moved past the drag threshold.
        drag: Option<CanvasVector>,
        modifiers: Modifiers,
    },
    Keyboard {
        modifiers: Modifiers,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionState {
    pub data: InteractionData,
    pub active_control: ActiveControl,
}

impl InteractionState {
    pub fn drag(
        drag_start: CanvasPoint,
        drag: Option<CanvasVector>,
        modifiers: Modifiers,
        active_control: ActiveControl,
    ) -> Self {
        Self {
            data: InteractionData::Drag {
                drag_start,
                drag,
                modifiers,
            },
            active_control,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self.data {
            InteractionData::Drag { modifiers, .. } | InteractionData::Keyboard { modifiers } => {
                modifiers
            }
        }
    }

    pub fn is_drag(&self) -> bool {
        matches!(self.data, InteractionData::Drag { .. })
    }

    /// The drag vector, once the drag has started.
    pub fn drag_vector(&self) -> Option<CanvasVector> {
        match self.data {
            InteractionData::Drag { drag, .. } => drag,
            InteractionData::Keyboard { .. } => None,
        }
    }

    pub fn resize_handle(&self) -> Option<EdgePosition> {
        match self.active_control {
            ActiveControl::ResizeHandle(edge) => Some(edge),
            ActiveControl::BoundingArea => None,
        }
    }
}

/// Metadata captured when an interaction starts; read-only for its whole
/// lifetime.
#[derive(Debug, Clone, Default)]
pub struct InteractionSession {
    pub starting_metadata: ElementMetadataMap,
}

impl InteractionSession {
    pub fn new(starting_metadata: ElementMetadataMap) -> Self {
        Self { starting_metadata }
    }
}

/// The editor state a strategy reads.
#[derive(Debug, Clone, Copy)]
pub struct CanvasState<'a> {
    pub selected_elements: &'a [ElementPath],
    pub project_contents: &'a ProjectContents,
    pub open_file: &'a str,
    /// Canvas zoom; 2.0 draws everything twice as large.
    pub scale: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_positions_from_weights() {
        assert_eq!(EdgePosition::from_weights(1.0, 1.0), Some(EdgePosition::BOTTOM_RIGHT));
        assert_eq!(EdgePosition::from_weights(0.0, 0.5), Some(EdgePosition::LEFT));
        assert_eq!(EdgePosition::from_weights(0.5, 0.5), None);
        assert_eq!(EdgePosition::from_weights(0.25, 0.0), None);
    }

    #[test]
    fn eight_distinct_handles() {
        let corners = EdgePosition::ALL.iter().filter(|e| e.is_corner()).count();
        assert_eq!(corners, 4);
        for (i, a) in EdgePosition::ALL.iter().enumerate() {
            assert_eq!(EdgePosition::from_weights(a.x.weight(), a.y.weight()), Some(*a));
            assert!(EdgePosition::ALL[i + 1..].iter().all(|b| b != a));
        }
    }

    #[test]
    fn interaction_accessors() {
        let state = InteractionState::drag(
            CanvasPoint::new(0.0, 0.0),
            Some(CanvasVector::new(4.0, 2.0)),
            Modifiers::ALT,
            ActiveControl::ResizeHandle(EdgePosition::TOP),
        );
        assert!(state.is_drag());
        assert!(state.modifiers().alt);
        assert_eq!(state.drag_vector(), Some(CanvasVector::new(4.0, 2.0)));
        assert_eq!(state.resize_handle(), Some(EdgePosition::TOP));

        let keyboard = InteractionState {
            data: InteractionData::Keyboard {
                modifiers: Modifiers::NONE,
            },
            active_control: ActiveControl::BoundingArea,
        };
        assert!(!keyboard.is_drag());
        assert_eq!(keyboard.drag_vector(), None);
    }
}
