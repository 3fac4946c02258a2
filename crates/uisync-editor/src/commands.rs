//! Canvas commands and the applier that commits them.
//!
//! Strategies never touch the project directly: they return a list of
//! declarative commands. `Permanent` commands edit the element tree of the
//! open file; `Transient` ones only feed the live overlay (snap lines,
//! highlights) and are dropped after the frame that produced them.

use crate::pins::CssLength;
use crate::snapping::GuidelineWithSnappingVector;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uisync_core::geom::round_to;
use uisync_core::model::{JsxAttribute, JsxElement, Literal};
use uisync_core::path::ElementPath;
use uisync_core::project::{ProjectContents, RevisionsState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhenToRun {
    Permanent,
    Transient,
}

/// `["style", "left"]`: attribute name, then keys into its object value.
pub type PropertyPath = SmallVec<[String; 2]>;

pub fn style_property(name: &str) -> PropertyPath {
    SmallVec::from_iter(["style".to_string(), name.to_string()])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustCssLengthProperty {
    pub when: WhenToRun,
    pub target: ElementPath,
    pub property: PropertyPath,
    /// Change in pixels; percentages are converted through the parent size.
    pub value_px: f64,
    /// The parent's width or height along the property's axis.
    pub parent_dimension_px: Option<f64>,
    pub create_if_not_existing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CanvasCommand {
    AdjustCssLengthProperty(AdjustCssLengthProperty),
    SetSnappingGuidelines {
        when: WhenToRun,
        guidelines: Vec<GuidelineWithSnappingVector>,
    },
    UpdateHighlightedViews {
        when: WhenToRun,
        views: Vec<ElementPath>,
    },
}

impl CanvasCommand {
    pub fn when(&self) -> WhenToRun {
        match self {
            CanvasCommand::AdjustCssLengthProperty(c) => c.when,
            CanvasCommand::SetSnappingGuidelines { when, .. }
            | CanvasCommand::UpdateHighlightedViews { when, .. } => *when,
        }
    }
}

// ─── Applying ────────────────────────────────────────────────────────────

/// What the live canvas draws on top of the scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasOverlay {
    pub guidelines: Vec<GuidelineWithSnappingVector>,
    pub highlighted_views: Vec<ElementPath>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandsOutcome {
    pub overlay: CanvasOverlay,
    /// Elements whose attributes changed.
    pub edited: Vec<ElementPath>,
    /// Adjustments whose target or property could not be resolved.
    pub skipped: usize,
}

/// Apply commands in order to the open file of `project`.
///
/// Guidelines accumulate across commands; a highlight update replaces the
/// highlighted set. An edited file is marked ahead of its code.
pub fn apply_commands(
    project: &mut ProjectContents,
    open_file: &str,
    commands: &[CanvasCommand],
) -> CommandsOutcome {
    let mut outcome = CommandsOutcome::default();
    for command in commands {
        match command {
            CanvasCommand::AdjustCssLengthProperty(adjust) => {
                let applied = project
                    .find_element_mut(open_file, &adjust.target)
                    .is_some_and(|element| adjust_css_length(element, adjust));
                if applied {
                    trace!("adjusted {:?} of {}", adjust.property, adjust.target);
                    if !outcome.edited.contains(&adjust.target) {
                        outcome.edited.push(adjust.target.clone());
                    }
                } else {
                    outcome.skipped += 1;
                }
            }
            CanvasCommand::SetSnappingGuidelines { guidelines, .. } => {
                outcome.overlay.guidelines.extend(guidelines.iter().copied());
            }
            CanvasCommand::UpdateHighlightedViews { views, .. } => {
                outcome.overlay.highlighted_views = views.clone();
            }
        }
    }
    if !outcome.edited.is_empty() {
        if let Some(file) = project.text_file_mut(open_file) {
            file.revisions_state = RevisionsState::ParsedAhead;
        }
    }
    debug!(
        "applied {} commands: {} elements edited, {} skipped",
        commands.len(),
        outcome.edited.len(),
        outcome.skipped
    );
    outcome
}

/// Apply one length adjustment to an element's attributes. Returns `false`
/// when the property is missing (and may not be created) or is not a
/// length that can be adjusted.
pub fn adjust_css_length(element: &mut JsxElement, adjust: &AdjustCssLengthProperty) -> bool {
    let [attribute, key] = adjust.property.as_slice() else {
        return false;
    };
    if element.attribute(attribute).is_none() {
        if !adjust.create_if_not_existing {
            return false;
        }
        element.set_attribute(attribute, JsxAttribute::nested_object(Vec::new()));
    }
    let Some(object) = element.attribute_mut(attribute) else {
        return false;
    };
    let current = match object.get_property(key) {
        Some(value @ JsxAttribute::Value { .. }) => {
            let Some(length) = value.to_json().as_ref().and_then(CssLength::from_json) else {
                return false;
            };
            Some((length, value))
        }
        Some(_) => return false,
        None => None,
    };
    let new_value = match current {
        Some((length, value)) => {
            let Some(adjusted) = length.adjusted_by(adjust.value_px, adjust.parent_dimension_px)
            else {
                return false;
            };
            let mut new_value = length_attribute(adjusted, value);
            *new_value.comments_mut() = value.comments().clone();
            new_value
        }
        None if adjust.create_if_not_existing => JsxAttribute::number(adjust.value_px),
        None => return false,
    };
    object.set_property(key, new_value)
}

/// Write an adjusted length back in the same form the old value used.
fn length_attribute(length: CssLength, old: &JsxAttribute) -> JsxAttribute {
    let was_string = matches!(
        old,
        JsxAttribute::Value {
            value: Literal::String(_),
            ..
        }
    );
    match length {
        CssLength::Px(v) if was_string => {
            let written_px = matches!(
                old,
                JsxAttribute::Value { value: Literal::String(s), .. } if s.trim_end().ends_with("px")
            );
            let v = round_to(v, 2);
            JsxAttribute::string(if written_px { format!("{v}px") } else { format!("{v}") })
        }
        CssLength::Px(v) => JsxAttribute::number(round_to(v, 2)),
        CssLength::Percent(p) => JsxAttribute::string(format!("{}%", round_to(p, 2))),
    }
}
