//! Seam to the annotation overlay engine.
//!
//! The engine renders shapes over the image viewer, hit-tests them, lets the
//! user draw and reshape them, and keeps the authoritative list of live
//! annotations. The zone layer only issues commands through
//! [`AnnotationEngine`] and consumes the [`EngineEvent`]s the host forwards
//! from the engine's callbacks.

mod memory;

pub use memory::{MemoryEngine, PENDING_ELEMENT};

use crate::annotation_types::Target;
use crate::annotations::WebAnnotation;
use crate::error::Error;
use crate::selection::Selected;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape drawing tool offered by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DrawingTool {
    /// Rectangle (fragment selector)
    #[default]
    Rect,
    /// Polygon (SVG selector)
    Polygon,
}

impl DrawingTool {
    /// Engine name of the tool.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Polygon => "polygon",
        }
    }
}

impl TryFrom<String> for DrawingTool {
    type Error = Error;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<DrawingTool> for String {
    fn from(tool: DrawingTool) -> Self {
        tool.name().to_string()
    }
}

impl fmt::Display for DrawingTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DrawingTool {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rect" => Ok(Self::Rect),
            "polygon" => Ok(Self::Polygon),
            other => Err(Error::UnknownTool(other.to_string())),
        }
    }
}

/// Payload of the engine's `select` callback.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectEvent<E> {
    /// Selected shape, or `None` for a deselection
    pub selection: Option<Selected>,
    /// Rendered element of the shape
    pub element: Option<E>,
    /// Programmatic reselection; update state without notifying the application
    pub skip_event: bool,
}

/// Callback from the engine, forwarded by the host in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent<E> {
    /// `select({annotation, element, skipEvent})`
    Select(SelectEvent<E>),
    /// `updateTarget(element, target)`: the user reshaped the selection
    UpdateTarget {
        /// Rendered element being edited
        element: E,
        /// New target
        target: Target,
    },
}

impl<E> EngineEvent<E> {
    /// A user selection of an existing annotation.
    pub fn select(annotation: WebAnnotation, element: Option<E>) -> Self {
        Self::Select(SelectEvent {
            selection: Some(Selected::Annotation(annotation)),
            element,
            skip_event: false,
        })
    }

    /// A selection that must not be reported to the application.
    pub fn select_silently(selection: Selected, element: Option<E>) -> Self {
        Self::Select(SelectEvent {
            selection: Some(selection),
            element,
            skip_event: true,
        })
    }

    /// Nothing selected any more.
    pub fn deselect() -> Self {
        Self::Select(SelectEvent {
            selection: None,
            element: None,
            skip_event: false,
        })
    }
}

/// Commands the zone layer issues to the overlay engine.
pub trait AnnotationEngine {
    /// Handle to a rendered shape.
    type Element: Clone + fmt::Debug;

    /// Replace every annotation at once.
    fn init(&mut self, annotations: Vec<WebAnnotation>);

    /// Current annotations, in the engine's order.
    fn annotations(&self) -> Vec<WebAnnotation>;

    /// Add one annotation.
    fn add_annotation(&mut self, annotation: WebAnnotation);

    /// Remove one annotation.
    fn remove_annotation(&mut self, annotation: &WebAnnotation);

    /// Replace `previous` with `next`; adds `next` if `previous` is unknown.
    fn add_or_update_annotation(&mut self, next: WebAnnotation, previous: &WebAnnotation) {
        self.remove_annotation(previous);
        self.add_annotation(next);
    }

    /// Clear the engine's selection.
    fn deselect(&mut self);

    /// Allow or forbid drawing new shapes.
    fn set_drawing_enabled(&mut self, enabled: bool);

    /// Tool used for new shapes.
    fn set_drawing_tool(&mut self, tool: DrawingTool);

    /// Ids of the rendered shapes.
    fn shape_ids(&self) -> Vec<String>;

    /// Mark or unmark a rendered shape as highlighted.
    fn set_shape_highlighted(&mut self, id: &str, highlighted: bool);
}
