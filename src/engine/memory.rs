//! In-process overlay engine.
//!
//! Keeps annotations in an ordered list and tracks selection, drawing
//! settings and highlighted shapes the way a rendering engine would, without
//! rendering anything. Rendered elements are identified by annotation id.
//! The `select_shape`/`draw_shape`/`edit_selected`/`click_background` helpers
//! stand in for user interaction and return the event a real engine would
//! emit.

use super::{AnnotationEngine, DrawingTool, EngineEvent, SelectEvent};
use crate::annotation_types::Target;
use crate::annotations::WebAnnotation;
use crate::selection::{PendingShape, Selected};
use indexmap::IndexSet;

/// Element handle reported for a shape that is still being drawn.
pub const PENDING_ELEMENT: &str = "pending";

/// Ordered, non-rendering [`AnnotationEngine`].
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    annotations: Vec<WebAnnotation>,
    selected: Option<String>,
    highlighted: IndexSet<String>,
    drawing_enabled: bool,
    drawing_tool: DrawingTool,
}

impl MemoryEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    fn position_of(&self, annotation: &WebAnnotation) -> Option<usize> {
        match &annotation.id {
            Some(id) => self.annotations.iter().position(|a| a.id.as_ref() == Some(id)),
            None => self.annotations.iter().position(|a| a == annotation),
        }
    }

    /// Drop selection and highlight state of a shape that no longer exists.
    fn forget_shape(&mut self, id: &str) {
        self.highlighted.shift_remove(id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
    }

    /// Annotation with the given id.
    pub fn annotation(&self, id: &str) -> Option<&WebAnnotation> {
        self.annotations.iter().find(|a| a.id.as_deref() == Some(id))
    }

    /// Element of the current selection.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Whether new shapes may be drawn.
    pub fn drawing_enabled(&self) -> bool {
        self.drawing_enabled
    }

    /// Tool used for new shapes.
    pub fn drawing_tool(&self) -> DrawingTool {
        self.drawing_tool
    }

    /// Whether the shape is highlighted.
    pub fn is_highlighted(&self, id: &str) -> bool {
        self.highlighted.contains(id)
    }

    /// Highlighted shape ids, in the order they were highlighted.
    pub fn highlighted_ids(&self) -> Vec<&str> {
        self.highlighted.iter().map(String::as_str).collect()
    }

    /// The user clicks an existing shape.
    pub fn select_shape(&mut self, id: &str) -> Option<EngineEvent<String>> {
        let annotation = self.annotation(id)?.clone();
        self.selected = Some(id.to_string());
        Some(EngineEvent::select(annotation, Some(id.to_string())))
    }

    /// The user draws a new shape; `None` when drawing is disabled.
    pub fn draw_shape(&mut self, target: Target) -> Option<EngineEvent<String>> {
        if !self.drawing_enabled {
            return None;
        }
        self.selected = Some(PENDING_ELEMENT.to_string());
        Some(EngineEvent::Select(SelectEvent {
            selection: Some(Selected::Pending(PendingShape::new(target))),
            element: Some(PENDING_ELEMENT.to_string()),
            skip_event: false,
        }))
    }

    /// The user drags or reshapes the selected shape.
    pub fn edit_selected(&mut self, target: Target) -> Option<EngineEvent<String>> {
        let element = self.selected.clone()?;
        Some(EngineEvent::UpdateTarget { element, target })
    }

    /// The user clicks empty space.
    pub fn click_background(&mut self) -> EngineEvent<String> {
        self.selected = None;
        EngineEvent::deselect()
    }
}

impl AnnotationEngine for MemoryEngine {
    type Element = String;

    fn init(&mut self, annotations: Vec<WebAnnotation>) {
        self.annotations = annotations;
        self.selected = None;
        self.highlighted.clear();
    }

    fn annotations(&self) -> Vec<WebAnnotation> {
        self.annotations.clone()
    }

    fn add_annotation(&mut self, annotation: WebAnnotation) {
        self.annotations.push(annotation);
    }

    fn remove_annotation(&mut self, annotation: &WebAnnotation) {
        if let Some(pos) = self.position_of(annotation) {
            let removed = self.annotations.remove(pos);
            if let Some(id) = removed.id {
                self.forget_shape(&id);
            }
        }
    }

    fn add_or_update_annotation(&mut self, next: WebAnnotation, previous: &WebAnnotation) {
        match self.position_of(previous) {
            Some(pos) => {
                let replaced = std::mem::replace(&mut self.annotations[pos], next);
                if let Some(old_id) = replaced.id {
                    if self.annotations[pos].id.as_ref() != Some(&old_id) {
                        self.forget_shape(&old_id);
                    }
                }
            },
            None => self.annotations.push(next),
        }
    }

    fn deselect(&mut self) {
        self.selected = None;
    }

    fn set_drawing_enabled(&mut self, enabled: bool) {
        self.drawing_enabled = enabled;
    }

    fn set_drawing_tool(&mut self, tool: DrawingTool) {
        self.drawing_tool = tool;
    }

    fn shape_ids(&self) -> Vec<String> {
        self.annotations.iter().filter_map(|a| a.id.clone()).collect()
    }

    fn set_shape_highlighted(&mut self, id: &str, highlighted: bool) {
        if highlighted {
            if self.annotation(id).is_some() {
                self.highlighted.insert(id.to_string());
            }
        } else {
            self.highlighted.shift_remove(id);
        }
    }
}
