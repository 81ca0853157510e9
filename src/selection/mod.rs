//! Selection tracking for the zone layer.
//!
//! The overlay engine keeps at most one shape selected. The layer mirrors that
//! selection in a [`SelectionState`], together with any target edit the user
//! has made since selecting it:
//!
//! ```text
//!            select(pending)            update_target
//!   Idle ──────────────────────▶ Selecting ───────────▶ Editing
//!    ▲  ─────────────────────▶ Selected ────────────▶   │
//!    │      select(annotation)                          │
//!    └──────────── save / cancel / deselect ────────────┘
//! ```
//!
//! Events are applied in arrival order and the most recent one wins; a new
//! `select` replaces the previous selection and drops its edit.

use crate::annotation_types::{AnnotationBody, Target};
use crate::annotations::WebAnnotation;
use uuid::Uuid;

/// A shape the user has drawn but that has no committed identity yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingShape {
    /// Region drawn so far
    pub target: Target,
    /// Bodies attached while drawing
    pub body: Vec<AnnotationBody>,
}

impl PendingShape {
    /// Create a pending shape with no body.
    pub fn new(target: Target) -> Self {
        Self {
            target,
            body: Vec::new(),
        }
    }

    /// Materialize as a full annotation with a freshly generated `#<uuid>` id.
    pub fn to_annotation(&self) -> WebAnnotation {
        let mut annotation =
            WebAnnotation::new(Some(format!("#{}", Uuid::new_v4())), self.target.clone());
        annotation.body = self.body.clone();
        annotation
    }
}

/// What the engine reports as selected.
#[derive(Debug, Clone, PartialEq)]
pub enum Selected {
    /// An existing, committed annotation
    Annotation(WebAnnotation),
    /// A brand-new shape still being drawn
    Pending(PendingShape),
}

impl Selected {
    /// Whether this is a pending, uncommitted shape.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// The selection as a full annotation, materializing a pending shape.
    pub fn resolve(&self) -> WebAnnotation {
        match self {
            Self::Annotation(annotation) => annotation.clone(),
            Self::Pending(shape) => shape.to_annotation(),
        }
    }
}

/// Coarse state of the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    /// Nothing selected
    Idle,
    /// A pending new shape is selected
    Selecting,
    /// A committed annotation is selected
    Selected,
    /// The selection carries an uncommitted target edit
    Editing,
}

/// Annotation pair produced when a selection is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    /// The annotation as it was selected
    pub previous: WebAnnotation,
    /// The annotation with the pending edit applied
    pub next: WebAnnotation,
}

#[derive(Debug, Clone)]
struct ActiveSelection<E> {
    selected: Selected,
    element: Option<E>,
    modified_target: Option<Target>,
}

/// Current selection and pending edit, owned by a single zone layer.
#[derive(Debug, Clone)]
pub struct SelectionState<E> {
    active: Option<ActiveSelection<E>>,
}

impl<E> Default for SelectionState<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> SelectionState<E> {
    /// Create an idle state.
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Current phase.
    pub fn phase(&self) -> SelectionPhase {
        match &self.active {
            None => SelectionPhase::Idle,
            Some(active) if active.modified_target.is_some() => SelectionPhase::Editing,
            Some(active) if active.selected.is_pending() => SelectionPhase::Selecting,
            Some(_) => SelectionPhase::Selected,
        }
    }

    /// Whether anything is selected.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Replace the selection, discarding any previous edit.
    pub fn select(&mut self, selected: Selected, element: Option<E>) {
        self.active = Some(ActiveSelection {
            selected,
            element,
            modified_target: None,
        });
    }

    /// Record an edited target for the current selection.
    ///
    /// Returns `false` and changes nothing when there is no selection.
    pub fn update_target(&mut self, element: E, target: Target) -> bool {
        match &mut self.active {
            Some(active) => {
                active.element = Some(element);
                active.modified_target = Some(target);
                true
            },
            None => false,
        }
    }

    /// Drop the selection and any edit.
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// The selected shape.
    pub fn selected(&self) -> Option<&Selected> {
        self.active.as_ref().map(|active| &active.selected)
    }

    /// Rendered element of the selection, as last reported by the engine.
    pub fn element(&self) -> Option<&E> {
        self.active.as_ref().and_then(|active| active.element.as_ref())
    }

    /// Uncommitted target edit.
    pub fn modified_target(&self) -> Option<&Target> {
        self.active.as_ref().and_then(|active| active.modified_target.as_ref())
    }

    /// Annotations to commit for the current selection, if any.
    ///
    /// A pending shape is materialized first, so `previous` carries the id
    /// the new annotation will be stored under unless the caller overrides it.
    pub fn commit_candidate(&self) -> Option<Commit> {
        let active = self.active.as_ref()?;
        let previous = active.selected.resolve();
        let next = match &active.modified_target {
            Some(target) => previous.with_target(target.clone()),
            None => previous.clone(),
        };
        Some(Commit { previous, next })
    }
}
