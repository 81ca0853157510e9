//! Web Annotation records exchanged with the overlay engine.
//!
//! A [`WebAnnotation`] is always built structurally and serialized with
//! serde, so note text containing quotes or newlines cannot break the JSON.

use crate::annotation_types::{AnnotationBody, Target, ANNOTATION_CONTEXT, ANNOTATION_TYPE};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A W3C Web Annotation representing one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebAnnotation {
    /// JSON-LD context
    #[serde(rename = "@context", default = "default_context")]
    pub context: String,

    /// Annotation identifier (mirrors the zone id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Always "Annotation"
    #[serde(rename = "type", default = "default_type")]
    pub annotation_type: String,

    /// Bodies; the first textual body carries the zone note
    #[serde(default)]
    pub body: Vec<AnnotationBody>,

    /// Annotated region
    pub target: Target,
}

fn default_context() -> String {
    ANNOTATION_CONTEXT.to_string()
}

fn default_type() -> String {
    ANNOTATION_TYPE.to_string()
}

impl WebAnnotation {
    /// Create an annotation with the fixed context and type and no body.
    pub fn new(id: Option<String>, target: Target) -> Self {
        Self {
            context: default_context(),
            id,
            annotation_type: default_type(),
            body: Vec::new(),
            target,
        }
    }

    /// Parse an annotation from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Text of the first body, or `""` when it is absent or not textual.
    pub fn note(&self) -> &str {
        self.body.first().and_then(AnnotationBody::text_value).unwrap_or("")
    }

    /// Replace the note, keeping the purpose of an existing first textual body.
    pub fn set_note(&mut self, note: impl Into<String>) {
        let note = note.into();
        match self.body.first_mut() {
            Some(AnnotationBody::TextualBody { value, .. }) => *value = note,
            Some(first) => *first = AnnotationBody::text(note),
            None => self.body.push(AnnotationBody::text(note)),
        }
    }

    /// Copy of this annotation pointing at a different target.
    pub fn with_target(&self, target: Target) -> Self {
        Self {
            target,
            ..self.clone()
        }
    }
}
