//! Core Web Annotation vocabulary types used by the zone codec.
//!
//! Only the subset of the W3C Web Annotation Data Model that the overlay
//! engine exchanges is modelled: a textual body, a target with a single
//! selector, and the two selector kinds (media fragment and SVG).

use serde::{Deserialize, Serialize};

/// JSON-LD context of every annotation.
pub const ANNOTATION_CONTEXT: &str = "http://www.w3.org/ns/anno.jsonld";

/// Value of the annotation `type` field.
pub const ANNOTATION_TYPE: &str = "Annotation";

/// `conformsTo` of a media fragment selector.
pub const MEDIA_FRAGMENTS_SPEC: &str = "http://www.w3.org/TR/media-frags/";

/// Prefix of a pixel-space fragment selector value.
pub const FRAGMENT_PREFIX: &str = "xywh=pixel:";

/// Opening of an SVG polygon selector value, up to the points attribute.
pub const SVG_POLYGON_PREFIX: &str = "<svg><polygon points=\"";

/// Closing of an SVG polygon selector value, after the points attribute.
pub const SVG_POLYGON_SUFFIX: &str = "\"></polygon></svg>";

/// Annotation selector, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Selector {
    /// Media fragment (`xywh=pixel:x,y,w,h`)
    FragmentSelector {
        /// Fragment syntax the value follows
        #[serde(rename = "conformsTo", default = "default_conforms_to")]
        conforms_to: String,
        /// Fragment value
        value: String,
    },
    /// Embedded SVG shape
    SvgSelector {
        /// SVG markup
        value: String,
    },
    /// Any other selector type
    #[serde(other)]
    Unsupported,
}

fn default_conforms_to() -> String {
    MEDIA_FRAGMENTS_SPEC.to_string()
}

impl Selector {
    /// Create a pixel-space fragment selector.
    pub fn fragment(value: impl Into<String>) -> Self {
        Self::FragmentSelector {
            conforms_to: default_conforms_to(),
            value: value.into(),
        }
    }

    /// Create an SVG selector.
    pub fn svg(value: impl Into<String>) -> Self {
        Self::SvgSelector {
            value: value.into(),
        }
    }

    /// Selector type name as written in JSON.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::FragmentSelector { .. } => "FragmentSelector",
            Self::SvgSelector { .. } => "SvgSelector",
            Self::Unsupported => "Unsupported",
        }
    }

    /// Raw selector value, if the selector type carries one.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::FragmentSelector { value, .. } | Self::SvgSelector { value } => Some(value),
            Self::Unsupported => None,
        }
    }
}

/// What an annotation points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// IRI of the annotated image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Region of the image
    pub selector: Selector,
}

impl Target {
    /// Create a target with no source.
    pub fn new(selector: Selector) -> Self {
        Self {
            source: None,
            selector,
        }
    }
}

/// One entry of the annotation `body` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnnotationBody {
    /// Free text; the zone note lives here
    TextualBody {
        /// Text content
        value: String,
        /// Motivation of this body (`commenting`, `tagging`, ...)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        purpose: Option<String>,
    },
    /// Any other body type
    #[serde(other)]
    Other,
}

impl AnnotationBody {
    /// Create a textual body with no purpose.
    pub fn text(value: impl Into<String>) -> Self {
        Self::TextualBody {
            value: value.into(),
            purpose: None,
        }
    }

    /// Text of a textual body.
    pub fn text_value(&self) -> Option<&str> {
        match self {
            Self::TextualBody { value, .. } => Some(value),
            Self::Other => None,
        }
    }
}
