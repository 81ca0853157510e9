//! # Zone Annotations
//!
//! Adapter between an image viewer's zone model and the W3C Web Annotation
//! Data Model spoken by annotation overlay engines on deep-zoom viewers.
//!
//! ## Core Features
//!
//! - **Zone ⇄ Annotation codec**: rectangles become `xywh=pixel:` media
//!   fragment selectors, polygons become SVG polygon selectors, the note
//!   travels in a `TextualBody`. Decoding is strict and round-trips exactly.
//! - **Selection tracking**: mirrors the engine's single selection
//!   (idle, drawing a new shape, selected, editing) so an edit can be saved or
//!   cancelled later.
//! - **Engine seam**: the overlay engine is the [`AnnotationEngine`] trait;
//!   [`engine::MemoryEngine`] is an in-process implementation.
//! - **Application events**: `zoneSelected` and `zoneSaved`, delivered
//!   synchronously to subscribed listeners.
//!
//! ## Quick Start
//!
//! ```
//! use zone_annotations::engine::MemoryEngine;
//! use zone_annotations::{LayerConfig, Zone, ZoneEvent, ZoneLayer, ZoneProperties};
//!
//! # fn main() -> zone_annotations::Result<()> {
//! let mut layer = ZoneLayer::new(MemoryEngine::new(), LayerConfig::new().with_drawing(true));
//! layer.subscribe(|event: &ZoneEvent<String>| println!("{} {:?}", event.name(), event.zone()));
//!
//! layer.set_zones(vec![
//!     Zone::rectangle(10.0, 20.0, 110.0, 70.0).with_id("z1").with_note("sample"),
//!     Zone::polygon("0,0 40,0 40,40").with_id("z2"),
//! ])?;
//!
//! // forward the engine's callbacks
//! let click = layer.engine_mut().select_shape("z1").unwrap();
//! layer.handle_event(click)?;
//!
//! let saved = layer.save(ZoneProperties::new().with_note("revised"))?;
//! assert_eq!(saved.note, "revised");
//! assert_eq!(layer.zones()?.len(), 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Geometry and zone records
pub mod geometry;
pub mod zone;

// Web Annotation model
/// Web Annotation vocabulary types and constants
pub mod annotation_types;
pub mod annotations;

// Conversion
pub mod codec;

// Selection tracking and engine seam
pub mod engine;
pub mod events;
pub mod layer;
pub mod selection;

// Configuration
pub mod config;

// Re-exports
pub use annotation_types::{AnnotationBody, Selector, Target};
pub use annotations::WebAnnotation;
pub use codec::{annotation_to_zone, zone_to_annotation};
pub use config::LayerConfig;
pub use engine::{AnnotationEngine, DrawingTool, EngineEvent, SelectEvent};
pub use error::{Error, Result};
pub use events::ZoneEvent;
pub use layer::{ZoneLayer, ZoneProperties};
pub use selection::{PendingShape, Selected, SelectionPhase};
pub use zone::{zones_from_json, zones_to_json, Zone, ZoneGeometry};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
