//! The zone layer: application-facing adapter over an overlay engine.
//!
//! The layer converts the application's zones to Web Annotations before they
//! reach the engine, converts engine annotations back when reporting to the
//! application, and mirrors the engine's selection so that a later
//! [`save`](ZoneLayer::save) or [`cancel`](ZoneLayer::cancel) can commit or
//! discard the user's edit.
//!
//! ```
//! use zone_annotations::engine::MemoryEngine;
//! use zone_annotations::{LayerConfig, Zone, ZoneLayer};
//!
//! # fn main() -> zone_annotations::Result<()> {
//! let mut layer = ZoneLayer::new(MemoryEngine::new(), LayerConfig::default());
//! layer.set_zones(vec![Zone::rectangle(10.0, 20.0, 110.0, 70.0).with_id("z1")])?;
//!
//! let click = layer.engine_mut().select_shape("z1").unwrap();
//! layer.handle_event(click)?;
//! let saved = layer.save("z1")?;
//! assert_eq!(saved.id.as_deref(), Some("z1"));
//! # Ok(())
//! # }
//! ```

use crate::codec::{annotation_to_zone, zone_to_annotation};
use crate::config::LayerConfig;
use crate::engine::{AnnotationEngine, DrawingTool, EngineEvent, SelectEvent};
use crate::error::{Error, Result};
use crate::events::{ZoneEvent, ZoneListener};
use crate::selection::{Commit, Selected, SelectionPhase, SelectionState};
use crate::zone::Zone;
use std::collections::HashSet;

/// Caller-supplied overrides applied when a selection is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneProperties {
    /// Identifier to store the zone under
    pub id: Option<String>,
    /// Note to store with the zone
    pub note: Option<String>,
}

impl ZoneProperties {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Override the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl From<&str> for ZoneProperties {
    fn from(id: &str) -> Self {
        Self::new().with_id(id)
    }
}

impl From<String> for ZoneProperties {
    fn from(id: String) -> Self {
        Self::new().with_id(id)
    }
}

/// Zone adapter over an [`AnnotationEngine`].
pub struct ZoneLayer<En: AnnotationEngine> {
    engine: En,
    config: LayerConfig,
    selection: SelectionState<En::Element>,
    listeners: Vec<ZoneListener<En::Element>>,
}

impl<En: AnnotationEngine> ZoneLayer<En> {
    /// Wrap an engine, applying the configured drawing settings to it.
    pub fn new(mut engine: En, config: LayerConfig) -> Self {
        engine.set_drawing_enabled(config.drawing_enabled);
        engine.set_drawing_tool(config.drawing_tool);
        Self {
            engine,
            config,
            selection: SelectionState::new(),
            listeners: Vec::new(),
        }
    }

    /// Register a listener. Listeners run synchronously, in registration order.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&ZoneEvent<En::Element>) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: ZoneEvent<En::Element>) {
        log::trace!("Emitting {} for zone {:?}", event.name(), event.zone().id);
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    /// Apply one engine callback.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedSelector`] if a reported selection cannot be
    /// converted to a zone. The selection is still recorded.
    pub fn handle_event(&mut self, event: EngineEvent<En::Element>) -> Result<()> {
        match event {
            EngineEvent::Select(SelectEvent {
                selection: Some(selected),
                element,
                skip_event,
            }) => {
                self.selection.select(selected, element.clone());
                if skip_event {
                    log::trace!("Selection updated without notification");
                    return Ok(());
                }
                if let Some(zone) = self.selected_zone()? {
                    self.emit(ZoneEvent::ZoneSelected { zone, element });
                }
            },
            EngineEvent::Select(SelectEvent {
                selection: None, ..
            }) => {
                log::trace!("Selection cleared by engine");
                self.selection.clear();
            },
            EngineEvent::UpdateTarget { element, target } => {
                if !self.selection.update_target(element, target) {
                    log::warn!("Ignoring target update with no active selection");
                }
            },
        }
        Ok(())
    }

    /// Replace every zone in the engine and clear the selection.
    ///
    /// All zones are converted before the engine is touched, so an invalid
    /// zone leaves the previous set in place. An empty input clears the layer.
    pub fn set_zones<I>(&mut self, zones: I) -> Result<()>
    where
        I: IntoIterator<Item = Zone>,
    {
        let annotations = zones
            .into_iter()
            .map(|zone| {
                let mut annotation = zone_to_annotation(&zone)?;
                annotation.target.source = self.config.image_source.clone();
                Ok(annotation)
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Loading {} zones", annotations.len());
        self.engine.init(annotations);
        self.selection.clear();
        Ok(())
    }

    /// Remove every zone.
    pub fn clear_zones(&mut self) {
        log::debug!("Clearing all zones");
        self.engine.init(Vec::new());
        self.selection.clear();
    }

    /// Zones currently held by the engine, in engine order.
    pub fn zones(&self) -> Result<Vec<Zone>> {
        self.engine.annotations().iter().map(annotation_to_zone).collect()
    }

    /// The selected zone; a pending shape has `id == None`.
    pub fn selected_zone(&self) -> Result<Option<Zone>> {
        match self.selection.selected() {
            None => Ok(None),
            Some(Selected::Annotation(annotation)) => annotation_to_zone(annotation).map(Some),
            Some(Selected::Pending(shape)) => {
                let mut zone = annotation_to_zone(&shape.to_annotation())?;
                zone.id = None;
                Ok(Some(zone))
            },
        }
    }

    /// Current selection phase.
    pub fn selection_phase(&self) -> SelectionPhase {
        self.selection.phase()
    }

    /// Commit the current selection, including any reshaping, and return the
    /// saved zone.
    ///
    /// A pending shape is stored under a generated id unless `properties`
    /// supplies one.
    ///
    /// # Errors
    ///
    /// - [`Error::NoActiveSelection`] when nothing is selected.
    /// - [`Error::MalformedSelector`] when the result cannot be read back as a
    ///   zone; the selection is kept and the engine is not modified.
    pub fn save(&mut self, properties: impl Into<ZoneProperties>) -> Result<Zone> {
        let properties = properties.into();
        let Commit { previous, mut next } =
            self.selection.commit_candidate().ok_or(Error::NoActiveSelection)?;

        if let Some(id) = properties.id {
            next.id = Some(id);
        }
        if let Some(note) = properties.note {
            next.set_note(note);
        }
        if next.target.source.is_none() {
            next.target.source = self.config.image_source.clone();
        }

        let zone = annotation_to_zone(&next)?;

        self.selection.clear();
        self.engine.deselect();
        self.engine.add_or_update_annotation(next, &previous);
        log::debug!("Saved zone {:?} (was {:?})", zone.id, previous.id);

        self.emit(ZoneEvent::ZoneSaved { zone: zone.clone() });
        Ok(zone)
    }

    /// Discard the selection and any reshaping.
    pub fn cancel(&mut self) {
        log::debug!("Cancelling selection ({:?})", self.selection.phase());
        self.selection.clear();
        self.engine.deselect();
    }

    /// Delete the selected zone from the engine.
    ///
    /// Returns the removed zone, or `None` when the selection was a shape
    /// still being drawn (which is simply discarded).
    pub fn remove_selected_zone(&mut self) -> Result<Option<Zone>> {
        let annotation = match self.selection.selected() {
            None => return Err(Error::NoActiveSelection),
            Some(Selected::Pending(_)) => {
                self.cancel();
                return Ok(None);
            },
            Some(Selected::Annotation(annotation)) => annotation.clone(),
        };

        let zone = annotation_to_zone(&annotation)?;
        self.selection.clear();
        self.engine.deselect();
        self.engine.remove_annotation(&annotation);
        log::debug!("Removed zone {:?}", zone.id);
        Ok(Some(zone))
    }

    /// Allow or forbid drawing new shapes.
    pub fn set_drawing_enabled(&mut self, enabled: bool) {
        self.config.drawing_enabled = enabled;
        self.engine.set_drawing_enabled(enabled);
    }

    /// Tool used for new shapes.
    pub fn set_drawing_tool(&mut self, tool: DrawingTool) {
        self.config.drawing_tool = tool;
        self.engine.set_drawing_tool(tool);
    }

    /// Highlight exactly the zones whose ids are given.
    pub fn set_highlights<I, S>(&mut self, zone_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: HashSet<String> = zone_ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        for id in self.engine.shape_ids() {
            let highlighted = wanted.contains(&id);
            self.engine.set_shape_highlighted(&id, highlighted);
        }
    }

    /// Layer configuration.
    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &En {
        &self.engine
    }

    /// The wrapped engine, mutably.
    pub fn engine_mut(&mut self) -> &mut En {
        &mut self.engine
    }
}
