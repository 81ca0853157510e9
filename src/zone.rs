//! Application-level zone records.
//!
//! A zone is a rectangle or polygon in image pixel space with an identifier
//! and a free-text note. On the wire it is a flat JSON object:
//!
//! ```text
//! { "id": "z1", "ulx": 10, "uly": 20, "lrx": 110, "lry": 70, "note": "..." }
//! { "id": "z2", "points": "0,0 10,0 10,10", "note": "..." }
//! ```

use crate::error::{Error, Result};
use crate::geometry::PixelRect;
use serde::{Deserialize, Serialize};

/// Shape of a zone.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneGeometry {
    /// Axis-aligned rectangle
    Rectangle(PixelRect),
    /// Polygon as a flat `"x1,y1 x2,y2 ..."` string, kept verbatim
    Polygon {
        /// Encoded points
        points: String,
    },
}

/// A rectangle or polygon region of an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ZoneRecord", into = "ZoneRecord")]
pub struct Zone {
    /// Identifier, unique within a layer; `None` while the zone is being drawn
    pub id: Option<String>,
    /// Rectangle or polygon
    pub geometry: ZoneGeometry,
    /// Free-text note, empty when absent
    pub note: String,
}

impl Zone {
    /// Create a zone with no id and an empty note.
    pub fn new(geometry: ZoneGeometry) -> Self {
        Self {
            id: None,
            geometry,
            note: String::new(),
        }
    }

    /// Create a rectangular zone from its corners.
    pub fn rectangle(ulx: f64, uly: f64, lrx: f64, lry: f64) -> Self {
        Self::new(ZoneGeometry::Rectangle(PixelRect::new(ulx, uly, lrx, lry)))
    }

    /// Create a polygon zone from a flat points string.
    pub fn polygon(points: impl Into<String>) -> Self {
        Self::new(ZoneGeometry::Polygon {
            points: points.into(),
        })
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Parse a single zone from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parse a JSON array of zones; `null` is an empty list.
pub fn zones_from_json(json: &str) -> Result<Vec<Zone>> {
    let zones: Option<Vec<Zone>> = serde_json::from_str(json)?;
    Ok(zones.unwrap_or_default())
}

/// Serialize zones to a JSON array.
pub fn zones_to_json(zones: &[Zone]) -> Result<String> {
    Ok(serde_json::to_string(zones)?)
}

/// Loose wire form of a zone, with every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    /// Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Upper-left x
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ulx: Option<f64>,
    /// Upper-left y
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uly: Option<f64>,
    /// Lower-right x
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lrx: Option<f64>,
    /// Lower-right y (`lty` in older data)
    #[serde(default, alias = "lty", skip_serializing_if = "Option::is_none")]
    pub lry: Option<f64>,
    /// Polygon points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<String>,
    /// Note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TryFrom<ZoneRecord> for Zone {
    type Error = Error;

    fn try_from(record: ZoneRecord) -> Result<Self> {
        let geometry = match (record.points, record.ulx, record.uly, record.lrx, record.lry) {
            (Some(points), ..) => ZoneGeometry::Polygon { points },
            (None, Some(ulx), Some(uly), Some(lrx), Some(lry)) => {
                ZoneGeometry::Rectangle(PixelRect::new(ulx, uly, lrx, lry))
            },
            _ => {
                return Err(Error::InvalidGeometry(format!(
                    "zone {} has neither points nor all of ulx/uly/lrx/lry",
                    record.id.as_deref().unwrap_or("<new>")
                )))
            },
        };

        Ok(Zone {
            id: record.id,
            geometry,
            note: record.note.unwrap_or_default(),
        })
    }
}

impl From<Zone> for ZoneRecord {
    fn from(zone: Zone) -> Self {
        let mut record = ZoneRecord {
            id: zone.id,
            note: Some(zone.note),
            ..Default::default()
        };
        match zone.geometry {
            ZoneGeometry::Rectangle(rect) => {
                record.ulx = Some(rect.ulx);
                record.uly = Some(rect.uly);
                record.lrx = Some(rect.lrx);
                record.lry = Some(rect.lry);
            },
            ZoneGeometry::Polygon { points } => record.points = Some(points),
        }
        record
    }
}
