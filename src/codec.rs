//! Zone ⇄ Web Annotation conversion.
//!
//! Rectangles map to a media fragment selector (`xywh=pixel:x,y,w,h`) and
//! polygons to an SVG polygon selector. The note travels in the first
//! textual body. Decoding is strict: a selector value that does not carry the
//! exact prefix (and suffix, for SVG) of its declared type is rejected rather
//! than turned into a partial zone.
//!
//! For any valid zone `z`, `annotation_to_zone(&zone_to_annotation(&z)?)? == z`.
//!
//! ```
//! use zone_annotations::{annotation_to_zone, zone_to_annotation, Zone};
//!
//! let zone = Zone::rectangle(10.0, 20.0, 110.0, 70.0).with_id("z1").with_note("sample");
//! let anno = zone_to_annotation(&zone).unwrap();
//! assert_eq!(anno.target.selector.value(), Some("xywh=pixel:10,20,100,50"));
//! assert_eq!(annotation_to_zone(&anno).unwrap(), zone);
//! ```

use crate::annotation_types::{
    AnnotationBody, Selector, Target, FRAGMENT_PREFIX, SVG_POLYGON_PREFIX, SVG_POLYGON_SUFFIX,
};
use crate::annotations::WebAnnotation;
use crate::error::{Error, Result};
use crate::geometry::{validate_points, PixelRect};
use crate::zone::{Zone, ZoneGeometry};

/// Build the Web Annotation for a zone.
///
/// # Errors
///
/// Returns [`Error::InvalidGeometry`] for non-finite rectangle coordinates or
/// a polygon whose points do not parse.
pub fn zone_to_annotation(zone: &Zone) -> Result<WebAnnotation> {
    let mut annotation = WebAnnotation::new(zone.id.clone(), Target::new(zone_selector(zone)?));
    annotation.body.push(AnnotationBody::text(zone.note.clone()));
    Ok(annotation)
}

fn zone_selector(zone: &Zone) -> Result<Selector> {
    match &zone.geometry {
        ZoneGeometry::Rectangle(rect) => {
            if !rect.is_finite() {
                return Err(Error::InvalidGeometry(format!(
                    "zone {} has non-finite corners {:?}",
                    zone.id.as_deref().unwrap_or("<new>"),
                    rect
                )));
            }
            Ok(Selector::fragment(fragment_value(rect)))
        },
        ZoneGeometry::Polygon { points } => {
            validate_points(points)?;
            Ok(Selector::svg(format!("{}{}{}", SVG_POLYGON_PREFIX, points, SVG_POLYGON_SUFFIX)))
        },
    }
}

fn fragment_value(rect: &PixelRect) -> String {
    let [x, y, w, h] = rect.to_xywh();
    format!("{}{},{},{},{}", FRAGMENT_PREFIX, x, y, w, h)
}

/// Recover the zone an annotation represents.
///
/// # Errors
///
/// Returns [`Error::MalformedSelector`] when the selector type is not
/// recognised or its value does not match the pattern of its type.
pub fn annotation_to_zone(annotation: &WebAnnotation) -> Result<Zone> {
    let geometry = match &annotation.target.selector {
        Selector::FragmentSelector { value, .. } => {
            ZoneGeometry::Rectangle(parse_fragment(value)?)
        },
        Selector::SvgSelector { value } => ZoneGeometry::Polygon {
            points: parse_svg_polygon(value)?.to_string(),
        },
        Selector::Unsupported => {
            return Err(Error::malformed("", "unsupported selector type"));
        },
    };

    Ok(Zone {
        id: annotation.id.clone(),
        geometry,
        note: annotation.note().to_string(),
    })
}

fn parse_fragment(value: &str) -> Result<PixelRect> {
    let coords = value
        .strip_prefix(FRAGMENT_PREFIX)
        .ok_or_else(|| Error::malformed(value, format!("missing '{}' prefix", FRAGMENT_PREFIX)))?;

    let parts: Vec<&str> = coords.split(',').collect();
    if parts.len() != 4 {
        return Err(Error::malformed(
            value,
            format!("expected 4 comma-separated numbers, found {}", parts.len()),
        ));
    }

    let mut xywh = [0.0; 4];
    for (slot, part) in xywh.iter_mut().zip(&parts) {
        *slot = match part.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => return Err(Error::malformed(value, format!("'{}' is not a number", part))),
        };
    }

    let [x, y, w, h] = xywh;
    Ok(PixelRect::from_xywh(x, y, w, h))
}

fn parse_svg_polygon(value: &str) -> Result<&str> {
    let points = value
        .strip_prefix(SVG_POLYGON_PREFIX)
        .and_then(|rest| rest.strip_suffix(SVG_POLYGON_SUFFIX))
        .ok_or_else(|| Error::malformed(value, "not an SVG polygon selector"))?;

    validate_points(points).map_err(|e| Error::malformed(value, e.to_string()))?;
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn annotation_with_selector(selector: Selector) -> WebAnnotation {
        WebAnnotation::new(Some("z1".to_string()), Target::new(selector))
    }

    #[test]
    fn test_rectangle_selector_value() {
        let zone = Zone::rectangle(10.0, 20.0, 110.0, 70.0).with_id("z1").with_note("sample");
        let anno = zone_to_annotation(&zone).unwrap();

        assert_eq!(anno.id.as_deref(), Some("z1"));
        assert_eq!(anno.target.selector, Selector::fragment("xywh=pixel:10,20,100,50"));
        assert_eq!(anno.body, vec![AnnotationBody::text("sample")]);
    }

    #[test]
    fn test_concrete_example_json() {
        let zone = Zone::rectangle(10.0, 20.0, 110.0, 70.0).with_id("z1").with_note("sample");
        let value = serde_json::to_value(zone_to_annotation(&zone).unwrap()).unwrap();
        assert_eq!(value["target"]["selector"]["value"], "xywh=pixel:10,20,100,50");
        assert_eq!(value["body"], json!([{"type": "TextualBody", "value": "sample"}]));
    }

    #[test]
    fn test_missing_note_becomes_empty_body() {
        let anno = zone_to_annotation(&Zone::rectangle(0.0, 0.0, 1.0, 1.0)).unwrap();
        assert_eq!(anno.body, vec![AnnotationBody::text("")]);
        assert_eq!(anno.id, None);
    }

    #[test]
    fn test_polygon_selector_value() {
        let zone = Zone::polygon("0,0 10,0 10,10").with_id("p1");
        let anno = zone_to_annotation(&zone).unwrap();
        assert_eq!(
            anno.target.selector,
            Selector::svg("<svg><polygon points=\"0,0 10,0 10,10\"></polygon></svg>")
        );
        assert_eq!(annotation_to_zone(&anno).unwrap(), zone);
    }

    #[test]
    fn test_decimal_rectangle_round_trip() {
        let zone = Zone::rectangle(0.1, 0.7, 0.3, 1.1).with_id("d");
        let anno = zone_to_annotation(&zone).unwrap();
        assert_eq!(anno.target.selector.value(), Some("xywh=pixel:0.1,0.7,0.2,0.4"));
        assert_eq!(annotation_to_zone(&anno).unwrap(), zone);
    }

    #[test]
    fn test_full_precision_corners_round_trip() {
        let zone = Zone::rectangle(0.1, 1234.5678901234567, 0.30000000000000004, 4321.098765432109);
        let anno = zone_to_annotation(&zone).unwrap();
        let decoded = WebAnnotation::from_json(&anno.to_json().unwrap()).unwrap();
        assert_eq!(annotation_to_zone(&decoded).unwrap(), zone);
    }

    #[test]
    fn test_inverted_rectangle_passes_through() {
        let zone = Zone::rectangle(50.0, 50.0, 40.0, 45.0);
        let anno = zone_to_annotation(&zone).unwrap();
        assert_eq!(anno.target.selector.value(), Some("xywh=pixel:50,50,-10,-5"));
    }

    #[test]
    fn test_non_finite_rectangle_rejected() {
        let zone = Zone::rectangle(f64::NAN, 0.0, 1.0, 1.0);
        assert!(matches!(zone_to_annotation(&zone), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn test_bad_polygon_rejected() {
        let zone = Zone::polygon("0,0 10");
        assert!(matches!(zone_to_annotation(&zone), Err(Error::InvalidGeometry(_))));
        assert!(matches!(zone_to_annotation(&Zone::polygon("")), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn test_garbage_fragment_rejected() {
        let anno = annotation_with_selector(Selector::fragment("garbage"));
        match annotation_to_zone(&anno) {
            Err(Error::MalformedSelector { value, .. }) => assert_eq!(value, "garbage"),
            other => panic!("expected MalformedSelector, got {:?}", other),
        }
    }

    #[test]
    fn test_fragment_without_pixel_unit_rejected() {
        let anno = annotation_with_selector(Selector::fragment("xywh=10,20,30,40"));
        assert!(matches!(annotation_to_zone(&anno), Err(Error::MalformedSelector { .. })));
    }

    #[test]
    fn test_fragment_arity_and_numbers() {
        for value in [
            "xywh=pixel:1,2,3",
            "xywh=pixel:1,2,3,4,5",
            "xywh=pixel:1,2,three,4",
            "xywh=pixel:1,2,,4",
            "xywh=pixel:1,2,inf,4",
        ] {
            let anno = annotation_with_selector(Selector::fragment(value));
            assert!(
                matches!(annotation_to_zone(&anno), Err(Error::MalformedSelector { .. })),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_svg_prefix_and_suffix_are_strict() {
        for value in [
            "<svg><polygon points=\"0,0 1,1\"/></svg>",
            "<svg><circle cx=\"1\"></circle></svg>",
            "<svg><polygon points=\"0,0 1\"></polygon></svg>",
            "garbage",
        ] {
            let anno = annotation_with_selector(Selector::svg(value));
            assert!(
                matches!(annotation_to_zone(&anno), Err(Error::MalformedSelector { .. })),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_unsupported_selector_rejected() {
        let anno = annotation_with_selector(Selector::Unsupported);
        assert!(matches!(annotation_to_zone(&anno), Err(Error::MalformedSelector { .. })));
    }

    #[test]
    fn test_note_from_first_textual_body() {
        let mut anno = annotation_with_selector(Selector::fragment("xywh=pixel:0,0,1,1"));
        assert_eq!(annotation_to_zone(&anno).unwrap().note, "");

        anno.body.push(AnnotationBody::TextualBody {
            value: "hello".to_string(),
            purpose: Some("commenting".to_string()),
        });
        assert_eq!(annotation_to_zone(&anno).unwrap().note, "hello");
    }

    #[test]
    fn test_engine_json_decodes() {
        let anno = WebAnnotation::from_json(
            r##"{
                "@context": "http://www.w3.org/ns/anno.jsonld",
                "id": "#5f1c",
                "type": "Annotation",
                "body": [{"type": "TextualBody", "value": "a \"quoted\" note"}],
                "target": {
                    "source": "https://example.org/iiif/p1/full/full/0/default.jpg",
                    "selector": {
                        "type": "FragmentSelector",
                        "conformsTo": "http://www.w3.org/TR/media-frags/",
                        "value": "xywh=pixel:12.5,40,100.25,60"
                    }
                }
            }"##,
        )
        .unwrap();

        let zone = annotation_to_zone(&anno).unwrap();
        assert_eq!(zone.id.as_deref(), Some("#5f1c"));
        assert_eq!(zone.geometry, ZoneGeometry::Rectangle(PixelRect::new(12.5, 40.0, 112.75, 100.0)));
        assert_eq!(zone.note, "a \"quoted\" note");
    }
}
