//! Geometric primitives for zones in image pixel space.
//!
//! Rectangles are stored by their corners (`ulx, uly, lrx, lry`) because that
//! is how the application describes zones, while the Web Annotation fragment
//! selector speaks in `x, y, width, height`. This module converts between the
//! two and validates the flat `"x1,y1 x2,y2 ..."` polygon encoding.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// One `NUM,NUM` pair
    static ref RE_POINT: Regex = Regex::new(
        r"^([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?),([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)$"
    )
    .unwrap();
}

/// How far [`PixelRect::to_xywh`] searches around the plain difference for a
/// size that rebuilds the corner exactly.
const MAX_ULP_STEPS: usize = 64;

/// A 2D point in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle given by its upper-left and lower-right corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    /// Upper-left x
    pub ulx: f64,
    /// Upper-left y
    pub uly: f64,
    /// Lower-right x
    pub lrx: f64,
    /// Lower-right y
    pub lry: f64,
}

impl PixelRect {
    /// Create a rectangle from its two corners.
    pub fn new(ulx: f64, uly: f64, lrx: f64, lry: f64) -> Self {
        Self { ulx, uly, lrx, lry }
    }

    /// Create a rectangle from an origin and a size.
    ///
    /// The lower-right corner is rounded to the decimal precision of the
    /// inputs so that `10.1 + 0.2` comes back as `10.3`.
    ///
    /// # Examples
    ///
    /// ```
    /// use zone_annotations::geometry::PixelRect;
    ///
    /// let rect = PixelRect::from_xywh(10.0, 20.0, 100.0, 50.0);
    /// assert_eq!(rect, PixelRect::new(10.0, 20.0, 110.0, 70.0));
    ///
    /// let rect = PixelRect::from_xywh(0.1, 0.0, 0.2, 1.0);
    /// assert_eq!(rect.lrx, 0.3);
    /// ```
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            ulx: x,
            uly: y,
            lrx: add_at_precision(x, width),
            lry: add_at_precision(y, height),
        }
    }

    /// Width (`lrx - ulx`), rounded to the precision of the corners.
    ///
    /// The result always satisfies `from_xywh(ulx, _, width, _).lrx == lrx`.
    /// No check is made that it is non-negative.
    pub fn width(&self) -> f64 {
        extent(self.ulx, self.lrx)
    }

    /// Height (`lry - uly`), rounded to the precision of the corners.
    pub fn height(&self) -> f64 {
        extent(self.uly, self.lry)
    }

    /// Origin and size as `[x, y, width, height]`.
    pub fn to_xywh(&self) -> [f64; 4] {
        [self.ulx, self.uly, self.width(), self.height()]
    }

    /// Whether every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.ulx.is_finite() && self.uly.is_finite() && self.lrx.is_finite() && self.lry.is_finite()
    }
}

/// Parse a flat `"x1,y1 x2,y2 ..."` polygon string.
///
/// # Errors
///
/// Returns [`Error::InvalidGeometry`] if the string is empty or any pair is
/// not two comma-separated numbers.
///
/// # Examples
///
/// ```
/// use zone_annotations::geometry::{parse_points, Point};
///
/// let points = parse_points("0,0 10.5,0 10.5,20").unwrap();
/// assert_eq!(points.len(), 3);
/// assert_eq!(points[1], Point::new(10.5, 0.0));
/// assert!(parse_points("0,0 10").is_err());
/// ```
pub fn parse_points(points: &str) -> Result<Vec<Point>> {
    point_pairs(points)?.map(parse_point).collect()
}

/// Check a flat polygon string without collecting its points.
///
/// # Errors
///
/// Same as [`parse_points`].
pub fn validate_points(points: &str) -> Result<()> {
    point_pairs(points)?.try_for_each(|pair| parse_point(pair).map(drop))
}

fn point_pairs(points: &str) -> Result<std::str::SplitWhitespace<'_>> {
    if points.trim().is_empty() {
        return Err(Error::InvalidGeometry("polygon has no points".to_string()));
    }
    Ok(points.split_whitespace())
}

fn parse_point(pair: &str) -> Result<Point> {
    let caps = RE_POINT
        .captures(pair)
        .ok_or_else(|| Error::InvalidGeometry(format!("malformed point '{}'", pair)))?;
    Ok(Point::new(parse_coord(&caps[1])?, parse_coord(&caps[2])?))
}

fn parse_coord(s: &str) -> Result<f64> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::InvalidGeometry(format!("'{}' is not a finite coordinate", s))),
    }
}

/// Number of digits after the decimal point in the shortest display form.
///
/// ```
/// use zone_annotations::geometry::decimal_places;
///
/// assert_eq!(decimal_places(10.0), 0);
/// assert_eq!(decimal_places(10.25), 2);
/// ```
pub fn decimal_places(v: f64) -> usize {
    let s = v.to_string();
    match s.find('.') {
        Some(dot) => s.len() - dot - 1,
        None => 0,
    }
}

/// Round `v` to `places` decimal digits.
pub fn round_to_places(v: f64, places: usize) -> f64 {
    if !v.is_finite() {
        return v;
    }
    format!("{:.*}", places, v).parse().unwrap_or(v)
}

/// `v` rounded to `places` decimals, unless the rounded form would need more
/// significant digits than an f64 carries exactly. Values at full precision
/// are left as they are.
fn at_precision(v: f64, places: usize) -> f64 {
    if !v.is_finite() {
        return v;
    }
    let text = format!("{:.*}", places, v);
    let significant = text
        .trim_start_matches(|c: char| c == '-' || c == '0' || c == '.')
        .chars()
        .filter(char::is_ascii_digit)
        .count();
    if significant > f64::DIGITS as usize {
        return v;
    }
    text.parse().unwrap_or(v)
}

fn add_at_precision(a: f64, b: f64) -> f64 {
    at_precision(a + b, decimal_places(a).max(decimal_places(b)))
}

fn sub_at_precision(a: f64, b: f64) -> f64 {
    at_precision(a - b, decimal_places(a).max(decimal_places(b)))
}

/// Size from `origin` to `end` that `add_at_precision` turns back into `end`.
///
/// The decimal-rounded difference works for short decimals. At full f64
/// precision the rounding can lose the last ULP, so neighbours of the plain
/// difference are tried until one lands on `end`.
fn extent(origin: f64, end: f64) -> f64 {
    let rounded = sub_at_precision(end, origin);
    if add_at_precision(origin, rounded) == end {
        return rounded;
    }

    let mut below = end - origin;
    let mut above = below;
    for _ in 0..MAX_ULP_STEPS {
        if add_at_precision(origin, below) == end {
            return below;
        }
        if add_at_precision(origin, above) == end {
            return above;
        }
        below = next_toward(below, f64::NEG_INFINITY);
        above = next_toward(above, f64::INFINITY);
    }

    log::trace!("No exact size from {} to {}; using {}", origin, end, rounded);
    rounded
}

/// Adjacent representable value of a finite `v` in the direction of `target`.
fn next_toward(v: f64, target: f64) -> f64 {
    if v == target || !v.is_finite() {
        return v;
    }
    if v == 0.0 {
        let tiny = f64::from_bits(1);
        return if target > 0.0 { tiny } else { -tiny };
    }
    let bits = v.to_bits();
    if (v < target) == (v > 0.0) {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_size() {
        let r = PixelRect::new(10.0, 20.0, 110.0, 70.0);
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 50.0);
        assert_eq!(r.to_xywh(), [10.0, 20.0, 100.0, 50.0]);
    }

    #[test]
    fn test_rect_size_keeps_decimal_precision() {
        let r = PixelRect::new(0.1, 0.7, 0.3, 1.1);
        // plain subtraction would give 0.19999999999999998
        assert_eq!(r.width(), 0.2);
        assert_eq!(r.height(), 0.4);
    }

    #[test]
    fn test_inverted_rect_is_not_rejected() {
        let r = PixelRect::new(110.0, 70.0, 10.0, 20.0);
        assert_eq!(r.width(), -100.0);
        assert_eq!(r.height(), -50.0);
    }

    #[test]
    fn test_from_xywh_inverts_size() {
        let r = PixelRect::new(12.5, 3.25, 99.75, 40.0);
        let [x, y, w, h] = r.to_xywh();
        assert_eq!(PixelRect::from_xywh(x, y, w, h), r);
    }

    #[test]
    fn test_full_precision_size_rebuilds_corner() {
        // 0.1 + 0.2 style drift in the last digit
        let r = PixelRect::new(0.1, 0.0, 0.30000000000000004, 1.0);
        let [x, y, w, h] = r.to_xywh();
        assert_eq!(PixelRect::from_xywh(x, y, w, h), r);

        let mut seed = 0x2545_f491_4f6c_dd1du64;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed >> 11) as f64 / (1u64 << 53) as f64
        };
        for _ in 0..2000 {
            let x = next() * 100_000.0;
            let r = PixelRect::new(x, 0.0, x + next() * 5000.0, 1.0);
            let [x, y, w, h] = r.to_xywh();
            assert_eq!(PixelRect::from_xywh(x, y, w, h), r, "size {:?}", [w, h]);
        }
    }

    #[test]
    fn test_next_toward() {
        assert_eq!(next_toward(1.0, 2.0), 1.0 + f64::EPSILON);
        assert_eq!(next_toward(1.0 + f64::EPSILON, 0.0), 1.0);
        assert_eq!(next_toward(-1.0, f64::NEG_INFINITY), -(1.0 + f64::EPSILON));
        assert_eq!(next_toward(0.0, 1.0), f64::from_bits(1));
        assert_eq!(next_toward(f64::from_bits(1), -1.0), 0.0);
    }

    #[test]
    fn test_is_finite() {
        assert!(PixelRect::new(0.0, 0.0, 1.0, 1.0).is_finite());
        assert!(!PixelRect::new(f64::NAN, 0.0, 1.0, 1.0).is_finite());
        assert!(!PixelRect::new(0.0, 0.0, f64::INFINITY, 1.0).is_finite());
    }

    #[test]
    fn test_parse_points() {
        let points = parse_points("10,20 30.5,-40 1e2,.5").unwrap();
        assert_eq!(
            points,
            vec![Point::new(10.0, 20.0), Point::new(30.5, -40.0), Point::new(100.0, 0.5)]
        );
    }

    #[test]
    fn test_parse_points_tolerates_surrounding_whitespace() {
        let points = parse_points("  1,2\t3,4\n").unwrap();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_parse_points_rejects_garbage() {
        assert!(parse_points("").is_err());
        assert!(parse_points("   ").is_err());
        assert!(parse_points("1,2,3").is_err());
        assert!(parse_points("1,2 3").is_err());
        assert!(parse_points("a,b").is_err());
        assert!(parse_points("1, 2").is_err());
    }

    #[test]
    fn test_validate_points_matches_parse() {
        for points in ["10,20 30.5,-40 1e2,.5", "", "1,2 3", "1e999,0", "a,b"] {
            assert_eq!(validate_points(points).is_ok(), parse_points(points).is_ok(), "{:?}", points);
        }
        assert!(validate_points("1e999,0").is_err());
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(decimal_places(0.0), 0);
        assert_eq!(decimal_places(-3.5), 1);
        assert_eq!(decimal_places(0.125), 3);
        assert_eq!(decimal_places(1e21), 0);
    }

    #[test]
    fn test_at_precision_leaves_full_precision_alone() {
        assert_eq!(at_precision(10.299999999999999, 1), 10.3);
        assert_eq!(at_precision(5555.160888141659, 12), 5555.160888141659);
        assert_eq!(at_precision(0.20000000000000004, 17), 0.20000000000000004);
        assert_eq!(at_precision(-0.000120000001, 4), -0.0001);
    }

    #[test]
    fn test_round_to_places() {
        assert_eq!(round_to_places(0.30000000000000004, 1), 0.3);
        assert_eq!(round_to_places(1.23456, 2), 1.23);
        assert_eq!(round_to_places(-7.0, 3), -7.0);
        assert!(round_to_places(f64::NAN, 2).is_nan());
    }
}
