//! Validation for geographic coordinates and shapes.

use crate::error::{CoverError, Result};
use cover_types::Shape;
use geo::{Coord, LineString, Polygon};

/// Checks that a position is finite and lies on the geohash domain:
/// longitude in [-180, 180] and latitude in [-90, 90].
///
/// The domain edges themselves are accepted. Cells on the antimeridian and
/// at the poles are still found, because encoding keeps edge positions in
/// the outermost cell.
///
/// # Examples
///
/// ```
/// use geohash_cover::compute::validation::validate_position;
/// use geo::coord;
///
/// assert!(validate_position(&coord! { x: 180.0, y: 90.0 }).is_ok());
/// assert!(validate_position(&coord! { x: 180.5, y: 0.0 }).is_err());
/// assert!(validate_position(&coord! { x: 0.0, y: f64::NAN }).is_err());
/// ```
pub fn validate_position(position: &Coord) -> Result<()> {
    let Coord { x: lon, y: lat } = *position;

    match (lon.is_finite(), lat.is_finite()) {
        (false, _) => Err(CoverError::invalid_input(format!(
            "Longitude must be finite, got: {}",
            lon
        ))),
        (_, false) => Err(CoverError::invalid_input(format!(
            "Latitude must be finite, got: {}",
            lat
        ))),
        _ if lon.abs() > 180.0 => Err(CoverError::invalid_input(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            lon
        ))),
        _ if lat.abs() > 90.0 => Err(CoverError::invalid_input(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            lat
        ))),
        _ => Ok(()),
    }
}

fn validate_coords<'a>(coords: impl Iterator<Item = &'a Coord>, what: &str) -> Result<()> {
    for (idx, coord) in coords.enumerate() {
        validate_position(coord).map_err(|e| {
            CoverError::InvalidInput(format!("{} point at index {}: {}", what, idx, e))
        })?;
    }
    Ok(())
}

/// Validates every position of a line.
pub fn validate_line(line: &LineString) -> Result<()> {
    validate_coords(line.coords(), "Line")
}

/// Validates all polygon coordinates (exterior and interior rings).
///
/// # Examples
///
/// ```
/// use geohash_cover::compute::validation::validate_polygon;
/// use geo::{polygon, Polygon};
///
/// let poly: Polygon = polygon![
///     (x: 13.33, y: 52.45),
///     (x: 13.42, y: 52.45),
///     (x: 13.42, y: 52.51),
///     (x: 13.33, y: 52.51),
///     (x: 13.33, y: 52.45),
/// ];
///
/// assert!(validate_polygon(&poly).is_ok());
/// ```
pub fn validate_polygon(polygon: &Polygon) -> Result<()> {
    validate_coords(polygon.exterior().coords(), "Exterior ring")?;

    for (ring_idx, interior) in polygon.interiors().iter().enumerate() {
        validate_coords(interior.coords(), &format!("Interior ring {}", ring_idx))?;
    }

    Ok(())
}

/// Validates every coordinate of a shape, recursing into collections.
pub fn validate_shape(shape: &Shape) -> Result<()> {
    match shape {
        Shape::Point(point) => validate_position(&point.0),
        Shape::Line(line) => validate_line(line),
        Shape::Polygon(polygon) => validate_polygon(polygon),
        Shape::Collection(members) => {
            for (idx, member) in members.iter().enumerate() {
                validate_shape(member).map_err(|e| {
                    CoverError::InvalidInput(format!("Collection member {}: {}", idx, e))
                })?;
            }
            Ok(())
        }
    }
}
