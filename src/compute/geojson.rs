//! Shape extraction from raw coordinate arrays and GeoJSON.
//!
//! Every input is normalized into a flat list of [`Shape`]s and validated
//! before any cover work starts, so malformed input never yields a partial
//! result.

use crate::compute::validation::validate_shape;
use crate::error::{CoverError, Result};
use cover_types::Shape;
use geo::Coord;
use serde_json::Value;

/// Nesting depth of a coordinate array: 1 for a position, 2 for a line,
/// 3 for a polygon and 4 for a list of polygons.
pub fn coordinate_depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.first().map(coordinate_depth).unwrap_or(0),
        _ => 0,
    }
}

/// Classifies a raw coordinate array by its nesting depth and builds the shape.
///
/// # Examples
///
/// ```
/// use geohash_cover::compute::geojson::shape_from_coordinates;
/// use geohash_cover::ShapeKind;
/// use serde_json::json;
///
/// let point = shape_from_coordinates(&json!([13.4, 52.5])).unwrap();
/// assert_eq!(point.kind(), ShapeKind::Point);
///
/// let line = shape_from_coordinates(&json!([[13.4, 52.5], [13.5, 52.4]])).unwrap();
/// assert_eq!(line.kind(), ShapeKind::Line);
/// ```
pub fn shape_from_coordinates(coordinates: &Value) -> Result<Shape> {
    match coordinate_depth(coordinates) {
        1 => Ok(Shape::Point(position(coordinates)?.into())),
        2 => Ok(Shape::line(positions(coordinates)?)?),
        3 => polygon(coordinates),
        4 => Ok(Shape::collection(polygons(coordinates)?)?),
        depth => Err(CoverError::invalid_input(format!(
            "Cannot classify coordinates nested {} levels deep",
            depth
        ))),
    }
}

/// Extracts the canonical shapes from raw coordinates or a GeoJSON object.
///
/// Arrays are classified by nesting depth; a list of polygons becomes one
/// shape per polygon. Objects are read as GeoJSON geometries, features or
/// feature collections.
///
/// # Examples
///
/// ```
/// use geohash_cover::compute::geojson::extract_shapes;
/// use serde_json::json;
///
/// let collection = json!({
///     "type": "FeatureCollection",
///     "features": [
///         {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [13.4, 52.5]}},
///         {"type": "Feature", "properties": {}, "geometry": {"type": "MultiPoint", "coordinates": [[13.4, 52.5], [13.5, 52.4]]}}
///     ]
/// });
/// assert_eq!(extract_shapes(&collection).unwrap().len(), 3);
///
/// let missing = json!({"type": "Polygon"});
/// assert!(extract_shapes(&missing).is_err());
/// ```
pub fn extract_shapes(input: &Value) -> Result<Vec<Shape>> {
    let shapes = match input {
        Value::Array(_) => match shape_from_coordinates(input)? {
            Shape::Collection(members) => members,
            shape => vec![shape],
        },
        Value::Object(_) => {
            let mut shapes = Vec::new();
            extract_into(input, &mut shapes)?;
            shapes
        }
        other => {
            return Err(CoverError::invalid_input(format!(
                "Expected a coordinate array or GeoJSON object, got {}",
                other
            )));
        }
    };

    for shape in &shapes {
        validate_shape(shape)?;
    }
    Ok(shapes)
}

/// Parses a JSON document and extracts its shapes.
pub fn extract_shapes_from_str(json: &str) -> Result<Vec<Shape>> {
    let value: Value = serde_json::from_str(json)?;
    extract_shapes(&value)
}

fn extract_into(object: &Value, out: &mut Vec<Shape>) -> Result<()> {
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(CoverError::MissingType)?;

    match kind {
        "FeatureCollection" => {
            let features = member_array(object, kind, "features")?;
            for feature in features {
                extract_into(feature, out)?;
            }
        }
        "Feature" => match object.get("geometry") {
            None => return Err(CoverError::missing_field(kind, "geometry")),
            Some(Value::Null) => log::debug!("Skipping feature without geometry"),
            Some(geometry) => extract_into(geometry, out)?,
        },
        "GeometryCollection" => {
            let geometries = member_array(object, kind, "geometries")?;
            for geometry in geometries {
                extract_into(geometry, out)?;
            }
        }
        "Point" => {
            let coords = coordinates(object, kind)?;
            out.push(Shape::Point(position(coords)?.into()));
        }
        "MultiPoint" => {
            let coords = coordinates(object, kind)?;
            require_depth(coords, kind, 2)?;
            for pos in positions(coords)? {
                out.push(Shape::Point(pos.into()));
            }
        }
        "LineString" => {
            let coords = coordinates(object, kind)?;
            out.push(Shape::line(positions(coords)?)?);
        }
        "MultiLineString" => {
            let coords = coordinates(object, kind)?;
            require_depth(coords, kind, 3)?;
            for line in array(coords, kind)? {
                out.push(Shape::line(positions(line)?)?);
            }
        }
        "Polygon" => {
            let coords = coordinates(object, kind)?;
            out.push(polygon(coords)?);
        }
        "MultiPolygon" => {
            let coords = coordinates(object, kind)?;
            require_depth(coords, kind, 4)?;
            out.extend(polygons(coords)?);
        }
        other => return Err(CoverError::UnsupportedType(other.to_string())),
    }

    Ok(())
}

fn coordinates<'a>(object: &'a Value, kind: &str) -> Result<&'a Value> {
    object
        .get("coordinates")
        .ok_or_else(|| CoverError::missing_field(kind, "coordinates"))
}

fn member_array<'a>(object: &'a Value, kind: &str, field: &'static str) -> Result<&'a Vec<Value>> {
    object
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| CoverError::missing_field(kind, field))
}

fn require_depth(coords: &Value, kind: &str, depth: usize) -> Result<()> {
    // An empty multi geometry has nothing to check
    if coords.as_array().is_some_and(Vec::is_empty) {
        return Ok(());
    }
    if coordinate_depth(coords) != depth {
        return Err(CoverError::NotMulti {
            kind: kind.to_string(),
        });
    }
    Ok(())
}

fn array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| CoverError::invalid_input(format!("{} must be an array, got {}", what, value)))
}

fn position(value: &Value) -> Result<Coord> {
    let items = array(value, "Position")?;
    let number = |idx: usize| {
        items.get(idx).and_then(Value::as_f64).ok_or_else(|| {
            CoverError::invalid_input(format!(
                "Position must start with two numbers, got {}",
                value
            ))
        })
    };
    Ok(Coord {
        x: number(0)?,
        y: number(1)?,
    })
}

fn positions(value: &Value) -> Result<Vec<Coord>> {
    array(value, "Line")?.iter().map(position).collect()
}

fn polygon(value: &Value) -> Result<Shape> {
    let mut rings = array(value, "Polygon")?
        .iter()
        .map(positions)
        .collect::<Result<Vec<_>>>()?
        .into_iter();
    let exterior = rings
        .next()
        .ok_or_else(|| CoverError::invalid_input("Polygon must have at least one ring"))?;
    Ok(Shape::polygon(exterior, rings.collect())?)
}

fn polygons(value: &Value) -> Result<Vec<Shape>> {
    array(value, "MultiPolygon")?.iter().map(polygon).collect()
}

/// Extracts shapes from a typed GeoJSON value.
#[cfg(feature = "geojson")]
pub fn shapes_from_geojson(geojson: &geojson::GeoJson) -> Result<Vec<Shape>> {
    use geojson::GeoJson;

    let mut shapes = Vec::new();
    match geojson {
        GeoJson::Geometry(geometry) => geometry_into(geometry, &mut shapes)?,
        GeoJson::Feature(feature) => {
            if let Some(geometry) = &feature.geometry {
                geometry_into(geometry, &mut shapes)?;
            }
        }
        GeoJson::FeatureCollection(collection) => {
            for geometry in collection.features.iter().filter_map(|f| f.geometry.as_ref()) {
                geometry_into(geometry, &mut shapes)?;
            }
        }
    }

    for shape in &shapes {
        validate_shape(shape)?;
    }
    Ok(shapes)
}

#[cfg(feature = "geojson")]
fn geometry_into(geometry: &geojson::Geometry, out: &mut Vec<Shape>) -> Result<()> {
    use geojson::Value as G;

    let coord = |pos: &Vec<f64>| -> Result<Coord> {
        if pos.len() < 2 {
            return Err(CoverError::invalid_input(
                "Coordinate must have at least 2 values",
            ));
        }
        Ok(Coord {
            x: pos[0],
            y: pos[1],
        })
    };
    let line = |pos: &Vec<Vec<f64>>| pos.iter().map(coord).collect::<Result<Vec<_>>>();
    let poly = |rings: &Vec<Vec<Vec<f64>>>| -> Result<Shape> {
        let mut rings = rings.iter().map(line).collect::<Result<Vec<_>>>()?.into_iter();
        let exterior = rings
            .next()
            .ok_or_else(|| CoverError::invalid_input("Polygon must have at least one ring"))?;
        Ok(Shape::polygon(exterior, rings.collect())?)
    };

    match &geometry.value {
        G::Point(pos) => out.push(Shape::Point(coord(pos)?.into())),
        G::MultiPoint(points) => {
            for pos in points {
                out.push(Shape::Point(coord(pos)?.into()));
            }
        }
        G::LineString(positions) => out.push(Shape::line(line(positions)?)?),
        G::MultiLineString(lines) => {
            for positions in lines {
                out.push(Shape::line(line(positions)?)?);
            }
        }
        G::Polygon(rings) => out.push(poly(rings)?),
        G::MultiPolygon(polygons) => {
            for rings in polygons {
                out.push(poly(rings)?);
            }
        }
        G::GeometryCollection(geometries) => {
            for member in geometries {
                geometry_into(member, out)?;
            }
        }
    }
    Ok(())
}
