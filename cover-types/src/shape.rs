//! Canonical shapes accepted by the cover engine.

use geo::{
    BoundingRect, Coord, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
    Rect,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error raised when a shape cannot be constructed from the given positions.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// Not enough positions for the requested shape
    TooFewPositions {
        kind: ShapeKind,
        needed: usize,
        got: usize,
    },
    /// A collection without members
    EmptyCollection,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPositions { kind, needed, got } => write!(
                f,
                "{} needs at least {} positions, got {}",
                kind, needed, got
            ),
            Self::EmptyCollection => write!(f, "Collection has no members"),
        }
    }
}

impl std::error::Error for ShapeError {}

/// Tag describing which variant a [`Shape`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Point,
    Line,
    Polygon,
    Collection,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Point => "Point",
            ShapeKind::Line => "Line",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Collection => "Collection",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 2-D geographic shape in longitude/latitude degrees.
///
/// Shapes are immutable once built. Lines carry at least two positions and
/// polygon rings are closed (first position equals last).
///
/// # Examples
///
/// ```
/// use cover_types::Shape;
///
/// let zone = Shape::polygon(
///     vec![(13.33, 52.49), (13.37, 52.50), (13.42, 52.50), (13.41, 52.45), (13.33, 52.49)],
///     vec![],
/// )
/// .unwrap();
///
/// let envelope = zone.envelope().unwrap();
/// assert_eq!(envelope.min().x, 13.33);
/// assert_eq!(envelope.max().y, 52.50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Point(Point<f64>),
    Line(LineString<f64>),
    Polygon(Polygon<f64>),
    Collection(Vec<Shape>),
}

impl Shape {
    /// A single position.
    pub fn point(x: f64, y: f64) -> Self {
        Shape::Point(Point::new(x, y))
    }

    /// An ordered line through at least two positions.
    pub fn line<C: Into<Coord<f64>>>(positions: Vec<C>) -> Result<Self, ShapeError> {
        let line = LineString::from(positions.into_iter().map(Into::into).collect::<Vec<_>>());
        Self::from_line_string(line)
    }

    /// A polygon from an outer ring and zero or more hole rings.
    ///
    /// Open rings are closed automatically.
    pub fn polygon<C: Into<Coord<f64>>>(
        exterior: Vec<C>,
        holes: Vec<Vec<C>>,
    ) -> Result<Self, ShapeError> {
        let ring = |positions: Vec<C>| {
            LineString::from(positions.into_iter().map(Into::into).collect::<Vec<_>>())
        };
        let interiors = holes.into_iter().map(ring).collect();
        Self::from_polygon(Polygon::new(ring(exterior), interiors))
    }

    /// Wraps a `geo::LineString`, checking its length.
    pub fn from_line_string(line: LineString<f64>) -> Result<Self, ShapeError> {
        if line.0.len() < 2 {
            return Err(ShapeError::TooFewPositions {
                kind: ShapeKind::Line,
                needed: 2,
                got: line.0.len(),
            });
        }
        Ok(Shape::Line(line))
    }

    /// Wraps a `geo::Polygon`, checking that every ring has at least four positions.
    pub fn from_polygon(polygon: Polygon<f64>) -> Result<Self, ShapeError> {
        let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
        for ring in rings {
            if ring.0.len() < 4 {
                return Err(ShapeError::TooFewPositions {
                    kind: ShapeKind::Polygon,
                    needed: 4,
                    got: ring.0.len(),
                });
            }
        }
        Ok(Shape::Polygon(polygon))
    }

    /// Groups shapes into one collection.
    pub fn collection(members: Vec<Shape>) -> Result<Self, ShapeError> {
        if members.is_empty() {
            return Err(ShapeError::EmptyCollection);
        }
        Ok(Shape::Collection(members))
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Point(_) => ShapeKind::Point,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::Collection(_) => ShapeKind::Collection,
        }
    }

    /// Smallest axis-aligned rectangle containing the shape.
    ///
    /// Returns `None` for empty geometries.
    pub fn envelope(&self) -> Option<Rect<f64>> {
        match self {
            Shape::Point(point) => Some(point.bounding_rect()),
            Shape::Line(line) => line.bounding_rect(),
            Shape::Polygon(polygon) => polygon.bounding_rect(),
            Shape::Collection(members) => members
                .iter()
                .filter_map(Shape::envelope)
                .reduce(|a, b| {
                    Rect::new(
                        Coord {
                            x: a.min().x.min(b.min().x),
                            y: a.min().y.min(b.min().y),
                        },
                        Coord {
                            x: a.max().x.max(b.max().x),
                            y: a.max().y.max(b.max().y),
                        },
                    )
                }),
        }
    }

    /// The non-collection shapes, with nested collections flattened depth-first.
    pub fn leaves(&self) -> Vec<&Shape> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Shape>) {
        match self {
            Shape::Collection(members) => {
                for member in members {
                    member.collect_leaves(out);
                }
            }
            leaf => out.push(leaf),
        }
    }
}

impl From<Point<f64>> for Shape {
    fn from(point: Point<f64>) -> Self {
        Shape::Point(point)
    }
}

impl From<Rect<f64>> for Shape {
    fn from(rect: Rect<f64>) -> Self {
        Shape::Polygon(rect.to_polygon())
    }
}

impl From<MultiPoint<f64>> for Shape {
    fn from(points: MultiPoint<f64>) -> Self {
        Shape::Collection(points.into_iter().map(Shape::Point).collect())
    }
}

impl From<MultiPolygon<f64>> for Shape {
    fn from(polygons: MultiPolygon<f64>) -> Self {
        Shape::Collection(polygons.into_iter().map(Shape::Polygon).collect())
    }
}

impl TryFrom<LineString<f64>> for Shape {
    type Error = ShapeError;

    fn try_from(line: LineString<f64>) -> Result<Self, Self::Error> {
        Shape::from_line_string(line)
    }
}

impl TryFrom<Polygon<f64>> for Shape {
    type Error = ShapeError;

    fn try_from(polygon: Polygon<f64>) -> Result<Self, Self::Error> {
        Shape::from_polygon(polygon)
    }
}

impl TryFrom<MultiLineString<f64>> for Shape {
    type Error = ShapeError;

    fn try_from(lines: MultiLineString<f64>) -> Result<Self, Self::Error> {
        lines
            .into_iter()
            .map(Shape::from_line_string)
            .collect::<Result<Vec<_>, _>>()
            .map(Shape::Collection)
    }
}
