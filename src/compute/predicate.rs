//! Coverage predicates deciding whether a candidate cell joins the cover.

use crate::compute::walker::Span;
use cover_types::HashMode;
use geo::{BooleanOps, ChamberlainDuquetteArea, Contains, Intersects, Polygon, Rect};

/// The shape a predicate tests cells against.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    /// Lines have no interior; which cells qualify is decided by the spans
    /// the scanner generates, so every walked cell is accepted.
    Line,
    Polygon(&'a Polygon<f64>),
}

/// One of the four coverage tests, bound to the shape being scanned.
#[derive(Debug, Clone, Copy)]
pub struct CoveragePredicate<'a> {
    mode: HashMode,
    target: Target<'a>,
    min_intersect_area: f64,
}

impl<'a> CoveragePredicate<'a> {
    /// Predicate for a polygon. `min_intersect_area` is in square meters and
    /// only applies to [`HashMode::Intersect`].
    pub fn for_polygon(mode: HashMode, polygon: &'a Polygon<f64>, min_intersect_area: f64) -> Self {
        Self {
            mode,
            target: Target::Polygon(polygon),
            min_intersect_area,
        }
    }

    /// Predicate for a line.
    pub fn for_line(mode: HashMode) -> Self {
        Self {
            mode,
            target: Target::Line,
            min_intersect_area: 0.0,
        }
    }

    /// Tests `cell` against the row span it was reached from and the whole shape.
    pub fn accepts(&self, span: &Span, cell: &Rect<f64>) -> bool {
        let polygon = match self.target {
            Target::Line => return self.mode != HashMode::InsideOnly,
            Target::Polygon(polygon) => polygon,
        };

        match self.mode {
            HashMode::Envelope => true,
            HashMode::Intersect => {
                span.overlaps(cell)
                    && (self.min_intersect_area <= 0.0
                        || intersection_area(polygon, cell) >= self.min_intersect_area)
            }
            HashMode::InsideOnly => strictly_inside(polygon, cell),
            HashMode::Border => span.overlaps(cell) && !polygon.contains(&cell.to_polygon()),
        }
    }
}

/// Spherical area shared by `polygon` and `cell`, in square meters.
pub fn intersection_area(polygon: &Polygon<f64>, cell: &Rect<f64>) -> f64 {
    polygon
        .intersection(&cell.to_polygon())
        .chamberlain_duquette_unsigned_area()
}

/// `cell` lies within `polygon` and no ring of the polygon touches any edge
/// of the cell.
pub fn strictly_inside(polygon: &Polygon<f64>, cell: &Rect<f64>) -> bool {
    let cell = cell.to_polygon();
    if !polygon.contains(&cell) {
        return false;
    }

    let edges = cell.exterior();
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .all(|ring| !ring.intersects(edges))
}
