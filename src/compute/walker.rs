//! Walks geohash cells eastward across a single row span.

use crate::compute::grid::{cell_rect, encode_cell};
use crate::compute::predicate::CoveragePredicate;
use crate::error::Result;
use geo::{BoundingRect, Intersects, Polygon, Rect};
use geohash::Direction;

/// Nudge, in degrees, applied when stepping off a cell edge so the next
/// lookup lands in the neighboring cell rather than on the shared boundary.
///
/// Cells at precision 10 and above are narrower than a few multiples of
/// this value.
pub const EDGE_EPSILON: f64 = 0.000_01;

/// Span extents within this fraction of a cell width of the current cell's
/// east edge are treated as reaching it.
const STOP_TOLERANCE_RATIO: f64 = 1e-6;

/// Easternmost longitude already walked in the current row.
///
/// Spans of one row are visited west to east, so anything west of this
/// value has already been tested and is never tested again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowProgress {
    max_lon_consumed: f64,
}

impl Default for RowProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl RowProgress {
    pub fn new() -> Self {
        Self {
            max_lon_consumed: f64::NEG_INFINITY,
        }
    }

    /// Forget progress when moving to a new row.
    pub fn reset(&mut self) {
        self.max_lon_consumed = f64::NEG_INFINITY;
    }

    pub fn max_lon_consumed(&self) -> f64 {
        self.max_lon_consumed
    }

    /// Whether everything up to `lon` has been walked.
    pub fn covers(&self, lon: f64) -> bool {
        self.max_lon_consumed >= lon
    }

    fn advance(&mut self, cell_max_lon: f64) {
        self.max_lon_consumed = self.max_lon_consumed.max(cell_max_lon + EDGE_EPSILON);
    }
}

/// A contiguous piece of the shape inside one row.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub geometry: Polygon<f64>,
    pub envelope: Rect<f64>,
}

impl Span {
    pub fn from_polygon(geometry: Polygon<f64>) -> Option<Self> {
        let envelope = geometry.bounding_rect()?;
        Some(Self { geometry, envelope })
    }

    pub fn from_rect(envelope: Rect<f64>) -> Self {
        Self {
            geometry: envelope.to_polygon(),
            envelope,
        }
    }

    pub fn min_lon(&self) -> f64 {
        self.envelope.min().x
    }

    pub fn max_lon(&self) -> f64 {
        self.envelope.max().x
    }

    pub fn overlaps(&self, cell: &Rect<f64>) -> bool {
        self.geometry.intersects(cell)
    }
}

/// Visits the cells crossed by a span, testing each with a predicate.
#[derive(Debug, Clone, Copy)]
pub struct SpanWalker {
    precision: usize,
    max_columns: usize,
    stop_tolerance: f64,
}

impl SpanWalker {
    /// `columns` is the width of the aligned grid; a walk never visits more
    /// cells than that plus a small allowance.
    pub fn new(precision: usize, columns: usize, cell_width: f64) -> Self {
        Self {
            precision,
            max_columns: columns + 2,
            stop_tolerance: cell_width * STOP_TOLERANCE_RATIO,
        }
    }

    /// Appends accepted cells of `span` to `out`, in west to east order.
    ///
    /// Spans lying entirely within already consumed longitude are skipped.
    pub fn walk(
        &self,
        span: &Span,
        predicate: &CoveragePredicate<'_>,
        progress: &mut RowProgress,
        out: &mut Vec<String>,
    ) -> Result<()> {
        if progress.covers(span.max_lon()) {
            return Ok(());
        }

        let min = span.envelope.min();
        let max = span.envelope.max();
        let nudged = (min.x + EDGE_EPSILON).min((min.x + max.x) / 2.0);
        let start_lon = progress.max_lon_consumed().max(nudged).min(180.0);
        let mid_lat = (min.y + max.y) / 2.0;

        let mut hash = encode_cell(start_lon, mid_lat, self.precision)?;
        let mut visited = 0;
        loop {
            let cell = cell_rect(&hash)?;
            let east = cell.max().x;
            progress.advance(east);

            if predicate.accepts(span, &cell) {
                out.push(hash.clone());
            }

            if east >= max.x - self.stop_tolerance {
                break;
            }

            visited += 1;
            if visited >= self.max_columns {
                log::warn!(
                    "Span walk stopped after {} cells at {} without reaching longitude {}",
                    visited,
                    hash,
                    max.x
                );
                break;
            }

            hash = geohash::neighbor(&hash, Direction::E)?;
        }

        Ok(())
    }
}
