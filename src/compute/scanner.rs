//! Row-by-row scanning of lines and polygons.
//!
//! The aligned envelope is cut into horizontal rows one cell tall. For each
//! row the shape is clipped to the row, the resulting spans are sorted west
//! to east and every span is walked cell by cell. Rows are produced lazily,
//! north to south.

use crate::compute::grid::GridAlignment;
use crate::compute::predicate::CoveragePredicate;
use crate::compute::walker::{EDGE_EPSILON, RowProgress, Span, SpanWalker};
use crate::config::CoverOptions;
use crate::error::{CoverError, Result};
use cover_types::{HashMode, Shape};
use geo::{BooleanOps, BoundingRect, Coord, LineString, Polygon, Rect};
use smallvec::SmallVec;

/// Clipped parts thinner than this fraction of a cell are boolean-op noise.
const SLIVER_RATIO: f64 = 1e-6;

/// Scans above this many candidate cells are logged as expensive.
const LARGE_SCAN_CELLS: usize = 1_000_000;

/// Precision from which cells are too small for [`EDGE_EPSILON`].
const FINE_PRECISION: usize = 10;

type Spans = SmallVec<[Span; 4]>;

/// Position of the sweep over the aligned envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowState {
    /// Top latitude of the next row
    pub current_top: f64,
    /// Bottom latitude of the aligned envelope
    pub bottom_limit: f64,
    /// Rows are exactly one cell tall
    pub row_height: f64,
    /// Width of the aligned envelope, shared by every row
    pub row_width: f64,
    /// Height of one cell at the scan precision
    pub cell_height: f64,
    /// West edge shared by every row
    pub left: f64,
}

impl RowState {
    fn new(grid: &GridAlignment) -> Self {
        Self {
            current_top: grid.extended.max().y,
            bottom_limit: grid.extended.min().y,
            row_height: grid.cell_height,
            row_width: grid.row_width,
            cell_height: grid.cell_height,
            left: grid.extended.min().x,
        }
    }

    /// Whether a full row still fits above the bottom limit. Half a cell of
    /// slack absorbs rounding in the accumulated latitude.
    fn has_rows(&self) -> bool {
        self.current_top - self.row_height * 0.5 > self.bottom_limit
    }

    /// Rectangle of the next row.
    fn row(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.left,
                y: self.current_top - self.row_height,
            },
            Coord {
                x: self.left + self.row_width,
                y: self.current_top,
            },
        )
    }

    fn step(&mut self) {
        self.current_top -= self.row_height;
    }
}

#[derive(Debug, Clone, Copy)]
enum ScanTarget<'a> {
    Line(&'a LineString<f64>),
    Polygon(&'a Polygon<f64>),
}

/// Lazy north-to-south producer of cell rows for one line or polygon.
///
/// Each item is the ordered list of accepted cells in one row; rows with no
/// accepted cells are yielded as empty lists. The first error ends the scan.
#[derive(Debug)]
pub struct RowScanner<'a> {
    target: ScanTarget<'a>,
    mode: HashMode,
    grid: GridAlignment,
    state: RowState,
    progress: RowProgress,
    walker: SpanWalker,
    predicate: CoveragePredicate<'a>,
    finished: bool,
}

impl<'a> RowScanner<'a> {
    /// Prepares a scan of `shape`, which must be a line or a polygon.
    pub fn new(shape: &'a Shape, options: &CoverOptions) -> Result<Self> {
        let precision = options.precision;
        let mode = options.hash_mode;

        let (target, envelope) = match shape {
            Shape::Line(line) => (ScanTarget::Line(line), line.bounding_rect()),
            Shape::Polygon(polygon) => (ScanTarget::Polygon(polygon), polygon.bounding_rect()),
            other => {
                return Err(CoverError::InvalidInput(format!(
                    "Row scanning needs a line or polygon, got {}",
                    other.kind()
                )));
            }
        };
        let envelope = envelope.ok_or_else(|| {
            CoverError::InvalidInput(format!("{} has no coordinates", shape.kind()))
        })?;

        let grid = GridAlignment::new(&envelope, precision)?;
        let predicate = match target {
            ScanTarget::Line(_) => CoveragePredicate::for_line(mode),
            ScanTarget::Polygon(polygon) => {
                let min_area = if mode == HashMode::Intersect {
                    options.min_intersect_fraction * grid.reference_cell_area()
                } else {
                    0.0
                };
                CoveragePredicate::for_polygon(mode, polygon, min_area)
            }
        };

        if precision >= FINE_PRECISION {
            log::warn!(
                "Precision {} cells are close to the {} degree edge nudge; results near cell edges may be off",
                precision,
                EDGE_EPSILON
            );
        }
        let candidates = grid.rows().saturating_mul(grid.columns());
        if candidates > LARGE_SCAN_CELLS {
            log::warn!(
                "Scanning {} rows x {} columns at precision {}",
                grid.rows(),
                grid.columns(),
                precision
            );
        }
        log::debug!(
            "Scanning {} in {} mode: {} rows x {} columns at precision {}",
            shape.kind(),
            mode,
            grid.rows(),
            grid.columns(),
            precision
        );

        Ok(Self {
            target,
            mode,
            state: RowState::new(&grid),
            progress: RowProgress::new(),
            walker: SpanWalker::new(precision, grid.columns(), grid.cell_width),
            predicate,
            grid,
            finished: false,
        })
    }

    pub fn grid(&self) -> &GridAlignment {
        &self.grid
    }

    /// Scans the next row, or returns `None` once the envelope is exhausted.
    pub fn next_row(&mut self) -> Option<Result<Vec<String>>> {
        if self.finished || !self.state.has_rows() {
            self.finished = true;
            return None;
        }

        let row = self.state.row();
        let spans = self.row_spans(&row);
        self.progress.reset();

        let mut cells = Vec::new();
        for span in &spans {
            if let Err(e) = self
                .walker
                .walk(span, &self.predicate, &mut self.progress, &mut cells)
            {
                self.finished = true;
                return Some(Err(e));
            }
        }

        log::trace!(
            "Row at {:.6}: {} spans, {} cells",
            self.state.current_top,
            spans.len(),
            cells.len()
        );
        self.state.step();
        Some(Ok(cells))
    }

    /// Pieces of the shape within `row`, sorted west to east.
    fn row_spans(&self, row: &Rect<f64>) -> Spans {
        let mut spans: Spans = match (self.mode, self.target) {
            (HashMode::Envelope, _) => SmallVec::from_elem(Span::from_rect(*row), 1),
            (HashMode::InsideOnly, ScanTarget::Line(_)) => SmallVec::new(),
            (_, ScanTarget::Line(line)) => interior_segments(line, row)
                .iter()
                .filter_map(|piece| piece.bounding_rect())
                .map(Span::from_rect)
                .collect(),
            (_, ScanTarget::Polygon(polygon)) => self.polygon_spans(polygon, row),
        };

        spans.sort_by(|a, b| a.min_lon().total_cmp(&b.min_lon()));
        spans
    }

    fn polygon_spans(&self, polygon: &Polygon<f64>, row: &Rect<f64>) -> Spans {
        let min_height = self.grid.cell_height * SLIVER_RATIO;
        let min_width = self.grid.cell_width * SLIVER_RATIO;

        polygon
            .intersection(&row.to_polygon())
            .into_iter()
            .filter_map(Span::from_polygon)
            .filter(|span| span.envelope.height() > min_height && span.envelope.width() > min_width)
            .collect()
    }
}

impl Iterator for RowScanner<'_> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    Above,
    Inside,
    Below,
}

fn band(y: f64, row: &Rect<f64>) -> Band {
    if y > row.max().y {
        Band::Above
    } else if y < row.min().y {
        Band::Below
    } else {
        Band::Inside
    }
}

/// Cuts `line` wherever it crosses the top or bottom edge of `row`.
///
/// Consecutive pieces alternate between lying inside and outside the row.
pub fn split_line_by_row(line: &LineString<f64>, row: &Rect<f64>) -> Vec<LineString<f64>> {
    let mut pieces = Vec::new();
    let mut coords = line.coords();
    let Some(&first) = coords.next() else {
        return pieces;
    };

    let mut current = vec![first];
    let mut previous = first;
    for &next in coords {
        let from = band(previous.y, row);
        let to = band(next.y, row);
        if from != to {
            for y in crossings(from, to, row) {
                let t = (y - previous.y) / (next.y - previous.y);
                let cut = Coord {
                    x: previous.x + t * (next.x - previous.x),
                    y,
                };
                current.push(cut);
                pieces.push(LineString::new(std::mem::take(&mut current)));
                current.push(cut);
            }
        }
        current.push(next);
        previous = next;
    }
    pieces.push(LineString::new(current));
    pieces
}

/// Edge latitudes crossed when moving from one band to another, in order.
fn crossings(from: Band, to: Band, row: &Rect<f64>) -> SmallVec<[f64; 2]> {
    let top = row.max().y;
    let bottom = row.min().y;
    match (from, to) {
        (Band::Above, Band::Inside) | (Band::Inside, Band::Above) => SmallVec::from_slice(&[top]),
        (Band::Below, Band::Inside) | (Band::Inside, Band::Below) => SmallVec::from_slice(&[bottom]),
        (Band::Above, Band::Below) => SmallVec::from_slice(&[top, bottom]),
        (Band::Below, Band::Above) => SmallVec::from_slice(&[bottom, top]),
        _ => SmallVec::new(),
    }
}

/// Pieces of `line` lying inside `row`.
///
/// A segment passing straight through the row produces an outside piece,
/// an inside piece and another outside piece, so parity starts from the band
/// of the first vertex and alternates from there.
pub fn interior_segments(line: &LineString<f64>, row: &Rect<f64>) -> Vec<LineString<f64>> {
    let starts_inside = line
        .0
        .first()
        .is_some_and(|first| band(first.y, row) == Band::Inside);

    split_line_by_row(line, row)
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| (idx % 2 == 0) == starts_inside)
        .map(|(_, piece)| piece)
        .collect()
}
