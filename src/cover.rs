//! Shape dispatch and top-level cover calls.
//!
//! Points are encoded directly. Lines and polygons go through the row
//! scanner. Collections run one scan per member, each with its own row
//! state, either one after another or on scoped worker threads.

use crate::aggregate::{CellAggregator, CellSink, Deduplicated};
use crate::compute::geojson::{extract_shapes, extract_shapes_from_str};
use crate::compute::grid::encode_cell;
use crate::compute::scanner::RowScanner;
use crate::compute::validation::validate_shape;
use crate::config::CoverOptions;
use crate::error::{CoverError, Result};
use cover_types::Shape;
use geo::Point;
use parking_lot::Mutex;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Cell rows of a single non-collection shape.
#[derive(Debug)]
enum LeafRows<'a> {
    Point(Option<Vec<String>>),
    Scan(RowScanner<'a>),
}

impl<'a> LeafRows<'a> {
    fn new(shape: &'a Shape, options: &CoverOptions) -> Result<Self> {
        match shape {
            Shape::Point(point) => Ok(LeafRows::Point(Some(vec![encode_point(
                point,
                options.precision,
            )?]))),
            Shape::Collection(_) => Err(CoverError::invalid_input(
                "Collections are scanned member by member",
            )),
            _ => RowScanner::new(shape, options).map(LeafRows::Scan),
        }
    }
}

impl Iterator for LeafRows<'_> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            LeafRows::Point(cell) => cell.take().map(Ok),
            LeafRows::Scan(scanner) => scanner.next(),
        }
    }
}

fn encode_point(point: &Point<f64>, precision: usize) -> Result<String> {
    encode_cell(point.x(), point.y(), precision)
}

/// Pull-based iterator over the cell rows of a shape.
///
/// Rows of one member are yielded north to south with cells west to east;
/// collection members follow each other in order. Rows that contain no
/// accepted cell are yielded as empty lists. After the first error the
/// iterator is exhausted.
#[derive(Debug)]
pub struct Rows<'a> {
    leaves: std::vec::IntoIter<&'a Shape>,
    current: Option<LeafRows<'a>>,
    options: CoverOptions,
    failed: bool,
}

impl<'a> Rows<'a> {
    fn new(shape: &'a Shape, options: CoverOptions) -> Self {
        Self {
            leaves: shape.leaves().into_iter(),
            current: None,
            options,
            failed: false,
        }
    }
}

impl Iterator for Rows<'_> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }

            if let Some(current) = self.current.as_mut() {
                if let Some(row) = current.next() {
                    self.failed = row.is_err();
                    return Some(row);
                }
                self.current = None;
            }

            let leaf = self.leaves.next()?;
            match LeafRows::new(leaf, &self.options) {
                Ok(rows) => self.current = Some(rows),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Runs every leaf through its pipeline, handing each row to `consume`.
fn for_each_row<F>(leaves: &[&Shape], options: &CoverOptions, mut consume: F) -> Result<()>
where
    F: FnMut(Vec<String>) -> Result<()> + Send,
{
    if !options.parallel || leaves.len() < 2 {
        for leaf in leaves {
            for row in LeafRows::new(leaf, options)? {
                consume(row?)?;
            }
        }
        return Ok(());
    }

    let workers = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .min(leaves.len());
    let chunk_size = leaves.len().div_ceil(workers);
    log::debug!(
        "Covering {} shapes on {} workers",
        leaves.len(),
        workers
    );

    let consume = Mutex::new(consume);
    let failed = AtomicBool::new(false);

    thread::scope(|scope| {
        let handles: Vec<_> = leaves
            .chunks(chunk_size)
            .map(|chunk| {
                let consume = &consume;
                let failed = &failed;
                scope.spawn(move || {
                    let result = scan_chunk(chunk, options, consume, failed);
                    if result.is_err() {
                        failed.store(true, Ordering::Relaxed);
                    }
                    result
                })
            })
            .collect();

        let mut outcome = Ok(());
        for handle in handles {
            let result = handle.join().unwrap_or(Err(CoverError::WorkerPanicked));
            if let Err(e) = result {
                failed.store(true, Ordering::Relaxed);
                if outcome.is_ok() {
                    outcome = Err(e);
                }
            }
        }
        outcome
    })
}

/// Worker body: scans its share of the leaves until done or until another
/// worker has failed.
fn scan_chunk<F>(
    chunk: &[&Shape],
    options: &CoverOptions,
    consume: &Mutex<F>,
    failed: &AtomicBool,
) -> Result<()>
where
    F: FnMut(Vec<String>) -> Result<()>,
{
    for leaf in chunk {
        for row in LeafRows::new(leaf, options)? {
            if failed.load(Ordering::Relaxed) {
                return Ok(());
            }
            let row = row?;
            let mut consume = consume.lock();
            (*consume)(row)?;
        }
    }
    Ok(())
}

/// A validated cover engine.
///
/// # Examples
///
/// ```
/// use geohash_cover::{CoverOptions, GeohashCover, HashMode, Shape};
///
/// let cover = GeohashCover::new(CoverOptions::default().with_precision(5))?;
/// let berlin = Shape::polygon(
///     vec![
///         (13.331187, 52.49439),
///         (13.371699, 52.509027),
///         (13.4245712, 52.50401228),
///         (13.41221166, 52.457175),
///         (13.3414871, 52.4504801),
///     ],
///     vec![],
/// )?;
///
/// let cells = cover.cover(&berlin)?;
/// assert_eq!(cells.len(), 6);
/// assert!(cells.contains(&"u33d8".to_string()));
/// # Ok::<(), geohash_cover::CoverError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GeohashCover {
    options: CoverOptions,
}

impl GeohashCover {
    /// Creates an engine, rejecting invalid options.
    pub fn new(options: CoverOptions) -> Result<Self> {
        options.validate().map_err(CoverError::InvalidConfig)?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &CoverOptions {
        &self.options
    }

    /// Cells covering one shape.
    pub fn cover(&self, shape: &Shape) -> Result<Vec<String>> {
        self.cover_all(std::slice::from_ref(shape))
    }

    /// Cells covering every shape, merged into one result.
    pub fn cover_all(&self, shapes: &[Shape]) -> Result<Vec<String>> {
        let leaves = self.prepare(shapes)?;
        let mut aggregator = CellAggregator::new(self.options.allow_duplicates);
        for_each_row(&leaves, &self.options, |row| {
            aggregator.push_row(row);
            Ok(())
        })?;

        log::debug!(
            "Covered {} shapes with {} cells",
            leaves.len(),
            aggregator.len()
        );
        Ok(aggregator.into_cells())
    }

    /// Cells covering GeoJSON or raw coordinate input.
    pub fn cover_geojson(&self, input: &Value) -> Result<Vec<String>> {
        let shapes = extract_shapes(input)?;
        self.cover_all(&shapes)
    }

    /// Parses `json` and covers the shapes it holds.
    pub fn cover_geojson_str(&self, json: &str) -> Result<Vec<String>> {
        let shapes = extract_shapes_from_str(json)?;
        self.cover_all(&shapes)
    }

    /// Cells covering a typed GeoJSON document.
    #[cfg(feature = "geojson")]
    pub fn cover_typed_geojson(&self, geojson: &geojson::GeoJson) -> Result<Vec<String>> {
        let shapes = crate::compute::geojson::shapes_from_geojson(geojson)?;
        self.cover_all(&shapes)
    }

    /// Hands cells to `sink` one row at a time instead of collecting them.
    ///
    /// Without duplicates allowed, each cell reaches the sink once and rows
    /// emptied by that filter are not delivered. A sink error stops the call.
    pub fn stream<S>(&self, shapes: &[Shape], sink: &mut S) -> Result<()>
    where
        S: CellSink + Send + ?Sized,
    {
        let leaves = self.prepare(shapes)?;
        if self.options.allow_duplicates {
            for_each_row(&leaves, &self.options, |row| {
                if row.is_empty() {
                    return Ok(());
                }
                sink.accept(row)
            })
        } else {
            let mut dedup = Deduplicated::new(sink);
            for_each_row(&leaves, &self.options, |row| dedup.accept(row))
        }
    }

    /// Lazily scans `shape`, one row per item.
    pub fn rows<'a>(&self, shape: &'a Shape) -> Result<Rows<'a>> {
        validate_shape(shape)?;
        Ok(Rows::new(shape, self.options.clone()))
    }

    /// Validates every shape before any scanning starts.
    fn prepare<'a>(&self, shapes: &'a [Shape]) -> Result<Vec<&'a Shape>> {
        for shape in shapes {
            validate_shape(shape)?;
        }
        Ok(shapes.iter().flat_map(Shape::leaves).collect())
    }
}

/// Cells covering `shape` with the given options.
pub fn cover_shape(shape: &Shape, options: &CoverOptions) -> Result<Vec<String>> {
    GeohashCover::new(options.clone())?.cover(shape)
}

/// Cells covering GeoJSON or raw coordinate input with the given options.
pub fn cover_geojson(input: &Value, options: &CoverOptions) -> Result<Vec<String>> {
    GeohashCover::new(options.clone())?.cover_geojson(input)
}
