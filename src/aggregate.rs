//! Result collection.
//!
//! Rows produced by the scanner end up either in a [`CellAggregator`], which
//! builds the final result set, or in a caller supplied [`CellSink`].

use crate::error::Result;
use rustc_hash::FxHashSet;

/// Consumer of cell rows, handed one row at a time.
///
/// Returning an error aborts the cover call that is feeding the sink.
///
/// Any `FnMut(Vec<String>) -> Result<()>` closure is a sink:
///
/// ```
/// use geohash_cover::{CellSink, Result};
///
/// let mut total = 0;
/// let mut sink = |row: Vec<String>| -> Result<()> {
///     total += row.len();
///     Ok(())
/// };
/// sink.accept(vec!["u336x".to_string()])?;
/// assert_eq!(total, 1);
/// # Ok::<(), geohash_cover::CoverError>(())
/// ```
pub trait CellSink {
    fn accept(&mut self, row: Vec<String>) -> Result<()>;
}

impl<F> CellSink for F
where
    F: FnMut(Vec<String>) -> Result<()>,
{
    fn accept(&mut self, row: Vec<String>) -> Result<()> {
        self(row)
    }
}

/// Accumulates cells across rows and shapes.
///
/// With duplicates allowed the cells are kept in arrival order, repeats
/// included. Otherwise each cell code is kept once, at the position it was
/// first seen.
#[derive(Debug, Clone, Default)]
pub struct CellAggregator {
    allow_duplicates: bool,
    seen: FxHashSet<String>,
    cells: Vec<String>,
}

impl CellAggregator {
    pub fn new(allow_duplicates: bool) -> Self {
        Self {
            allow_duplicates,
            seen: FxHashSet::default(),
            cells: Vec::new(),
        }
    }

    /// Adds one row of cells.
    pub fn push_row(&mut self, row: Vec<String>) {
        if self.allow_duplicates {
            self.cells.extend(row);
            return;
        }

        for cell in row {
            if !self.seen.contains(&cell) {
                self.seen.insert(cell.clone());
                self.cells.push(cell);
            }
        }
    }

    pub fn contains(&self, cell: &str) -> bool {
        if self.allow_duplicates {
            self.cells.iter().any(|c| c == cell)
        } else {
            self.seen.contains(cell)
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<String> {
        self.cells
    }
}

impl CellSink for CellAggregator {
    fn accept(&mut self, row: Vec<String>) -> Result<()> {
        self.push_row(row);
        Ok(())
    }
}

/// Forwards only cells the wrapped sink has not been given before.
/// Rows left empty by the filter are dropped.
#[derive(Debug)]
pub(crate) struct Deduplicated<'s, S: ?Sized> {
    seen: FxHashSet<String>,
    inner: &'s mut S,
}

impl<'s, S: CellSink + ?Sized> Deduplicated<'s, S> {
    pub(crate) fn new(inner: &'s mut S) -> Self {
        Self {
            seen: FxHashSet::default(),
            inner,
        }
    }
}

impl<S: CellSink + ?Sized> CellSink for Deduplicated<'_, S> {
    fn accept(&mut self, row: Vec<String>) -> Result<()> {
        let fresh: Vec<String> = row
            .into_iter()
            .filter(|cell| self.seen.insert(cell.clone()))
            .collect();
        if fresh.is_empty() {
            return Ok(());
        }
        self.inner.accept(fresh)
    }
}
