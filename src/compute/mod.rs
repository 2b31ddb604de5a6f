//! Compute layer: the scanline engine and the input layer feeding it.
//!
//! - [`grid`] snaps envelopes to the geohash grid
//! - [`scanner`] sweeps rows and cuts the shape into spans
//! - [`walker`] visits the cells of each span
//! - [`predicate`] decides which visited cells are kept
//! - [`geojson`] and [`validation`] turn raw input into checked shapes

pub mod geojson;
pub mod grid;
pub mod predicate;
pub mod scanner;
pub mod validation;
pub mod walker;
