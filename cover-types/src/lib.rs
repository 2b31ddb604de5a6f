//! # cover-types
//!
//! Core shape and coverage-mode types shared by the `geohash-cover` engine.
//!
//! - **Shapes**: [`Shape`] with `Point`, `Line`, `Polygon` and `Collection` variants
//! - **Modes**: [`HashMode`], the rule deciding which grid cells belong to a cover
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use cover_types::{HashMode, Shape};
//!
//! let line = Shape::line(vec![(13.28, 52.50), (13.38, 52.44)]).unwrap();
//! assert_eq!(line.kind().as_str(), "Line");
//!
//! let mode: HashMode = "insideOnly".parse().unwrap();
//! assert_eq!(mode, HashMode::InsideOnly);
//! ```

pub mod mode;
pub mod shape;

pub use mode::{HashMode, ParseHashModeError};
pub use shape::{Shape, ShapeError, ShapeKind};
