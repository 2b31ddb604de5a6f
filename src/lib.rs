//! Polygon, line and point coverage with geohash cells, computed by a
//! row-by-row scanline sweep.
//!
//! ```rust
//! use geohash_cover::{CoverBuilder, HashMode, Shape};
//!
//! let cover = CoverBuilder::new()
//!     .precision(5)
//!     .hash_mode(HashMode::Intersect)
//!     .build()?;
//!
//! let area = Shape::polygon(
//!     vec![
//!         (13.331187, 52.49439),
//!         (13.371699, 52.509027),
//!         (13.4245712, 52.50401228),
//!         (13.41221166, 52.457175),
//!         (13.3414871, 52.4504801),
//!     ],
//!     vec![],
//! )?;
//! let cells = cover.cover(&area)?;
//! assert!(cells.contains(&"u336x".to_string()));
//!
//! for row in cover.rows(&area)? {
//!     println!("{:?}", row?);
//! }
//! # Ok::<(), geohash_cover::CoverError>(())
//! ```

pub mod aggregate;
pub mod builder;
pub mod compute;
pub mod config;
pub mod cover;
pub mod error;

pub use aggregate::{CellAggregator, CellSink};
pub use builder::CoverBuilder;
pub use config::{CoverOptions, MAX_PRECISION};
pub use cover::{GeohashCover, Rows, cover_geojson, cover_shape};
pub use error::{CoverError, Result};

pub use cover_types::{HashMode, ParseHashModeError, Shape, ShapeError, ShapeKind};

pub use compute::geojson::{extract_shapes, extract_shapes_from_str};
#[cfg(feature = "geojson")]
pub use compute::geojson::shapes_from_geojson;

pub use geo::{LineString, Point, Polygon, Rect};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{CoverBuilder, CoverError, GeohashCover, Result};

    pub use crate::{CoverOptions, HashMode, Shape};

    pub use crate::{CellSink, cover_geojson, cover_shape, extract_shapes};

    pub use geo::{Point, Polygon, Rect};
}
