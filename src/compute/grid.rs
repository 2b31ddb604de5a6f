//! Geohash grid alignment.
//!
//! Rows swept by the scanner must match real geohash rows, so the shape's
//! envelope is first snapped outwards to whole cells at the working
//! precision.

use crate::error::Result;
use geo::{ChamberlainDuquetteArea, Coord, Rect};
use geohash::{decode_bbox, encode};

/// Encodes a longitude/latitude position at the given precision.
///
/// Positions on the east edge (lon 180) or north edge (lat 90) of the
/// domain are kept in the eastmost or northmost cell; the codec would
/// otherwise wrap them to the opposite side of the globe.
pub fn encode_cell(lon: f64, lat: f64, precision: usize) -> Result<String> {
    let position = Coord {
        x: inside_upper_edge(lon, 180.0),
        y: inside_upper_edge(lat, 90.0),
    };
    Ok(encode(position, precision)?)
}

fn inside_upper_edge(value: f64, edge: f64) -> f64 {
    if value == edge { edge.next_down() } else { value }
}

/// Decodes a cell into its bounding rectangle.
pub fn cell_rect(cell: &str) -> Result<Rect<f64>> {
    Ok(decode_bbox(cell)?)
}

/// A shape envelope snapped to the geohash grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridAlignment {
    /// Envelope whose corners fall on cell boundaries
    pub extended: Rect<f64>,
    /// The cell holding the envelope's north-west corner
    pub top_left_cell: Rect<f64>,
    /// Width of the extended envelope
    pub row_width: f64,
    /// Height of a single cell at this precision
    pub cell_height: f64,
    /// Width of a single cell at this precision
    pub cell_width: f64,
}

impl GridAlignment {
    /// Snaps `envelope` outwards to whole cells at `precision`.
    ///
    /// The north-west and south-east corners are encoded and decoded; the
    /// extended envelope takes its top and left edges from the first cell
    /// and its bottom and right edges from the second.
    ///
    /// # Examples
    ///
    /// ```
    /// use geohash_cover::compute::grid::GridAlignment;
    /// use geo::{coord, Rect};
    ///
    /// let envelope = Rect::new(coord! { x: 13.331187, y: 52.4504801 }, coord! { x: 13.4245712, y: 52.509027 });
    /// let grid = GridAlignment::new(&envelope, 5).unwrap();
    ///
    /// assert_eq!(grid.rows(), 2);
    /// assert_eq!(grid.columns(), 3);
    /// assert!(grid.extended.min().x <= envelope.min().x);
    /// ```
    pub fn new(envelope: &Rect<f64>, precision: usize) -> Result<Self> {
        let top_left = cell_rect(&encode_cell(
            envelope.min().x,
            envelope.max().y,
            precision,
        )?)?;
        let bottom_right = cell_rect(&encode_cell(
            envelope.max().x,
            envelope.min().y,
            precision,
        )?)?;

        let extended = Rect::new(
            Coord {
                x: top_left.min().x,
                y: bottom_right.min().y,
            },
            Coord {
                x: bottom_right.max().x,
                y: top_left.max().y,
            },
        );

        Ok(Self {
            extended,
            top_left_cell: top_left,
            row_width: extended.width(),
            cell_height: top_left.height(),
            cell_width: top_left.width(),
        })
    }

    /// Number of grid rows in the extended envelope.
    pub fn rows(&self) -> usize {
        (self.extended.height() / self.cell_height).round() as usize
    }

    /// Number of grid columns in the extended envelope.
    pub fn columns(&self) -> usize {
        (self.row_width / self.cell_width).round() as usize
    }

    /// Spherical area of the top-left cell, the fixed reference for
    /// minimum-intersection tests.
    pub fn reference_cell_area(&self) -> f64 {
        self.top_left_cell
            .to_polygon()
            .chamberlain_duquette_unsigned_area()
    }
}
