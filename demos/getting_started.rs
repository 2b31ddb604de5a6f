//! Getting Started Example
//!
//! This example shows how to cover points, lines and polygons with geohash
//! cells in each of the four hash modes.

use geohash_cover::{CoverBuilder, CoverOptions, HashMode, Shape, cover_geojson};
use serde_json::json;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("=== geohash-cover - Getting Started ===\n");

    // ========================================
    // 1. Building an engine
    // ========================================
    println!("1. Engine");
    println!("---------");

    let engine = CoverBuilder::new().precision(5).build()?;
    println!("   Options: {:?}\n", engine.options());

    // ========================================
    // 2. Points
    // ========================================
    println!("2. Points");
    println!("---------");

    let brandenburg_gate = Shape::point(13.3777, 52.5163);
    println!("   Brandenburg Gate: {:?}\n", engine.cover(&brandenburg_gate)?);

    // ========================================
    // 3. Polygons in every mode
    // ========================================
    println!("3. Polygons");
    println!("-----------");

    let kreuzberg = Shape::polygon(
        vec![
            (13.331187, 52.49439),
            (13.371699, 52.509027),
            (13.4245712, 52.50401228),
            (13.41221166, 52.457175),
            (13.3414871, 52.4504801),
        ],
        vec![],
    )?;

    for mode in HashMode::ALL {
        let cells = CoverBuilder::new()
            .precision(6)
            .hash_mode(mode)
            .build()?
            .cover(&kreuzberg)?;
        println!("   {:<10} {} cells", mode, cells.len());
    }

    // ========================================
    // 4. Lines
    // ========================================
    println!("\n4. Lines");
    println!("--------");

    let route = Shape::line(vec![
        (13.286631, 52.501994),
        (13.383104, 52.443386),
        (13.481295, 52.459287),
    ])?;
    println!("   Route: {:?}\n", engine.cover(&route)?);

    // ========================================
    // 5. GeoJSON input
    // ========================================
    println!("5. GeoJSON");
    println!("----------");

    let features = json!({
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "Tempelhof"}, "geometry": {
                "type": "Polygon",
                "coordinates": [[[13.39, 52.47], [13.42, 52.47], [13.42, 52.48], [13.39, 52.48], [13.39, 52.47]]]
            }},
            {"type": "Feature", "properties": {"name": "Alexanderplatz"}, "geometry": {
                "type": "Point", "coordinates": [13.4132, 52.5219]
            }}
        ]
    });
    let options = CoverOptions::default()
        .with_precision(6)
        .with_allow_duplicates(false);
    let cells = cover_geojson(&features, &options)?;
    println!("   {} unique cells: {:?}", cells.len(), cells);

    Ok(())
}
