//! Streaming Rows Example
//!
//! Fine precisions over large shapes produce many cells. This example pulls
//! them one row at a time, and pushes them into a sink, instead of
//! collecting the whole result.

use geohash_cover::{CoverBuilder, Shape};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let berlin = Shape::polygon(
        vec![
            (13.088, 52.338),
            (13.761, 52.338),
            (13.761, 52.675),
            (13.088, 52.675),
        ],
        vec![vec![
            (13.30, 52.45),
            (13.50, 52.45),
            (13.50, 52.55),
            (13.30, 52.55),
        ]],
    )?;

    let engine = CoverBuilder::new().precision(6).build()?;

    // Pull: one row per iteration
    let mut rows = 0;
    let mut widest = 0;
    for row in engine.rows(&berlin)? {
        let row = row?;
        rows += 1;
        widest = widest.max(row.len());
    }
    println!("Pulled {} rows, widest has {} cells", rows, widest);

    // Push: a closure sink counting cells per prefix
    let mut per_prefix = std::collections::BTreeMap::<String, usize>::new();
    let mut sink = |row: Vec<String>| -> geohash_cover::Result<()> {
        for cell in row {
            *per_prefix.entry(cell[..4].to_string()).or_default() += 1;
        }
        Ok(())
    };
    engine.stream(std::slice::from_ref(&berlin), &mut sink)?;

    for (prefix, count) in &per_prefix {
        println!("{}: {} cells", prefix, count);
    }

    Ok(())
}
