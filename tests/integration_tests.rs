use geohash_cover::compute::grid::{GridAlignment, cell_rect};
use geohash_cover::prelude::*;
use std::collections::BTreeSet;

fn ring(points: &[[f64; 2]]) -> Vec<(f64, f64)> {
    points.iter().map(|p| (p[0], p[1])).collect()
}

fn polygon(points: &[[f64; 2]]) -> Shape {
    Shape::polygon(ring(points), vec![]).expect("valid polygon")
}

fn set(cells: Vec<String>) -> BTreeSet<String> {
    cells.into_iter().collect()
}

fn expected(cells: &[&str]) -> BTreeSet<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn cover(shape: &Shape, mode: HashMode) -> Vec<String> {
    CoverBuilder::new()
        .precision(5)
        .hash_mode(mode)
        .build()
        .expect("valid options")
        .cover(shape)
        .expect("cover succeeds")
}

const BERLIN: [[f64; 2]; 6] = [
    [13.331187, 52.49439],
    [13.371699, 52.509027],
    [13.4245712, 52.50401228],
    [13.41221166, 52.457175],
    [13.3414871, 52.4504801],
    [13.331187, 52.49439],
];

const SQUARE: [[f64; 2]; 5] = [
    [13.328475952148438, 52.54713081557263],
    [13.330535888671875, 52.4350833510599],
    [13.423233032226562, 52.44178076592579],
    [13.410873413085938, 52.55172368081563],
    [13.328475952148438, 52.54713081557263],
];

const SQUARE_HOLE: [[f64; 2]; 5] = [
    [13.336029052734373, 52.5433726592131],
    [13.338775634765625, 52.441362207320445],
    [13.41499328613281, 52.44596613327885],
    [13.40606689453125, 52.54838346285351],
    [13.336029052734373, 52.5433726592131],
];

/// Test 1: A cell's own rectangle covers to exactly that cell
#[test]
fn test_cell_bbox_covers_itself() {
    let rect = cell_rect("u336x").expect("decodes");
    let cells = cover(&Shape::from(rect), HashMode::Intersect);
    assert_eq!(cells, vec!["u336x"]);
}

/// Test 2: Intersect mode on a small polygon
#[test]
fn test_intersect_polygon() {
    let cells = cover(&polygon(&BERLIN), HashMode::Intersect);
    assert_eq!(cells.len(), 6, "no duplicates expected: {:?}", cells);
    assert_eq!(
        set(cells),
        expected(&["u336x", "u33d8", "u33d9", "u336r", "u33d2", "u33d3"])
    );
}

/// Test 3: Single-shape output is row-major
#[test]
fn test_intersect_polygon_is_row_major() {
    let cells = cover(&polygon(&BERLIN), HashMode::Intersect);
    assert_eq!(
        cells,
        vec!["u336x", "u33d8", "u33d9", "u336r", "u33d2", "u33d3"]
    );
}

/// Test 4: Inside-only keeps fully contained cells
#[test]
fn test_inside_only_polygon() {
    let shape = polygon(&[
        [13.328819274902344, 52.510579539510864],
        [13.327960968017578, 52.43351349719224],
        [13.422374725341797, 52.4388507721828],
        [13.41482162475586, 52.549427308276925],
        [13.327789306640625, 52.5481746907895],
        [13.328819274902344, 52.510579539510864],
    ]);
    let cells = cover(&shape, HashMode::InsideOnly);
    assert_eq!(cells, vec!["u33d8"]);
}

/// Test 5: Border keeps cells crossed by the outline
#[test]
fn test_border_polygon() {
    let cells = cover(&polygon(&SQUARE), HashMode::Border);
    assert_eq!(
        set(cells),
        expected(&[
            "u336z", "u33db", "u33dc", "u336x", "u33d9", "u336r", "u33d2", "u33d3"
        ])
    );
}

/// Test 6: A hole removes interior cells in intersect mode
#[test]
fn test_polygon_with_hole() {
    let shape = Shape::polygon(ring(&SQUARE), vec![ring(&SQUARE_HOLE)]).expect("valid polygon");
    let cells = cover(&shape, HashMode::Intersect);
    assert_eq!(
        set(cells),
        expected(&[
            "u336z", "u33db", "u33dc", "u336x", "u33d9", "u336r", "u33d2", "u33d3"
        ])
    );
}

/// Test 7: Envelope mode returns the whole aligned grid
#[test]
fn test_envelope_triangle() {
    let shape = polygon(&[
        [13.33740234375, 52.453498792506736],
        [13.407440185546875, 52.45308034523523],
        [13.402633666992188, 52.53919655252312],
        [13.33740234375, 52.453498792506736],
    ]);
    let cells = cover(&shape, HashMode::Envelope);
    assert_eq!(cells.len(), 9);
    assert_eq!(
        set(cells),
        expected(&[
            "u336z", "u33db", "u33dc", "u336x", "u33d8", "u33d9", "u336r", "u33d2", "u33d3"
        ])
    );
}

/// Test 8: Lines cover only the cells they pass through
#[test]
fn test_line() {
    let line = Shape::line(vec![
        (13.286631, 52.501994),
        (13.383104, 52.443386),
        (13.481295, 52.459287),
    ])
    .expect("valid line");
    let cells = cover(&line, HashMode::Intersect);
    assert_eq!(
        set(cells),
        expected(&["u336w", "u336x", "u336r", "u33d2", "u33d3", "u33d6"])
    );
}

/// Test 9: Lines have no interior
#[test]
fn test_line_inside_only_is_empty() {
    let line = Shape::line(vec![(13.286631, 52.501994), (13.383104, 52.443386)])
        .expect("valid line");
    assert!(cover(&line, HashMode::InsideOnly).is_empty());
}

/// Test 10: Collection members are merged
#[test]
fn test_multi_polygon() {
    let shifted: Vec<[f64; 2]> = BERLIN.iter().map(|p| [p[0] + 0.26, p[1]]).collect();
    let shape = Shape::collection(vec![polygon(&BERLIN), polygon(&shifted)]).expect("non-empty");
    let cells = cover(&shape, HashMode::Intersect);
    assert_eq!(
        set(cells),
        expected(&[
            "u336x", "u33d8", "u33d9", "u336r", "u33d2", "u33d3", "u33dt", "u33dw", "u33dx",
            "u33dm", "u33dq", "u33dr"
        ])
    );
}

/// Test 11: Raising the minimum intersection shrinks the result
#[test]
fn test_min_intersect_fraction() {
    let shape = polygon(&BERLIN);
    let all = set(cover(&shape, HashMode::Intersect));
    let half = set(
        CoverBuilder::new()
            .precision(5)
            .min_intersect_fraction(0.5)
            .build()
            .expect("valid options")
            .cover(&shape)
            .expect("cover succeeds"),
    );

    assert!(!half.is_empty());
    assert!(half.is_subset(&all));
    assert!(half.len() < all.len());
}

/// Test 12: Mode results nest as expected
#[test]
fn test_mode_relationships() {
    for shape in [polygon(&BERLIN), polygon(&SQUARE)] {
        let intersect = set(cover(&shape, HashMode::Intersect));
        let inside = set(cover(&shape, HashMode::InsideOnly));
        let border = set(cover(&shape, HashMode::Border));
        let envelope = set(cover(&shape, HashMode::Envelope));

        assert!(inside.is_subset(&intersect));
        assert!(border.is_subset(&intersect));
        assert!(inside.is_disjoint(&border));
        assert!(intersect.is_subset(&envelope));
    }
}

/// Test 13: A point is encoded directly
#[test]
fn test_point_matches_codec() {
    let cells = cover(&Shape::point(13.36, 52.49), HashMode::Border);
    let direct = geohash::encode(geo::coord! { x: 13.36, y: 52.49 }, 5).expect("encodes");
    assert_eq!(cells, vec![direct]);
}

/// Test 14: A shape inside one cell yields that cell
#[test]
fn test_shape_within_single_cell() {
    let rect = cell_rect("u33d8").expect("decodes");
    let (w, h) = (rect.width(), rect.height());
    let inner = Shape::polygon(
        vec![
            (rect.min().x + w * 0.2, rect.min().y + h * 0.2),
            (rect.min().x + w * 0.8, rect.min().y + h * 0.3),
            (rect.min().x + w * 0.5, rect.min().y + h * 0.7),
        ],
        vec![],
    )
    .expect("valid polygon");

    assert_eq!(cover(&inner, HashMode::Intersect), vec!["u33d8"]);
}

/// Test 15: Overlapping shapes without duplicates
#[test]
fn test_no_duplicates_across_shapes() {
    let engine = CoverBuilder::new()
        .precision(5)
        .allow_duplicates(false)
        .build()
        .expect("valid options");
    let cells = engine
        .cover_all(&[polygon(&BERLIN), polygon(&SQUARE)])
        .expect("cover succeeds");

    let unique = set(cells.clone());
    assert_eq!(unique.len(), cells.len());

    let with_repeats = CoverBuilder::new()
        .precision(5)
        .build()
        .expect("valid options")
        .cover_all(&[polygon(&BERLIN), polygon(&SQUARE)])
        .expect("cover succeeds");
    assert!(with_repeats.len() > cells.len());
}

/// Test 16: Repeated calls are deterministic
#[test]
fn test_deterministic() {
    let shape = polygon(&SQUARE);
    let first = cover(&shape, HashMode::Border);
    for _ in 0..5 {
        assert_eq!(cover(&shape, HashMode::Border), first);
    }
}

/// Test 17: Streaming delivers the same cells row by row
#[test]
fn test_stream_rows_to_sink() {
    let engine = CoverBuilder::new().precision(5).build().expect("valid options");
    let mut rows: Vec<Vec<String>> = Vec::new();
    engine
        .stream(&[polygon(&BERLIN)], &mut |row: Vec<String>| -> Result<()> {
            rows.push(row);
            Ok(())
        })
        .expect("stream succeeds");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], vec!["u336x", "u33d8", "u33d9"]);
    assert_eq!(rows[1], vec!["u336r", "u33d2", "u33d3"]);
}

/// Test 18: Pull-based rows match the collected result
#[test]
fn test_rows_match_cover() {
    let engine = CoverBuilder::new().precision(6).build().expect("valid options");
    let shape = polygon(&SQUARE);

    let mut pulled = Vec::new();
    for row in engine.rows(&shape).expect("valid shape") {
        pulled.extend(row.expect("row scans"));
    }
    assert_eq!(pulled, engine.cover(&shape).expect("cover succeeds"));
}

/// Test 19: Parallel and sequential collections agree
#[test]
fn test_parallel_collection() {
    let members: Vec<Shape> = (0..8)
        .map(|i| {
            let shifted: Vec<[f64; 2]> = BERLIN
                .iter()
                .map(|p| [p[0] + 0.3 * i as f64, p[1] - 0.1 * i as f64])
                .collect();
            polygon(&shifted)
        })
        .collect();
    let shape = Shape::collection(members).expect("non-empty");

    let sequential = CoverBuilder::new()
        .precision(6)
        .allow_duplicates(false)
        .build()
        .expect("valid options")
        .cover(&shape)
        .expect("cover succeeds");
    let parallel = CoverBuilder::new()
        .precision(6)
        .allow_duplicates(false)
        .parallel(true)
        .build()
        .expect("valid options")
        .cover(&shape)
        .expect("cover succeeds");

    assert_eq!(set(sequential.clone()), set(parallel.clone()));
    assert_eq!(sequential.len(), parallel.len());
}

fn route() -> Shape {
    Shape::line(vec![
        (13.286631, 52.501994),
        (13.383104, 52.443386),
        (13.481295, 52.459287),
    ])
    .expect("valid line")
}

/// Test 20: Border on a line keeps every cell the line passes through
#[test]
fn test_line_border_matches_intersect() {
    let line = route();
    let intersect = cover(&line, HashMode::Intersect);
    let border = cover(&line, HashMode::Border);

    assert_eq!(border, intersect);
    assert_eq!(
        set(border),
        expected(&["u336w", "u336x", "u336r", "u33d2", "u33d3", "u33d6"])
    );
}

/// Test 21: Envelope on a line is the full aligned grid
#[test]
fn test_line_envelope_is_full_grid() {
    let line = route();
    let envelope = line.envelope().expect("non-empty line");
    let grid = GridAlignment::new(&envelope, 5).expect("aligns");

    let cells = cover(&line, HashMode::Envelope);
    assert_eq!(cells.len(), grid.rows() * grid.columns());

    let cells = set(cells);
    assert!(set(cover(&line, HashMode::Intersect)).is_subset(&cells));
    for cell in &cells {
        let rect = cell_rect(cell).expect("decodes");
        assert!(rect.min().x >= grid.extended.min().x && rect.max().x <= grid.extended.max().x);
        assert!(rect.min().y >= grid.extended.min().y && rect.max().y <= grid.extended.max().y);
    }
}

/// Test 22: Streaming without duplicates hands each cell over once
#[test]
fn test_stream_without_duplicates() {
    let engine = CoverBuilder::new()
        .precision(5)
        .allow_duplicates(false)
        .build()
        .expect("valid options");
    let shapes = [polygon(&BERLIN), polygon(&SQUARE)];

    let mut rows: Vec<Vec<String>> = Vec::new();
    engine
        .stream(&shapes, &mut |row: Vec<String>| -> Result<()> {
            rows.push(row);
            Ok(())
        })
        .expect("stream succeeds");

    assert!(rows.iter().all(|row| !row.is_empty()));
    let streamed: Vec<String> = rows.into_iter().flatten().collect();
    let unique = set(streamed.clone());
    assert_eq!(unique.len(), streamed.len());
    assert_eq!(unique, set(engine.cover_all(&shapes).expect("cover succeeds")));
}

/// Test 23: A failing sink fails a parallel collection
#[test]
fn test_parallel_sink_error_fails_call() {
    let members: Vec<Shape> = (0..6)
        .map(|i| {
            let shifted: Vec<[f64; 2]> = BERLIN
                .iter()
                .map(|p| [p[0] + 0.3 * i as f64, p[1]])
                .collect();
            polygon(&shifted)
        })
        .collect();
    let engine = CoverBuilder::new()
        .precision(5)
        .parallel(true)
        .build()
        .expect("valid options");

    let mut delivered = 0;
    let result = engine.stream(&members, &mut |_: Vec<String>| -> Result<()> {
        delivered += 1;
        Err(CoverError::sink("downstream closed"))
    });

    assert!(matches!(result, Err(CoverError::Sink(_))));
    assert!(delivered >= 1);
}
