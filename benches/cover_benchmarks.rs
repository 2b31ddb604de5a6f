use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use geohash_cover::{CoverBuilder, HashMode, Shape};

fn berlin() -> Shape {
    Shape::polygon(
        vec![
            (13.331187, 52.49439),
            (13.371699, 52.509027),
            (13.4245712, 52.50401228),
            (13.41221166, 52.457175),
            (13.3414871, 52.4504801),
        ],
        vec![],
    )
    .unwrap()
}

fn benchmark_precision(c: &mut Criterion) {
    let mut group = c.benchmark_group("polygon_precision");
    let shape = berlin();

    for precision in [5usize, 6, 7] {
        let engine = CoverBuilder::new().precision(precision).build().unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(precision),
            &precision,
            |b, _| b.iter(|| engine.cover(black_box(&shape)).unwrap()),
        );
    }

    group.finish();
}

fn benchmark_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_modes");
    let shape = berlin();

    for mode in HashMode::ALL {
        let engine = CoverBuilder::new()
            .precision(6)
            .hash_mode(mode)
            .build()
            .unwrap();
        group.bench_function(mode.as_str(), |b| {
            b.iter(|| engine.cover(black_box(&shape)).unwrap())
        });
    }

    group.finish();
}

fn benchmark_line(c: &mut Criterion) {
    let line = Shape::line(vec![
        (13.286631, 52.501994),
        (13.383104, 52.443386),
        (13.481295, 52.459287),
    ])
    .unwrap();
    let engine = CoverBuilder::new().precision(7).build().unwrap();

    c.bench_function("line_precision_7", |b| {
        b.iter(|| engine.cover(black_box(&line)).unwrap())
    });
}

fn benchmark_collection(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection");
    let members: Vec<Shape> = (0..16)
        .map(|i| {
            let dx = 0.2 * i as f64;
            Shape::polygon(
                vec![
                    (13.331187 + dx, 52.49439),
                    (13.371699 + dx, 52.509027),
                    (13.4245712 + dx, 52.50401228),
                    (13.41221166 + dx, 52.457175),
                    (13.3414871 + dx, 52.4504801),
                ],
                vec![],
            )
            .unwrap()
        })
        .collect();

    for parallel in [false, true] {
        let engine = CoverBuilder::new()
            .precision(6)
            .allow_duplicates(false)
            .parallel(parallel)
            .build()
            .unwrap();
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| {
            b.iter(|| engine.cover_all(black_box(&members)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_precision,
    benchmark_modes,
    benchmark_line,
    benchmark_collection
);
criterion_main!(benches);
