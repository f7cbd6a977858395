use criterion::{black_box, BenchmarkId, Criterion};
use s2o::{CellId, Level};

pub fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");

    for level in [5, 15, 30] {
        group.bench_with_input(
            BenchmarkId::from_parameter(level),
            &level,
            |b, &level| {
                let level = Level::try_from(level).expect("level");
                let cell = CellId::begin(level);

                b.iter(|| black_box(cell).advance(black_box(42)))
            },
        );
    }

    group.finish();
}
