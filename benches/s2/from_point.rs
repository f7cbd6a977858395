use criterion::{black_box, Criterion};
use s2o::{CellId, Vec3d};

pub fn bench(c: &mut Criterion) {
    let p = Vec3d::new(0.3, -0.5, 0.8).normalize();

    c.bench_function("fromPoint", |b| {
        b.iter(|| CellId::from_point(black_box(&p)))
    });
}
