use criterion::{black_box, Criterion};
use s2o::CellId;

pub fn bench(c: &mut Criterion) {
    let cell = CellId::try_from(0x3b00f71d30000001).expect("cell id");

    c.bench_function("toFaceIJOrientation", |b| {
        b.iter(|| black_box(cell).to_face_ij_orientation())
    });
}
