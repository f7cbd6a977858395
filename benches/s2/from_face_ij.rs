use criterion::{black_box, Criterion};
use s2o::{CellId, Face};

pub fn bench(c: &mut Criterion) {
    let face = Face::try_from(3).expect("face");

    c.bench_function("fromFaceIJ", |b| {
        b.iter(|| {
            CellId::from_face_ij(
                black_box(face),
                black_box(0x2b1c6e3a),
                black_box(0x1d4f82c5),
            )
        })
    });
}
