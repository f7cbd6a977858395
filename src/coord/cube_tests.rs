use super::*;
use crate::Face;
use float_eq::assert_float_eq;

#[test]
fn st_uv_endpoints() {
    assert_float_eq!(st_to_uv(0.), -1., abs <= f64::EPSILON);
    assert_float_eq!(st_to_uv(0.5), 0., abs <= f64::EPSILON);
    assert_float_eq!(st_to_uv(1.), 1., abs <= f64::EPSILON);

    assert_float_eq!(uv_to_st(-1.), 0., abs <= f64::EPSILON);
    assert_float_eq!(uv_to_st(0.), 0.5, abs <= f64::EPSILON);
    assert_float_eq!(uv_to_st(1.), 1., abs <= f64::EPSILON);
}

#[test]
fn st_uv_roundtrip() {
    for k in 0..=64 {
        let s = f64::from(k) / 64.;
        assert_float_eq!(
            uv_to_st(st_to_uv(s)),
            s,
            abs <= 4. * f64::EPSILON,
            "s = {s}"
        );

        let u = f64::from(k) / 32. - 1.;
        assert_float_eq!(
            st_to_uv(uv_to_st(u)),
            u,
            abs <= 4. * f64::EPSILON,
            "u = {u}"
        );
    }
}

#[test]
fn st_to_ij_clamps() {
    assert_eq!(st_to_ij(-0.5), 0);
    assert_eq!(st_to_ij(0.), 0);
    assert_eq!(st_to_ij(0.5), MAX_SIZE / 2);
    assert_eq!(st_to_ij(1.), MAX_SIZE - 1);
    assert_eq!(st_to_ij(1.5), MAX_SIZE - 1);
}

#[test]
fn ij_st_corners() {
    assert_float_eq!(ij_to_st_min(0), 0., abs <= f64::EPSILON);
    assert_float_eq!(ij_to_st_min(MAX_SIZE), 1., abs <= f64::EPSILON);
    assert_float_eq!(
        ij_to_st_min(MAX_SIZE / 2),
        0.5,
        abs <= f64::EPSILON
    );
}

#[test]
fn siti_to_st_center() {
    assert_float_eq!(siti_to_st(MAX_SITI / 2), 0.5, abs <= f64::EPSILON);
    assert_float_eq!(siti_to_st(0), 0., abs <= f64::EPSILON);
    assert_float_eq!(siti_to_st(MAX_SITI), 1., abs <= f64::EPSILON);
}

#[test]
fn face_centers() {
    let expected = [
        Vec3d::new(1., 0., 0.),
        Vec3d::new(0., 1., 0.),
        Vec3d::new(0., 0., 1.),
        Vec3d::new(-1., 0., 0.),
        Vec3d::new(0., -1., 0.),
        Vec3d::new(0., 0., -1.),
    ];

    for (value, center) in Face::iter().zip(expected) {
        assert_eq!(face_uv_to_xyz(value, 0., 0.), center);
        assert_eq!(face(&center), value);
    }
}

#[test]
fn face_uv_roundtrip() {
    for value in Face::iter() {
        for ku in -2_i8..=2 {
            for kv in -2_i8..=2 {
                let u = f64::from(ku) / 2.5;
                let v = f64::from(kv) / 2.5;
                let (back, ub, vb) =
                    xyz_to_face_uv(&face_uv_to_xyz(value, u, v));

                assert_eq!(back, value, "face {value}, ({u}, {v})");
                assert_float_eq!(ub, u, abs <= 4. * f64::EPSILON);
                assert_float_eq!(vb, v, abs <= 4. * f64::EPSILON);
            }
        }
    }
}
