use super::*;
use float_eq::assert_float_eq;

#[test]
fn dot() {
    let v1 = Vec3d::new(1., 2., 3.);
    let v2 = Vec3d::new(4., -5., 6.);

    assert_float_eq!(v1.dot(&v2), 12., abs <= f64::EPSILON);
    assert_float_eq!(v1.dot(&v1), 14., abs <= f64::EPSILON);
}

#[test]
fn cross() {
    let x = Vec3d::new(1., 0., 0.);
    let y = Vec3d::new(0., 1., 0.);
    let z = x.cross(&y);

    assert_float_eq!(z.x, 0., abs <= f64::EPSILON);
    assert_float_eq!(z.y, 0., abs <= f64::EPSILON);
    assert_float_eq!(z.z, 1., abs <= f64::EPSILON, "x cross y is z");

    let backward = y.cross(&x);
    assert_float_eq!(backward.z, -1., abs <= f64::EPSILON, "anticommutative");
}

#[test]
fn norm() {
    let v = Vec3d::new(2., 3., 6.);

    assert_float_eq!(v.norm2(), 49., abs <= f64::EPSILON);
    assert_float_eq!(v.norm(), 7., abs <= f64::EPSILON);
}

#[test]
fn normalize() {
    let v = Vec3d::new(0.3, -0.5, 0.8).normalize();

    assert_float_eq!(v.norm(), 1., abs <= 4. * f64::EPSILON);
}

#[test]
fn largest_abs_component() {
    assert_eq!(Vec3d::new(3., -2., 1.).largest_abs_component(), 0);
    assert_eq!(Vec3d::new(3., -4., 1.).largest_abs_component(), 1);
    assert_eq!(Vec3d::new(3., -4., 5.).largest_abs_component(), 2);
    assert_eq!(
        Vec3d::new(-1., -1., -1.).largest_abs_component(),
        2,
        "ties resolve to the highest axis"
    );
}

#[test]
fn angle() {
    let x = Vec3d::new(1., 0., 0.);
    let y = Vec3d::new(0., 1., 0.);

    assert_float_eq!(
        x.angle(&y),
        std::f64::consts::FRAC_PI_2,
        abs <= f64::EPSILON
    );
    assert_float_eq!(x.angle(&x), 0., abs <= f64::EPSILON);
}
