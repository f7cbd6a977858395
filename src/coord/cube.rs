//! The cube-to-sphere projection underlying the cell decomposition.
//!
//! In the process of converting a point on the sphere to a 64-bit cell id,
//! the following coordinate systems are used:
//!
//! - `(face, i, j)`: leaf-cell coordinates. `i` and `j` are integers in
//!   `[0, 2^30 - 1]` identifying a leaf cell on the given face.
//! - `(face, s, t)`: cell-space coordinates. `s` and `t` are real numbers in
//!   `[0, 1]` identifying a point on the given face; `(0.5, 0.5)` is the
//!   center of the face cell.
//! - `(face, si, ti)`: discrete cell-space coordinates, `s` and `t` scaled by
//!   `2^31`. They represent the edge and center positions of all cells with
//!   no loss of precision: the center of a level-k cell ends, in binary, with
//!   a 1 followed by `30 - k` zeros.
//! - `(face, u, v)`: cube-space coordinates in `[-1, 1]²`, after the
//!   nonlinear rectification that makes cell sizes more uniform on the
//!   sphere.
//! - `(x, y, z)`: a direction vector ([`Vec3d`]), not necessarily unit
//!   length.

use super::Vec3d;
use crate::{Face, MAX_SIZE};

/// Orientation bit: the `i` and `j` axes are exchanged.
pub const SWAP_MASK: u8 = 0x01;

/// Orientation bit: the traversal order of the children is reversed.
pub const INVERT_MASK: u8 = 0x02;

/// The maximum value of an si- or ti-coordinate: `2 * MAX_SIZE`.
pub const MAX_SITI: u32 = (MAX_SIZE as u32) << 1;

/// Traversal order of the four children within a parent cell, for each of the
/// four Hilbert curve orientations.
///
/// The entry value packs the child's `(i, j)` offsets as `i << 1 | j`.
#[rustfmt::skip]
pub const POS_TO_IJ: [[u8; 4]; 4] = [
  // 0  1  2  3
    [0, 1, 3, 2], // canonical order:    (0,0), (0,1), (1,1), (1,0)
    [0, 2, 3, 1], // axes swapped:       (0,0), (1,0), (1,1), (0,1)
    [3, 2, 0, 1], // bits inverted:      (1,1), (1,0), (0,0), (0,1)
    [3, 1, 0, 2], // swapped & inverted: (1,1), (0,1), (0,0), (1,0)
];

/// Orientation adjustment (XOR delta) applied when descending into each child
/// position.
///
/// The trailing-suffix algebra of the id codec relies on the identities
/// `POS_TO_ORIENTATION[0] == SWAP_MASK` and `POS_TO_ORIENTATION[2] == 0`.
pub const POS_TO_ORIENTATION: [u8; 4] =
    [SWAP_MASK, 0, 0, SWAP_MASK | INVERT_MASK];

/// Converts an s- or t-value to the corresponding u- or v-value.
///
/// This is a non-linear transformation from `[0, 1]` to `[-1, 1]` that
/// attempts to make the cell sizes on the sphere more uniform.
#[must_use]
pub fn st_to_uv(s: f64) -> f64 {
    if s >= 0.5 {
        (1. / 3.) * 4.0_f64.mul_add(s * s, -1.)
    } else {
        (1. / 3.) * (1. - 4. * (1. - s) * (1. - s))
    }
}

/// The inverse of the [`st_to_uv`] transformation.
///
/// Note that it is not always true that `uv_to_st(st_to_uv(x)) == x` due to
/// numerical errors.
#[must_use]
pub fn uv_to_st(u: f64) -> f64 {
    if u >= 0. {
        0.5 * 3.0_f64.mul_add(u, 1.).sqrt()
    } else {
        1. - 0.5 * 3.0_f64.mul_add(-u, 1.).sqrt()
    }
}

/// Returns the i- or j-index of the leaf cell containing the given s- or
/// t-value.
///
/// Values outside the range spanned by valid leaf cells are clamped to the
/// closest valid index.
#[allow(clippy::cast_possible_truncation)] // Clamped below.
#[must_use]
pub fn st_to_ij(s: f64) -> i32 {
    ((f64::from(MAX_SIZE) * s).floor() as i32).clamp(0, MAX_SIZE - 1)
}

/// Converts the i- or j-index of a leaf cell to the minimum s- or t-value
/// contained by that cell.
///
/// The argument must be in `[0, 2^30]`, i.e. up to one position beyond the
/// normal range of valid leaf cell indices.
#[must_use]
pub fn ij_to_st_min(i: i32) -> f64 {
    debug_assert!((0..=MAX_SIZE).contains(&i), "ij index out of range");
    f64::from(i) / f64::from(MAX_SIZE)
}

/// Converts an si- or ti-value to the corresponding s- or t-value.
#[must_use]
pub fn siti_to_st(si: u32) -> f64 {
    debug_assert!(si <= MAX_SITI, "siti index out of range");
    f64::from(si) / f64::from(MAX_SITI)
}

/// Converts `(face, u, v)` coordinates to a direction vector (not necessarily
/// unit length).
#[rustfmt::skip]
#[must_use]
pub fn face_uv_to_xyz(face: Face, u: f64, v: f64) -> Vec3d {
    match u8::from(face) {
        0 => Vec3d::new( 1.,   u,   v),
        1 => Vec3d::new( -u,  1.,   v),
        2 => Vec3d::new( -u,  -v,  1.),
        3 => Vec3d::new(-1.,  -v,  -u),
        4 => Vec3d::new(  v, -1.,  -u),
        _ => Vec3d::new(  v,   u, -1.),
    }
}

/// Returns the face containing the given direction vector.
///
/// For points on the boundary between faces, the result is arbitrary but
/// repeatable.
#[allow(clippy::cast_possible_truncation)] // Axis is in [0; 2].
#[must_use]
pub fn face(p: &Vec3d) -> Face {
    let axis = p.largest_abs_component();
    let face = if p.component(axis) < 0. { axis + 3 } else { axis };
    Face::new_unchecked(face as u8)
}

/// Computes the `(u, v)` coordinates of a point known to lie on the given
/// face (i.e. the face component of the point is nonzero and carries the
/// face's sign).
#[must_use]
pub fn face_xyz_to_uv(face: Face, p: &Vec3d) -> (f64, f64) {
    match u8::from(face) {
        0 => (p.y / p.x, p.z / p.x),
        1 => (-p.x / p.y, p.z / p.y),
        2 => (-p.x / p.z, -p.y / p.z),
        3 => (p.z / p.x, p.y / p.x),
        4 => (p.z / p.y, -p.x / p.y),
        _ => (-p.y / p.z, -p.x / p.z),
    }
}

/// Projects a direction vector onto the cube: returns the face containing it
/// and the `(u, v)` coordinates of the projection on that face.
#[must_use]
pub fn xyz_to_face_uv(p: &Vec3d) -> (Face, f64, f64) {
    let face = face(p);
    let (u, v) = face_xyz_to_uv(face, p);
    (face, u, v)
}

/// Converts discrete `(face, si, ti)` cell-space coordinates to a direction
/// vector (not necessarily unit length).
#[must_use]
pub fn face_siti_to_xyz(face: Face, si: u32, ti: u32) -> Vec3d {
    let u = st_to_uv(siti_to_st(si));
    let v = st_to_uv(siti_to_st(ti));
    face_uv_to_xyz(face, u, v)
}

#[cfg(test)]
#[path = "./cube_tests.rs"]
mod tests;
