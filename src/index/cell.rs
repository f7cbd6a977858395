use crate::{
    coord::{
        cube::{self, INVERT_MASK, SWAP_MASK},
        LatLng, Rect, Vec2d, Vec3d,
    },
    error::InvalidCellId,
    index::{
        bits,
        lookup::{LOOKUP_BITS, TABLES},
    },
    Face, Level, FACE_BITSIZE, MAX_LEVEL, MAX_SIZE, NUM_FACES, POS_BITSIZE,
    WRAP_OFFSET,
};
use either::Either;
use std::{fmt, str::FromStr};

/// Identifies a cell of the S2 decomposition of the unit sphere, at any
/// subdivision level from 0 (one of the six cube faces) to 30 (leaf).
///
/// The id is encoded on 64-bit with the following bit layout:
///
/// ```text
///  ┏━━━━━┳━━━━━━┳━━━━━━┳━┈┈┈┈┈┈┈┈━┳━━━━━━┳━━━┳━┈┈┈┈┈━┓
///  ┃  F  ┃  P₁  ┃  P₂  ┃          ┃  Pₗ  ┃ 1 ┃  0…0  ┃
///  ┗━━━━━┻━━━━━━┻━━━━━━┻━┈┈┈┈┈┈┈┈━┻━━━━━━┻━━━┻━┈┈┈┈┈━┛
/// 64    61     59     57        61-2l
/// ```
///
/// Where:
/// - `F` is the cube face, in [0; 5], coded on 3 bits.
/// - `Pₖ` is the Hilbert curve position of the level-`k` ancestor within its
///   parent, coded on 2 bits, one pair per level down to the cell itself.
/// - the 1 bit marks the end of the position payload (and thereby encodes the
///   level); every bit below it is 0.
///
/// This layout gives the identifier the two properties all the algebra here
/// builds on:
///
/// - integer order on ids is the Hilbert traversal order at any fixed level,
///   and
/// - the descendants of a cell are exactly the ids sharing its bit prefix,
///   i.e. the ids in `[range_min(), range_max()]`.
///
/// Most operations require [`is_valid`](Self::is_valid) to be true (although
/// not all of them enforce it); the two invalid markers [`none`](Self::none)
/// and [`sentinel`](Self::sentinel) are only meant as absent/upper-bound keys
/// for indexing structures.
///
/// This type is intended to be copied by value as desired.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId(u64);

impl CellId {
    /// Size, in bits, of the cube face prefix.
    pub const FACE_BITS: usize = FACE_BITSIZE;

    /// Number of cube faces.
    pub const NUM_FACES: u8 = NUM_FACES;

    /// Size, in bits, of the Hilbert curve position suffix.
    pub const POS_BITS: usize = POS_BITSIZE;

    /// Number of leaf cells along one edge of a cube face.
    pub const MAX_SIZE: i32 = MAX_SIZE;

    /// One past the last valid cell id.
    pub const WRAP_OFFSET: u64 = WRAP_OFFSET;

    // -------------------------------------------------------------------------
    // Constructors.

    /// Wraps a raw 64-bit value.
    ///
    /// Any bit pattern is accepted: use `CellId::try_from` for checked
    /// construction.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the absent-cell marker (all bits zero), which is not a valid
    /// cell id.
    #[must_use]
    pub const fn none() -> Self {
        Self(0)
    }

    /// Returns an invalid cell id guaranteed to be larger than any valid one.
    ///
    /// Useful as an upper bound key in ordered containers.
    #[must_use]
    pub const fn sentinel() -> Self {
        Self(u64::MAX)
    }

    /// Returns the level-0 cell covering the given cube face.
    ///
    /// # Example
    ///
    /// ```
    /// use s2o::{CellId, Face};
    ///
    /// let cell = CellId::from_face(Face::try_from(5)?);
    /// assert_eq!(u64::from(cell), 0xb000000000000000);
    /// # Ok::<(), s2o::error::InvalidFace>(())
    /// ```
    #[must_use]
    pub fn from_face(face: Face) -> Self {
        Self((u64::from(face) << POS_BITSIZE) + bits::lsb_for_level(0))
    }

    /// Returns the cell at the given level containing the 61-bit Hilbert
    /// curve position `pos` on the given face.
    ///
    /// The position bits below the cell's payload-end marker are discarded.
    #[must_use]
    pub fn from_face_pos_level(face: Face, pos: u64, level: Level) -> Self {
        debug_assert!(pos >> POS_BITSIZE == 0, "position out of range");
        let cell = Self((u64::from(face) << POS_BITSIZE) + (pos | 1));
        cell.parent_unchecked(level)
    }

    /// Returns the leaf cell containing the given `(i, j)` coordinates on the
    /// given face.
    ///
    /// Both coordinates must be in `[0, CellId::MAX_SIZE)`.
    #[must_use]
    pub fn from_face_ij(face: Face, i: i32, j: i32) -> Self {
        debug_assert!(
            (0..MAX_SIZE).contains(&i) && (0..MAX_SIZE).contains(&j),
            "leaf coordinates out of range"
        );
        let tables = &*TABLES;

        // Note that this value gets shifted one bit to the left at the end of
        // the function.
        let mut n = u64::from(face) << (POS_BITSIZE - 1);

        // Alternating faces have opposite Hilbert curve orientations; this is
        // necessary in order for all faces to have a right-handed coordinate
        // system.
        let mut bits = u64::from(u8::from(face) & SWAP_MASK);

        // Each iteration maps 4 bits of "i" and "j" into 8 bits of the
        // Hilbert curve position. The lookup table transforms a 10-bit key of
        // the form "iiiijjjjoo" to a 10-bit value of the form "ppppppppoo",
        // where the letters [ijpo] denote bits of "i", "j", Hilbert curve
        // position, and Hilbert curve orientation respectively.
        #[allow(clippy::cast_sign_loss)] // Coordinates are non-negative.
        let (i, j) = (i as u32, j as u32);
        let mask = (1 << LOOKUP_BITS) - 1;
        for k in (0..8).rev() {
            bits += u64::from((i >> (k * LOOKUP_BITS)) & mask)
                << (LOOKUP_BITS + 2);
            bits += u64::from((j >> (k * LOOKUP_BITS)) & mask) << 2;
            #[allow(clippy::cast_possible_truncation)] // 10-bit key.
            let value = tables.pos[bits as usize];
            bits = u64::from(value);
            n |= (bits >> 2) << (k * 2 * LOOKUP_BITS);
            bits &= u64::from(SWAP_MASK | INVERT_MASK);
        }

        Self(n * 2 + 1)
    }

    /// Returns the leaf cell containing the given point on the sphere.
    ///
    /// The point does not have to be unit length.
    ///
    /// # Example
    ///
    /// ```
    /// use s2o::{CellId, Vec3d};
    ///
    /// let cell = CellId::from_point(&Vec3d::new(1., 0., 0.));
    /// assert!(cell.is_leaf());
    /// ```
    #[must_use]
    pub fn from_point(p: &Vec3d) -> Self {
        let (face, u, v) = cube::xyz_to_face_uv(p);
        let i = cube::st_to_ij(cube::uv_to_st(u));
        let j = cube::st_to_ij(cube::uv_to_st(v));
        Self::from_face_ij(face, i, j)
    }

    /// Returns the leaf cell containing the given coordinate.
    ///
    /// # Example
    ///
    /// ```
    /// use s2o::{CellId, LatLng};
    ///
    /// let ll = LatLng::new(48.864716, 2.349014)?;
    /// let cell = CellId::from_latlng(ll);
    /// assert!(cell.is_leaf());
    /// # Ok::<(), s2o::error::InvalidLatLng>(())
    /// ```
    #[must_use]
    pub fn from_latlng(ll: LatLng) -> Self {
        Self::from_point(&Vec3d::from(ll))
    }

    // -------------------------------------------------------------------------
    // Accessors.

    /// Returns the cube face of the cell.
    ///
    /// # Example
    ///
    /// ```
    /// let cell = s2o::CellId::try_from(0xb000000000000000)?;
    /// assert_eq!(u8::from(cell.face()), 5);
    /// # Ok::<(), s2o::error::InvalidCellId>(())
    /// ```
    #[must_use]
    pub const fn face(self) -> Face {
        Face::new_unchecked(bits::get_face(self.0))
    }

    /// Returns the 61-bit Hilbert curve position of the cell center along the
    /// curve of its face.
    ///
    /// The position is the id with the face bits cleared; it is not unique
    /// across faces.
    #[must_use]
    pub const fn pos(self) -> u64 {
        self.0 & (u64::MAX >> FACE_BITSIZE)
    }

    /// Returns the subdivision level of the cell.
    ///
    /// # Example
    ///
    /// ```
    /// use s2o::{CellId, Level};
    ///
    /// let cell = CellId::try_from(0xb000000000000000)?;
    /// assert_eq!(cell.level(), Level::MIN);
    /// # Ok::<(), s2o::error::InvalidCellId>(())
    /// ```
    #[must_use]
    pub const fn level(self) -> Level {
        debug_assert!(self.0 != 0, "invalid cell id");
        Level::new_unchecked(bits::get_level(self.0))
    }

    /// Returns true if the id represents a valid cell.
    ///
    /// All methods require a valid cell id unless otherwise specified
    /// (although not all of them enforce it).
    #[must_use]
    pub const fn is_valid(self) -> bool {
        bits::get_face(self.0) < NUM_FACES
            && bits::lsb(self.0) & bits::LSB_MASK != 0
    }

    /// Returns true if the cell is a leaf (level 30).
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        self.0 & 1 != 0
    }

    /// Returns true if the cell is a whole cube face (level 0).
    #[must_use]
    pub const fn is_face(self) -> bool {
        self.0 & (bits::lsb_for_level(0) - 1) == 0
    }

    /// Returns the lowest set bit of the id.
    ///
    /// `a.lsb() <= b.lsb()` if and only if `a.level() >= b.level()`, but the
    /// first test is more efficient.
    #[must_use]
    pub const fn lsb(self) -> u64 {
        bits::lsb(self.0)
    }

    /// Returns the lowest set bit of any cell id at the given level.
    #[must_use]
    pub const fn lsb_for_level(level: Level) -> u64 {
        bits::lsb_for_level(level.to_u8())
    }

    /// Returns the Hilbert curve position, in `[0; 3]`, of the cell's
    /// level-`level` ancestor within its own parent.
    ///
    /// `level` must be in `[1, self.level()]` (the position at level 0 is the
    /// face, not a curve position).
    #[allow(clippy::cast_possible_truncation)] // Masked to 2 bits.
    #[must_use]
    pub fn child_position(self, level: Level) -> u8 {
        debug_assert!(self.is_valid(), "invalid cell id");
        debug_assert!(
            (1..=u8::from(self.level())).contains(&u8::from(level)),
            "level out of range"
        );
        (self.0 >> (2 * (MAX_LEVEL - u8::from(level)) + 1) & 3) as u8
    }

    // -------------------------------------------------------------------------
    // Hierarchy.

    /// Returns the ancestor of the cell at the given level, if any.
    ///
    /// Returns `None` when `level` is finer than the cell's own level.
    ///
    /// # Example
    ///
    /// ```
    /// use s2o::{CellId, Level};
    ///
    /// let cell = CellId::try_from(0x36b000000000000)?;
    /// assert_eq!(
    ///     cell.parent(Level::try_from(2)?),
    ///     CellId::try_from(0x300000000000000).ok(),
    /// );
    /// # Ok::<(), s2o::error::InvalidCellId>(())
    /// ```
    #[must_use]
    pub fn parent(self, level: Level) -> Option<Self> {
        (level <= self.level()).then(|| self.parent_unchecked(level))
    }

    /// Returns the child of the cell at the given Hilbert curve position, in
    /// `[0; 3]`.
    ///
    /// Returns `None` for leaf cells.
    #[must_use]
    pub fn child(self, k: u8) -> Option<Self> {
        debug_assert!(k < 4, "child position out of range");
        (!self.is_leaf()).then(|| self.child_unchecked(k))
    }

    /// Returns the first child of the cell in Hilbert curve order.
    ///
    /// Returns `None` for leaf cells.
    #[must_use]
    pub fn child_begin(self) -> Option<Self> {
        debug_assert!(self.is_valid(), "invalid cell id");
        (!self.is_leaf()).then(|| {
            let old_lsb = self.lsb();
            Self(self.0 - old_lsb + (old_lsb >> 2))
        })
    }

    /// Returns the first descendant of the cell at the given level in Hilbert
    /// curve order.
    ///
    /// Returns `None` when `level` is coarser than the cell's own level.
    #[must_use]
    pub fn child_begin_at(self, level: Level) -> Option<Self> {
        debug_assert!(self.is_valid(), "invalid cell id");
        (level >= self.level()).then(|| {
            Self(self.0 - self.lsb() + bits::lsb_for_level(level.into()))
        })
    }

    /// Returns one past the last child of the cell in Hilbert curve order.
    ///
    /// Returns `None` for leaf cells. The result is not a valid position: it
    /// is only meant as a comparison bound or an iteration stop.
    #[must_use]
    pub fn child_end(self) -> Option<Self> {
        debug_assert!(self.is_valid(), "invalid cell id");
        (!self.is_leaf()).then(|| {
            let old_lsb = self.lsb();
            Self(self.0 + old_lsb + (old_lsb >> 2))
        })
    }

    /// Returns one past the last descendant of the cell at the given level in
    /// Hilbert curve order.
    ///
    /// Returns `None` when `level` is coarser than the cell's own level.
    #[must_use]
    pub fn child_end_at(self, level: Level) -> Option<Self> {
        debug_assert!(self.is_valid(), "invalid cell id");
        (level >= self.level()).then(|| {
            Self(self.0 + self.lsb() + bits::lsb_for_level(level.into()))
        })
    }

    /// Iterates over the descendants of the cell at the given level, in
    /// Hilbert curve order.
    ///
    /// The iterator is empty when `level` is coarser than the cell's own
    /// level.
    ///
    /// # Example
    ///
    /// ```
    /// use s2o::{CellId, Face, Level};
    ///
    /// let face = CellId::from_face(Face::try_from(0)?);
    /// let count = face.children(Level::try_from(2)?).count();
    /// assert_eq!(count, 16);
    /// # Ok::<(), s2o::error::InvalidFace>(())
    /// ```
    pub fn children(self, level: Level) -> impl Iterator<Item = Self> {
        debug_assert!(self.is_valid(), "invalid cell id");
        let count = if level >= self.level() {
            1_u64 << (2 * (u8::from(level) - u8::from(self.level())))
        } else {
            0
        };
        let start = self.0 - self.lsb() + bits::lsb_for_level(level.into());
        let step = bits::lsb_for_level(level.into()) << 1;

        (0..count).map(move |k| Self(start + k * step))
    }

    /// Returns the minimum id among the descendants of the cell (itself
    /// included).
    #[must_use]
    pub const fn range_min(self) -> Self {
        Self(self.0 - (self.lsb() - 1))
    }

    /// Returns the maximum id among the descendants of the cell (itself
    /// included).
    #[must_use]
    pub const fn range_max(self) -> Self {
        Self(self.0 + (self.lsb() - 1))
    }

    /// Returns true if the given cell is `self` or one of its descendants.
    ///
    /// # Example
    ///
    /// ```
    /// use s2o::{CellId, Face};
    ///
    /// let face = CellId::from_face(Face::try_from(2)?);
    /// let leaf = CellId::try_from(0x4000000000000001)?;
    /// assert!(face.contains(leaf));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        debug_assert!(self.is_valid(), "invalid cell id");
        debug_assert!(other.is_valid(), "invalid cell id");
        other >= self.range_min() && other <= self.range_max()
    }

    /// Returns true if the two cells share a descendant (i.e. one contains
    /// the other).
    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        debug_assert!(self.is_valid(), "invalid cell id");
        debug_assert!(other.is_valid(), "invalid cell id");
        other.range_min() <= self.range_max()
            && other.range_max() >= self.range_min()
    }

    /// Returns the level of the finest common ancestor of the two cells, if
    /// any.
    ///
    /// Returns `None` when the cells lie on different faces.
    ///
    /// # Example
    ///
    /// ```
    /// use s2o::{CellId, Level};
    ///
    /// let a = CellId::try_from(0x3400000000000000)?;
    /// let b = CellId::try_from(0x3c00000000000000)?;
    /// assert_eq!(a.common_ancestor_level(b), Level::try_from(0).ok());
    /// # Ok::<(), s2o::error::InvalidCellId>(())
    /// ```
    #[allow(clippy::cast_sign_loss)] // Guarded by the sign check.
    #[must_use]
    pub fn common_ancestor_level(self, other: Self) -> Option<Level> {
        // Find the first bit position at which the two ids differ and convert
        // it to a level. The max() covers the case where one id is a
        // descendant of the other.
        let bits = (self.0 ^ other.0).max(self.lsb().max(other.lsb()));
        debug_assert!(bits != 0, "invalid cell id");

        // Map the msb position: {0} -> 30, {1,2} -> 29, ..., {59,60} -> 0,
        // {61,62,63} -> none.
        #[allow(clippy::cast_possible_wrap)] // Leading zeros is in [0; 63].
        let msb = 63 - bits.leading_zeros() as i32;
        let level = (60 - msb).max(-1) >> 1;

        (level >= 0).then(|| Level::new_unchecked(level as u8))
    }

    // -------------------------------------------------------------------------
    // Geometry.

    /// Decodes the id into its face and leaf-grid `(i, j)` coordinates.
    ///
    /// For cells above the leaf level, the returned coordinates are those of
    /// a leaf cell adjacent to the center of the portion of the Hilbert curve
    /// filling the cell.
    #[must_use]
    pub fn to_face_ij(self) -> (Face, i32, i32) {
        let (face, i, j, _) = self.to_face_ij_orientation();
        (face, i, j)
    }

    /// Decodes the id into its face, leaf-grid `(i, j)` coordinates and
    /// Hilbert curve orientation (a combination of the swap and invert bits).
    #[allow(clippy::cast_possible_wrap)] // Coordinates are < 2^30.
    #[must_use]
    pub fn to_face_ij_orientation(self) -> (Face, i32, i32, u8) {
        let tables = &*TABLES;
        let face = self.face();
        let mut bits = u64::from(u8::from(face) & SWAP_MASK);
        let (mut i, mut j) = (0_u32, 0_u32);

        // Each iteration maps 8 bits of the Hilbert curve position into 4
        // bits of "i" and "j". The lookup table transforms a key of the form
        // "ppppppppoo" to a value of the form "iiiijjjjoo".
        //
        // On the first iteration the mask is narrowed to skip over the bits
        // representing the cube face.
        for k in (0..8).rev() {
            let nbits = if k == 7 {
                MAX_LEVEL as usize - 7 * LOOKUP_BITS
            } else {
                LOOKUP_BITS
            };
            bits += (self.0 >> (k * 2 * LOOKUP_BITS + 1)
                & ((1 << (2 * nbits)) - 1))
                << 2;
            #[allow(clippy::cast_possible_truncation)] // 10-bit key.
            let value = tables.ij[bits as usize];
            bits = u64::from(value);
            #[allow(clippy::cast_possible_truncation)] // 4-bit nibbles.
            {
                i += ((bits >> (LOOKUP_BITS + 2)) as u32) << (k * LOOKUP_BITS);
                j += (((bits >> 2) & ((1 << LOOKUP_BITS) - 1)) as u32)
                    << (k * LOOKUP_BITS);
            }
            bits &= u64::from(SWAP_MASK | INVERT_MASK);
        }

        // The curve position of a cell at level n is a prefix of 2n bits
        // followed by a suffix of the form 10…0. The leading "10" of the
        // suffix has no effect on the orientation, while each subsequent "00"
        // pair toggles the swap bit (POS_TO_ORIENTATION[0] == SWAP_MASK and
        // POS_TO_ORIENTATION[2] == 0). The mask below selects exactly the lsb
        // positions preceded by an odd number of such pairs.
        #[allow(clippy::cast_possible_truncation)] // 2-bit orientation.
        let mut orientation = bits as u8;
        if self.lsb() & 0x1111_1111_1111_1110 != 0 {
            orientation ^= SWAP_MASK;
        }

        (face, i as i32, j as i32, orientation)
    }

    /// Returns the discrete `(face, si, ti)` coordinates of the cell center.
    ///
    /// The coordinates are the leaf-grid ones multiplied by two, so that the
    /// center of a cell at any level lands on an exact lattice point (an odd
    /// one for leaf cells).
    #[allow(clippy::cast_sign_loss)] // Coordinates are non-negative.
    #[must_use]
    pub fn center_siti(self) -> (Face, u32, u32) {
        let (face, i, j, _) = self.to_face_ij_orientation();
        let size = self.level().size_ij();
        let si = 2 * (i & -size) + size;
        let ti = 2 * (j & -size) + size;
        (face, si as u32, ti as u32)
    }

    /// Returns the `(s, t)` coordinates of the cell center.
    #[must_use]
    pub fn center_st(self) -> Vec2d {
        let (_, si, ti) = self.center_siti();
        Vec2d::new(cube::siti_to_st(si), cube::siti_to_st(ti))
    }

    /// Returns the `(u, v)` coordinates of the cell center.
    #[must_use]
    pub fn center_uv(self) -> Vec2d {
        let center = self.center_st();
        Vec2d::new(cube::st_to_uv(center.x), cube::st_to_uv(center.y))
    }

    /// Returns the bound of the cell in `(s, t)`-space.
    #[must_use]
    pub fn bound_st(self) -> Rect {
        let size = self.level().size_st();
        Rect::from_center_size(self.center_st(), Vec2d::new(size, size))
    }

    /// Returns the bound of the cell in `(u, v)`-space.
    #[must_use]
    pub fn bound_uv(self) -> Rect {
        let (_, i, j, _) = self.to_face_ij_orientation();
        Self::ij_level_to_bound_uv(i, j, self.level())
    }

    /// Returns the bound in `(u, v)`-space of the cell at the given level
    /// containing the leaf cell with the given `(i, j)` coordinates.
    #[must_use]
    pub fn ij_level_to_bound_uv(i: i32, j: i32, level: Level) -> Rect {
        let cell_size = level.size_ij();
        let (i_lo, j_lo) = (i & -cell_size, j & -cell_size);

        let lo = Vec2d::new(
            cube::st_to_uv(cube::ij_to_st_min(i_lo)),
            cube::st_to_uv(cube::ij_to_st_min(j_lo)),
        );
        let hi = Vec2d::new(
            cube::st_to_uv(cube::ij_to_st_min(i_lo + cell_size)),
            cube::st_to_uv(cube::ij_to_st_min(j_lo + cell_size)),
        );

        Rect::new(lo, hi)
    }

    /// Returns the direction vector of the cell center.
    ///
    /// The vector is not necessarily unit length; see
    /// [`to_point`](Self::to_point) for the normalized version.
    #[must_use]
    pub fn to_point_raw(self) -> Vec3d {
        let (face, si, ti) = self.center_siti();
        cube::face_siti_to_xyz(face, si, ti)
    }

    /// Returns the center of the cell as a point on the unit sphere.
    ///
    /// # Example
    ///
    /// ```
    /// use s2o::{CellId, Vec3d};
    ///
    /// let p = Vec3d::new(0.3, -0.5, 0.8).normalize();
    /// let roundtrip = CellId::from_point(&p).to_point();
    /// assert!(p.angle(&roundtrip) < 1e-8);
    /// ```
    #[must_use]
    pub fn to_point(self) -> Vec3d {
        self.to_point_raw().normalize()
    }

    /// Returns the coordinate of the cell center.
    #[must_use]
    pub fn to_latlng(self) -> LatLng {
        LatLng::from(self.to_point_raw())
    }

    // -------------------------------------------------------------------------
    // Traversal.

    /// Returns the first cell, in Hilbert curve order, at the given level.
    #[must_use]
    pub const fn begin(level: Level) -> Self {
        Self(bits::lsb_for_level(level.to_u8()))
    }

    /// Returns one past the last cell, in Hilbert curve order, at the given
    /// level.
    ///
    /// The result is not a valid cell id.
    #[must_use]
    pub const fn end(level: Level) -> Self {
        Self(WRAP_OFFSET + bits::lsb_for_level(level.to_u8()))
    }

    /// Returns the next cell at the same level along the Hilbert curve.
    ///
    /// Works correctly when advancing from one face to the next, but does not
    /// wrap around from the last face to the first: the result past the last
    /// cell is `end(level)`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(self.lsb() << 1))
    }

    /// Returns the previous cell at the same level along the Hilbert curve.
    ///
    /// Does not wrap around before the first cell: the result is then an
    /// invalid id with face 7.
    #[must_use]
    pub const fn prev(self) -> Self {
        Self(self.0.wrapping_sub(self.lsb() << 1))
    }

    /// Returns the next cell at the same level, wrapping from the last cell
    /// back to the first.
    #[must_use]
    pub const fn next_wrap(self) -> Self {
        debug_assert!(self.is_valid(), "invalid cell id");
        let next = self.next();
        if next.0 < WRAP_OFFSET {
            next
        } else {
            Self(next.0 - WRAP_OFFSET)
        }
    }

    /// Returns the previous cell at the same level, wrapping from the first
    /// cell back to the last.
    #[must_use]
    pub const fn prev_wrap(self) -> Self {
        debug_assert!(self.is_valid(), "invalid cell id");
        let prev = self.prev();
        if prev.0 < WRAP_OFFSET {
            prev
        } else {
            Self(prev.0.wrapping_add(WRAP_OFFSET))
        }
    }

    /// Advances the cell along the Hilbert curve at its own level by the
    /// given (possibly negative) number of steps.
    ///
    /// The number of steps is clamped so that the result stays in
    /// `[begin(level), end(level)]`.
    ///
    /// # Example
    ///
    /// ```
    /// use s2o::{CellId, Level};
    ///
    /// let leaf = CellId::begin(Level::MAX);
    /// assert_eq!(leaf.advance(3).advance(-3), leaf);
    /// ```
    #[allow(clippy::cast_sign_loss)] // Two's complement add on purpose.
    #[must_use]
    pub fn advance(self, mut steps: i64) -> Self {
        if steps == 0 {
            return self;
        }

        // Clamp the number of steps so that we do not advance past end() or
        // before begin() of this level. Note that min_steps and max_steps
        // always fit in a signed 64-bit integer.
        let step_shift =
            u32::from(2 * (MAX_LEVEL - u8::from(self.level())) + 1);
        #[allow(clippy::cast_possible_wrap)] // Both bounds fit in i64.
        if steps < 0 {
            let min_steps = -((self.0 >> step_shift) as i64);
            if steps < min_steps {
                steps = min_steps;
            }
        } else {
            let max_steps =
                ((WRAP_OFFSET + self.lsb() - self.0) >> step_shift) as i64;
            if steps > max_steps {
                steps = max_steps;
            }
        }

        // A negative step count shifted left must wrap as two's complement:
        // do the add in unsigned 64-bit.
        Self(self.0.wrapping_add((steps as u64) << step_shift))
    }

    /// Advances the cell along the Hilbert curve at its own level, wrapping
    /// around the sphere as needed.
    ///
    /// Unlike [`advance`](Self::advance), the end-of-level bound is not a
    /// reachable position: every result is a valid cell.
    #[allow(clippy::cast_sign_loss)] // Two's complement add on purpose.
    #[must_use]
    pub fn advance_wrap(self, mut steps: i64) -> Self {
        debug_assert!(self.is_valid(), "invalid cell id");
        if steps == 0 {
            return self;
        }

        let step_shift =
            u32::from(2 * (MAX_LEVEL - u8::from(self.level())) + 1);
        #[allow(clippy::cast_possible_wrap)] // All bounds fit in i64.
        if steps < 0 {
            let min_steps = -((self.0 >> step_shift) as i64);
            if steps < min_steps {
                let step_wrap = (WRAP_OFFSET >> step_shift) as i64;
                steps %= step_wrap;
                if steps < min_steps {
                    steps += step_wrap;
                }
            }
        } else {
            // Unlike advance(), we don't want to return end(level).
            let max_steps = ((WRAP_OFFSET - self.0) >> step_shift) as i64;
            if steps > max_steps {
                let step_wrap = (WRAP_OFFSET >> step_shift) as i64;
                steps %= step_wrap;
                if steps > max_steps {
                    steps -= step_wrap;
                }
            }
        }

        Self(self.0.wrapping_add((steps as u64) << step_shift))
    }

    /// Returns the number of steps between this cell and the first cell at
    /// the same level, in Hilbert curve order.
    ///
    /// Ids at different levels are not comparable through this distance: a
    /// cell and its children are at different distances from begin.
    #[must_use]
    pub fn distance_from_begin(self) -> u64 {
        let step_shift =
            u32::from(2 * (MAX_LEVEL - u8::from(self.level())) + 1);
        self.0 >> step_shift
    }

    /// Returns the largest cell whose range starts at this cell's
    /// [`range_min`](Self::range_min) and stops before `limit`.
    ///
    /// Returns `limit` itself when no such cell exists. This is the building
    /// block for converting ranges of leaf ids into minimal sets of cells.
    #[must_use]
    pub fn maximum_tile(self, limit: Self) -> Self {
        let mut id = self;
        let start = id.range_min();
        if start >= limit.range_min() {
            return limit;
        }

        if id.range_max() >= limit {
            // The cell is too large. Shrink it. When generating coverings of
            // cell id ranges this loop usually executes only once. Also,
            // because start < limit.range_min(), the loop always exits before
            // reaching a leaf cell.
            while id.range_max() >= limit {
                id = id.child_unchecked(0);
            }
            return id;
        }

        // The cell may be too small. Grow it if necessary. Note that
        // generally this loop only iterates once.
        while !id.is_face() {
            let level = Level::new_unchecked(u8::from(id.level()) - 1);
            let parent = id.parent_unchecked(level);
            if parent.range_min() != start || parent.range_max() >= limit {
                break;
            }
            id = parent;
        }
        id
    }

    // -------------------------------------------------------------------------
    // Neighbors.

    /// Returns the four cells adjacent across the cell's edges.
    ///
    /// Edges 0, 1, 2, 3 are in the down, right, up, left directions in the
    /// face space. All neighbors are at the same level as the cell, and are
    /// distinct even for cells on a face boundary.
    ///
    /// # Example
    ///
    /// ```
    /// use s2o::{CellId, Face};
    ///
    /// let face = CellId::from_face(Face::try_from(2)?);
    /// let neighbors = face.edge_neighbors();
    /// assert!(neighbors.iter().all(|n| n.is_face()));
    /// # Ok::<(), s2o::error::InvalidFace>(())
    /// ```
    #[must_use]
    pub fn edge_neighbors(self) -> [Self; 4] {
        let level = self.level();
        let size = level.size_ij();
        let (face, i, j, _) = self.to_face_ij_orientation();

        [
            Self::from_face_ij_same(face, i, j - size, j - size >= 0)
                .parent_unchecked(level),
            Self::from_face_ij_same(face, i + size, j, i + size < MAX_SIZE)
                .parent_unchecked(level),
            Self::from_face_ij_same(face, i, j + size, j + size < MAX_SIZE)
                .parent_unchecked(level),
            Self::from_face_ij_same(face, i - size, j, i - size >= 0)
                .parent_unchecked(level),
        ]
    }

    /// Returns the cells, at the given coarser level, sharing the vertex of
    /// the level-`level` ancestor closest to this cell.
    ///
    /// `level` must be strictly coarser than the cell's own level (so that
    /// the closest vertex is determined). Normally four cells are returned
    /// (the ancestor and its three vertex neighbors); at one of the eight
    /// cube vertices, only three cells share the vertex.
    pub fn vertex_neighbors(self, level: Level) -> impl Iterator<Item = Self> {
        debug_assert!(level < self.level(), "level not above the cell's");
        let (face, i, j, _) = self.to_face_ij_orientation();

        // Determine the i- and j-offsets to the closest neighboring cell in
        // each direction by inspecting the next bit of "i" and "j": it tells
        // in which quadrant of the ancestor this cell lies.
        let halfsize = Level::new_unchecked(u8::from(level) + 1).size_ij();
        let size = halfsize << 1;
        let (ioffset, isame) = if i & halfsize == 0 {
            (-size, i - size >= 0)
        } else {
            (size, i + size < MAX_SIZE)
        };
        let (joffset, jsame) = if j & halfsize == 0 {
            (-size, j - size >= 0)
        } else {
            (size, j + size < MAX_SIZE)
        };

        let ancestor = self.parent_unchecked(level);
        let i_neighbor = Self::from_face_ij_same(face, i + ioffset, j, isame)
            .parent_unchecked(level);
        let j_neighbor = Self::from_face_ij_same(face, i, j + joffset, jsame)
            .parent_unchecked(level);

        // If the i- and j-neighbors are *both* on a different face, the
        // vertex is one of the eight cube vertices and only has three
        // neighbors: the diagonal one does not exist.
        if isame || jsame {
            let diagonal = Self::from_face_ij_same(
                face,
                i + ioffset,
                j + joffset,
                isame && jsame,
            )
            .parent_unchecked(level);
            Either::Left(
                [ancestor, i_neighbor, j_neighbor, diagonal].into_iter(),
            )
        } else {
            Either::Right([ancestor, i_neighbor, j_neighbor].into_iter())
        }
    }

    /// Returns all the cells, at the given level, adjacent to this cell along
    /// its boundary (edges and vertices).
    ///
    /// `level` must be greater than or equal to the cell's own level. Two
    /// cells on opposite sides of a face boundary are still adjacent; the
    /// output never contains this cell itself and may contain duplicates near
    /// cube vertices.
    #[must_use]
    pub fn all_neighbors(self, level: Level) -> Vec<Self> {
        debug_assert!(level >= self.level(), "level not below the cell's");
        let (face, mut i, mut j, _) = self.to_face_ij_orientation();

        // Normalize (i, j) to the cell's lower-left corner: the requested
        // level may be finer than the cell's own, so the decoded leaf
        // position within the cell matters.
        let size = self.level().size_ij();
        i &= -size;
        j &= -size;

        let nbr_size = level.size_ij();
        let mut output = Vec::new();

        // Compute the top-bottom, left-right, and diagonal neighbors in one
        // pass. The loop test is at the end of the loop body to avoid 32-bit
        // overflow on the last iteration.
        let mut k = -nbr_size;
        loop {
            let same_face = if k < 0 {
                j + k >= 0
            } else if k >= size {
                j + k < MAX_SIZE
            } else {
                // Top and bottom neighbors.
                output.push(
                    Self::from_face_ij_same(
                        face,
                        i + k,
                        j - nbr_size,
                        j - size >= 0,
                    )
                    .parent_unchecked(level),
                );
                output.push(
                    Self::from_face_ij_same(
                        face,
                        i + k,
                        j + size,
                        j + size < MAX_SIZE,
                    )
                    .parent_unchecked(level),
                );
                true
            };

            // Left, right, and diagonal neighbors.
            output.push(
                Self::from_face_ij_same(
                    face,
                    i - nbr_size,
                    j + k,
                    same_face && i - size >= 0,
                )
                .parent_unchecked(level),
            );
            output.push(
                Self::from_face_ij_same(
                    face,
                    i + size,
                    j + k,
                    same_face && i + size < MAX_SIZE,
                )
                .parent_unchecked(level),
            );

            if k >= size {
                break;
            }
            k += nbr_size;
        }

        output
    }

    // -------------------------------------------------------------------------
    // Tokens.

    /// Encodes the id as a compact text token.
    ///
    /// The token is the id in lowercase hex with the trailing zero digits
    /// stripped, which makes it case-insensitive, alphanumeric, free of
    /// characters requiring escaping in most indexing systems, and directly
    /// comparable against the ids of the corresponding features. The
    /// [`none`](Self::none) id, whose stripped form would be empty, is
    /// encoded as `"X"`.
    ///
    /// # Example
    ///
    /// ```
    /// let cell = s2o::CellId::try_from(0xb000000000000000)?;
    /// assert_eq!(cell.to_token(), "b");
    /// # Ok::<(), s2o::error::InvalidCellId>(())
    /// ```
    #[must_use]
    pub fn to_token(self) -> String {
        if self.0 == 0 {
            return "X".to_owned();
        }
        let zero_digits = (self.0.trailing_zeros() / 4) as usize;
        let value = self.0 >> (4 * zero_digits);

        format!("{value:0width$x}", width = 16 - zero_digits)
    }

    /// Decodes a text token produced by [`to_token`](Self::to_token).
    ///
    /// Malformed input (longer than 16 characters, or containing a non-hex
    /// digit) maps to the [`none`](Self::none) id; this function never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use s2o::CellId;
    ///
    /// let cell = CellId::from_token("b");
    /// assert_eq!(u64::from(cell), 0xb000000000000000);
    /// assert_eq!(CellId::from_token("not a token"), CellId::none());
    /// ```
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token.len() > 16
            || !token.bytes().all(|byte| byte.is_ascii_hexdigit())
        {
            return Self::none();
        }
        u64::from_str_radix(token, 16).map_or_else(
            |_| Self::none(),
            |value| Self(value << (4 * (16 - token.len()))),
        )
    }

    // -------------------------------------------------------------------------
    // Internal helpers.

    /// Same as [`parent`](Self::parent), without the level check.
    pub(crate) fn parent_unchecked(self, level: Level) -> Self {
        debug_assert!(level <= self.level(), "level above the cell's");
        let new_lsb = bits::lsb_for_level(level.into());
        Self((self.0 & new_lsb.wrapping_neg()) | new_lsb)
    }

    /// Same as [`child`](Self::child), without the leaf check.
    fn child_unchecked(self, k: u8) -> Self {
        debug_assert!(!self.is_leaf(), "leaf cells have no children");
        // The four children evenly split the position range around the cell's
        // own id: child k sits at offset (2k - 3) times the child lsb.
        let new_lsb = self.lsb() >> 2;
        Self(
            self.0.wrapping_add(
                u64::from(2 * k + 1).wrapping_sub(4).wrapping_mul(new_lsb),
            ),
        )
    }

    /// Dispatches `(i, j)` reassembly on whether the perturbed coordinates
    /// stayed within the face.
    fn from_face_ij_same(face: Face, i: i32, j: i32, same_face: bool) -> Self {
        if same_face {
            Self::from_face_ij(face, i, j)
        } else {
            Self::from_face_ij_wrap(face, i, j)
        }
    }

    /// Returns the leaf cell containing `(i, j)` coordinates that may cross
    /// over the edge of the given face onto an adjacent one.
    fn from_face_ij_wrap(face: Face, i: i32, j: i32) -> Self {
        // Convert i and j to the coordinates of a leaf cell just beyond the
        // boundary of this face. This prevents 32-bit overflow in the case of
        // finding the neighbors of a face cell.
        let i = i.clamp(-1, MAX_SIZE);
        let j = j.clamp(-1, MAX_SIZE);

        // Wrap the coordinates onto the appropriate adjacent face: convert
        // them to (x, y, z) (a point just outside the normal face boundary)
        // and project back onto the cube. The linear projection u = 2*s - 1
        // suffices here (any projection works, this one is the cheapest).
        //
        // The (u, v) coordinates are clamped so that the point lands barely
        // outside the [-1, 1] x [-1, 1] face rectangle: the reprojection step
        // divides by the new face's axis coordinate, and a larger excursion
        // could perturb the other coordinates enough to end up in the wrong
        // leaf cell. The clamp bound is the smallest double above 1.
        const SCALE: f64 = 1.0 / MAX_SIZE as f64;
        const LIMIT: f64 = 1.0 + f64::EPSILON;

        let u = (SCALE * f64::from(i).mul_add(2., 1. - f64::from(MAX_SIZE)))
            .clamp(-LIMIT, LIMIT);
        let v = (SCALE * f64::from(j).mul_add(2., 1. - f64::from(MAX_SIZE)))
            .clamp(-LIMIT, LIMIT);

        // Find the leaf cell coordinates on the adjacent face and convert
        // them to a cell id at the appropriate level.
        let (face, u, v) =
            cube::xyz_to_face_uv(&cube::face_uv_to_xyz(face, u, v));
        Self::from_face_ij(
            face,
            cube::st_to_ij(0.5 * (u + 1.)),
            cube::st_to_ij(0.5 * (v + 1.)),
        )
    }
}

impl From<CellId> for u64 {
    fn from(value: CellId) -> Self {
        value.0
    }
}

impl TryFrom<u64> for CellId {
    type Error = InvalidCellId;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if bits::get_face(value) >= NUM_FACES {
            return Err(Self::Error::new(Some(value), "face out of range"));
        }
        // A well-formed payload carries its end marker at an even offset (and
        // in particular is non-zero).
        if bits::lsb(value) & bits::LSB_MASK == 0 {
            return Err(Self::Error::new(
                Some(value),
                "misplaced payload-end marker",
            ));
        }

        Ok(Self(value))
    }
}

impl FromStr for CellId {
    type Err = InvalidCellId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = Self::from_token(s);
        if id == Self::none() {
            return Err(Self::Err {
                value: None,
                reason: "malformed cell id token",
            });
        }

        Self::try_from(id.0)
    }
}

impl fmt::Debug for CellId {
    /// Prints the face number followed by the Hilbert curve position at each
    /// level, e.g. `2/0123`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "Invalid: {:016x}", self.0);
        }

        write!(f, "{}/", self.face())?;
        for level in 1..=u8::from(self.level()) {
            write!(f, "{}", self.child_position(Level::new_unchecked(level)))?;
        }
        Ok(())
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_token())
    }
}

impl fmt::Binary for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

impl fmt::Octal for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Octal::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for CellId {
    fn arbitrary(
        data: &mut arbitrary::Unstructured<'a>,
    ) -> arbitrary::Result<Self> {
        let face = Face::new_unchecked(u8::arbitrary(data)? % NUM_FACES);
        let level =
            Level::new_unchecked(u8::arbitrary(data)? % (MAX_LEVEL + 1));
        let pos = u64::arbitrary(data)? >> FACE_BITSIZE;

        Ok(Self::from_face_pos_level(face, pos, level))
    }
}

#[cfg(test)]
#[path = "./cell_tests.rs"]
mod tests;
