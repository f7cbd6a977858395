//! The six faces of the cube inscribed in the unit sphere.

use crate::{error, NUM_FACES};
use std::fmt;

/// A cube face, in `[0; 5]`.
///
/// Faces 0, 1 and 2 front the positive `x`, `y` and `z` half-axes; faces 3, 4
/// and 5 front the negative ones. The `(u, v)` coordinate system is
/// right-handed on every face, and adjacent faces are oriented so that the
/// Hilbert curve connects continuously from one face to the next.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Face(u8);

impl Face {
    /// Initializes a new `Face` using a value that may be out of range.
    ///
    /// # Safety
    ///
    /// The value must be a valid face.
    pub(crate) const fn new_unchecked(value: u8) -> Self {
        debug_assert!(value < NUM_FACES, "face out of range");
        Self(value)
    }

    /// Iterates over the six cube faces.
    ///
    /// # Example
    ///
    /// ```
    /// let faces = s2o::Face::iter().collect::<Vec<_>>();
    /// assert_eq!(faces.len(), 6);
    /// ```
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..NUM_FACES).map(Self)
    }
}

impl From<Face> for u8 {
    fn from(value: Face) -> Self {
        value.0
    }
}

impl From<Face> for usize {
    fn from(value: Face) -> Self {
        Self::from(value.0)
    }
}

impl From<Face> for u64 {
    fn from(value: Face) -> Self {
        Self::from(value.0)
    }
}

impl TryFrom<u8> for Face {
    type Error = error::InvalidFace;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value >= NUM_FACES {
            return Err(Self::Error::new(value, "out of range"));
        }

        Ok(Self(value))
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
