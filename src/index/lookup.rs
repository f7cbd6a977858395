//! Hilbert curve lookup tables.
//!
//! Converting between an `(i, j)` cell index and the corresponding position
//! along the Hilbert curve one level at a time would cost 30 table walks per
//! id. Instead, two 1024-entry tables resolve four levels per step:
//! [`Tables::pos`] maps 4 bits of `i`, 4 bits of `j` and 2 bits of incoming
//! curve orientation to 8 bits of curve position plus 2 bits of outgoing
//! orientation, and [`Tables::ij`] is the inverse mapping.
//!
//! (Bigger tables resolving more bits per step were measured upstream to be
//! slower: 2KB fits easily in the primary cache.)

use crate::coord::cube::{POS_TO_IJ, POS_TO_ORIENTATION, SWAP_MASK};
use std::sync::LazyLock;

/// Number of `i` (and `j`) bits resolved per lookup step.
pub const LOOKUP_BITS: usize = 4;

/// Number of entries: 4 bits of `i`, 4 bits of `j`, 2 bits of orientation.
const TABLE_SIZE: usize = 1 << (2 * LOOKUP_BITS + 2);

/// The pair of lookup tables, built once on first use.
///
/// `LazyLock` gives the one-shot initialization contract: the filling happens
/// at most once per process, is published with release semantics, and every
/// reader observes a fully populated table.
pub static TABLES: LazyLock<Tables> = LazyLock::new(Tables::build);

/// Four-level Hilbert curve subdivision, in both directions.
pub struct Tables {
    /// `iiiijjjjoo -> ppppppppoo`: (i, j, orientation) to (position,
    /// orientation).
    pub pos: [u16; TABLE_SIZE],
    /// `ppppppppoo -> iiiijjjjoo`: the inverse of `pos`.
    pub ij: [u16; TABLE_SIZE],
}

impl Tables {
    /// Fills both tables by recursing four levels down the Hilbert grammar
    /// from each of the four root orientations.
    fn build() -> Self {
        let mut tables = Self {
            pos: [0; TABLE_SIZE],
            ij: [0; TABLE_SIZE],
        };

        for orientation in 0..4 {
            tables.fill(0, 0, 0, orientation, 0, orientation);
        }

        tables
    }

    fn fill(
        &mut self,
        level: usize,
        i: u16,
        j: u16,
        root_orientation: u8,
        pos: u16,
        orientation: u8,
    ) {
        if level == LOOKUP_BITS {
            let ij = (i << LOOKUP_BITS) + j;
            let key_pos = (ij << 2) + u16::from(root_orientation);
            let key_ij = (pos << 2) + u16::from(root_orientation);
            self.pos[usize::from(key_pos)] =
                (pos << 2) + u16::from(orientation);
            self.ij[usize::from(key_ij)] = (ij << 2) + u16::from(orientation);
            return;
        }

        // Visit the four children in curve order, tracking where each one
        // lands in the (i, j) grid and how it reorients the curve.
        let order = &POS_TO_IJ[usize::from(orientation)];
        for (offset, &ij) in order.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)] // Offset is in [0; 3].
            self.fill(
                level + 1,
                (i << 1) + u16::from(ij >> 1),
                (j << 1) + u16::from(ij & 1),
                root_orientation,
                (pos << 2) + offset as u16,
                orientation ^ POS_TO_ORIENTATION[offset],
            );
        }
    }
}

// The suffix algebra of the id decoder folds the trailing `10…0` padding of
// non-leaf cells into a single conditional swap; that shortcut is only sound
// with the canonical orientation deltas.
const _: () = assert!(POS_TO_ORIENTATION[0] == SWAP_MASK);
const _: () = assert!(POS_TO_ORIENTATION[2] == 0);

#[cfg(test)]
#[path = "./lookup_tests.rs"]
mod tests;
