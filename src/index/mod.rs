//! S2 index types

pub mod bits;
mod cell;
mod lookup;

pub use cell::CellId;
