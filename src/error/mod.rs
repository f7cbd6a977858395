//! S2O error types.

mod invalid_value;


pub use invalid_value::{
    InvalidCellId, InvalidFace, InvalidLatLng, InvalidLevel,
};
