//! Coordinate systems used by S2 internally.
//!
//! See the [`cube`] module documentation for the full chain from a direction
//! vector down to discrete leaf-cell coordinates.

pub mod cube;

mod latlng;
mod rect;
mod vec2d;
mod vec3d;

pub use latlng::LatLng;
pub use rect::Rect;
pub use vec2d::Vec2d;
pub use vec3d::Vec3d;
