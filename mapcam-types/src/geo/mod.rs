//! Points in geographic coordinates (latitude and longitude) (see [`GeoPoint2d`]) and their projection
//! into the flat world-pixel space used for camera interpolation (see [`WebMercator`]).

mod angle;
mod point;
mod web_mercator;

pub use angle::{normalize_angle, wrap};
pub use point::GeoPoint2d;
pub use web_mercator::{WebMercator, LATITUDE_MAX, LATITUDE_MIN, TILE_SIZE};
