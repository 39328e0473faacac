//! Types in screen space: points, vectors, sizes and insets. Coordinates are measured in points from the
//! top-left corner of the map view.

mod insets;
mod size;

pub use insets::EdgeInsets;
pub use nalgebra::{Point2, Vector2};
pub use size::Size;

/// 2d point with `f64` coordinates.
pub type Point2d = Point2<f64>;
/// 2d vector with `f64` coordinates.
pub type Vector2d = Vector2<f64>;
