//! Primitive types shared by the `mapcam` camera engine.
//!
//! * [`geo`] contains points in geographic coordinates ([`GeoPoint2d`](geo::GeoPoint2d)), spherical Mercator
//!   projection into world pixels and helpers for longitude and angle wrapping.
//! * [`cartesian`] contains screen-space types: points, vectors, [`Size`](cartesian::Size) and
//!   [`EdgeInsets`](cartesian::EdgeInsets).

pub mod cartesian;
pub mod error;
pub mod geo;

pub use cartesian::{EdgeInsets, Point2d, Size, Vector2d};
pub use geo::GeoPoint2d;
