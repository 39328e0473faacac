//! Interpolation of camera values.
//!
//! Every [`Interpolator`] returns exactly `from` for the fraction `0.0` and exactly `to` for the fraction
//! `1.0`, so an animation that reaches its end never leaves a floating point residue in the camera.

use mapcam_types::cartesian::{EdgeInsets, Point2d};
use mapcam_types::geo::{wrap, GeoPoint2d, WebMercator};

use crate::camera::CameraOptions;

mod fly_to;

pub use fly_to::{FlyToInterpolator, DEFAULT_RHO, DEFAULT_VELOCITY};

/// Calculates intermediate values between two states.
pub trait Interpolator {
    /// Type of the interpolated value.
    type Value;

    /// Returns the value at `fraction` of the way from `from` to `to`. `fraction` is normally in `[0, 1]`.
    fn interpolate(&self, from: &Self::Value, to: &Self::Value, fraction: f64) -> Self::Value;
}

pub(crate) fn lerp(from: f64, to: f64, fraction: f64) -> f64 {
    (1.0 - fraction) * from + fraction * to
}

/// Linear interpolation of scalars.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinearInterpolator;

impl Interpolator for LinearInterpolator {
    type Value = f64;

    fn interpolate(&self, from: &f64, to: &f64, fraction: f64) -> f64 {
        lerp(*from, *to, fraction)
    }
}

/// Interpolation of directions in degrees along the shortest arc.
///
/// Rotation from `350` to `10` goes through `0`, not through `180`. Intermediate values are wrapped into
/// `[0, 360)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectionInterpolator;

impl Interpolator for DirectionInterpolator {
    type Value = f64;

    fn interpolate(&self, from: &f64, to: &f64, fraction: f64) -> f64 {
        if fraction <= 0.0 {
            return *from;
        }
        if fraction >= 1.0 {
            return *to;
        }

        let mut delta = wrap(to - from, -180.0, 180.0);
        if delta == -180.0 {
            delta = 180.0;
        }

        (from + delta * fraction).rem_euclid(360.0)
    }
}

/// Interpolation of geographic coordinates in the Mercator plane.
///
/// The path is a straight line on the Mercator map and takes the shorter way around the globe, crossing the
/// antimeridian if needed. Resulting longitudes are wrapped into `[-180, 180]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoordinateInterpolator {
    projection: WebMercator,
}

impl Interpolator for CoordinateInterpolator {
    type Value = GeoPoint2d;

    fn interpolate(&self, from: &GeoPoint2d, to: &GeoPoint2d, fraction: f64) -> GeoPoint2d {
        if fraction <= 0.0 {
            return *from;
        }
        if fraction >= 1.0 {
            return *to;
        }

        let from_projected = self
            .projection
            .project(&from.unwrapped_for_shortest_path(to));
        let to_projected = self.projection.project(to);
        let point = Point2d::new(
            lerp(from_projected.x, to_projected.x, fraction),
            lerp(from_projected.y, to_projected.y, fraction),
        );

        self.projection.unproject(&point).wrapped()
    }
}

/// Componentwise linear interpolation of [`EdgeInsets`].
#[derive(Debug, Default, Clone, Copy)]
pub struct EdgeInsetsInterpolator;

impl Interpolator for EdgeInsetsInterpolator {
    type Value = EdgeInsets;

    fn interpolate(&self, from: &EdgeInsets, to: &EdgeInsets, fraction: f64) -> EdgeInsets {
        EdgeInsets {
            top: lerp(from.top, to.top, fraction),
            left: lerp(from.left, to.left, fraction),
            bottom: lerp(from.bottom, to.bottom, fraction),
            right: lerp(from.right, to.right, fraction),
        }
    }
}

/// Componentwise linear interpolation of screen points.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointInterpolator;

impl Interpolator for PointInterpolator {
    type Value = Point2d;

    fn interpolate(&self, from: &Point2d, to: &Point2d, fraction: f64) -> Point2d {
        Point2d::new(
            lerp(from.x, to.x, fraction),
            lerp(from.y, to.y, fraction),
        )
    }
}

/// Wraps an interpolator to work with optional values. If either end is `None`, the result is `None`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OptionalInterpolator<I>(pub I);

impl<I: Interpolator> Interpolator for OptionalInterpolator<I> {
    type Value = Option<I::Value>;

    fn interpolate(
        &self,
        from: &Option<I::Value>,
        to: &Option<I::Value>,
        fraction: f64,
    ) -> Option<I::Value> {
        match (from, to) {
            (Some(from), Some(to)) => Some(self.0.interpolate(from, to, fraction)),
            _ => None,
        }
    }
}

/// Interpolates every field of [`CameraOptions`] with the interpolator suitable for it.
///
/// A field is present in the result only if it is present in both `from` and `to`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CameraOptionsInterpolator {
    coordinate: OptionalInterpolator<CoordinateInterpolator>,
    insets: OptionalInterpolator<EdgeInsetsInterpolator>,
    point: OptionalInterpolator<PointInterpolator>,
    linear: OptionalInterpolator<LinearInterpolator>,
    direction: OptionalInterpolator<DirectionInterpolator>,
}

impl Interpolator for CameraOptionsInterpolator {
    type Value = CameraOptions;

    fn interpolate(&self, from: &CameraOptions, to: &CameraOptions, fraction: f64) -> CameraOptions {
        CameraOptions {
            center: self.coordinate.interpolate(&from.center, &to.center, fraction),
            padding: self.insets.interpolate(&from.padding, &to.padding, fraction),
            anchor: self.point.interpolate(&from.anchor, &to.anchor, fraction),
            zoom: self.linear.interpolate(&from.zoom, &to.zoom, fraction),
            bearing: self
                .direction
                .interpolate(&from.bearing, &to.bearing, fraction),
            pitch: self.linear.interpolate(&from.pitch, &to.pitch, fraction),
        }
    }
}
