use std::f64::consts::PI;

use crate::cartesian::Point2d;
use crate::error::MapcamTypesError;
use crate::geo::GeoPoint2d;

/// Maximum latitude that can be represented in the spherical Mercator projection.
pub const LATITUDE_MAX: f64 = 85.051_128_779_806_6;
/// Minimum latitude that can be represented in the spherical Mercator projection.
pub const LATITUDE_MIN: f64 = -LATITUDE_MAX;
/// Width of one tile in pixels. The whole world at zoom level 0 is one tile.
pub const TILE_SIZE: f64 = 512.0;

/// Spherical Mercator projection into world pixels.
///
/// The world is a square of `TILE_SIZE * zoom_scale` pixels with the origin in the top-left corner
/// (longitude `-180`, latitude [`LATITUDE_MAX`]) and `y` axis pointing to the south.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercator {
    world_size: f64,
}

impl Default for WebMercator {
    fn default() -> Self {
        Self {
            world_size: TILE_SIZE,
        }
    }
}

impl WebMercator {
    /// Creates a projection for the given zoom scale (`2^zoom`).
    pub fn new(zoom_scale: f64) -> Result<Self, MapcamTypesError> {
        if !zoom_scale.is_finite() || zoom_scale <= 0.0 {
            return Err(MapcamTypesError::InvalidZoomScale(zoom_scale));
        }

        Ok(Self {
            world_size: TILE_SIZE * zoom_scale,
        })
    }

    /// Creates a projection for the given zoom level.
    pub fn with_zoom(zoom: f64) -> Result<Self, MapcamTypesError> {
        Self::new(2f64.powf(zoom))
    }

    /// Size of the world in pixels.
    pub fn world_size(&self) -> f64 {
        self.world_size
    }

    /// Projects the point into world pixels. Latitude is clamped to the valid Mercator range, longitude
    /// is not wrapped.
    pub fn project(&self, point: &GeoPoint2d) -> Point2d {
        let lat = point.lat().clamp(LATITUDE_MIN, LATITUDE_MAX);
        let x = (180.0 + point.lon()) / 360.0 * self.world_size;
        let y = (180.0 - (180.0 / PI) * (PI / 4.0 + lat * PI / 360.0).tan().ln()) / 360.0
            * self.world_size;

        Point2d::new(x, y)
    }

    /// Converts world pixels back into geographic coordinates.
    pub fn unproject(&self, point: &Point2d) -> GeoPoint2d {
        let y2 = 180.0 - point.y * 360.0 / self.world_size;
        let lat = 360.0 / PI * (y2 * PI / 180.0).exp().atan() - 90.0;
        let lon = point.x * 360.0 / self.world_size - 180.0;

        GeoPoint2d::latlon(lat.clamp(LATITUDE_MIN, LATITUDE_MAX), lon)
    }
}
