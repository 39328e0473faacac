#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geo::angle::wrap;

/// 2d point on the surface of the Earth.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint2d {
    lat: f64,
    lon: f64,
}

impl GeoPoint2d {
    /// Creates a new point from latitude and longitude in degrees.
    pub const fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Creates a new point from longitude and latitude in degrees.
    pub const fn lonlat(lon: f64, lat: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Latitude in radians.
    pub fn lat_rad(&self) -> f64 {
        self.lat.to_radians()
    }

    /// Longitude in radians.
    pub fn lon_rad(&self) -> f64 {
        self.lon.to_radians()
    }

    /// Returns the same point with the longitude brought into the `[-180, 180]` range.
    pub fn wrapped(&self) -> Self {
        if (-180.0..=180.0).contains(&self.lon) {
            return *self;
        }

        Self {
            lat: self.lat,
            lon: wrap(self.lon, -180.0, 180.0),
        }
    }

    /// Returns this point shifted by a whole turn of longitude if that makes the straight path to `destination`
    /// shorter.
    ///
    /// The result can have longitude outside of the `[-180, 180]` range. This is intended: interpolating
    /// between the returned point and `destination` never crosses the whole world when the antimeridian
    /// is between them.
    pub fn unwrapped_for_shortest_path(&self, destination: &GeoPoint2d) -> Self {
        let delta = destination.lon - self.lon;
        let lon = if delta > 180.0 {
            self.lon + 360.0
        } else if delta < -180.0 {
            self.lon - 360.0
        } else {
            self.lon
        };

        Self { lat: self.lat, lon }
    }
}

impl approx::AbsDiffEq for GeoPoint2d {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.lat.abs_diff_eq(&other.lat, epsilon) && self.lon.abs_diff_eq(&other.lon, epsilon)
    }
}

/// Creates a new GeoPoint2d from latitude and longitude values (in degrees).
///
/// ```
/// use mapcam_types::latlon;
///
/// let point = latlon!(38.0, 52.0);
/// assert_eq!(point.lat(), 38.0);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        $crate::geo::GeoPoint2d::latlon($lat, $lon)
    };
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn wrapped_keeps_valid_longitude() {
        let point = GeoPoint2d::latlon(10.0, 180.0);
        assert_eq!(point.wrapped(), point);

        let point = GeoPoint2d::latlon(10.0, -180.0);
        assert_eq!(point.wrapped(), point);
    }

    #[test]
    fn wrapped_brings_longitude_into_range() {
        assert_abs_diff_eq!(
            GeoPoint2d::latlon(5.0, 190.0).wrapped(),
            GeoPoint2d::latlon(5.0, -170.0)
        );
        assert_abs_diff_eq!(
            GeoPoint2d::latlon(5.0, -540.0).wrapped(),
            GeoPoint2d::latlon(5.0, -180.0)
        );
        assert_abs_diff_eq!(
            GeoPoint2d::latlon(5.0, 725.0).wrapped(),
            GeoPoint2d::latlon(5.0, 5.0)
        );
    }

    #[test]
    fn unwrap_across_antimeridian() {
        let source = GeoPoint2d::latlon(0.0, 170.0);
        let dest = GeoPoint2d::latlon(0.0, -170.0);
        assert_eq!(source.unwrapped_for_shortest_path(&dest).lon(), -190.0);
        assert_eq!(dest.unwrapped_for_shortest_path(&source).lon(), 190.0);
    }

    #[test]
    fn unwrap_is_noop_for_close_points() {
        let source = GeoPoint2d::latlon(0.0, 10.0);
        let dest = GeoPoint2d::latlon(0.0, 100.0);
        assert_eq!(source.unwrapped_for_shortest_path(&dest), source);
    }

    #[test]
    fn latlon_macro() {
        let point = crate::latlon!(1.0, 2.0);
        assert_eq!(point.lat(), 1.0);
        assert_eq!(point.lon(), 2.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialize_point() {
        let point = GeoPoint2d::latlon(1.5, -2.5);
        let json = serde_json::to_string(&point).expect("serialization failed");
        assert_eq!(json, r#"{"lat":1.5,"lon":-2.5}"#);
        let restored: GeoPoint2d = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(restored, point);
    }
}
