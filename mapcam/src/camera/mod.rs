//! Camera value types: the current [`CameraState`], partial [`CameraOptions`] used to change it,
//! [`CameraBounds`] that constrain it and [`CameraTransition`] that describes an animated change.

use mapcam_types::cartesian::{EdgeInsets, Point2d};
use mapcam_types::geo::GeoPoint2d;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod transition;

pub use transition::{CameraTransition, Change};

/// Snapshot of the map camera.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraState {
    /// Geographic coordinate shown in the visual center of the map.
    pub center: GeoPoint2d,
    /// Insets of the area the center is calculated for.
    pub padding: EdgeInsets,
    /// Zoom level.
    pub zoom: f64,
    /// Rotation of the map in degrees clockwise from north.
    pub bearing: f64,
    /// Tilt of the map in degrees. `0` means looking straight down.
    pub pitch: f64,
}

/// Partial camera description. Fields that are `None` are left unchanged when the options are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraOptions {
    /// Geographic coordinate of the visual center.
    pub center: Option<GeoPoint2d>,
    /// Padding of the viewport.
    pub padding: Option<EdgeInsets>,
    /// Screen point zoom and rotation are applied around.
    pub anchor: Option<Point2d>,
    /// Zoom level.
    pub zoom: Option<f64>,
    /// Bearing in degrees.
    pub bearing: Option<f64>,
    /// Pitch in degrees.
    pub pitch: Option<f64>,
}

impl CameraOptions {
    /// Sets the center.
    pub fn with_center(mut self, center: GeoPoint2d) -> Self {
        self.center = Some(center);
        self
    }

    /// Sets the padding.
    pub fn with_padding(mut self, padding: EdgeInsets) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Sets the anchor.
    pub fn with_anchor(mut self, anchor: Point2d) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Sets the zoom level.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Sets the bearing.
    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = Some(bearing);
        self
    }

    /// Sets the pitch.
    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = Some(pitch);
        self
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.center.is_none()
            && self.padding.is_none()
            && self.anchor.is_none()
            && self.zoom.is_none()
            && self.bearing.is_none()
            && self.pitch.is_none()
    }

    /// Returns true if both options have the same set of non-`None` fields.
    pub fn has_same_fields(&self, other: &CameraOptions) -> bool {
        self.center.is_some() == other.center.is_some()
            && self.padding.is_some() == other.padding.is_some()
            && self.anchor.is_some() == other.anchor.is_some()
            && self.zoom.is_some() == other.zoom.is_some()
            && self.bearing.is_some() == other.bearing.is_some()
            && self.pitch.is_some() == other.pitch.is_some()
    }
}

impl From<CameraState> for CameraOptions {
    fn from(state: CameraState) -> Self {
        Self {
            center: Some(state.center),
            padding: Some(state.padding),
            anchor: None,
            zoom: Some(state.zoom),
            bearing: Some(state.bearing),
            pitch: Some(state.pitch),
        }
    }
}

/// Limits of the camera parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraBounds {
    /// Minimum zoom level.
    pub min_zoom: f64,
    /// Maximum zoom level.
    pub max_zoom: f64,
    /// Minimum pitch in degrees.
    pub min_pitch: f64,
    /// Maximum pitch in degrees.
    pub max_pitch: f64,
}

impl Default for CameraBounds {
    fn default() -> Self {
        Self {
            min_zoom: 0.0,
            max_zoom: 22.0,
            min_pitch: 0.0,
            max_pitch: 85.0,
        }
    }
}

impl CameraBounds {
    /// Clamps the zoom level into the bounds. If the bounds are inverted, the maximum wins. NaN bounds
    /// are ignored.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }

    /// Clamps the pitch into the bounds. If the bounds are inverted, the maximum wins. NaN bounds are
    /// ignored.
    pub fn clamp_pitch(&self, pitch: f64) -> f64 {
        pitch.max(self.min_pitch).min(self.max_pitch)
    }
}
