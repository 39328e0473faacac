use mapcam_types::cartesian::{EdgeInsets, Point2d};
use mapcam_types::geo::GeoPoint2d;

use crate::camera::{CameraOptions, CameraState};

/// Change of one camera property during an animation.
///
/// `to_value` of `None` means the property is not animated: it keeps whatever value the map has and is not
/// overwritten with `from_value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Change<T> {
    /// Value at the start of the animation.
    pub from_value: T,
    /// Value at the end of the animation.
    pub to_value: Option<T>,
}

impl<T: Copy> Change<T> {
    /// Creates a change that starts at `from_value` and has no target yet.
    pub fn new(from_value: T) -> Self {
        Self {
            from_value,
            to_value: None,
        }
    }

    fn from_option(&self) -> Option<T> {
        self.to_value.map(|_| self.from_value)
    }
}

/// Per-property description of a camera animation.
///
/// The transition is created from the current camera when a [`BasicCameraAnimator`](crate::animator::BasicCameraAnimator)
/// starts, and then given to the animation closure, which sets the target values it wants to animate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransition {
    /// Center coordinate.
    pub center: Change<GeoPoint2d>,
    /// Zoom level.
    pub zoom: Change<f64>,
    /// Padding.
    pub padding: Change<EdgeInsets>,
    /// Anchor point.
    pub anchor: Change<Point2d>,
    /// Bearing in degrees.
    pub bearing: Change<f64>,
    /// Pitch in degrees.
    pub pitch: Change<f64>,
    /// If true, the bearing is animated along the shorter direction of rotation. Otherwise the difference
    /// between the bearings is used as is, so a change from `0` to `720` makes two full turns.
    pub should_optimize_bearing_path: bool,
}

impl CameraTransition {
    /// Creates a transition that starts at the given camera and anchor.
    pub fn new(camera: &CameraState, anchor: Point2d) -> Self {
        Self {
            center: Change::new(camera.center),
            zoom: Change::new(camera.zoom),
            padding: Change::new(camera.padding),
            anchor: Change::new(anchor),
            bearing: Change::new(camera.bearing),
            pitch: Change::new(camera.pitch),
            should_optimize_bearing_path: true,
        }
    }

    /// Sets every present field of `options` as a target of the transition.
    pub fn set_targets(&mut self, options: &CameraOptions) {
        self.center.to_value = options.center;
        self.zoom.to_value = options.zoom;
        self.padding.to_value = options.padding;
        self.anchor.to_value = options.anchor;
        self.bearing.to_value = options.bearing;
        self.pitch.to_value = options.pitch;
    }

    /// Camera options with the target values. Properties that are not animated are `None`.
    pub fn to_camera_options(&self) -> CameraOptions {
        CameraOptions {
            center: self.center.to_value,
            padding: self.padding.to_value,
            anchor: self.anchor.to_value,
            zoom: self.zoom.to_value,
            bearing: self.bearing.to_value,
            pitch: self.pitch.to_value,
        }
    }

    /// Camera options with the start values. Properties that are not animated are `None`.
    pub fn from_camera_options(&self) -> CameraOptions {
        CameraOptions {
            center: self.center.from_option(),
            padding: self.padding.from_option(),
            anchor: self.anchor.from_option(),
            zoom: self.zoom.from_option(),
            bearing: self.bearing.from_option(),
            pitch: self.pitch.from_option(),
        }
    }

    /// Returns true if at least one property has a target value.
    pub fn is_animated(&self) -> bool {
        !self.to_camera_options().is_empty()
    }
}
