//! Boundary between the animators and the map they move.

use mapcam_types::cartesian::{Point2d, Size, Vector2d};
use mapcam_types::geo::WebMercator;

use crate::camera::{CameraBounds, CameraOptions, CameraState};

/// Map whose camera is driven by the animators.
///
/// The engine is the only shared state the animators write to. All calls are made synchronously from the
/// thread that ticks the animations.
pub trait MapEngine {
    /// Current camera.
    fn camera_state(&self) -> CameraState;

    /// Applies the present fields of `options` to the camera. `None` fields stay unchanged.
    fn set_camera(&mut self, options: &CameraOptions);

    /// Limits of the camera parameters.
    fn camera_bounds(&self) -> CameraBounds;

    /// Size of the viewport in points.
    fn size(&self) -> Size;

    /// Point of the viewport that stays fixed when zooming or rotating. Defaults to the center of the
    /// viewport.
    fn anchor(&self) -> Point2d {
        let size = self.size();
        Point2d::new(size.half_width(), size.half_height())
    }

    /// Called when an animator starts running. Calls are balanced by [`MapEngine::end_animation`] and
    /// may nest.
    fn begin_animation(&mut self);

    /// Called when a running animator pauses or stops.
    fn end_animation(&mut self);

    /// Camera options that move the map so the geographic point under the screen point `from` ends up
    /// under the screen point `to`.
    ///
    /// The default implementation ignores pitch and takes bearing into account.
    fn drag_camera_options(&self, from: Point2d, to: Point2d) -> CameraOptions {
        drag_camera_options(&self.camera_state(), from, to)
    }
}

/// Camera options that move `camera` so the geographic point under the screen point `from` ends up under
/// the screen point `to`.
///
/// Gesture handlers that receive the location where the gesture started should drag from the camera
/// they had at that moment, not from the current one, otherwise the movement accumulates.
pub fn drag_camera_options(camera: &CameraState, from: Point2d, to: Point2d) -> CameraOptions {
    let Ok(projection) = WebMercator::with_zoom(camera.zoom) else {
        log::warn!("Cannot drag the map at zoom {}", camera.zoom);
        return CameraOptions::default();
    };

    let screen_delta = to - from;
    let (sin, cos) = camera.bearing.to_radians().sin_cos();
    let world_delta = Vector2d::new(
        screen_delta.x * cos - screen_delta.y * sin,
        screen_delta.x * sin + screen_delta.y * cos,
    );

    let center = projection.project(&camera.center) - world_delta;
    CameraOptions::default().with_center(projection.unproject(&center).wrapped())
}
