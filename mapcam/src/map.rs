//! In-memory [`MapEngine`] implementation.

use mapcam_types::cartesian::{Point2d, Size, Vector2d};
use mapcam_types::geo::{GeoPoint2d, WebMercator, LATITUDE_MAX, LATITUDE_MIN};

use crate::camera::{CameraBounds, CameraOptions, CameraState};
use crate::engine::MapEngine;
use crate::messenger::Messenger;

/// Map that keeps its camera in memory.
///
/// The map clamps zoom and pitch to its [`CameraBounds`], wraps the center longitude into `[-180, 180]`
/// and keeps bearing in `[0, 360)`. If a [`Messenger`] is set, every camera change requests a redraw.
pub struct Map {
    camera: CameraState,
    bounds: CameraBounds,
    size: Size,
    anchor: Option<Point2d>,
    animation_depth: usize,
    messenger: Option<Box<dyn Messenger>>,
}

impl Map {
    /// Creates a new map.
    pub fn new(camera: CameraState, size: Size, messenger: Option<Box<dyn Messenger>>) -> Self {
        let mut map = Self {
            camera,
            bounds: CameraBounds::default(),
            size,
            anchor: None,
            animation_depth: 0,
            messenger,
        };
        map.camera = map.constrained(camera);
        map
    }

    /// Current camera of the map.
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Sets new limits for the camera and applies them to the current camera.
    pub fn set_bounds(&mut self, bounds: CameraBounds) {
        self.bounds = bounds;
        self.camera = self.constrained(self.camera);
        self.redraw();
    }

    /// Sets the size of the viewport.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.redraw();
    }

    /// Sets the point that stays fixed on zoom and rotation. `None` means the center of the viewport.
    pub fn set_anchor(&mut self, anchor: Option<Point2d>) {
        self.anchor = anchor;
    }

    /// Sets the new event messenger for the map.
    pub fn set_messenger(&mut self, messenger: Option<impl Messenger + 'static>) {
        self.messenger = messenger.map(|m| Box::new(m) as Box<dyn Messenger>);
    }

    /// Returns true while at least one animator is running.
    pub fn is_animating(&self) -> bool {
        self.animation_depth > 0
    }

    /// Request redraw of the map.
    pub fn redraw(&self) {
        if let Some(messenger) = &self.messenger {
            messenger.request_redraw()
        }
    }

    fn constrained(&self, mut camera: CameraState) -> CameraState {
        camera.zoom = self.bounds.clamp_zoom(camera.zoom);
        camera.pitch = self.bounds.clamp_pitch(camera.pitch);
        camera.bearing = camera.bearing.rem_euclid(360.0);
        camera.center = GeoPoint2d::latlon(
            camera.center.lat().clamp(LATITUDE_MIN, LATITUDE_MAX),
            camera.center.lon(),
        )
        .wrapped();

        camera
    }

    fn viewport_center(&self) -> Point2d {
        Point2d::new(self.size.half_width(), self.size.half_height())
    }

    /// Center that keeps the coordinate under `anchor` in place when zoom and bearing change.
    fn anchored_center(&self, anchor: Point2d, zoom: f64, bearing: f64) -> Option<GeoPoint2d> {
        let old_projection = WebMercator::with_zoom(self.camera.zoom).ok()?;
        let new_projection = WebMercator::with_zoom(zoom).ok()?;

        let offset = anchor - self.viewport_center();
        let anchor_point = old_projection.project(&self.camera.center)
            + rotated(offset, self.camera.bearing);
        let anchor_coordinate = old_projection.unproject(&anchor_point);

        let center = new_projection.project(&anchor_coordinate) - rotated(offset, bearing);
        Some(new_projection.unproject(&center))
    }
}

fn rotated(vector: Vector2d, bearing: f64) -> Vector2d {
    let (sin, cos) = bearing.to_radians().sin_cos();
    Vector2d::new(
        vector.x * cos - vector.y * sin,
        vector.x * sin + vector.y * cos,
    )
}

impl MapEngine for Map {
    fn camera_state(&self) -> CameraState {
        self.camera
    }

    fn set_camera(&mut self, options: &CameraOptions) {
        let mut camera = self.camera;
        if let Some(padding) = options.padding {
            camera.padding = padding;
        }
        if let Some(zoom) = options.zoom {
            camera.zoom = self.bounds.clamp_zoom(zoom);
        }
        if let Some(bearing) = options.bearing {
            camera.bearing = bearing;
        }
        if let Some(pitch) = options.pitch {
            camera.pitch = pitch;
        }

        match (options.center, options.anchor) {
            (Some(center), _) => camera.center = center,
            (None, Some(anchor)) => {
                if let Some(center) = self.anchored_center(anchor, camera.zoom, camera.bearing) {
                    camera.center = center;
                }
            }
            (None, None) => {}
        }

        self.camera = self.constrained(camera);
        self.redraw();
    }

    fn camera_bounds(&self) -> CameraBounds {
        self.bounds
    }

    fn size(&self) -> Size {
        self.size
    }

    fn anchor(&self) -> Point2d {
        self.anchor.unwrap_or_else(|| self.viewport_center())
    }

    fn begin_animation(&mut self) {
        self.animation_depth += 1;
    }

    fn end_animation(&mut self) {
        if self.animation_depth == 0 {
            log::warn!("end_animation called without a matching begin_animation");
            return;
        }

        self.animation_depth -= 1;
    }
}
