use mapcam_types::cartesian::{EdgeInsets, Point2d, Size};
use mapcam_types::geo::{normalize_angle, GeoPoint2d, WebMercator};

use crate::camera::{CameraBounds, CameraOptions, CameraState};
use crate::error::CameraError;
use crate::interpolation::{lerp, EdgeInsetsInterpolator, Interpolator};

/// ρ: the relative amount of zooming that takes place along the flight path. A high value maximizes
/// zooming for an exaggerated animation, while a low value minimizes zooming for something closer to a
/// plain ease.
///
/// 1.42 is the average value selected by participants in the user study in van Wijk (2003). A value of
/// 6^¼ would be equivalent to the root mean squared average velocity. A value of 1 produces a circular
/// motion.
pub const DEFAULT_RHO: f64 = 1.42;

/// Default average velocity of a flight, in ρ-screenfuls per second.
pub const DEFAULT_VELOCITY: f64 = 1.2;

const CLOSE_DISTANCE: f64 = 0.000_001;

/// Interpolator that implements an "optimal path" flight animation, as detailed in:
///
/// Van Wijk, Jarke J.; Nuij, Wim A. A. "Smooth and efficient zooming and panning."
/// INFOVIS '03. pp. 15–22. <https://www.win.tue.nl/~vanwijk/zoompan.pdf#page=5>
///
/// The camera zooms out at the start of a long flight and zooms back in when approaching the
/// destination. Center and zoom follow the optimal path; bearing, pitch and padding are interpolated
/// linearly.
///
/// Where applicable, field documentation begins with the associated variable or function in the paper.
#[derive(Debug, Clone)]
pub struct FlyToInterpolator {
    source_zoom: f64,
    dest_zoom: f64,
    projection: WebMercator,

    source_point: Point2d,
    dest_point: Point2d,
    dest_center: GeoPoint2d,

    source_bearing: f64,
    dest_bearing: f64,
    source_pitch: f64,
    dest_pitch: f64,
    source_padding: EdgeInsets,
    dest_padding: EdgeInsets,

    rho: f64,
    /// w₀: initial visible span, measured in pixels at the initial scale. Known henceforth as a screenful.
    w0: f64,
    /// u₁: length of the flight path as projected onto the ground plane, in pixels at the initial scale.
    u1: f64,
    /// r₀: zoom-out factor during ascent.
    r0: f64,
    /// When u₀ = u₁ the optimal path doesn't require both ascent and descent.
    is_close: bool,
    /// Direction of the zoom for the close path: `-1` when zooming in.
    close_direction: f64,
    /// S: total length of the flight path, measured in ρ-screenfuls.
    path_length: f64,
}

impl FlyToInterpolator {
    /// Creates a new interpolator.
    ///
    /// * `source` - the start camera. Its values are used as is.
    /// * `dest` - the end camera. Missing values default to the source values; zoom and pitch are clamped to
    ///   `bounds`.
    /// * `size` - size of the map viewport in points.
    ///
    /// Returns an error if the flight path cannot be calculated, e.g. for a zero-sized viewport.
    pub fn new(
        source: &CameraState,
        dest: &CameraOptions,
        bounds: &CameraBounds,
        size: Size,
    ) -> Result<Self, CameraError> {
        let source_zoom = source.zoom;
        let projection = WebMercator::with_zoom(source_zoom)
            .map_err(|err| CameraError::DegenerateFlight(err.to_string()))?;

        let dest_padding = dest.padding.unwrap_or(source.padding);
        let dest_center = dest.center.unwrap_or(source.center);
        let dest_zoom = bounds.clamp_zoom(dest.zoom.unwrap_or(source_zoom));
        let dest_pitch = bounds.clamp_pitch(dest.pitch.unwrap_or(source.pitch));
        let dest_bearing = dest.bearing.unwrap_or(source.bearing);

        let source_point = projection.project(&source.center.unwrapped_for_shortest_path(&dest_center));
        let dest_point = projection.project(&dest_center);

        // Minimize rotation by taking the shorter path around the circle.
        let dest_bearing = normalize_angle(dest_bearing.to_radians(), source.bearing.to_radians())
            .to_degrees();
        let source_bearing =
            normalize_angle(source.bearing.to_radians(), dest_bearing.to_radians()).to_degrees();

        let w0 = (size.width() - dest_padding.horizontal())
            .max(size.height() - dest_padding.vertical());

        // w₁: final visible span, measured in pixels with respect to the initial scale.
        let w1 = w0 / 2f64.powf(dest_zoom - source_zoom);
        let u1 = (dest_point - source_point).norm();

        let rho = DEFAULT_RHO;
        let rho2 = rho * rho;

        // rᵢ: returns the zoom-out factor at one end of the animation, i ∈ {0, 1}.
        let r = |i: usize| {
            let (sign, w) = if i == 0 { (1.0, w0) } else { (-1.0, w1) };
            // bᵢ
            let b = (w1 * w1 - w0 * w0 + sign * rho2 * rho2 * u1 * u1) / (2.0 * w * rho2 * u1);
            ((b * b + 1.0).sqrt() - b).ln()
        };

        let (r0, r1) = if u1 != 0.0 {
            (r(0), r(1))
        } else {
            (f64::INFINITY, f64::INFINITY)
        };

        let is_close = u1.abs() < CLOSE_DISTANCE || !r0.is_finite() || !r1.is_finite();
        let close_direction = if w1 < w0 { -1.0 } else { 1.0 };

        let path_length = if is_close {
            (w1 / w0).ln().abs() / rho
        } else {
            (r1 - r0) / rho
        };

        if !path_length.is_finite() {
            return Err(CameraError::DegenerateFlight(format!(
                "flight path length is {path_length} for viewport {}x{}",
                size.width(),
                size.height()
            )));
        }

        log::debug!(
            "Fly-to path: u1 = {u1}, w0 = {w0}, w1 = {w1}, S = {path_length}, close = {is_close}"
        );

        Ok(Self {
            source_zoom,
            dest_zoom,
            projection,
            source_point,
            dest_point,
            dest_center,
            source_bearing,
            dest_bearing,
            source_pitch: source.pitch,
            dest_pitch,
            source_padding: source.padding,
            dest_padding,
            rho,
            w0,
            u1,
            r0,
            is_close,
            close_direction,
            path_length,
        })
    }

    /// w(s): visible span on the ground at path distance `s`, relative to the initial span. Assumes an
    /// angular field of view of 2 arctan ½ ≈ 53°.
    fn w(&self, s: f64) -> f64 {
        if self.is_close {
            (self.close_direction * self.rho * s).exp()
        } else {
            self.r0.cosh() / (self.r0 + self.rho * s).cosh()
        }
    }

    /// u(s): distance along the flight path as projected onto the ground plane, as a fraction of u₁.
    fn u(&self, s: f64) -> f64 {
        if self.is_close {
            0.0
        } else {
            self.w0 * (self.r0.cosh() * (self.r0 + self.rho * s).tanh() - self.r0.sinh())
                / (self.rho * self.rho)
                / self.u1
        }
    }

    /// Total length of the flight path, measured in ρ-screenfuls.
    pub fn path_length(&self) -> f64 {
        self.path_length
    }

    /// Center coordinate at the given fraction of the flight.
    pub fn coordinate(&self, fraction: f64) -> GeoPoint2d {
        if fraction >= 1.0 {
            return self.dest_center;
        }

        let us = self.u(fraction * self.path_length);
        let point = Point2d::new(
            lerp(self.source_point.x, self.dest_point.x, us),
            lerp(self.source_point.y, self.dest_point.y, us),
        );

        self.projection.unproject(&point).wrapped()
    }

    /// Zoom level at the given fraction of the flight.
    pub fn zoom(&self, fraction: f64) -> f64 {
        if fraction >= 1.0 {
            return self.dest_zoom;
        }

        let s = fraction * self.path_length;
        self.source_zoom + (1.0 / self.w(s)).log2()
    }

    /// Bearing at the given fraction of the flight. Interpolated linearly along the shorter arc, so the
    /// returned value can differ from the requested destination bearing by a multiple of 360.
    pub fn bearing(&self, fraction: f64) -> f64 {
        lerp(self.source_bearing, self.dest_bearing, fraction)
    }

    /// Pitch at the given fraction of the flight.
    pub fn pitch(&self, fraction: f64) -> f64 {
        if fraction >= 1.0 {
            return self.dest_pitch;
        }

        lerp(self.source_pitch, self.dest_pitch, fraction)
    }

    /// Padding at the given fraction of the flight.
    pub fn padding(&self, fraction: f64) -> EdgeInsets {
        EdgeInsetsInterpolator.interpolate(&self.source_padding, &self.dest_padding, fraction)
    }

    /// Camera options with every field set to the value at the given fraction of the flight.
    pub fn camera_options(&self, fraction: f64) -> CameraOptions {
        CameraOptions {
            center: Some(self.coordinate(fraction)),
            padding: Some(self.padding(fraction)),
            anchor: None,
            zoom: Some(self.zoom(fraction)),
            bearing: Some(self.bearing(fraction)),
            pitch: Some(self.pitch(fraction)),
        }
    }

    /// Destination zoom after clamping to the camera bounds.
    pub fn dest_zoom(&self) -> f64 {
        self.dest_zoom
    }

    /// Destination pitch after clamping to the camera bounds.
    pub fn dest_pitch(&self) -> f64 {
        self.dest_pitch
    }

    /// Suitable duration of the flight in seconds.
    ///
    /// `velocity` is the average velocity in ρ-screenfuls per second. If `None`, the default velocity is
    /// used.
    pub fn duration(&self, velocity: Option<f64>) -> f64 {
        match velocity {
            Some(velocity) => self.path_length * self.rho / velocity,
            None => self.path_length / DEFAULT_VELOCITY,
        }
    }
}
