//! Timing functions that map the elapsed share of an animation to its eased progress.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::CameraError;

const SOLVE_EPSILON: f64 = 1e-6;
const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 64;

/// Cubic bezier timing curve going from `(0, 0)` to `(1, 1)` through two control points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingCurve {
    p1x: f64,
    p1y: f64,
    p2x: f64,
    p2y: f64,
}

impl TimingCurve {
    /// Constant speed.
    pub const LINEAR: Self = Self::new_unchecked(0.0, 0.0, 1.0, 1.0);
    /// Slow start.
    pub const EASE_IN: Self = Self::new_unchecked(0.42, 0.0, 1.0, 1.0);
    /// Slow end.
    pub const EASE_OUT: Self = Self::new_unchecked(0.0, 0.0, 0.58, 1.0);
    /// Slow start and slow end.
    pub const EASE_IN_OUT: Self = Self::new_unchecked(0.42, 0.0, 0.58, 1.0);

    /// Creates a curve with the control points `(p1x, p1y)` and `(p2x, p2y)`.
    ///
    /// Both x-coordinates must lie in `[0, 1]`, otherwise the curve is not a function of time and an error
    /// is returned. Y-coordinates are unrestricted, so the curve may overshoot.
    pub fn new(p1x: f64, p1y: f64, p2x: f64, p2y: f64) -> Result<Self, CameraError> {
        let x_valid = |x: f64| (0.0..=1.0).contains(&x);
        if !x_valid(p1x) || !x_valid(p2x) || !p1y.is_finite() || !p2y.is_finite() {
            return Err(CameraError::InvalidTimingCurve(p1x, p1y, p2x, p2y));
        }

        Ok(Self::new_unchecked(p1x, p1y, p2x, p2y))
    }

    const fn new_unchecked(p1x: f64, p1y: f64, p2x: f64, p2y: f64) -> Self {
        Self { p1x, p1y, p2x, p2y }
    }

    /// First control point.
    pub fn p1(&self) -> (f64, f64) {
        (self.p1x, self.p1y)
    }

    /// Second control point.
    pub fn p2(&self) -> (f64, f64) {
        (self.p2x, self.p2y)
    }

    /// Eased progress for the elapsed `ratio`. Exact at `0.0` and `1.0`.
    pub fn solve(&self, ratio: f64) -> f64 {
        if ratio <= 0.0 {
            return 0.0;
        }
        if ratio >= 1.0 {
            return 1.0;
        }

        UnitBezier::new(self).solve(ratio, SOLVE_EPSILON)
    }
}

impl Default for TimingCurve {
    fn default() -> Self {
        Self::EASE_IN_OUT
    }
}

/// Polynomial form of a [`TimingCurve`], with the solver for `y(x)`.
#[derive(Debug, Clone, Copy)]
pub struct UnitBezier {
    ax: f64,
    bx: f64,
    cx: f64,
    ay: f64,
    by: f64,
    cy: f64,
}

impl UnitBezier {
    /// Calculates the polynomial coefficients of the curve.
    pub fn new(curve: &TimingCurve) -> Self {
        let cx = 3.0 * curve.p1x;
        let bx = 3.0 * (curve.p2x - curve.p1x) - cx;
        let ax = 1.0 - cx - bx;

        let cy = 3.0 * curve.p1y;
        let by = 3.0 * (curve.p2y - curve.p1y) - cy;
        let ay = 1.0 - cy - by;

        Self {
            ax,
            bx,
            cx,
            ay,
            by,
            cy,
        }
    }

    fn sample_x(&self, t: f64) -> f64 {
        ((self.ax * t + self.bx) * t + self.cx) * t
    }

    fn sample_y(&self, t: f64) -> f64 {
        ((self.ay * t + self.by) * t + self.cy) * t
    }

    fn sample_derivative_x(&self, t: f64) -> f64 {
        (3.0 * self.ax * t + 2.0 * self.bx) * t + self.cx
    }

    /// Finds the curve parameter `t` for which `x(t) == x`.
    fn solve_curve_x(&self, x: f64, epsilon: f64) -> f64 {
        // Newton's method converges fast for most curves.
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let error = self.sample_x(t) - x;
            if error.abs() < epsilon {
                return t;
            }

            let derivative = self.sample_derivative_x(t);
            if derivative.abs() < 1e-6 {
                break;
            }

            t -= error / derivative;
        }

        // Fall back to bisection for reliability.
        let mut low = 0.0;
        let mut high = 1.0;
        let mut t = x.clamp(low, high);

        for _ in 0..BISECTION_ITERATIONS {
            let current = self.sample_x(t);
            if (current - x).abs() < epsilon {
                break;
            }

            if x > current {
                low = t;
            } else {
                high = t;
            }
            t = (high - low) * 0.5 + low;
        }

        t
    }

    /// Returns `y` for the given `x` with the precision `epsilon`.
    pub fn solve(&self, x: f64, epsilon: f64) -> f64 {
        self.sample_y(self.solve_curve_x(x, epsilon))
    }
}

const CRITICAL_FREQUENCY: f64 = 6.64;
const SETTLE_EXPONENT: f64 = 4.6;

/// Damped spring timing.
///
/// The spring is modelled as a damped harmonic oscillator released from `0` towards `1`. Its stiffness
/// is chosen so the oscillation fades to about 1% of the distance by the end of the animation, so the
/// duration of the animation stays under the control of the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpringTiming {
    damping_ratio: f64,
}

impl SpringTiming {
    /// Creates a spring with the given damping ratio. `1.0` is critically damped (no overshoot); lower
    /// values oscillate around the target. Values over `1.0` behave as `1.0`.
    pub fn new(damping_ratio: f64) -> Result<Self, CameraError> {
        if !damping_ratio.is_finite() || damping_ratio <= 0.0 {
            return Err(CameraError::InvalidDampingRatio(damping_ratio));
        }

        Ok(Self { damping_ratio })
    }

    /// Damping ratio of the spring.
    pub fn damping_ratio(&self) -> f64 {
        self.damping_ratio
    }

    /// Eased progress for the elapsed `ratio`. Exact at `0.0` and `1.0`.
    pub fn solve(&self, ratio: f64) -> f64 {
        if ratio <= 0.0 {
            return 0.0;
        }
        if ratio >= 1.0 {
            return 1.0;
        }

        let zeta = self.damping_ratio.min(1.0);
        if zeta >= 1.0 {
            let omega = CRITICAL_FREQUENCY;
            return 1.0 - (1.0 + omega * ratio) * (-omega * ratio).exp();
        }

        let omega0 = SETTLE_EXPONENT / zeta;
        let omega_d = omega0 * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * omega0 * ratio).exp();

        1.0 - envelope
            * ((omega_d * ratio).cos() + zeta * omega0 / omega_d * (omega_d * ratio).sin())
    }
}

/// Strategy used by self-timed animators to ease their progress.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimingParameters {
    /// Cubic bezier curve.
    Curve(TimingCurve),
    /// Damped spring.
    Spring(SpringTiming),
}

impl TimingParameters {
    /// Maps the elapsed `ratio` in `[0, 1]` to eased progress. Returns exactly `0.0` and `1.0` at the ends.
    pub fn progress(&self, ratio: f64) -> f64 {
        match self {
            Self::Curve(curve) => curve.solve(ratio),
            Self::Spring(spring) => spring.solve(ratio),
        }
    }
}

impl Default for TimingParameters {
    fn default() -> Self {
        Self::Curve(TimingCurve::default())
    }
}

impl From<TimingCurve> for TimingParameters {
    fn from(value: TimingCurve) -> Self {
        Self::Curve(value)
    }
}

impl From<SpringTiming> for TimingParameters {
    fn from(value: SpringTiming) -> Self {
        Self::Spring(value)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn linear_curve_is_identity() {
        for i in 0..=20 {
            let x = i as f64 / 20.0;
            assert_abs_diff_eq!(TimingCurve::LINEAR.solve(x), x, epsilon = 1e-6);
        }
    }

    #[test]
    fn named_curves_have_exact_ends() {
        for curve in [
            TimingCurve::LINEAR,
            TimingCurve::EASE_IN,
            TimingCurve::EASE_OUT,
            TimingCurve::EASE_IN_OUT,
        ] {
            assert_eq!(curve.solve(0.0), 0.0);
            assert_eq!(curve.solve(1.0), 1.0);
        }
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let curve = TimingCurve::EASE_IN_OUT;
        assert_abs_diff_eq!(curve.solve(0.5), 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(
            curve.solve(0.2) + curve.solve(0.8),
            1.0,
            epsilon = 1e-5
        );
        assert!(curve.solve(0.2) < 0.2);
    }

    #[test]
    fn ease_in_starts_slow() {
        assert!(TimingCurve::EASE_IN.solve(0.3) < 0.3);
        assert!(TimingCurve::EASE_OUT.solve(0.3) > 0.3);
    }

    #[test]
    fn curves_are_monotonic() {
        let curve = TimingCurve::new(0.1, 0.7, 0.9, 0.2).expect("valid curve");
        let mut prev = 0.0;
        for i in 1..=100 {
            let y = curve.solve(i as f64 / 100.0);
            assert!(y >= prev - 1e-6);
            prev = y;
        }
    }

    #[test]
    fn invalid_curve() {
        assert_matches!(
            TimingCurve::new(-0.1, 0.0, 1.0, 1.0),
            Err(CameraError::InvalidTimingCurve(..))
        );
        assert_matches!(
            TimingCurve::new(0.0, 0.0, 1.5, 1.0),
            Err(CameraError::InvalidTimingCurve(..))
        );
        assert_matches!(
            TimingCurve::new(0.0, f64::NAN, 1.0, 1.0),
            Err(CameraError::InvalidTimingCurve(..))
        );
        assert_matches!(TimingCurve::new(0.3, -2.0, 0.7, 3.0), Ok(_));
    }

    #[test]
    fn invalid_spring() {
        assert_matches!(SpringTiming::new(0.0), Err(CameraError::InvalidDampingRatio(_)));
        assert_matches!(SpringTiming::new(-1.0), Err(CameraError::InvalidDampingRatio(_)));
        assert_matches!(
            SpringTiming::new(f64::INFINITY),
            Err(CameraError::InvalidDampingRatio(_))
        );
    }

    #[test]
    fn critically_damped_spring_does_not_overshoot() {
        let spring = SpringTiming::new(1.0).expect("valid spring");
        let mut prev = 0.0;
        for i in 1..100 {
            let y = spring.solve(i as f64 / 100.0);
            assert!(y <= 1.0);
            assert!(y >= prev);
            prev = y;
        }
        assert!(prev > 0.98);
    }

    #[test]
    fn underdamped_spring_overshoots_and_settles() {
        let spring = SpringTiming::new(0.3).expect("valid spring");
        let max = (1..100)
            .map(|i| spring.solve(i as f64 / 100.0))
            .fold(0.0, f64::max);
        assert!(max > 1.0);
        assert_abs_diff_eq!(spring.solve(0.99), 1.0, epsilon = 0.02);
    }

    #[test]
    fn parameters_have_exact_ends() {
        let spring = TimingParameters::from(SpringTiming::new(0.5).expect("valid spring"));
        let curve = TimingParameters::from(TimingCurve::EASE_OUT);
        for parameters in [spring, curve] {
            assert_eq!(parameters.progress(0.0), 0.0);
            assert_eq!(parameters.progress(1.0), 1.0);
            assert_eq!(parameters.progress(-3.0), 0.0);
            assert_eq!(parameters.progress(1.5), 1.0);
        }
    }
}
