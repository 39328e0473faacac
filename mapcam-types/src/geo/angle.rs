use std::f64::consts::PI;

/// Wraps `value` into the `[min, max)` range. A value exactly equal to `max` is returned unchanged.
pub fn wrap(value: f64, min: f64, max: f64) -> f64 {
    if value == max {
        return value;
    }

    let d = max - min;
    ((value - min) % d + d) % d + min
}

/// Brings `angle` (in radians) to the equivalent angle that is not further than `PI` from `anchor`.
///
/// Used to find the shortest rotation between two angles: after normalization, linear interpolation
/// between `anchor` and the returned angle never makes more than half a turn. Returns `0.0` if any of
/// the arguments is `NaN`.
pub fn normalize_angle(angle: f64, anchor: f64) -> f64 {
    if angle.is_nan() || anchor.is_nan() {
        return 0.0;
    }

    let mut angle = wrap(angle, -PI, PI);
    if angle == -PI {
        angle = PI;
    }

    let diff = (angle - anchor).abs();
    if (angle - 2.0 * PI - anchor).abs() < diff {
        angle -= 2.0 * PI;
    }
    if (angle + 2.0 * PI - anchor).abs() < diff {
        angle += 2.0 * PI;
    }

    angle
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn wrap_values() {
        assert_eq!(wrap(10.0, 0.0, 360.0), 10.0);
        assert_eq!(wrap(370.0, 0.0, 360.0), 10.0);
        assert_eq!(wrap(-10.0, 0.0, 360.0), 350.0);
        assert_eq!(wrap(360.0, 0.0, 360.0), 360.0);
    }

    #[test]
    fn normalize_takes_shortest_path() {
        let anchor = 350f64.to_radians();
        let normalized = normalize_angle(10f64.to_radians(), anchor);
        assert_abs_diff_eq!(normalized.to_degrees(), 370.0, epsilon = 1e-9);

        let anchor = 10f64.to_radians();
        let normalized = normalize_angle(350f64.to_radians(), anchor);
        assert_abs_diff_eq!(normalized.to_degrees(), -10.0, epsilon = 1e-9);
    }

    #[test]
    fn normalize_keeps_close_angles() {
        let normalized = normalize_angle(90f64.to_radians(), 0.0);
        assert_abs_diff_eq!(normalized.to_degrees(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn normalize_nan() {
        assert_eq!(normalize_angle(f64::NAN, 1.0), 0.0);
        assert_eq!(normalize_angle(1.0, f64::NAN), 0.0);
    }
}
