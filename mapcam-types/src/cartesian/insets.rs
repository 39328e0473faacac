#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Insets from the edges of the map view, in points.
///
/// Camera padding shifts the visual center of the map: with a non-zero padding the camera center is
/// shown in the middle of the area that is left after the insets are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeInsets {
    /// Inset from the top edge.
    pub top: f64,
    /// Inset from the left edge.
    pub left: f64,
    /// Inset from the bottom edge.
    pub bottom: f64,
    /// Inset from the right edge.
    pub right: f64,
}

impl EdgeInsets {
    /// Insets with all values set to zero.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates new insets.
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Insets with the same value at every edge.
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Sum of the left and right insets.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Sum of the top and bottom insets.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

impl approx::AbsDiffEq for EdgeInsets {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.top.abs_diff_eq(&other.top, epsilon)
            && self.left.abs_diff_eq(&other.left, epsilon)
            && self.bottom.abs_diff_eq(&other.bottom, epsilon)
            && self.right.abs_diff_eq(&other.right, epsilon)
    }
}
