// File: crates/chart-geometry/src/geometry.rs
// Summary: Rectangle helpers for layout math.

use crate::types::Size;

/// Axis-aligned rectangle assigned to one hierarchy item.
/// Contract: `width` and `height` are non-negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutBound {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutBound {
    pub const fn from_ltwh(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
    /// Bound covering a whole container anchored at the origin.
    pub const fn from_size(size: Size) -> Self {
        Self::from_ltwh(0.0, 0.0, size.width, size.height)
    }
    pub fn right(&self) -> f64 { self.left + self.width }
    pub fn bottom(&self) -> f64 { self.top + self.height }
    pub fn area(&self) -> f64 { self.width * self.height }
    pub fn is_degenerate(&self) -> bool { self.width <= 0.0 || self.height <= 0.0 }

    /// Zero-size bound pinned at this bound's origin.
    pub const fn collapsed(&self) -> Self {
        Self::from_ltwh(self.left, self.top, 0.0, 0.0)
    }

    /// True when `other` lies entirely inside `self`, allowing `eps` of float slack.
    pub fn contains(&self, other: &LayoutBound, eps: f64) -> bool {
        other.left >= self.left - eps
            && other.top >= self.top - eps
            && other.right() <= self.right() + eps
            && other.bottom() <= self.bottom() + eps
    }
}

#[inline]
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo { lo } else if v > hi { hi } else { v }
}
