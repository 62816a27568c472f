// File: crates/chart-geometry/src/types.rs
// Summary: Shared types and constants (container sizes, item handles).

/// Default container width in pixels.
pub const WIDTH: f64 = 1024.0;
/// Default container height in pixels.
pub const HEIGHT: f64 = 640.0;

/// Default key of the synthetic hierarchy root.
pub const ROOT_KEY: &str = "__root__";

/// Stable handle of a hierarchy item inside a `HierarchyIndex` arena.
/// Handles are only meaningful for the index that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub(crate) u32);

impl ItemId {
    /// Position of the item in its arena.
    pub const fn index(self) -> usize { self.0 as usize }
}

/// Container dimensions in pixels.
/// Contract: both fields are finite and non-negative once validated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
    pub fn area(&self) -> f64 { self.width.max(0.0) * self.height.max(0.0) }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(WIDTH, HEIGHT)
    }
}
