// File: crates/chart-geometry/src/lib.rs
// Summary: Library entry point; exports value-domain resolution, hierarchy indexing and treemap layout.

pub mod chart;
pub mod config;
pub mod error;
pub mod geometry;
pub mod hierarchy;
pub mod layout_cache;
pub mod reactive;
pub mod scale;
pub mod series;
pub mod squarify;
pub mod types;
pub mod view;

pub use chart::Chart;
pub use config::ChartOptions;
pub use error::{GeometryError, Result};
pub use geometry::LayoutBound;
pub use hierarchy::{HierarchyIndex, HierarchyRecord, TreeNode};
pub use layout_cache::{CacheStats, LayoutCache};
pub use reactive::{DispatchReport, GraphBuilder, RecomputeGraph, Trigger};
pub use scale::{resolve, ValueEdge};
pub use series::{Series, SeriesGroup, SeriesKind, SeriesValues, StackAggregate, ValueShape};
pub use squarify::{layout_tree, squarify, BoundMap, WeightedItem};
pub use types::{ItemId, Size};
pub use view::{ViewSelection, ZoomTarget};
