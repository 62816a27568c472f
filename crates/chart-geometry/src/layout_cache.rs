// File: crates/chart-geometry/src/layout_cache.rs
// Summary: Memoized bound map for one view selection, with explicit invalidation.

use std::rc::Rc;

use log::debug;

use crate::geometry::LayoutBound;
use crate::hierarchy::HierarchyIndex;
use crate::squarify::{layout_tree, BoundMap};
use crate::types::Size;
use crate::view::ViewSelection;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

/// Holds the bound map of the most recently requested selection.
/// Callers get a shared read-only map; a hit hands back the same `Rc`.
#[derive(Debug, Default)]
pub struct LayoutCache {
    entry: Option<(ViewSelection, Rc<BoundMap>)>,
    stats: CacheStats,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound map for `selection`, computed with the squarify engine on a miss.
    /// The cache does not track hierarchy or container changes itself;
    /// owners call `invalidate` when either changes.
    pub fn get(&mut self, selection: &ViewSelection, index: &HierarchyIndex, container: Size) -> Rc<BoundMap> {
        if let Some((key, map)) = &self.entry {
            if key == selection {
                self.stats.hits += 1;
                return Rc::clone(map);
            }
        }
        self.stats.misses += 1;
        let map = Rc::new(layout_tree(index, selection, LayoutBound::from_size(container)));
        debug!(
            "[layout-cache] miss for root {:?} depth {} group {:?}: {} bounds",
            selection.root,
            selection.start_depth,
            selection.group,
            map.len()
        );
        self.entry = Some((selection.clone(), Rc::clone(&map)));
        map
    }

    /// Cached map for `selection` without computing anything.
    pub fn peek(&self, selection: &ViewSelection) -> Option<Rc<BoundMap>> {
        match &self.entry {
            Some((key, map)) if key == selection => Some(Rc::clone(map)),
            _ => None,
        }
    }

    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("[layout-cache] invalidated");
        }
        self.stats.invalidations += 1;
    }

    pub fn is_warm(&self) -> bool { self.entry.is_some() }

    pub fn stats(&self) -> CacheStats { self.stats }
}
