// File: crates/chart-geometry/src/view.rs
// Summary: First-class view selection: which subtree and group filter is rendered, plus zoom planning.

use crate::hierarchy::HierarchyIndex;
use crate::types::ItemId;

/// Current zoom state; also the layout cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ViewSelection {
    /// Subtree root; `None` is the synthetic root.
    pub root: Option<ItemId>,
    /// Depth of the first laid-out level.
    pub start_depth: u32,
    pub group: Option<String>,
}

impl Default for ViewSelection {
    fn default() -> Self {
        Self::root_view()
    }
}

impl ViewSelection {
    pub const fn root_view() -> Self {
        Self { root: None, start_depth: 1, group: None }
    }

    pub fn subtree(index: &HierarchyIndex, root: ItemId) -> Self {
        Self { root: Some(root), start_depth: index.depth_of(root) + 1, group: None }
    }

    pub fn with_group(mut self, group: Option<String>) -> Self {
        self.group = group;
        self
    }

    pub fn is_true_root(&self) -> bool { self.root.is_none() }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ZoomTarget {
    Root,
    Item(String),
}

impl ZoomTarget {
    pub fn item(key: impl Into<String>) -> Self {
        ZoomTarget::Item(key.into())
    }
}

/// Selection a zoom request lands on, or `None` when the request is a no-op:
/// unknown id, a leaf, or the selection already showing that root.
/// The group filter carries over.
pub fn plan_zoom(index: &HierarchyIndex, current: &ViewSelection, target: &ZoomTarget) -> Option<ViewSelection> {
    let next = match target {
        ZoomTarget::Root => ViewSelection::root_view(),
        ZoomTarget::Item(key) => {
            let id = index.lookup(key)?;
            if !index.has_children(id) {
                return None;
            }
            ViewSelection::subtree(index, id)
        }
    }
    .with_group(current.group.clone());
    (next != *current).then_some(next)
}

/// Selection one level above the current root, or `None` at the true root.
pub fn plan_zoom_out(index: &HierarchyIndex, current: &ViewSelection) -> Option<ViewSelection> {
    let root = current.root?;
    let next = match index.parent_of(root) {
        Some(parent) => ViewSelection::subtree(index, parent),
        None => ViewSelection::root_view(),
    };
    Some(next.with_group(current.group.clone()))
}

/// Keys from the top level down to the current root (empty at the true root).
pub fn breadcrumb(index: &HierarchyIndex, current: &ViewSelection) -> Vec<String> {
    let Some(root) = current.root else { return Vec::new() };
    index
        .ancestors(root)
        .into_iter()
        .chain(std::iter::once(root))
        .filter_map(|id| index.key(id).map(str::to_string))
        .collect()
}
