// File: crates/chart-geometry/src/hierarchy.rs
// Summary: Arena-backed index of weighted hierarchy items with parent/child/depth queries.
// Notes:
// - Items are stored in insertion order and a parent is always indexed before its
//   children, so every child handle is greater than its parent's. Weight and group
//   roll-ups rely on that ordering instead of recursion.
// - `None` stands for the synthetic root wherever a parent handle is expected.

use std::collections::HashMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::types::ItemId;

/// Flat input record. `parent` of `None` (or the index's root key) means top level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HierarchyRecord {
    pub id: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub group: Option<String>,
}

impl HierarchyRecord {
    pub fn new(id: impl Into<String>, parent: Option<&str>, weight: f64) -> Self {
        Self { id: id.into(), parent: parent.map(str::to_string), weight, group: None }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// Nested input node, the shape treemap datasets are usually written in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub label: String,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyItem {
    pub key: String,
    pub label: Option<String>,
    pub parent: Option<ItemId>,
    pub depth: u32,
    /// Weight as supplied.
    pub weight: f64,
    /// Group tag as supplied.
    pub group: Option<String>,
    children: Vec<ItemId>,
    total: f64,
    effective_group: Option<String>,
}

impl HierarchyItem {
    pub fn children(&self) -> &[ItemId] { &self.children }
    pub fn is_leaf(&self) -> bool { self.children.is_empty() }
    /// Own weight for leaves, sum of children for branches.
    pub fn total_weight(&self) -> f64 { self.total }
    /// Own group tag, or the nearest ancestor's.
    pub fn effective_group(&self) -> Option<&str> { self.effective_group.as_deref() }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyIndex {
    root_key: String,
    items: Vec<HierarchyItem>,
    by_key: HashMap<String, ItemId>,
    top_level: Vec<ItemId>,
}

/// Per-item visibility and weight under one group filter.
#[derive(Clone, Debug)]
pub(crate) struct GroupView {
    pub visible: Vec<bool>,
    pub weight: Vec<f64>,
}

impl HierarchyIndex {
    pub fn empty(root_key: impl Into<String>) -> Self {
        Self { root_key: root_key.into(), items: Vec::new(), by_key: HashMap::new(), top_level: Vec::new() }
    }

    /// Index `records` in a single forward pass. A record whose parent has not
    /// been indexed yet is rejected with `MalformedHierarchy`.
    pub fn build(root_key: impl Into<String>, records: impl IntoIterator<Item = HierarchyRecord>) -> Result<Self> {
        let mut index = Self::empty(root_key);
        for record in records {
            index.push(record, None)?;
        }
        index.roll_up();
        debug!(
            "[hierarchy] indexed {} items ({} top level, max depth {})",
            index.items.len(),
            index.top_level.len(),
            index.max_depth()
        );
        Ok(index)
    }

    /// Flatten nested nodes in pre-order, generating keys `"{parent}_{position}"`
    /// starting from the root key.
    pub fn from_tree(root_key: impl Into<String>, nodes: &[TreeNode]) -> Result<Self> {
        let mut index = Self::empty(root_key);
        index.push_nodes(nodes)?;
        index.roll_up();
        debug!("[hierarchy] indexed {} items from tree", index.items.len());
        Ok(index)
    }

    fn push_nodes(&mut self, nodes: &[TreeNode]) -> Result<()> {
        let mut stack: Vec<(&TreeNode, String, Option<String>)> =
            keyed_siblings(&self.root_key, nodes).into_iter().map(|(node, key)| (node, key, None)).collect();
        while let Some((node, key, parent)) = stack.pop() {
            let record = HierarchyRecord {
                id: key.clone(),
                parent,
                weight: node.weight.unwrap_or(0.0),
                group: node.group.clone(),
            };
            self.push(record, Some(node.label.clone()))?;
            for (child, child_key) in keyed_siblings(&key, &node.children) {
                stack.push((child, child_key, Some(key.clone())));
            }
        }
        Ok(())
    }

    fn push(&mut self, record: HierarchyRecord, label: Option<String>) -> Result<()> {
        if !record.weight.is_finite() || record.weight < 0.0 {
            warn!("[hierarchy] rejecting '{}': weight {}", record.id, record.weight);
            return Err(GeometryError::InvalidWeight { id: record.id, weight: record.weight });
        }
        if self.by_key.contains_key(&record.id) || record.id == self.root_key {
            return Err(GeometryError::DuplicateItem { id: record.id });
        }
        let parent = match record.parent.as_deref() {
            None => None,
            Some(p) if p == self.root_key => None,
            Some(p) => match self.by_key.get(p) {
                Some(&id) => Some(id),
                None => {
                    warn!("[hierarchy] rejecting '{}': parent '{}' not indexed", record.id, p);
                    return Err(GeometryError::MalformedHierarchy { id: record.id, parent: p.to_string() });
                }
            },
        };
        let id = ItemId(self.items.len() as u32);
        let depth = parent.map_or(1, |p| self.items[p.index()].depth + 1);
        let effective_group = record
            .group
            .clone()
            .or_else(|| parent.and_then(|p| self.items[p.index()].effective_group.clone()));
        match parent {
            Some(p) => self.items[p.index()].children.push(id),
            None => self.top_level.push(id),
        }
        self.by_key.insert(record.id.clone(), id);
        self.items.push(HierarchyItem {
            key: record.id,
            label,
            parent,
            depth,
            weight: record.weight,
            group: record.group,
            children: Vec::new(),
            total: record.weight,
            effective_group,
        });
        Ok(())
    }

    // Children always sit after their parent, so a reverse sweep sees every
    // child total before the parent needs it.
    fn roll_up(&mut self) {
        for i in (0..self.items.len()).rev() {
            if self.items[i].children.is_empty() {
                self.items[i].total = self.items[i].weight;
            } else {
                let sum: f64 = self.items[i].children.iter().map(|c| self.items[c.index()].total).sum();
                self.items[i].total = sum;
            }
        }
    }

    pub fn root_key(&self) -> &str { &self.root_key }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn get(&self, id: ItemId) -> Option<&HierarchyItem> { self.items.get(id.index()) }

    pub fn lookup(&self, key: &str) -> Option<ItemId> { self.by_key.get(key).copied() }

    pub fn key(&self, id: ItemId) -> Option<&str> { self.get(id).map(|item| item.key.as_str()) }

    pub fn items(&self) -> impl Iterator<Item = (ItemId, &HierarchyItem)> {
        self.items.iter().enumerate().map(|(i, item)| (ItemId(i as u32), item))
    }

    /// Ordered children of `parent`; `None` lists the top level.
    pub fn children_of(&self, parent: Option<ItemId>) -> &[ItemId] {
        match parent {
            None => &self.top_level,
            Some(id) => self.get(id).map(|item| item.children.as_slice()).unwrap_or(&[]),
        }
    }

    pub fn has_children(&self, id: ItemId) -> bool { !self.children_of(Some(id)).is_empty() }

    /// Depth of `id`: 1 for top-level items, 0 for unknown handles.
    pub fn depth_of(&self, id: ItemId) -> u32 { self.get(id).map_or(0, |item| item.depth) }

    pub fn parent_of(&self, id: ItemId) -> Option<ItemId> { self.get(id).and_then(|item| item.parent) }

    /// Items at `depth`, in insertion order.
    pub fn at_depth(&self, depth: u32) -> impl Iterator<Item = ItemId> + '_ {
        self.items().filter(move |(_, item)| item.depth == depth).map(|(id, _)| id)
    }

    pub fn max_depth(&self) -> u32 { self.items.iter().map(|item| item.depth).max().unwrap_or(0) }

    /// True when `id` lies strictly below `ancestor` (`None` = the synthetic root).
    pub fn is_descendant(&self, ancestor: Option<ItemId>, id: ItemId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        let Some(ancestor) = ancestor else { return true };
        let mut cur = self.parent_of(id);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.parent_of(p);
        }
        false
    }

    /// Ancestors of `id` from the top level down, excluding `id` itself.
    pub fn ancestors(&self, id: ItemId) -> Vec<ItemId> {
        let mut path = Vec::new();
        let mut cur = self.parent_of(id);
        while let Some(p) = cur {
            path.push(p);
            cur = self.parent_of(p);
        }
        path.reverse();
        path
    }

    /// Total weight of `id` as a share of its parent's (or of the whole total at top level).
    pub fn ratio(&self, id: ItemId) -> f64 {
        let Some(item) = self.get(id) else { return 0.0 };
        let parent_total = match item.parent {
            Some(p) => self.items[p.index()].total,
            None => self.top_level.iter().map(|t| self.items[t.index()].total).sum(),
        };
        if parent_total > 0.0 { item.total / parent_total } else { 0.0 }
    }

    /// Leaves below `root` (`None` = everything) that pass the group filter, in pre-order.
    pub fn leaves_under(&self, root: Option<ItemId>, group: Option<&str>) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut stack: Vec<ItemId> = self.children_of(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let item = &self.items[id.index()];
            if item.is_leaf() {
                if group.map_or(true, |g| item.effective_group() == Some(g)) {
                    out.push(id);
                }
            } else {
                stack.extend(item.children.iter().rev().copied());
            }
        }
        out
    }

    /// Visibility and weights under `group`. An item is visible when its
    /// effective group matches or any descendant's does; branch weights only
    /// count visible leaves.
    pub(crate) fn group_view(&self, group: Option<&str>) -> GroupView {
        let n = self.items.len();
        let Some(group) = group else {
            return GroupView { visible: vec![true; n], weight: self.items.iter().map(|i| i.total).collect() };
        };
        let mut visible = vec![false; n];
        let mut weight = vec![0.0; n];
        for i in (0..n).rev() {
            let item = &self.items[i];
            if item.children.is_empty() {
                visible[i] = item.effective_group() == Some(group);
                weight[i] = if visible[i] { item.weight } else { 0.0 };
            } else {
                visible[i] = item.effective_group() == Some(group)
                    || item.children.iter().any(|c| visible[c.index()]);
                weight[i] = item.children.iter().map(|c| weight[c.index()]).sum();
            }
        }
        GroupView { visible, weight }
    }
}

/// Siblings paired with their generated keys, last first so a stack pops them in order.
fn keyed_siblings<'a>(parent_key: &str, nodes: &'a [TreeNode]) -> Vec<(&'a TreeNode, String)> {
    nodes
        .iter()
        .enumerate()
        .rev()
        .map(|(position, node)| (node, format!("{parent_key}_{position}")))
        .collect()
}
