// File: crates/chart-geometry/src/chart.rs
// Summary: Chart struct owning series, hierarchy, view and derived geometry, wired through the recompute graph.

use std::collections::BTreeMap;
use std::rc::Rc;

use log::debug;

use crate::config::{validate_size, ChartOptions};
use crate::error::{GeometryError, Result};
use crate::hierarchy::{HierarchyIndex, HierarchyRecord, TreeNode};
use crate::layout_cache::{CacheStats, LayoutCache};
use crate::reactive::{DispatchReport, GraphBuilder, RecomputeGraph, Trigger};
use crate::scale::{resolve_group, ValueEdge};
use crate::series::{Series, SeriesGroup, SeriesValues};
use crate::squarify::BoundMap;
use crate::types::Size;
use crate::view::{self, ViewSelection, ZoomTarget};

/// Every state slice of a chart. Derived slices (`data_ranges`, stack
/// aggregates inside `groups`, `layout`) are only written by graph observers.
pub struct ChartState {
    options: ChartOptions,
    groups: Vec<SeriesGroup>,
    data_ranges: BTreeMap<String, ValueEdge>,
    hierarchy: HierarchyIndex,
    view: ViewSelection,
    container: Size,
    layout: LayoutCache,
}

impl ChartState {
    fn new(options: ChartOptions) -> Self {
        let hierarchy = HierarchyIndex::empty(options.root_key.clone());
        let container = options.container();
        Self {
            options,
            groups: Vec::new(),
            data_ranges: BTreeMap::new(),
            hierarchy,
            view: ViewSelection::root_view(),
            container,
            layout: LayoutCache::new(),
        }
    }

    fn group_mut(&mut self, name: &str) -> Result<&mut SeriesGroup> {
        self.groups
            .iter_mut()
            .find(|g| g.name == name)
            .ok_or_else(|| GeometryError::UnknownGroup { name: name.to_string() })
    }
}

// ---- observers ----------------------------------------------------------------

fn restack(state: &mut ChartState) -> Vec<Trigger> {
    let field = state.options.keyed_value_field.clone();
    let mut any = false;
    for group in &mut state.groups {
        group.restack(&field);
        any |= group.is_stacked();
    }
    if any { vec![Trigger::StacksChanged] } else { Vec::new() }
}

fn set_data_range(state: &mut ChartState) -> Vec<Trigger> {
    let field = state.options.keyed_value_field.as_str();
    state.data_ranges = state.groups.iter().map(|g| (g.name.clone(), resolve_group(g, field))).collect();
    Vec::new()
}

fn reset_view(state: &mut ChartState) -> Vec<Trigger> {
    let root = ViewSelection::root_view();
    if state.view == root {
        return Vec::new();
    }
    state.view = root;
    vec![Trigger::ViewChanged]
}

fn invalidate_layout(state: &mut ChartState) -> Vec<Trigger> {
    state.layout.invalidate();
    Vec::new()
}

fn assemble_graph() -> RecomputeGraph<ChartState> {
    use Trigger::*;
    GraphBuilder::new()
        .observe("restack", &[SeriesChanged], restack)
        .observe("set_data_range", &[SeriesChanged, StacksChanged], set_data_range)
        .observe("reset_view", &[HierarchyChanged], reset_view)
        .observe("invalidate_layout", &[HierarchyChanged, ViewChanged, ContainerResized], invalidate_layout)
        .build()
}

// ---- chart ----------------------------------------------------------------------

pub struct Chart {
    state: ChartState,
    graph: RecomputeGraph<ChartState>,
}

impl Default for Chart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart {
    pub fn new() -> Self {
        Self { state: ChartState::new(ChartOptions::default()), graph: assemble_graph() }
    }

    pub fn with_options(options: ChartOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { state: ChartState::new(options), graph: assemble_graph() })
    }

    pub fn options(&self) -> &ChartOptions { &self.state.options }

    fn emit(&mut self, trigger: Trigger) -> DispatchReport<Trigger> {
        self.graph.dispatch(&mut self.state, trigger)
    }

    // ---- series actions ----

    /// Add a group, replacing any group with the same name.
    pub fn add_group(&mut self, group: SeriesGroup) -> DispatchReport<Trigger> {
        match self.state.groups.iter().position(|g| g.name == group.name) {
            Some(i) => self.state.groups[i] = group,
            None => self.state.groups.push(group),
        }
        self.emit(Trigger::SeriesChanged)
    }

    pub fn add_series(&mut self, group: &str, series: Series) -> Result<DispatchReport<Trigger>> {
        self.state.group_mut(group)?.add_series(series)?;
        Ok(self.emit(Trigger::SeriesChanged))
    }

    pub fn append_data(&mut self, group: &str, series: &str, values: SeriesValues) -> Result<DispatchReport<Trigger>> {
        self.state.group_mut(group)?.append(series, values)?;
        Ok(self.emit(Trigger::SeriesChanged))
    }

    pub fn replace_dataset(&mut self, groups: Vec<SeriesGroup>) -> DispatchReport<Trigger> {
        self.state.groups = groups;
        self.emit(Trigger::SeriesChanged)
    }

    /// Toggle a series. Setting the flag it already has raises nothing.
    pub fn set_series_disabled(&mut self, group: &str, series: &str, disabled: bool) -> Result<DispatchReport<Trigger>> {
        let changed = self.state.group_mut(group)?.set_disabled(series, disabled)?;
        Ok(if changed { self.emit(Trigger::SeriesChanged) } else { DispatchReport::default() })
    }

    pub fn groups(&self) -> &[SeriesGroup] { &self.state.groups }

    pub fn group(&self, name: &str) -> Option<&SeriesGroup> {
        self.state.groups.iter().find(|g| g.name == name)
    }

    /// Recompute every value edge from current series state.
    pub fn set_data_range(&mut self) {
        set_data_range(&mut self.state);
    }

    pub fn data_range(&self, group: &str) -> Option<ValueEdge> { self.state.data_ranges.get(group).copied() }

    pub fn data_ranges(&self) -> &BTreeMap<String, ValueEdge> { &self.state.data_ranges }

    // ---- hierarchy actions ----

    /// Replace the hierarchy. On error the previous hierarchy stays in place.
    pub fn set_hierarchy(&mut self, records: impl IntoIterator<Item = HierarchyRecord>) -> Result<DispatchReport<Trigger>> {
        let index = HierarchyIndex::build(self.state.options.root_key.clone(), records)?;
        Ok(self.install_hierarchy(index))
    }

    pub fn set_tree(&mut self, nodes: &[TreeNode]) -> Result<DispatchReport<Trigger>> {
        let index = HierarchyIndex::from_tree(self.state.options.root_key.clone(), nodes)?;
        Ok(self.install_hierarchy(index))
    }

    fn install_hierarchy(&mut self, index: HierarchyIndex) -> DispatchReport<Trigger> {
        debug!("[chart] hierarchy replaced ({} items)", index.len());
        self.state.hierarchy = index;
        self.emit(Trigger::HierarchyChanged)
    }

    pub fn hierarchy(&self) -> &HierarchyIndex { &self.state.hierarchy }

    // ---- view actions ----

    /// Zoom to a subtree or back to the true root. Returns false when nothing
    /// changed: unknown id, an id without children, or the current view.
    pub fn zoom(&mut self, target: ZoomTarget) -> bool {
        match view::plan_zoom(&self.state.hierarchy, &self.state.view, &target) {
            Some(next) => self.apply_view(next),
            None => {
                debug!("[chart] zoom to {:?} ignored", target);
                false
            }
        }
    }

    /// Zoom one level up. False at the true root.
    pub fn zoom_out(&mut self) -> bool {
        match view::plan_zoom_out(&self.state.hierarchy, &self.state.view) {
            Some(next) => self.apply_view(next),
            None => false,
        }
    }

    pub fn set_group_filter(&mut self, group: Option<String>) -> bool {
        if self.state.view.group == group {
            return false;
        }
        let next = self.state.view.clone().with_group(group);
        self.apply_view(next)
    }

    fn apply_view(&mut self, next: ViewSelection) -> bool {
        self.state.view = next;
        self.emit(Trigger::ViewChanged);
        true
    }

    pub fn view(&self) -> &ViewSelection { &self.state.view }

    pub fn breadcrumb(&self) -> Vec<String> { view::breadcrumb(&self.state.hierarchy, &self.state.view) }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<DispatchReport<Trigger>> {
        validate_size(width, height)?;
        let size = Size::new(width, height);
        if size == self.state.container {
            return Ok(DispatchReport::default());
        }
        self.state.container = size;
        Ok(self.emit(Trigger::ContainerResized))
    }

    pub fn container(&self) -> Size { self.state.container }

    // ---- layout access ----

    /// Bound map of the current view.
    pub fn layout(&mut self) -> Rc<BoundMap> {
        let selection = self.state.view.clone();
        self.layout_for(&selection)
    }

    /// Bound map of an explicit selection, served from the cache when it matches.
    pub fn layout_for(&mut self, selection: &ViewSelection) -> Rc<BoundMap> {
        let ChartState { layout, hierarchy, container, .. } = &mut self.state;
        layout.get(selection, hierarchy, *container)
    }

    pub fn cache_stats(&self) -> CacheStats { self.state.layout.stats() }

    pub fn graph(&self) -> &RecomputeGraph<ChartState> { &self.graph }
}
