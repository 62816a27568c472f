// File: crates/chart-geometry/src/squarify.rs
// Summary: Squarified treemap layout: one hierarchy level per call, walked level by level per parent.
// Notes:
// - Items are consumed in input order. They are NOT sorted by weight first, which
//   differs from the textbook algorithm and changes the resulting aspect ratios.
// - Zero weights are allowed; such items get a zero-area bound at their slot.

use std::collections::HashMap;

use log::trace;

use crate::geometry::{clamp, LayoutBound};
use crate::hierarchy::{GroupView, HierarchyIndex};
use crate::types::ItemId;
use crate::view::ViewSelection;

/// Item id -> bound, covering every laid-out item of one view.
pub type BoundMap = HashMap<ItemId, LayoutBound>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedItem {
    pub id: ItemId,
    pub weight: f64,
}

impl WeightedItem {
    pub const fn new(id: ItemId, weight: f64) -> Self {
        Self { id, weight }
    }
}

/// Running statistics of the strip being accumulated.
#[derive(Clone, Copy, Debug)]
struct Strip {
    sum: f64,
    min: f64, // smallest positive area
    max: f64,
}

impl Strip {
    fn new(area: f64) -> Self {
        Self::empty().with(area)
    }

    fn empty() -> Self {
        Self { sum: 0.0, min: f64::INFINITY, max: 0.0 }
    }

    fn with(self, area: f64) -> Self {
        if area > 0.0 {
            Self { sum: self.sum + area, min: self.min.min(area), max: self.max.max(area) }
        } else {
            self
        }
    }

    /// Worst width:height ratio among the strip's rectangles when it is laid
    /// against a side of length `side`. Zero-area members do not count.
    fn worst(&self, side: f64) -> f64 {
        if self.sum <= 0.0 || side <= 0.0 {
            return f64::INFINITY;
        }
        let side_sq = side * side;
        let sum_sq = self.sum * self.sum;
        (side_sq * self.max / sum_sq).max(sum_sq / (side_sq * self.min))
    }
}

/// Lay out one level of items inside `container`, in input order.
pub fn squarify(container: LayoutBound, items: &[WeightedItem]) -> Vec<(ItemId, LayoutBound)> {
    let total: f64 = items.iter().map(|it| sanitize(it.weight)).sum();
    if items.is_empty() {
        return Vec::new();
    }
    if container.is_degenerate() || total <= 0.0 || !total.is_finite() {
        return items.iter().map(|it| (it.id, container.collapsed())).collect();
    }
    if items.len() == 1 {
        return vec![(items[0].id, container)];
    }

    let scale = container.area() / total;
    let areas: Vec<f64> = items.iter().map(|it| sanitize(it.weight) * scale).collect();

    let mut out = Vec::with_capacity(items.len());
    let mut free = container;
    let mut start = 0usize;
    while start < areas.len() {
        // strip runs along the long side; its members are sliced across the short one
        let side = free.width.min(free.height);
        let mut strip = Strip::new(areas[start]);
        let mut worst = strip.worst(side);
        let mut end = start + 1;
        while end < areas.len() {
            let next = strip.with(areas[end]);
            let next_worst = next.worst(side);
            if next_worst > worst {
                break;
            }
            strip = next;
            worst = next_worst;
            end += 1;
        }
        trace!("[squarify] strip {}..{} area {:.3} worst {:.3}", start, end, strip.sum, worst);
        let last = end == areas.len();
        place_strip(&items[start..end], &areas[start..end], strip.sum, &mut free, last, &mut out);
        start = end;
    }
    out
}

/// Convenience wrapper returning the level as a map.
pub fn layout(container: LayoutBound, items: &[WeightedItem]) -> BoundMap {
    squarify(container, items).into_iter().collect()
}

fn sanitize(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 { weight } else { 0.0 }
}

fn place_strip(
    items: &[WeightedItem],
    areas: &[f64],
    sum: f64,
    free: &mut LayoutBound,
    last: bool,
    out: &mut Vec<(ItemId, LayoutBound)>,
) {
    // Column along the left edge when the free rect is wide, row along the top otherwise.
    let column = free.width >= free.height;
    let (long, short) = if column { (free.width, free.height) } else { (free.height, free.width) };
    let thickness = if last || short <= 0.0 { long } else { clamp(sum / short, 0.0, long) };
    // The last positive-area member absorbs float drift so the strip is filled exactly.
    let last_positive = areas.iter().rposition(|&a| a > 0.0);

    let mut offset = 0.0;
    for (i, (item, &area)) in items.iter().zip(areas).enumerate() {
        let length = match last_positive {
            Some(lp) if i == lp => (short - offset).max(0.0),
            Some(lp) if i > lp => 0.0,
            _ if thickness > 0.0 => clamp(area / thickness, 0.0, (short - offset).max(0.0)),
            _ => 0.0,
        };
        let bound = if column {
            LayoutBound::from_ltwh(free.left, free.top + offset, thickness, length)
        } else {
            LayoutBound::from_ltwh(free.left + offset, free.top, length, thickness)
        };
        out.push((item.id, bound));
        offset += length;
    }

    if column {
        free.left += thickness;
        free.width = (free.width - thickness).max(0.0);
    } else {
        free.top += thickness;
        free.height = (free.height - thickness).max(0.0);
    }
}

/// Lay out every visible item below `selection.root` inside `container`,
/// then each laid-out item that has children inside its own bound.
/// Levels are walked in pre-order with an explicit stack, so hierarchy depth
/// is not limited by the call stack.
pub fn layout_tree(index: &HierarchyIndex, selection: &ViewSelection, container: LayoutBound) -> BoundMap {
    let view = index.group_view(selection.group.as_deref());
    let mut map = BoundMap::with_capacity(index.len());
    let mut pending: Vec<(Option<ItemId>, LayoutBound)> = vec![(selection.root, container)];
    while let Some((parent, bound)) = pending.pop() {
        let placed = layout_level(index, &view, parent, bound);
        for &(id, child) in placed.iter().rev() {
            if index.has_children(id) {
                pending.push((Some(id), child));
            }
        }
        map.extend(placed);
    }
    map
}

fn layout_level(
    index: &HierarchyIndex,
    view: &GroupView,
    parent: Option<ItemId>,
    container: LayoutBound,
) -> Vec<(ItemId, LayoutBound)> {
    let items: Vec<WeightedItem> = index
        .children_of(parent)
        .iter()
        .filter(|id| view.visible[id.index()])
        .map(|&id| WeightedItem::new(id, view.weight[id.index()]))
        .collect();
    squarify(container, &items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(weights: &[f64]) -> Vec<WeightedItem> {
        weights.iter().enumerate().map(|(i, &w)| WeightedItem::new(ItemId(i as u32), w)).collect()
    }

    #[test]
    fn strip_worst_ratio_of_square_is_one() {
        let strip = Strip::new(2500.0).with(2500.0);
        assert!((strip.worst(100.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_area_members_do_not_change_worst_ratio() {
        let base = Strip::new(400.0);
        assert_eq!(base.worst(20.0), base.with(0.0).worst(20.0));
    }

    #[test]
    fn empty_strip_is_infinitely_bad() {
        assert!(Strip::empty().worst(10.0).is_infinite());
        assert!(Strip::new(0.0).worst(10.0).is_infinite());
    }

    #[test]
    fn preserves_area_for_simple_case() {
        let container = LayoutBound::from_ltwh(0.0, 0.0, 50.0, 20.0);
        let rects = squarify(container, &items(&[400.0, 300.0, 200.0, 100.0]));
        let total: f64 = rects.iter().map(|(_, b)| b.area()).sum();
        assert!((total - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn keeps_input_order() {
        let container = LayoutBound::from_ltwh(0.0, 0.0, 60.0, 40.0);
        let rects = squarify(container, &items(&[1.0, 5.0, 2.0]));
        let ids: Vec<u32> = rects.iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
