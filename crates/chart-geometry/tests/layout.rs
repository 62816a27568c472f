// File: crates/chart-geometry/tests/layout.rs
// Purpose: Verify squarified bounds: tiling, containment, ordering, zero weights and group filters.

use chart_geometry::squarify::layout;
use chart_geometry::{
    layout_tree, squarify, BoundMap, HierarchyIndex, HierarchyRecord, ItemId, LayoutBound, ViewSelection,
    WeightedItem,
};

const EPS: f64 = 1e-6;

fn flat_index(keys: &[&str]) -> HierarchyIndex {
    HierarchyIndex::build("root", keys.iter().map(|k| HierarchyRecord::new(*k, None, 1.0))).expect("index")
}

fn weighted(index: &HierarchyIndex, pairs: &[(&str, f64)]) -> Vec<WeightedItem> {
    pairs.iter().map(|&(k, w)| WeightedItem::new(index.lookup(k).expect(k), w)).collect()
}

fn approx(a: &LayoutBound, b: &LayoutBound) -> bool {
    (a.left - b.left).abs() < EPS
        && (a.top - b.top).abs() < EPS
        && (a.width - b.width).abs() < EPS
        && (a.height - b.height).abs() < EPS
}

fn overlap(a: &LayoutBound, b: &LayoutBound) -> f64 {
    let w = a.right().min(b.right()) - a.left.max(b.left);
    let h = a.bottom().min(b.bottom()) - a.top.max(b.top);
    w.max(0.0) * h.max(0.0)
}

fn countries() -> HierarchyIndex {
    HierarchyIndex::build(
        "root",
        vec![
            HierarchyRecord::new("asia", None, 0.0),
            HierarchyRecord::new("china", Some("asia"), 14.0).with_group("big"),
            HierarchyRecord::new("japan", Some("asia"), 6.0),
            HierarchyRecord::new("korea", Some("asia"), 3.0),
            HierarchyRecord::new("europe", None, 0.0),
            HierarchyRecord::new("france", Some("europe"), 7.0).with_group("big"),
            HierarchyRecord::new("paris", Some("france"), 3.0),
            HierarchyRecord::new("lyon", Some("france"), 1.0),
            HierarchyRecord::new("spain", Some("europe"), 5.0),
            HierarchyRecord::new("oceania", None, 2.0),
        ],
    )
    .expect("index")
}

#[test]
fn four_equal_items_tile_into_quarters() {
    let index = flat_index(&["a", "b", "c", "d"]);
    let items = weighted(&index, &[("a", 1.0), ("b", 1.0), ("c", 1.0), ("d", 1.0)]);
    let map = layout(LayoutBound::from_ltwh(0.0, 0.0, 100.0, 100.0), &items);

    let expect = [
        ("a", LayoutBound::from_ltwh(0.0, 0.0, 50.0, 50.0)),
        ("b", LayoutBound::from_ltwh(0.0, 50.0, 50.0, 50.0)),
        ("c", LayoutBound::from_ltwh(50.0, 0.0, 50.0, 50.0)),
        ("d", LayoutBound::from_ltwh(50.0, 50.0, 50.0, 50.0)),
    ];
    for (key, bound) in expect {
        let got = map[&index.lookup(key).expect(key)];
        assert!(approx(&got, &bound), "{key}: {got:?}");
    }
}

#[test]
fn first_item_starts_at_the_container_origin() {
    let index = flat_index(&["a", "b"]);
    let items = weighted(&index, &[("a", 1.0), ("b", 3.0)]);
    let rects = squarify(LayoutBound::from_ltwh(0.0, 0.0, 100.0, 100.0), &items);
    assert!(approx(&rects[0].1, &LayoutBound::from_ltwh(0.0, 0.0, 100.0, 25.0)));
    assert!(approx(&rects[1].1, &LayoutBound::from_ltwh(0.0, 25.0, 100.0, 75.0)));

    let offset = squarify(LayoutBound::from_ltwh(10.0, 20.0, 40.0, 40.0), &items);
    assert_eq!((offset[0].1.left, offset[0].1.top), (10.0, 20.0));
}

#[test]
fn zero_weight_item_gets_zero_area_at_its_slot() {
    let index = flat_index(&["a", "z", "b"]);
    let items = weighted(&index, &[("a", 2.0), ("z", 0.0), ("b", 2.0)]);
    let rects = squarify(LayoutBound::from_ltwh(0.0, 0.0, 100.0, 50.0), &items);

    assert_eq!(rects.len(), 3);
    assert!(approx(&rects[0].1, &LayoutBound::from_ltwh(0.0, 0.0, 50.0, 50.0)));
    assert_eq!(rects[1].1.area(), 0.0);
    assert!(approx(&rects[1].1, &LayoutBound::from_ltwh(0.0, 50.0, 50.0, 0.0)));
    assert!(approx(&rects[2].1, &LayoutBound::from_ltwh(50.0, 0.0, 50.0, 50.0)));
}

#[test]
fn single_item_fills_its_container() {
    let index = flat_index(&["only"]);
    let container = LayoutBound::from_ltwh(5.0, 5.0, 30.0, 70.0);
    let rects = squarify(container, &weighted(&index, &[("only", 4.0)]));
    assert_eq!(rects, vec![(index.lookup("only").expect("only"), container)]);
}

#[test]
fn degenerate_inputs_collapse_every_bound() {
    let index = flat_index(&["a", "b"]);
    let items = weighted(&index, &[("a", 1.0), ("b", 2.0)]);
    for container in [LayoutBound::from_ltwh(3.0, 4.0, 0.0, 50.0), LayoutBound::from_ltwh(3.0, 4.0, 50.0, 0.0)] {
        for (_, b) in squarify(container, &items) {
            assert_eq!(b, LayoutBound::from_ltwh(3.0, 4.0, 0.0, 0.0));
        }
    }

    let zeros = weighted(&index, &[("a", 0.0), ("b", 0.0)]);
    for (_, b) in squarify(LayoutBound::from_ltwh(0.0, 0.0, 10.0, 10.0), &zeros) {
        assert_eq!(b.area(), 0.0);
    }
    assert!(squarify(LayoutBound::from_ltwh(0.0, 0.0, 10.0, 10.0), &[]).is_empty());
}

#[test]
fn uneven_weights_fill_the_container_without_overlap() {
    let keys = ["a", "b", "c", "d", "e", "f", "g"];
    let index = flat_index(&keys);
    let weights = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
    let pairs: Vec<(&str, f64)> = keys.iter().copied().zip(weights).collect();
    let container = LayoutBound::from_ltwh(0.0, 0.0, 600.0, 400.0);
    let rects = squarify(container, &weighted(&index, &pairs));

    let total: f64 = weights.iter().sum();
    let mut area = 0.0;
    for (i, (id, b)) in rects.iter().enumerate() {
        assert_eq!(*id, index.lookup(keys[i]).expect("key"), "order kept");
        assert!(b.width >= 0.0 && b.height >= 0.0);
        assert!(container.contains(b, EPS), "{b:?}");
        let expected = container.area() * weights[i] / total;
        assert!((b.area() - expected).abs() < 1e-3, "{}: {} vs {}", keys[i], b.area(), expected);
        area += b.area();
    }
    assert!((area - container.area()).abs() < 1e-3);
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            assert!(overlap(&rects[i].1, &rects[j].1) < 1e-6, "{} overlaps {}", keys[i], keys[j]);
        }
    }
}

fn assert_nested(index: &HierarchyIndex, map: &BoundMap, container: LayoutBound) {
    for (&id, bound) in map {
        let outer = match index.parent_of(id) {
            Some(parent) if map.contains_key(&parent) => map[&parent],
            _ => container,
        };
        assert!(outer.contains(bound, EPS), "{:?} escapes {:?}", index.key(id), outer);
    }
}

#[test]
fn tree_layout_nests_children_inside_parents() {
    let index = countries();
    let container = LayoutBound::from_ltwh(0.0, 0.0, 400.0, 300.0);
    let map = layout_tree(&index, &ViewSelection::root_view(), container);

    assert_eq!(map.len(), index.len());
    assert_nested(&index, &map, container);

    let area = |key: &str| map[&index.lookup(key).expect(key)].area();
    let top: f64 = ["asia", "europe", "oceania"].iter().map(|k| area(k)).sum();
    assert!((top - container.area()).abs() < 1e-6);
    // branch weights come from children: asia 23, europe 9, oceania 2
    assert!((area("asia") - container.area() * 23.0 / 34.0).abs() < 1e-6);
    assert!((area("paris") + area("lyon") - area("france")).abs() < 1e-6);
}

#[test]
fn subtree_view_lays_out_descendants_only() {
    let index = countries();
    let europe = index.lookup("europe").expect("europe");
    let container = LayoutBound::from_ltwh(0.0, 0.0, 200.0, 100.0);
    let map = layout_tree(&index, &ViewSelection::subtree(&index, europe), container);

    let mut keys: Vec<&str> = map.keys().filter_map(|&id| index.key(id)).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["france", "lyon", "paris", "spain"]);
    assert!(!map.contains_key(&europe), "view root is not laid out");
    let france = map[&index.lookup("france").expect("france")];
    let spain = map[&index.lookup("spain").expect("spain")];
    assert!((france.area() + spain.area() - container.area()).abs() < 1e-6);
}

#[test]
fn group_filter_hides_other_groups_and_reweights_branches() {
    let index = countries();
    let container = LayoutBound::from_ltwh(0.0, 0.0, 100.0, 100.0);
    let view = ViewSelection::root_view().with_group(Some("big".to_string()));
    let map = layout_tree(&index, &view, container);

    let ids: Vec<ItemId> = ["asia", "china", "europe", "france", "paris", "lyon"]
        .iter()
        .map(|k| index.lookup(k).expect(k))
        .collect();
    assert_eq!(map.len(), ids.len());
    for id in &ids {
        assert!(map.contains_key(id));
    }
    for hidden in ["japan", "korea", "spain", "oceania"] {
        assert!(!map.contains_key(&index.lookup(hidden).expect(hidden)), "{hidden}");
    }
    // asia shows china (14) only, europe shows france (3 + 1)
    let asia = map[&ids[0]];
    assert!((asia.area() - 10_000.0 * 14.0 / 18.0).abs() < 1e-6);
    assert!(approx(&map[&ids[1]], &asia), "lone child fills its parent");
    assert_nested(&index, &map, container);
}

#[test]
fn unknown_group_lays_out_nothing() {
    let index = countries();
    let view = ViewSelection::root_view().with_group(Some("none".to_string()));
    let map = layout_tree(&index, &view, LayoutBound::from_ltwh(0.0, 0.0, 100.0, 100.0));
    assert!(map.is_empty());
}

#[test]
fn uneven_weights_break_strips_where_ratios_worsen() {
    let keys = ["a", "b", "c", "d", "e", "f", "g"];
    let index = flat_index(&keys);
    let pairs: Vec<(&str, f64)> = keys.iter().copied().zip([6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0]).collect();
    let rects = squarify(LayoutBound::from_ltwh(0.0, 0.0, 600.0, 400.0), &weighted(&index, &pairs));

    // a+b form a column on the wide container; c+d a row across the now tall
    // remainder; e, f and g each close their own strip along the bottom band.
    let third = 700.0 / 3.0;
    let band = 500.0 / 3.0;
    let expect = [
        LayoutBound::from_ltwh(0.0, 0.0, 300.0, 200.0),
        LayoutBound::from_ltwh(0.0, 200.0, 300.0, 200.0),
        LayoutBound::from_ltwh(300.0, 0.0, 1200.0 / 7.0, third),
        LayoutBound::from_ltwh(300.0 + 1200.0 / 7.0, 0.0, 900.0 / 7.0, third),
        LayoutBound::from_ltwh(300.0, third, 120.0, band),
        LayoutBound::from_ltwh(420.0, third, 120.0, band),
        LayoutBound::from_ltwh(540.0, third, 60.0, band),
    ];
    assert_eq!(rects.len(), expect.len());
    for (i, ((_, got), want)) in rects.iter().zip(expect).enumerate() {
        assert!(approx(got, &want), "{}: {got:?} != {want:?}", keys[i]);
    }
}

#[test]
fn deep_chain_lays_out_every_level() {
    const DEPTH: usize = 10_000;
    let records = (0..DEPTH).map(|i| {
        let parent = if i == 0 { None } else { Some(format!("n{}", i - 1)) };
        HierarchyRecord::new(format!("n{i}"), parent.as_deref(), 1.0)
    });
    let index = HierarchyIndex::build("root", records).expect("chain");
    assert_eq!(index.max_depth(), DEPTH as u32);

    let container = LayoutBound::from_ltwh(0.0, 0.0, 100.0, 100.0);
    let map = layout_tree(&index, &ViewSelection::root_view(), container);
    assert_eq!(map.len(), DEPTH);
    let deepest = index.lookup(&format!("n{}", DEPTH - 1)).expect("leaf");
    assert_eq!(map[&deepest], container, "single children fill their parent");
}
