// File: crates/chart-examples/src/bin/treemap.rs
// Summary: Minimal example that lays out a two-level treemap, zooms in and back out.

use chart_geometry::{Chart, HierarchyRecord, ZoomTarget};

fn main() -> chart_geometry::Result<()> {
    env_logger::init();

    let mut chart = Chart::new();
    chart.resize(400.0, 300.0)?;
    chart.set_hierarchy(vec![
        HierarchyRecord::new("asia", None, 0.0),
        HierarchyRecord::new("europe", None, 0.0),
        HierarchyRecord::new("korea", Some("asia"), 52.0),
        HierarchyRecord::new("japan", Some("asia"), 125.0),
        HierarchyRecord::new("france", Some("europe"), 67.0),
        HierarchyRecord::new("germany", Some("europe"), 83.0),
        HierarchyRecord::new("italy", Some("europe"), 59.0),
    ])?;

    print_bounds(&mut chart, "root");
    if chart.zoom(ZoomTarget::item("europe")) {
        print_bounds(&mut chart, "europe");
    }
    // leaves cannot be zoomed into
    assert!(!chart.zoom(ZoomTarget::item("italy")));
    chart.zoom(ZoomTarget::Root);

    let stats = chart.cache_stats();
    println!("cache: {} hits, {} misses", stats.hits, stats.misses);
    Ok(())
}

fn print_bounds(chart: &mut Chart, title: &str) {
    let map = chart.layout();
    println!("{title}:");
    for (id, item) in chart.hierarchy().items() {
        if let Some(b) = map.get(&id) {
            println!("  {:<8} ({:>6.1}, {:>6.1}) {:>6.1} x {:>6.1}", item.key, b.left, b.top, b.width, b.height);
        }
    }
}
