// File: crates/demo/src/main.rs
// Summary: Demo loads series from CSV and a treemap hierarchy from JSON, then prints value edges and bounds.

use anyhow::{Context, Result};
use chart_geometry::{Chart, ChartOptions, Series, SeriesGroup, SeriesKind, SeriesValues, TreeNode, ZoomTarget};
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    // Usage: demo <series.csv> [hierarchy.json] [options.json]
    let mut args = std::env::args().skip(1);
    let series_path = args.next().unwrap_or_else(|| "series.csv".to_string());
    let tree_path = args.next();
    let options_path = args.next();

    let options = match &options_path {
        Some(p) => {
            let text = std::fs::read_to_string(p).with_context(|| format!("reading options '{p}'"))?;
            ChartOptions::from_json_str(&text).with_context(|| format!("parsing options '{p}'"))?
        }
        None => ChartOptions::default(),
    };
    let mut chart = Chart::with_options(options)?;

    let groups = load_series_csv(Path::new(&series_path))
        .with_context(|| format!("failed to load CSV '{series_path}'"))?;
    println!("Loaded {} series groups", groups.len());
    chart.replace_dataset(groups);

    for (name, edge) in chart.data_ranges() {
        println!("  {name:<16} [{:.4}, {:.4}]", edge.min, edge.max);
    }

    let Some(tree_path) = tree_path else { return Ok(()) };
    let text = std::fs::read_to_string(&tree_path).with_context(|| format!("reading '{tree_path}'"))?;
    let nodes: Vec<TreeNode> = serde_json::from_str(&text).with_context(|| format!("parsing '{tree_path}'"))?;
    chart.set_tree(&nodes)?;
    let size = chart.container();
    println!("Hierarchy: {} items, container {}x{}", chart.hierarchy().len(), size.width, size.height);
    print_layout(&mut chart);

    // Drill into the first top-level item that has children, then back out.
    let first_branch = chart
        .hierarchy()
        .children_of(None)
        .iter()
        .copied()
        .find(|&id| chart.hierarchy().has_children(id))
        .and_then(|id| chart.hierarchy().key(id).map(str::to_string));
    if let Some(key) = first_branch {
        if chart.zoom(ZoomTarget::item(&key)) {
            println!("Zoomed into {:?}", chart.breadcrumb());
            print_layout(&mut chart);
            chart.zoom_out();
        }
    }
    let stats = chart.cache_stats();
    log::info!("layout cache: {} hits, {} misses", stats.hits, stats.misses);
    Ok(())
}

fn print_layout(chart: &mut Chart) {
    let map = chart.layout();
    let index = chart.hierarchy();
    let mut rows: Vec<_> = map.iter().collect();
    rows.sort_by_key(|(id, _)| **id);
    for (id, b) in rows {
        let Some(item) = index.get(*id) else { continue };
        let indent = "  ".repeat(item.depth as usize);
        let label = item.label.as_deref().unwrap_or(&item.key);
        println!(
            "{indent}{label:<20} x={:>8.2} y={:>8.2} w={:>8.2} h={:>8.2}",
            b.left, b.top, b.width, b.height
        );
    }
}

/// Load long-format series CSV: one row per point with `group`, `kind`, `series`
/// and either `value` or `low`/`high` columns.
fn load_series_csv(path: &Path) -> Result<Vec<SeriesGroup>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr
        .headers()?
        .iter()
        .map(|h| h.to_lowercase())
        .collect::<Vec<_>>();
    log::debug!("headers: {:?}", headers);

    let idx = |names: &[&str]| -> Option<usize> { headers.iter().position(|h| names.contains(&h.as_str())) };
    let i_group = idx(&["group", "chart"]).context("missing 'group' column")?;
    let i_series = idx(&["series", "name"]).context("missing 'series' column")?;
    let i_kind = idx(&["kind", "type"]);
    let i_value = idx(&["value", "y"]);
    let i_low = idx(&["low", "start"]);
    let i_high = idx(&["high", "end"]);

    // (group, kind, [(series, values)]) in first-seen order
    let mut raw: Vec<(String, SeriesKind, Vec<(String, SeriesValues)>)> = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let parse = |i: Option<usize>| -> Option<f64> { i.and_then(|ix| rec.get(ix)).and_then(|s| s.parse::<f64>().ok()) };
        let group = rec.get(i_group).unwrap_or_default().to_string();
        let series = rec.get(i_series).unwrap_or_default().to_string();
        let kind = i_kind.and_then(|ix| rec.get(ix)).map(parse_kind).unwrap_or(SeriesKind::Line);

        let point = match (parse(i_low), parse(i_high)) {
            (Some(lo), Some(hi)) => SeriesValues::Pair(vec![(lo, hi)]),
            _ => SeriesValues::Scalar(vec![parse(i_value).unwrap_or(f64::NAN)]),
        };

        let slot = match raw.iter().position(|(g, _, _)| *g == group) {
            Some(i) => i,
            None => {
                raw.push((group.clone(), kind, Vec::new()));
                raw.len() - 1
            }
        };
        let entries = &mut raw[slot].2;
        match entries.iter_mut().find(|(s, _)| *s == series) {
            Some((_, values)) => append(values, point),
            None => entries.push((series, point)),
        }
    }

    raw.into_iter()
        .map(|(name, kind, entries)| {
            let series = entries.into_iter().map(|(s, v)| Series::new(s, v)).collect();
            SeriesGroup::with_series(name.clone(), kind, series).with_context(|| format!("group '{name}'"))
        })
        .collect()
}

fn append(values: &mut SeriesValues, point: SeriesValues) {
    match (values, point) {
        (SeriesValues::Scalar(a), SeriesValues::Scalar(b)) => a.extend(b),
        (SeriesValues::Pair(a), SeriesValues::Pair(b)) => a.extend(b),
        (_, other) => log::warn!("dropping point with mismatched shape {:?}", other.shape()),
    }
}

fn parse_kind(s: &str) -> SeriesKind {
    match s.to_ascii_lowercase().as_str() {
        "area" => SeriesKind::Area,
        "scatter" => SeriesKind::Scatter,
        "bar" => SeriesKind::Bar,
        "column" => SeriesKind::Column,
        _ => SeriesKind::Line,
    }
}
