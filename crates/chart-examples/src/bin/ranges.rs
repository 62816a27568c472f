// File: crates/chart-examples/src/bin/ranges.rs
// Summary: Minimal example that resolves value edges for a few series groups and toggles a series.

use chart_geometry::{Chart, Series, SeriesGroup, SeriesKind, SeriesValues};

fn main() -> chart_geometry::Result<()> {
    env_logger::init();

    let mut chart = Chart::new();
    chart.add_group(SeriesGroup::with_series(
        "line",
        SeriesKind::Line,
        vec![Series::scalars("a", [10.0, 100.0, 50.0]), Series::scalars("b", [30.0, 30.0, 30.0])],
    )?);
    chart.add_group(
        SeriesGroup::with_series(
            "column",
            SeriesKind::Column,
            vec![Series::scalars("up", [3.0, 4.0, 2.0]), Series::scalars("down", [-1.0, 2.0, -5.0])],
        )?
        .stacked(),
    );
    chart.add_group(SeriesGroup::with_series(
        "range",
        SeriesKind::Bar,
        vec![Series::pairs("spread", [(-3.0, 8.0), (1.0, 12.0)])],
    )?);

    print_ranges(&chart, "initial");

    chart.set_series_disabled("line", "a", true)?;
    print_ranges(&chart, "line/a disabled");

    chart.append_data("line", "b", SeriesValues::Scalar(vec![45.0]))?;
    print_ranges(&chart, "line/b appended 45");
    Ok(())
}

fn print_ranges(chart: &Chart, title: &str) {
    println!("{title}:");
    for (name, edge) in chart.data_ranges() {
        println!("  {name:<8} [{}, {}]", edge.min, edge.max);
    }
}
