// File: crates/chart-geometry/src/scale.rs
// Summary: Value-domain resolution: series values -> {min, max} edge per series group.

use std::collections::HashSet;

use log::trace;

use crate::series::{SeriesGroup, SeriesKind, SeriesValues, StackAggregate};

/// Number on a value axis, as read from series data.
pub type Value = f64;

/// Numeric range a value axis must cover.
/// Contract: `min <= max`, and the two are never both NaN.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueEdge {
    pub min: Value,
    pub max: Value,
}

impl ValueEdge {
    /// Edge reported when every value was filtered out.
    pub const ZERO: ValueEdge = ValueEdge { min: 0.0, max: 0.0 };

    pub const fn new(min: Value, max: Value) -> Self {
        Self { min, max }
    }
    pub fn span(&self) -> Value { self.max - self.min }
    pub fn contains(&self, v: Value) -> bool { v >= self.min && v <= self.max }
}

/// Resolve the value edge of one group's series values.
///
/// `values` holds the values of enabled series only; `field` names the keyed
/// field read from keyed points. When `kind` is a box kind and `stack` is
/// present, the stack's pre-summed values replace the raw ones. Scalar box
/// values also cover the `0` baseline, unless nothing was extracted at all.
pub fn resolve<'a>(
    group: &str,
    values: impl IntoIterator<Item = &'a SeriesValues>,
    kind: SeriesKind,
    field: &str,
    stack: Option<&StackAggregate>,
) -> ValueEdge {
    let mut flat = Vec::new();
    let mut tuple_flattened = false;
    for v in values {
        tuple_flattened |= extract(v, kind, field, &mut flat);
    }

    if kind.is_box() {
        if let Some(stack) = stack {
            flat.clear();
            flat.extend(stack.values.iter().copied().filter(|v| v.is_finite()));
        } else if !tuple_flattened && !flat.is_empty() {
            // baseline only when something is plotted; no values stays the zero edge
            flat.push(0.0);
        }
    }

    let edge = limit_safely(&flat);
    trace!("[resolve] group '{}': {} values -> [{}, {}]", group, flat.len(), edge.min, edge.max);
    edge
}

/// Resolve a group's edge from its enabled series and its own stack aggregate.
pub fn resolve_group(group: &SeriesGroup, default_field: &str) -> ValueEdge {
    let field = group.value_field().unwrap_or(default_field);
    let stack = if group.is_stacked() { group.stack_aggregate() } else { None };
    resolve(&group.name, group.enabled().map(|s| &s.values), group.kind, field, stack)
}

/// Push the finite values of `values` into `out`; returns true when tuple
/// coordinates were flattened as ranges.
fn extract(values: &SeriesValues, kind: SeriesKind, field: &str, out: &mut Vec<f64>) -> bool {
    match values {
        SeriesValues::Scalar(v) => {
            out.extend(v.iter().copied().filter(|x| x.is_finite()));
            false
        }
        SeriesValues::Pair(v) if kind.is_box() => {
            for &(lo, hi) in v {
                out.extend([lo, hi].into_iter().filter(|x| x.is_finite()));
            }
            true
        }
        SeriesValues::Pair(v) => {
            out.extend(v.iter().map(|&(_, y)| y).filter(|x| x.is_finite()));
            false
        }
        SeriesValues::Keyed(v) => {
            out.extend(v.iter().filter_map(|p| p.get(field).copied()).filter(|x| x.is_finite()));
            false
        }
    }
}

/// Turn raw values into an edge, widening degenerate ranges.
///
/// The single-value rules key on how many values were supplied; extremes
/// come from the distinct set.
pub fn limit_safely(values: &[f64]) -> ValueEdge {
    if values.is_empty() {
        return ValueEdge::ZERO;
    }
    // -0.0 + 0.0 == +0.0, so both zeros share one key
    let distinct: HashSet<u64> = values.iter().map(|v| (v + 0.0).to_bits()).collect();
    let (mut min, mut max) = distinct
        .iter()
        .map(|&bits| f64::from_bits(bits))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if values.len() == 1 {
        let v = min;
        if v > 0.0 {
            min = 0.0;
        } else if v == 0.0 {
            max = 10.0;
        } else {
            max = 0.0;
        }
    } else if min == 0.0 && max == 0.0 {
        max = 10.0;
    } else if min == max {
        min -= min.abs() / 10.0;
        max += max.abs() / 10.0;
    }
    ValueEdge { min, max }
}

/// Convenience for callers holding a bare slice of one shape.
pub fn resolve_scalars(group: &str, values: &[f64], kind: SeriesKind) -> ValueEdge {
    let values = SeriesValues::Scalar(values.to_vec());
    resolve(group, [&values], kind, "y", None)
}

