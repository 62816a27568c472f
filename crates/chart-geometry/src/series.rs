// File: crates/chart-geometry/src/series.rs
// Summary: Series model: named groups of series sharing one value shape, plus stack aggregates.
// Notes:
// - A group's `ValueShape` is fixed when the group is built; every series added
//   later must carry the same shape, so the domain resolver never re-detects it.
// - Disabled series stay in storage and are only skipped when iterating `enabled()`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Line,
    Area,
    Scatter,
    Bar,    // horizontal boxes from a baseline
    Column, // vertical boxes from a baseline
}

impl SeriesKind {
    /// Box kinds draw from a baseline, so their domain must include it.
    pub const fn is_box(self) -> bool {
        matches!(self, SeriesKind::Bar | SeriesKind::Column)
    }
}

/// Shape tag of a group's values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueShape {
    Scalar,
    Pair,
    Keyed,
}

/// One keyed data point, e.g. `{"x": 3, "y": 12.5}`.
pub type KeyedPoint = BTreeMap<String, f64>;

#[derive(Clone, Debug, PartialEq)]
pub enum SeriesValues {
    Scalar(Vec<f64>),
    /// Tuple coordinates; range series use `(low, high)`.
    Pair(Vec<(f64, f64)>),
    Keyed(Vec<KeyedPoint>),
}

impl SeriesValues {
    pub fn shape(&self) -> ValueShape {
        match self {
            SeriesValues::Scalar(_) => ValueShape::Scalar,
            SeriesValues::Pair(_) => ValueShape::Pair,
            SeriesValues::Keyed(_) => ValueShape::Keyed,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SeriesValues::Scalar(v) => v.len(),
            SeriesValues::Pair(v) => v.len(),
            SeriesValues::Keyed(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Value plotted against the value axis at `index`; `None` for gaps.
    pub fn value_at(&self, index: usize, field: &str) -> Option<f64> {
        let v = match self {
            SeriesValues::Scalar(v) => v.get(index).copied(),
            SeriesValues::Pair(v) => v.get(index).map(|&(_, y)| y),
            SeriesValues::Keyed(v) => v.get(index).and_then(|p| p.get(field).copied()),
        };
        v.filter(|x| x.is_finite())
    }

    /// Append `other` in place. On shape mismatch `self` is untouched and the
    /// offending shape is returned.
    fn extend(&mut self, other: SeriesValues) -> std::result::Result<(), ValueShape> {
        match (self, other) {
            (SeriesValues::Scalar(a), SeriesValues::Scalar(b)) => a.extend(b),
            (SeriesValues::Pair(a), SeriesValues::Pair(b)) => a.extend(b),
            (SeriesValues::Keyed(a), SeriesValues::Keyed(b)) => a.extend(b),
            (_, other) => return Err(other.shape()),
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: SeriesValues,
    pub disabled: bool,
}

impl Series {
    pub fn new(name: impl Into<String>, values: SeriesValues) -> Self {
        Self { name: name.into(), values, disabled: false }
    }

    pub fn scalars(name: impl Into<String>, values: impl Into<Vec<f64>>) -> Self {
        Self::new(name, SeriesValues::Scalar(values.into()))
    }

    pub fn pairs(name: impl Into<String>, values: impl Into<Vec<(f64, f64)>>) -> Self {
        Self::new(name, SeriesValues::Pair(values.into()))
    }

    pub fn keyed(name: impl Into<String>, values: impl Into<Vec<KeyedPoint>>) -> Self {
        Self::new(name, SeriesValues::Keyed(values.into()))
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Pre-summed values of a stacked group: for every category index, the sum of
/// positive values and the sum of negative values across enabled series.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StackAggregate {
    pub values: Vec<f64>,
}

impl StackAggregate {
    pub fn from_series<'a>(series: impl IntoIterator<Item = &'a Series>, field: &str) -> Self {
        let series: Vec<&Series> = series.into_iter().collect();
        let categories = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
        let mut values = Vec::with_capacity(categories * 2);
        for i in 0..categories {
            let mut positive = 0.0;
            let mut negative = 0.0;
            let mut any = false;
            for s in &series {
                if let Some(v) = s.values.value_at(i, field) {
                    any = true;
                    if v >= 0.0 { positive += v } else { negative += v }
                }
            }
            if any {
                values.push(positive);
                values.push(negative);
            }
        }
        Self { values }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SeriesGroup {
    pub name: String,
    pub kind: SeriesKind,
    shape: ValueShape,
    stacked: bool,
    value_field: Option<String>,
    series: Vec<Series>,
    stack: Option<StackAggregate>,
}

impl SeriesGroup {
    pub fn new(name: impl Into<String>, kind: SeriesKind, shape: ValueShape) -> Self {
        Self {
            name: name.into(),
            kind,
            shape,
            stacked: false,
            value_field: None,
            series: Vec::new(),
            stack: None,
        }
    }

    /// Build a group whose shape is taken from the first series (scalar when empty).
    pub fn with_series(name: impl Into<String>, kind: SeriesKind, series: Vec<Series>) -> Result<Self> {
        let shape = series.first().map(|s| s.values.shape()).unwrap_or(ValueShape::Scalar);
        let mut group = Self::new(name, kind, shape);
        for s in series {
            group.add_series(s)?;
        }
        Ok(group)
    }

    pub fn stacked(mut self) -> Self {
        self.stacked = true;
        self
    }

    /// Field read from keyed points; the chart-wide default applies when unset.
    pub fn with_value_field(mut self, field: impl Into<String>) -> Self {
        self.value_field = Some(field.into());
        self
    }

    pub fn shape(&self) -> ValueShape { self.shape }
    pub fn is_stacked(&self) -> bool { self.stacked }
    pub fn value_field(&self) -> Option<&str> { self.value_field.as_deref() }
    pub fn series(&self) -> &[Series] { &self.series }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn enabled(&self) -> impl Iterator<Item = &Series> {
        self.series.iter().filter(|s| !s.disabled)
    }

    pub fn add_series(&mut self, series: Series) -> Result<()> {
        let found = series.values.shape();
        if found != self.shape {
            return Err(self.mismatch(found));
        }
        self.series.push(series);
        Ok(())
    }

    /// Append points to an existing series.
    pub fn append(&mut self, series: &str, values: SeriesValues) -> Result<()> {
        let group = self.name.clone();
        let expected = self.shape;
        let target = self
            .series
            .iter_mut()
            .find(|s| s.name == series)
            .ok_or_else(|| GeometryError::UnknownSeries { group: group.clone(), name: series.to_string() })?;
        target
            .values
            .extend(values)
            .map_err(|found| GeometryError::ShapeMismatch { group, expected, found })
    }

    /// Returns whether the flag actually changed.
    pub fn set_disabled(&mut self, series: &str, disabled: bool) -> Result<bool> {
        let group = &self.name;
        let target = self
            .series
            .iter_mut()
            .find(|s| s.name == series)
            .ok_or_else(|| GeometryError::UnknownSeries { group: group.clone(), name: series.to_string() })?;
        let changed = target.disabled != disabled;
        target.disabled = disabled;
        Ok(changed)
    }

    pub fn stack_aggregate(&self) -> Option<&StackAggregate> { self.stack.as_ref() }

    /// Recompute the stack aggregate from enabled series. No-op for unstacked groups.
    pub fn restack(&mut self, default_field: &str) {
        if !self.stacked {
            self.stack = None;
            return;
        }
        let field = self.value_field.as_deref().unwrap_or(default_field);
        self.stack = Some(StackAggregate::from_series(self.enabled(), field));
    }

    fn mismatch(&self, found: ValueShape) -> GeometryError {
        GeometryError::ShapeMismatch { group: self.name.clone(), expected: self.shape, found }
    }
}
