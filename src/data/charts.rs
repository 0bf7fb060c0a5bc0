use std::collections::HashMap;

use serde::Serialize;

use super::numeric::{coerce, numeric_column};
use super::table::Table;

// ---------------------------------------------------------------------------
// CategoryCounts – input of the "type mix" bar chart
// ---------------------------------------------------------------------------

/// Occurrences per distinct label, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryCounts {
    entries: Vec<(String, usize)>,
}

impl CategoryCounts {
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(label, n)| (label.as_str(), *n))
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, n)| *n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Count each distinct raw value of `column`. Empty cells are missing data
/// and are not counted; an absent column gives empty counts.
pub fn category_counts(table: &Table, column: &str) -> CategoryCounts {
    let mut entries: Vec<(String, usize)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for cell in table.column(column).into_iter().flatten() {
        if cell.is_empty() {
            continue;
        }
        match slot.get(cell) {
            Some(&i) => entries[i].1 += 1,
            None => {
                slot.insert(cell, entries.len());
                entries.push((cell.to_string(), 1));
            }
        }
    }

    CategoryCounts { entries }
}

// ---------------------------------------------------------------------------
// Histogram input – the flowrate distribution
// ---------------------------------------------------------------------------

/// Numeric projection of `column`, in row order, for later binning.
pub fn histogram_input(table: &Table, column: &str) -> Vec<f64> {
    numeric_column(table, column).collect()
}

/// Equal-width bins over a set of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width buckets spanning min..=max.
    ///
    /// The last bucket is closed on the right. If all values are equal the
    /// range is widened to `v - 0.5 ..= v + 0.5`. `None` when there is
    /// nothing to bin.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 {
            return None;
        }
        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if (hi - lo).abs() < f64::EPSILON {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Histogram { edges, counts })
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// Centre of bucket `i`.
    pub fn center(&self, i: usize) -> f64 {
        (self.edges[i] + self.edges[i + 1]) / 2.0
    }
}

// ---------------------------------------------------------------------------
// PairedSeries – input of the scatter chart
// ---------------------------------------------------------------------------

/// Aligned `(x, y)` samples; `x` and `y` always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PairedSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl PairedSeries {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.x.iter().zip(&self.y).map(|(&x, &y)| [x, y])
    }
}

/// Pair two columns row by row. A row is dropped unless both cells coerce.
/// If either column is absent the series is empty.
pub fn paired_series(table: &Table, col_x: &str, col_y: &str) -> PairedSeries {
    let (Some(xs), Some(ys)) = (table.column(col_x), table.column(col_y)) else {
        return PairedSeries::default();
    };

    let (x, y): (Vec<f64>, Vec<f64>) = xs
        .zip(ys)
        .filter_map(|(cx, cy)| Some((coerce(cx)?, coerce(cy)?)))
        .unzip();
    PairedSeries { x, y }
}
