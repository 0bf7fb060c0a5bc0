use std::fmt;

use serde::{Serialize, Serializer};

use super::numeric::numeric_column;
use super::table::Table;

/// Placeholder shown wherever a figure cannot be computed.
pub const UNAVAILABLE: &str = "—";

// ---------------------------------------------------------------------------
// Stat – one summary figure or the "unavailable" sentinel
// ---------------------------------------------------------------------------

/// A single statistic. Displays with exactly two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Stat {
    Value(f64),
    #[default]
    Unavailable,
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stat::Value(v) => write!(f, "{v:.2}"),
            Stat::Unavailable => write!(f, "{UNAVAILABLE}"),
        }
    }
}

/// Serialised as the two-decimal string, or `null` when unavailable.
impl Serialize for Stat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Stat::Value(_) => serializer.collect_str(self),
            Stat::Unavailable => serializer.serialize_none(),
        }
    }
}

// ---------------------------------------------------------------------------
// StatsSummary
// ---------------------------------------------------------------------------

/// Mean, extremes and deciles of one numeric column.
///
/// Either every field is a value or every field is [`Stat::Unavailable`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StatsSummary {
    pub mean: Stat,
    pub min: Stat,
    pub max: Stat,
    pub p10: Stat,
    pub p50: Stat,
    pub p90: Stat,
}

impl StatsSummary {
    /// Summarise already-coerced values. Empty input gives the all-sentinel summary.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
        let pct = |p: f64| Stat::Value(percentile_sorted(&sorted, p));

        StatsSummary {
            mean: Stat::Value(mean),
            min: Stat::Value(sorted[0]),
            max: Stat::Value(sorted[sorted.len() - 1]),
            p10: pct(10.0),
            p50: pct(50.0),
            p90: pct(90.0),
        }
    }
}

/// Summarise a table column. Absent columns and unparsable cells never fail;
/// they just shrink the projection, possibly to nothing.
pub fn summarize(table: &Table, column: &str) -> StatsSummary {
    let values: Vec<f64> = numeric_column(table, column).collect();
    StatsSummary::from_values(&values)
}

/// Percentile `p` (0..=100) of non-empty sorted data, interpolating linearly
/// between the two closest ranks at index `p / 100 * (n - 1)`.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = h.floor() as usize;
    let frac = h - h.floor();
    if lo + 1 >= n {
        sorted[n - 1]
    } else {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(s: &StatsSummary) -> [String; 6] {
        [s.mean, s.min, s.max, s.p10, s.p50, s.p90].map(|v| v.to_string())
    }

    #[test]
    fn one_to_ten() {
        let csv = (1..=10).fold(String::from("Flowrate\n"), |acc, i| acc + &format!("{i}\n"));
        let table = Table::parse_str(&csv).unwrap();
        let s = summarize(&table, "Flowrate");
        assert_eq!(rendered(&s), ["5.50", "1.00", "10.00", "1.90", "5.50", "9.10"]);
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let s = StatsSummary::from_values(&[9.0, 1.0, 5.0]);
        assert_eq!(s.min, Stat::Value(1.0));
        assert_eq!(s.max, Stat::Value(9.0));
        assert_eq!(s.p50, Stat::Value(5.0));
    }

    #[test]
    fn single_value_fills_every_field() {
        let s = StatsSummary::from_values(&[4.25]);
        assert_eq!(rendered(&s), ["4.25"; 6].map(String::from));
    }

    #[test]
    fn missing_and_non_numeric_columns_are_unavailable() {
        let table = Table::parse_str("Type,Flowrate\nPump,abc\nValve,\n").unwrap();
        for col in ["Flowrate", "Pressure"] {
            let s = summarize(&table, col);
            assert_eq!(s, StatsSummary::default());
            assert_eq!(rendered(&s), [UNAVAILABLE; 6].map(String::from));
        }
    }

    #[test]
    fn bad_cells_are_excluded_not_zeroed() {
        let table = Table::parse_str("v\n10\nbad\n\n20\n").unwrap();
        let s = summarize(&table, "v");
        assert_eq!(s.mean, Stat::Value(15.0));
        assert_eq!(s.min, Stat::Value(10.0));
    }

    #[test]
    fn serialises_as_strings_or_null() {
        let json = serde_json::to_value(StatsSummary::from_values(&[1.0, 2.0])).unwrap();
        assert_eq!(json["mean"], "1.50");
        let json = serde_json::to_value(StatsSummary::default()).unwrap();
        assert!(json["p90"].is_null());
    }
}
