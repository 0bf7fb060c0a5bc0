use serde::Serialize;

use super::charts::{category_counts, histogram_input, paired_series, CategoryCounts, PairedSeries};
use super::stats::{summarize, StatsSummary, UNAVAILABLE};
use super::table::Table;

pub const TYPE_COLUMN: &str = "Type";
pub const FLOWRATE_COLUMN: &str = "Flowrate";
pub const PRESSURE_COLUMN: &str = "Pressure";
pub const TEMPERATURE_COLUMN: &str = "Temperature";

// ---------------------------------------------------------------------------
// DashboardState – one immutable snapshot per successful load
// ---------------------------------------------------------------------------

/// Everything the dashboard shows, computed in one pass over a [`Table`].
///
/// Never mutated after [`DashboardState::build`]; a reload produces a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardState {
    /// Number of data rows, `None` when the table has none.
    pub entry_count: Option<usize>,
    pub flow_stats: StatsSummary,
    pub pressure_stats: StatsSummary,
    pub temp_stats: StatsSummary,
    pub type_counts: CategoryCounts,
    pub flowrate_series: Vec<f64>,
    pub pressure_temperature: PairedSeries,
}

impl DashboardState {
    pub fn build(table: &Table) -> Self {
        DashboardState {
            entry_count: (!table.is_empty()).then(|| table.row_count()),
            flow_stats: summarize(table, FLOWRATE_COLUMN),
            pressure_stats: summarize(table, PRESSURE_COLUMN),
            temp_stats: summarize(table, TEMPERATURE_COLUMN),
            type_counts: category_counts(table, TYPE_COLUMN),
            flowrate_series: histogram_input(table, FLOWRATE_COLUMN),
            pressure_temperature: paired_series(table, PRESSURE_COLUMN, TEMPERATURE_COLUMN),
        }
    }
}

// ---------------------------------------------------------------------------
// Kpi – headline cards
// ---------------------------------------------------------------------------

/// A formatted KPI card: title, headline figure, and a one-line hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kpi {
    pub title: &'static str,
    pub value: String,
    pub hint: String,
}

impl Kpi {
    /// Cards for a snapshot, or the placeholder cards before anything is loaded.
    pub fn cards(snapshot: Option<&DashboardState>) -> [Kpi; 4] {
        let empty = StatsSummary::default();
        let (count, flow, pressure, temp) = match snapshot {
            Some(s) => (s.entry_count, &s.flow_stats, &s.pressure_stats, &s.temp_stats),
            None => (None, &empty, &empty, &empty),
        };
        let count = count.map_or_else(|| UNAVAILABLE.to_string(), |n| n.to_string());

        [
            Kpi {
                title: "Total Equipment",
                value: count,
                hint: "Entries parsed".to_string(),
            },
            Kpi {
                title: "Avg Flowrate",
                value: flow.mean.to_string(),
                hint: format!("P50 {} • P90 {}", flow.p50, flow.p90),
            },
            Kpi {
                title: "Avg Pressure",
                value: pressure.mean.to_string(),
                hint: format!("Min {} • Max {}", pressure.min, pressure.max),
            },
            Kpi {
                title: "Avg Temperature",
                value: temp.mean.to_string(),
                hint: format!("P10 {} • P90 {}", temp.p10, temp.p90),
            },
        ]
    }
}
