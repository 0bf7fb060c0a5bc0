/// Data layer: CSV ingest, statistics, and chart datasets.
///
/// Architecture:
/// ```text
///        .csv
///          │
///          ▼
///    ┌──────────┐
///    │  table    │  parse text → Table (columns + raw cells)
///    └──────────┘
///          │
///          ├──────────────┐
///          ▼              ▼
///    ┌──────────┐   ┌──────────┐
///    │  stats    │   │  charts   │  numeric projections via `numeric`
///    └──────────┘   └──────────┘
///          │              │
///          └──────┬───────┘
///                 ▼
///          ┌────────────┐
///          │  snapshot   │  DashboardState, rebuilt per load
///          └────────────┘
/// ```
///
/// Nothing in here depends on the UI or the theme.

pub mod charts;
pub mod numeric;
pub mod snapshot;
pub mod stats;
pub mod table;
