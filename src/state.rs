use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::data::snapshot::DashboardState;
use crate::data::table::{self, IngestError, Table};
use crate::upload::{UploadClient, UploadHandle};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which page the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Table,
}

/// A successfully ingested file and the snapshot built from it.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub source: PathBuf,
    pub table: Table,
    pub snapshot: DashboardState,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// `None` is the initial empty dashboard.
    pub loaded: Option<Loaded>,

    pub view: View,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the status message reports a failure.
    pub status_is_error: bool,

    /// Upload in flight, if any.
    pub upload: Option<UploadHandle>,

    uploader: Option<UploadClient>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let uploader = config.upload_endpoint.as_deref().map(UploadClient::new);
        Self {
            config,
            loaded: None,
            view: View::Dashboard,
            status_message: None,
            status_is_error: false,
            upload: None,
            uploader,
        }
    }

    pub fn snapshot(&self) -> Option<&DashboardState> {
        self.loaded.as_ref().map(|l| &l.snapshot)
    }

    /// Read a CSV from disk, rebuild the dashboard and start uploading it.
    pub fn load_path(&mut self, path: &Path) {
        let result = table::load_file(path);
        if self.ingest(path, result) {
            if let Some(client) = &self.uploader {
                self.upload = Some(client.spawn(path.to_path_buf()));
            }
        }
    }

    /// Apply an ingest result. A failure leaves the previous snapshot in place.
    /// Returns whether a new snapshot was installed.
    pub fn ingest(&mut self, source: &Path, result: Result<Table, IngestError>) -> bool {
        match result {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows with columns {:?} from {}",
                    table.row_count(),
                    table.columns(),
                    source.display()
                );
                let snapshot = DashboardState::build(&table);
                self.loaded = Some(Loaded {
                    source: source.to_path_buf(),
                    table,
                    snapshot,
                });
                self.view = View::Dashboard;
                self.set_status(None, false);
                true
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", source.display());
                self.set_status(Some(format!("Error: {e:#}")), true);
                false
            }
        }
    }

    /// Switch to the table page. Ignored while nothing is loaded.
    pub fn show_table(&mut self) {
        if self.loaded.is_some() {
            self.view = View::Table;
        }
    }

    pub fn show_dashboard(&mut self) {
        self.view = View::Dashboard;
    }

    /// Collect the background upload result, if it has arrived.
    pub fn poll_upload(&mut self) {
        let Some(handle) = &self.upload else {
            return;
        };
        let Some(outcome) = handle.poll() else {
            return;
        };
        let label = handle.label.clone();
        self.upload = None;
        match outcome {
            Ok(()) => self.set_status(Some(format!("Uploaded {label}")), false),
            // Advisory only: the dashboard stays as it is.
            Err(e) => self.set_status(Some(format!("Upload of {label} failed: {e}")), true),
        }
    }

    pub fn set_status(&mut self, message: Option<String>, is_error: bool) {
        self.status_message = message;
        self.status_is_error = is_error;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::UploadError;

    fn offline() -> AppState {
        AppState::new(AppConfig {
            upload_endpoint: None,
            ..AppConfig::default()
        })
    }

    #[test]
    fn starts_empty() {
        let state = offline();
        assert!(state.snapshot().is_none());
        assert_eq!(state.view, View::Dashboard);
    }

    #[test]
    fn successful_ingest_installs_snapshot() {
        let mut state = offline();
        let ok = state.ingest(Path::new("a.csv"), Table::parse_str("Flowrate\n1\n2\n"));
        assert!(ok);
        assert_eq!(state.snapshot().unwrap().entry_count, Some(2));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let mut state = offline();
        state.ingest(Path::new("a.csv"), Table::parse_str("Flowrate\n1\n2\n"));
        let before = state.snapshot().cloned();

        let ok = state.ingest(Path::new("b.csv"), Table::parse_str(""));
        assert!(!ok);
        assert_eq!(state.snapshot().cloned(), before);
        assert_eq!(state.loaded.as_ref().unwrap().source, Path::new("a.csv"));
        assert!(state.status_is_error);
    }

    #[test]
    fn failed_first_load_stays_empty() {
        let mut state = offline();
        state.load_path(Path::new("/no/such/file.csv"));
        assert!(state.snapshot().is_none());
        assert!(state.upload.is_none());
        assert!(state.status_message.unwrap().contains("file.csv"));
    }

    #[test]
    fn reload_replaces_snapshot_wholesale() {
        let mut state = offline();
        state.ingest(Path::new("a.csv"), Table::parse_str("Type\nA\nB\n"));
        state.ingest(Path::new("b.csv"), Table::parse_str("Flowrate\n5\n"));
        let snapshot = state.snapshot().unwrap();
        assert!(snapshot.type_counts.is_empty());
        assert_eq!(snapshot.entry_count, Some(1));
    }

    #[test]
    fn table_view_requires_data() {
        let mut state = offline();
        state.show_table();
        assert_eq!(state.view, View::Dashboard);

        state.ingest(Path::new("a.csv"), Table::parse_str("Type\nA\n"));
        state.show_table();
        assert_eq!(state.view, View::Table);
        state.show_dashboard();
        assert_eq!(state.view, View::Dashboard);
    }

    #[test]
    fn upload_outcome_updates_status_only() {
        let mut state = offline();
        state.ingest(Path::new("a.csv"), Table::parse_str("Type\nA\n"));
        let rejected = UploadError::Rejected {
            status: reqwest::StatusCode::BAD_REQUEST,
            body: "bad".into(),
        };
        state.upload = Some(UploadHandle::ready("a.csv", Err(rejected)));

        state.poll_upload();
        assert!(state.upload.is_none());
        assert!(state.status_is_error);
        assert!(state.snapshot().is_some());

        state.upload = Some(UploadHandle::ready("a.csv", Ok(())));
        state.poll_upload();
        assert_eq!(state.status_message.as_deref(), Some("Uploaded a.csv"));
    }

    #[test]
    fn lost_upload_worker_clears_the_spinner() {
        let mut state = offline();
        state.upload = Some(UploadHandle::abandoned("a.csv"));
        state.poll_upload();
        assert!(state.upload.is_none());
        assert!(state.status_is_error);
    }
}
