use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use reqwest::blocking::{multipart, Client};
use thiserror::Error;

// ---------------------------------------------------------------------------
// UploadError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server rejected upload ({status}): {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("upload worker exited without a result")]
    WorkerLost,
}

// ---------------------------------------------------------------------------
// UploadClient – best-effort push of the raw CSV to the dataset store
// ---------------------------------------------------------------------------

/// Sends a dataset file to the REST store as a multipart form with
/// fields `name` and `file`.
#[derive(Debug, Clone)]
pub struct UploadClient {
    endpoint: String,
    client: Client,
}

impl UploadClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
        }
    }

    /// Upload synchronously. Any 2xx response counts as success.
    pub fn upload(&self, path: &Path) -> Result<(), UploadError> {
        let name = display_name(path);
        let form = multipart::Form::new()
            .text("name", name)
            .file("file", path)
            .map_err(|source| UploadError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let response = self.client.post(&self.endpoint).multipart(form).send()?;
        let status = response.status();
        if status.is_success() {
            log::info!("Uploaded {} to {} ({status})", path.display(), self.endpoint);
            Ok(())
        } else {
            let body = response.text().unwrap_or_default();
            Err(UploadError::Rejected { status, body })
        }
    }

    /// Upload on a background thread. The returned handle is polled for the outcome.
    pub fn spawn(&self, path: PathBuf) -> UploadHandle {
        let (tx, rx) = mpsc::channel();
        let client = self.clone();
        let label = display_name(&path);
        thread::spawn(move || {
            let outcome = client.upload(&path);
            if let Err(e) = &outcome {
                log::warn!("Upload of {} failed: {e:#}", path.display());
            }
            // The receiver may be gone if a newer upload replaced this one.
            let _ = tx.send(outcome);
        });
        UploadHandle { label, rx }
    }
}

/// File name sent as the dataset's display name.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// UploadHandle
// ---------------------------------------------------------------------------

/// A running upload.
#[derive(Debug)]
pub struct UploadHandle {
    pub label: String,
    rx: Receiver<Result<(), UploadError>>,
}

impl UploadHandle {
    /// Non-blocking: `None` while the upload is still running. A worker that
    /// died before reporting yields [`UploadError::WorkerLost`].
    pub fn poll(&self) -> Option<Result<(), UploadError>> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::error!("Upload worker for {} exited without a result", self.label);
                Some(Err(UploadError::WorkerLost))
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn ready(label: &str, outcome: Result<(), UploadError>) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(outcome);
        UploadHandle {
            label: label.to_string(),
            rx,
        }
    }

    #[cfg(test)]
    pub(crate) fn abandoned(label: &str) -> Self {
        let (_, rx) = mpsc::channel();
        UploadHandle {
            label: label.to_string(),
            rx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_file_name() {
        assert_eq!(display_name(Path::new("/data/run/equipment.csv")), "equipment.csv");
    }

    #[test]
    fn missing_file_fails_before_any_request() {
        let client = UploadClient::new("http://127.0.0.1:9/api/datasets/");
        let err = client.upload(Path::new("/no/such/file.csv")).unwrap_err();
        assert!(matches!(err, UploadError::Io { .. }));
    }

    #[test]
    fn dead_worker_is_reported_as_failure() {
        let handle = UploadHandle::abandoned("lost.csv");
        assert!(matches!(handle.poll(), Some(Err(UploadError::WorkerLost))));
    }

    #[test]
    fn spawned_upload_reports_failure_through_handle() {
        let client = UploadClient::new("http://127.0.0.1:9/api/datasets/");
        let handle = client.spawn(PathBuf::from("/no/such/file.csv"));
        let outcome = loop {
            if let Some(outcome) = handle.poll() {
                break outcome;
            }
            thread::sleep(std::time::Duration::from_millis(5));
        };
        assert!(outcome.is_err());
        assert_eq!(handle.label, "file.csv");
    }
}
