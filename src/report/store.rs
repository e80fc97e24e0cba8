//! Transient report artifacts.
//!
//! Every report is written to its own `filezer-<uuid>-file_analysis_report.txt` so concurrent
//! requests never share a path. The artifact is deleted once the bytes have been handed to the
//! caller, and again on drop if the caller never cleaned up.

use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// File name suggested to clients downloading a report.
pub const REPORT_FILENAME: &str = "file_analysis_report.txt";

/// Errors raised while persisting or removing a report artifact.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem operation on the artifact failed.
    #[error("Error generating text report at {path}: {source}")]
    Io {
        /// Artifact path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Writes report artifacts into a single directory.
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    /// Store artifacts under `dir`, or the OS temp directory when `None`.
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir: dir.unwrap_or_else(std::env::temp_dir),
        }
    }

    /// Persist a report under a fresh, invocation-scoped path.
    pub async fn write(&self, contents: String) -> Result<ReportArtifact, ReportError> {
        let path = self
            .dir
            .join(format!("filezer-{}-{REPORT_FILENAME}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ReportError::Io {
                path: self.dir.clone(),
                source,
            })?;
        let bytes = contents.into_bytes();
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Report artifact written");
        Ok(ReportArtifact {
            bytes,
            path: Some(path),
        })
    }
}

/// A written report: its bytes plus the transient file that must not outlive the response.
#[derive(Debug)]
pub struct ReportArtifact {
    bytes: Vec<u8>,
    path: Option<PathBuf>,
}

impl ReportArtifact {
    /// Transient file path, until the artifact has been cleaned up.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Delete the transient file.
    pub async fn cleanup(&mut self) -> Result<(), ReportError> {
        let Some(path) = self.path.take() else {
            return Ok(());
        };
        tokio::fs::remove_file(&path)
            .await
            .map_err(|source| ReportError::Io { path, source })
    }

    /// Delete the transient file and hand over the bytes for sending.
    pub async fn into_bytes(mut self) -> Vec<u8> {
        if let Err(error) = self.cleanup().await {
            tracing::warn!(error = %error, "Failed to delete report artifact");
        }
        std::mem::take(&mut self.bytes)
    }
}

// Fallback only. The HTTP handlers and the CLI consume artifacts through `into_bytes` or
// `cleanup`, so this blocking removal runs only for artifacts dropped unconsumed.
impl Drop for ReportArtifact {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(error) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %error, "Failed to delete report artifact");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("filezer-store-test-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn writes_unique_artifacts() {
        let dir = scratch_dir();
        let store = ReportStore::new(Some(dir.clone()));
        let first = store.write("one".into()).await.expect("first");
        let second = store.write("two".into()).await.expect("second");

        let first_path = first.path().expect("path").to_path_buf();
        assert_ne!(Some(first_path.as_path()), second.path());
        assert!(
            first_path
                .to_string_lossy()
                .ends_with("-file_analysis_report.txt")
        );
        assert_eq!(std::fs::read(&first_path).expect("read"), b"one");
        drop(second);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn into_bytes_deletes_file() {
        let dir = scratch_dir();
        let store = ReportStore::new(Some(dir.clone()));
        let artifact = store.write("report".into()).await.expect("artifact");
        let path = artifact.path().expect("path").to_path_buf();

        let bytes = artifact.into_bytes().await;
        assert_eq!(bytes, b"report");
        assert!(!path.exists());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn drop_deletes_file() {
        let dir = scratch_dir();
        let store = ReportStore::new(Some(dir.clone()));
        let artifact = store.write("report".into()).await.expect("artifact");
        let path = artifact.path().expect("path").to_path_buf();
        drop(artifact);
        assert!(!path.exists());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn unwritable_directory_is_a_report_error() {
        let dir = scratch_dir();
        std::fs::write(&dir, b"not a directory").expect("blocker file");
        let store = ReportStore::new(Some(dir.clone()));
        let error = store.write("report".into()).await.expect_err("write fails");
        assert!(matches!(error, ReportError::Io { .. }));
        let _ = std::fs::remove_file(dir);
    }
}
