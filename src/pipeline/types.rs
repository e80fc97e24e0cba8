//! Pipeline stages, outputs and errors.

use crate::report::{AnalysisResult, ReportArtifact, ReportError};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Stages a single analysis passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    /// Nothing has happened yet.
    Idle,
    /// Loading document bytes.
    Reading,
    /// Normalizing and splitting into words and sentences.
    Tokenizing,
    /// Computing statistics and word frequencies.
    Computing,
    /// Calling the annotation service.
    Annotating,
    /// Building the result record and writing the report.
    Assembling,
    /// Report ready.
    Done,
    /// Aborted; no report was produced.
    Failed,
}

impl PipelineStage {
    /// The stage that follows on success, if any.
    pub fn successor(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Reading),
            Self::Reading => Some(Self::Tokenizing),
            Self::Tokenizing => Some(Self::Computing),
            Self::Computing => Some(Self::Annotating),
            Self::Annotating => Some(Self::Assembling),
            Self::Assembling => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    /// Whether a fatal error may occur in this stage. Annotation problems never abort a run.
    pub fn can_fail(self) -> bool {
        matches!(self, Self::Reading | Self::Assembling)
    }
}

/// Fatal pipeline errors. Empty input and annotation failures degrade instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Document content could not be read.
    #[error("Failed to read file content from {path}: {source}")]
    UnreadableFile {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Report could not be persisted.
    #[error(transparent)]
    ReportWrite(#[from] ReportError),
}

/// Everything produced by a successful run.
#[derive(Debug)]
pub struct PipelineOutput {
    /// Structured result record.
    pub result: AnalysisResult,
    /// Serialized report; call [`ReportArtifact::into_bytes`] to send and delete it.
    pub report: ReportArtifact,
    /// User-visible messages for extractions that degraded.
    pub diagnostics: Vec<String>,
}
