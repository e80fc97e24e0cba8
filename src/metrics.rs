use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing analysis activity since startup.
#[derive(Default)]
pub struct AnalysisMetrics {
    documents_analyzed: AtomicU64,
    uploads_rejected: AtomicU64,
    annotation_failures: AtomicU64,
}

impl AnalysisMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document that reached the `Done` stage along with its failed extractions.
    pub fn record_document(&self, annotation_failures: u64) {
        self.documents_analyzed.fetch_add(1, Ordering::Relaxed);
        self.annotation_failures
            .fetch_add(annotation_failures, Ordering::Relaxed);
    }

    /// Record an upload rejected before the pipeline ran.
    pub fn record_rejection(&self) {
        self.uploads_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_analyzed: self.documents_analyzed.load(Ordering::Relaxed),
            uploads_rejected: self.uploads_rejected.load(Ordering::Relaxed),
            annotation_failures: self.annotation_failures.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of analysis counters used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of documents analyzed since startup.
    pub documents_analyzed: u64,
    /// Number of uploads rejected by validation.
    pub uploads_rejected: u64,
    /// Extractions that degraded to an empty list.
    pub annotation_failures: u64,
}
