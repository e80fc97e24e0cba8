//! Report assembly, text rendering and transient artifact storage.

pub mod format;
pub mod store;
pub mod types;

pub use format::{REPORT_TITLE, Report, escape_html, render_report};
pub use store::{REPORT_FILENAME, ReportArtifact, ReportError, ReportStore};
pub use types::{AnalysisResult, Scalar};
