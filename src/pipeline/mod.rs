//! Analysis pipeline: raw bytes in, result record and report artifact out.

mod service;
pub mod types;

pub use service::{AnalysisApi, AnalysisPipeline};
pub use types::{PipelineError, PipelineOutput, PipelineStage};
