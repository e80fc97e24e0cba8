#![deny(missing_docs)]

//! Core library for Filezer: text statistics, TextRazor annotations and downloadable reports.

/// Deterministic tokenization, statistics and word frequencies.
pub mod analysis;
/// External entity and category annotation.
pub mod annotation;
/// HTTP routing and upload handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Analysis counters.
pub mod metrics;
/// Orchestration of a single document analysis.
pub mod pipeline;
/// Report rendering and transient artifacts.
pub mod report;
/// Upload validation and raw documents.
pub mod upload;
