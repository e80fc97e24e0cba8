//! Entity and category annotations from the external TextRazor service.

pub mod client;
pub mod extract;
pub mod types;

pub use client::{
    AnnotationClient, OfflineAnnotationClient, TextRazorClient, get_annotation_client,
};
pub use extract::{
    AnnotationFailure, Annotations, Extractor, annotate, extract_categories, extract_entities,
};
pub use types::{AnalyzeResponse, AnnotationError, Entity};
