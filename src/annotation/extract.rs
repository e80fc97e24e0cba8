//! Entity and category extraction with per-extractor degradation.
//!
//! Each extraction issues its own call to the annotation client, at most once. A failure in one
//! extraction is logged and recorded as an [`AnnotationFailure`]; the affected list is left empty
//! and the other extraction still runs.

use super::client::AnnotationClient;
use super::types::{AnnotationError, Entity};
use serde::Serialize;
use std::fmt;

/// Named annotation capability requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Extractor {
    /// Named entity recognition.
    Entities,
    /// Document categorization.
    Categories,
}

impl Extractor {
    /// Parse a configured extractor name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "entities" => Some(Self::Entities),
            "categories" => Some(Self::Categories),
            _ => None,
        }
    }
}

impl fmt::Display for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entities => f.write_str("entity recognition"),
            Self::Categories => f.write_str("categorization"),
        }
    }
}

/// A single extraction that degraded to an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationFailure {
    /// Extraction that failed.
    pub extractor: Extractor,
    /// User-visible description of the failure.
    pub message: String,
}

impl fmt::Display for AnnotationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error performing {}: {}", self.extractor, self.message)
    }
}

/// Annotations gathered for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    /// Entities in the order the service returned them.
    pub entities: Vec<Entity>,
    /// Category labels in the order the service returned them.
    pub categories: Vec<String>,
    /// Extractions that failed and were left empty.
    pub failures: Vec<AnnotationFailure>,
}

/// Request entities for `text`.
pub async fn extract_entities(
    client: &dyn AnnotationClient,
    text: &str,
) -> Result<Vec<Entity>, AnnotationError> {
    let body = client.analyze(text).await?.into_body()?;
    Ok(body
        .entities
        .unwrap_or_default()
        .into_iter()
        .map(Entity::from)
        .collect())
}

/// Request category labels for `text`.
pub async fn extract_categories(
    client: &dyn AnnotationClient,
    text: &str,
) -> Result<Vec<String>, AnnotationError> {
    let body = client.analyze(text).await?.into_body()?;
    Ok(body
        .categories
        .unwrap_or_default()
        .into_iter()
        .map(String::from)
        .collect())
}

/// Run every requested extraction, degrading each one independently.
pub async fn annotate(
    client: &dyn AnnotationClient,
    text: &str,
    extractors: &[Extractor],
) -> Annotations {
    let mut annotations = Annotations::default();

    if extractors.contains(&Extractor::Entities) {
        match extract_entities(client, text).await {
            Ok(entities) => annotations.entities = entities,
            Err(error) => annotations.failures.push(record_failure(Extractor::Entities, error)),
        }
    }

    if extractors.contains(&Extractor::Categories) {
        match extract_categories(client, text).await {
            Ok(categories) => annotations.categories = categories,
            Err(error) => annotations
                .failures
                .push(record_failure(Extractor::Categories, error)),
        }
    }

    annotations
}

fn record_failure(extractor: Extractor, error: AnnotationError) -> AnnotationFailure {
    tracing::warn!(%extractor, error = %error, "Annotation extraction failed; continuing without it");
    AnnotationFailure {
        extractor,
        message: error.to_string(),
    }
}
