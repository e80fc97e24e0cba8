//! Annotation records, wire payloads and errors.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder used when the service omits an entity type, identifier or category label.
pub const UNKNOWN: &str = "unknown";

/// Errors returned while talking to the annotation service.
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// HTTP layer failed before a complete response arrived (including timeouts).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Service answered with a status code and a body that is not a service payload.
    #[error("Unexpected annotation response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from the service.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Successful response that could not be decoded.
    #[error("Malformed annotation response: {0}")]
    InvalidResponse(String),
    /// Service reported an error inside its payload.
    #[error("TextRazor API request failed. Error: {0}")]
    Service(String),
}

/// A named entity recognized in the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    /// Entity type, `unknown` when absent.
    #[serde(rename = "type")]
    pub kind: String,
    /// Entity identifier, `unknown` when absent.
    pub identifier: String,
    /// Topical importance in `[0, 1]`, `0` when absent.
    pub relevance: f64,
    /// Extraction certainty, `0` when absent.
    pub confidence: f64,
}

/// Top-level payload returned by the annotation service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeResponse {
    /// `false` when the service rejected the request.
    #[serde(default)]
    pub ok: Option<bool>,
    /// Service-reported error message.
    #[serde(default)]
    pub error: Option<String>,
    /// Extraction results, present on success.
    #[serde(default)]
    pub response: Option<AnalyzeBody>,
}

/// Extraction results nested under `response`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeBody {
    /// Entities, when the `entities` extractor ran.
    #[serde(default)]
    pub entities: Option<Vec<RawEntity>>,
    /// Categories, when the `categories` extractor ran with a classifier.
    #[serde(default)]
    pub categories: Option<Vec<RawCategory>>,
}

/// Entity as sent on the wire; every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntity {
    /// Service identifier of the entity.
    #[serde(default, rename = "entityId")]
    pub entity_id: Option<String>,
    /// Entity type, a single label or a list of labels.
    #[serde(default, rename = "type")]
    pub kind: Option<EntityKind>,
    /// Relevance score.
    #[serde(default, rename = "relevanceScore")]
    pub relevance_score: Option<f64>,
    /// Confidence score.
    #[serde(default, rename = "confidenceScore")]
    pub confidence_score: Option<f64>,
}

/// Entity type as either one label or a list of labels.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EntityKind {
    /// Single type label.
    Single(String),
    /// Several type labels, joined with `, ` when rendered.
    Many(Vec<String>),
}

/// Category as sent on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCategory {
    /// Human-readable category label.
    #[serde(default)]
    pub label: Option<String>,
}

impl AnalyzeResponse {
    /// Surface a service-reported error, or return the extraction body.
    pub fn into_body(self) -> Result<AnalyzeBody, AnnotationError> {
        if let Some(error) = self.error {
            return Err(AnnotationError::Service(error));
        }
        if self.ok == Some(false) {
            return Err(AnnotationError::Service(
                "request was not accepted".to_string(),
            ));
        }
        Ok(self.response.unwrap_or_default())
    }
}

impl From<RawEntity> for Entity {
    fn from(raw: RawEntity) -> Self {
        let kind = match raw.kind {
            Some(EntityKind::Single(label)) => label,
            Some(EntityKind::Many(labels)) => labels.join(", "),
            None => UNKNOWN.to_string(),
        };
        Self {
            kind,
            identifier: raw.entity_id.unwrap_or_else(|| UNKNOWN.to_string()),
            relevance: raw.relevance_score.unwrap_or(0.0),
            confidence: raw.confidence_score.unwrap_or(0.0),
        }
    }
}

impl From<RawCategory> for String {
    fn from(raw: RawCategory) -> Self {
        raw.label.unwrap_or_else(|| UNKNOWN.to_string())
    }
}
