//! Annotation service clients.
//!
//! [`AnnotationClient`] is the seam between the pipeline and the outside world. The TextRazor
//! adapter posts form-encoded requests directly with `reqwest`; the offline client answers
//! every call with an empty payload so the pipeline can run without network access.

use super::types::{AnalyzeResponse, AnnotationError};
use crate::config::AnnotationConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Interface implemented by annotation backends.
#[async_trait]
pub trait AnnotationClient: Send + Sync {
    /// Submit text once and return the raw service payload.
    ///
    /// Service-reported errors are returned inside the payload; `Err` means the call itself
    /// failed.
    async fn analyze(&self, text: &str) -> Result<AnalyzeResponse, AnnotationError>;
}

/// Build the TextRazor client for the supplied configuration.
pub fn get_annotation_client(
    config: &AnnotationConfig,
) -> Result<Box<dyn AnnotationClient>, AnnotationError> {
    Ok(Box::new(TextRazorClient::new(config)?))
}

/// HTTP client for the TextRazor analysis endpoint.
pub struct TextRazorClient {
    http: Client,
    base_url: String,
    api_key: String,
    extractors: String,
    classifiers: Option<String>,
}

impl TextRazorClient {
    /// Construct a client with a bounded per-call timeout.
    pub fn new(config: &AnnotationConfig) -> Result<Self, AnnotationError> {
        let http = Client::builder()
            .user_agent("filezer/0.2")
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        tracing::debug!(
            url = %config.base_url,
            extractors = ?config.extractors,
            has_api_key = !config.api_key.is_empty(),
            "Initialized annotation HTTP client"
        );
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            extractors: config.extractors.join(","),
            classifiers: config.classifiers.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl AnnotationClient for TextRazorClient {
    async fn analyze(&self, text: &str) -> Result<AnalyzeResponse, AnnotationError> {
        let mut form = vec![("text", text), ("extractors", self.extractors.as_str())];
        if let Some(classifiers) = self.classifiers.as_deref() {
            form.push(("classifiers", classifiers));
        }

        let response = self
            .http
            .post(self.endpoint())
            .header("x-textrazor-key", &self.api_key)
            .form(&form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%status, bytes = body.len(), "Annotation service responded");

        match serde_json::from_str::<AnalyzeResponse>(&body) {
            Ok(payload) if status.is_success() || payload.error.is_some() => Ok(payload),
            Err(error) if status.is_success() => Err(AnnotationError::InvalidResponse(format!(
                "failed to decode TextRazor response: {error}"
            ))),
            _ => Err(AnnotationError::UnexpectedStatus { status, body }),
        }
    }
}

/// Client that never leaves the process and reports no annotations.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineAnnotationClient;

#[async_trait]
impl AnnotationClient for OfflineAnnotationClient {
    async fn analyze(&self, _text: &str) -> Result<AnalyzeResponse, AnnotationError> {
        Ok(AnalyzeResponse::default())
    }
}
