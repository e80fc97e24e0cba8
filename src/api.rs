//! HTTP surface for Filezer.
//!
//! This module exposes a compact Axum router:
//!
//! - `GET /` – Upload form posting a `.txt` file to `/upload`.
//! - `POST /upload` – Validate a multipart upload (field `file`), run the analysis pipeline, and
//!   answer with the report as an `application/octet-stream` attachment named
//!   `file_analysis_report.txt`.
//! - `POST /analyze` – Same upload contract, but returns the structured result and any
//!   annotation diagnostics as JSON.
//! - `GET /metrics` – Analysis counters.
//!
//! Invalid uploads are rejected with a plain-text 400 before the pipeline runs.

use crate::metrics::MetricsSnapshot;
use crate::pipeline::{AnalysisApi, PipelineError, PipelineOutput};
use crate::report::AnalysisResult;
use crate::upload::{RawDocument, UploadError, validate_upload};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";
const ATTACHMENT_DISPOSITION: &str = "attachment; filename=\"file_analysis_report.txt\"";
const UPLOAD_FORM: &str = concat!(
    "<h1>Upload a Text File</h1>",
    "<form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">",
    "<input type=\"file\" name=\"file\" accept=\".txt\">",
    "<button type=\"submit\">Upload</button>",
    "</form>",
);

/// Build the HTTP router exposing the upload and analysis surface.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: AnalysisApi + 'static,
{
    Router::new()
        .route("/", get(upload_form))
        .route("/upload", post(upload_report::<S>))
        .route("/analyze", post(analyze_upload::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(service)
}

/// Render the upload form.
async fn upload_form() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}

/// Analyze an uploaded file and return the report as a download.
async fn upload_report<S>(
    State(service): State<Arc<S>>,
    multipart: Multipart,
) -> Result<Response, AppError>
where
    S: AnalysisApi,
{
    let output = accept_and_analyze(service.as_ref(), multipart).await?;
    let bytes = output.report.into_bytes().await;
    let length = bytes.len();
    tracing::info!(bytes = length, "Sending analysis report");
    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static(ATTACHMENT_DISPOSITION),
            ),
            (header::CONTENT_LENGTH, HeaderValue::from(length)),
        ],
        bytes,
    )
        .into_response())
}

/// Response body for `POST /analyze`.
#[derive(Serialize)]
struct AnalyzeResponse {
    result: AnalysisResult,
    diagnostics: Vec<String>,
}

/// Analyze an uploaded file and return the structured result.
async fn analyze_upload<S>(
    State(service): State<Arc<S>>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError>
where
    S: AnalysisApi,
{
    let PipelineOutput {
        result,
        mut report,
        diagnostics,
    } = accept_and_analyze(service.as_ref(), multipart).await?;
    if let Err(error) = report.cleanup().await {
        tracing::warn!(error = %error, "Failed to delete report artifact");
    }
    Ok(Json(AnalyzeResponse {
        result,
        diagnostics,
    }))
}

/// Return the metrics snapshot.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: AnalysisApi,
{
    Json(service.metrics_snapshot())
}

async fn accept_and_analyze<S>(
    service: &S,
    mut multipart: Multipart,
) -> Result<PipelineOutput, AppError>
where
    S: AnalysisApi + ?Sized,
{
    let document = match read_upload(&mut multipart).await {
        Ok(document) => document,
        Err(error) => {
            service.record_rejection();
            tracing::warn!(error = %error, "Rejected upload");
            return Err(error.into());
        }
    };
    tracing::info!(
        filename = %document.filename,
        bytes = document.bytes.len(),
        "File uploaded successfully"
    );
    Ok(service.analyze_document(document).await?)
}

/// Pull the `file` field out of a multipart body, validating it before reading the content.
async fn read_upload(multipart: &mut Multipart) -> Result<RawDocument, UploadError> {
    while let Some(field) = multipart.next_field().await.map_err(|error| {
        tracing::debug!(error = %error, "Multipart transport error");
        UploadError::InvalidFile
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let media_type = field.content_type().map(str::to_string);
        let filename = field.file_name().map(str::to_string);
        validate_upload(media_type.as_deref(), filename.as_deref())?;
        let bytes = field.bytes().await.map_err(|error| {
            tracing::debug!(error = %error, "Failed to read upload body");
            UploadError::InvalidFile
        })?;
        return RawDocument::new(bytes.to_vec(), media_type.as_deref(), filename.as_deref());
    }
    Err(UploadError::InvalidFile)
}

enum AppError {
    Upload(UploadError),
    Pipeline(PipelineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Upload(error) => (StatusCode::BAD_REQUEST, error.to_string()).into_response(),
            Self::Pipeline(error @ PipelineError::UnreadableFile { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, error.to_string()).into_response()
            }
            Self::Pipeline(error @ PipelineError::ReportWrite(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response()
            }
        }
    }
}

impl From<UploadError> for AppError {
    fn from(inner: UploadError) -> Self {
        Self::Upload(inner)
    }
}

impl From<PipelineError> for AppError {
    fn from(inner: PipelineError) -> Self {
        Self::Pipeline(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::create_router;
    use crate::annotation::OfflineAnnotationClient;
    use crate::config::Config;
    use crate::metrics::MetricsSnapshot;
    use crate::pipeline::{AnalysisApi, AnalysisPipeline, PipelineError, PipelineOutput};
    use crate::upload::RawDocument;
    use async_trait::async_trait;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    const BOUNDARY: &str = "filezer-test-boundary";

    struct RecordingService {
        pipeline: AnalysisPipeline,
        calls: Mutex<Vec<String>>,
        rejections: AtomicU64,
    }

    impl RecordingService {
        fn new() -> Self {
            let mut config = Config::offline();
            config.report_dir = Some(
                std::env::temp_dir().join(format!("filezer-api-test-{}", uuid::Uuid::new_v4())),
            );
            Self {
                pipeline: AnalysisPipeline::with_client(Box::new(OfflineAnnotationClient), &config),
                calls: Mutex::new(Vec::new()),
                rejections: AtomicU64::new(0),
            }
        }

        async fn recorded_calls(&self) -> Vec<String> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl AnalysisApi for RecordingService {
        async fn analyze_document(
            &self,
            document: RawDocument,
        ) -> Result<PipelineOutput, PipelineError> {
            self.calls.lock().await.push(document.filename.clone());
            self.pipeline.analyze(document).await
        }

        fn record_rejection(&self) {
            self.rejections.fetch_add(1, Ordering::Relaxed);
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot {
                uploads_rejected: self.rejections.load(Ordering::Relaxed),
                ..self.pipeline.metrics_snapshot()
            }
        }
    }

    fn router(service: Arc<RecordingService>) -> Router {
        create_router(service, 1024 * 1024)
    }

    fn upload_request(uri: &str, filename: &str, content_type: &str, body: &str) -> Request<Body> {
        let payload = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n\
             {body}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(payload))
            .expect("request")
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    #[tokio::test]
    async fn form_posts_txt_files_to_upload() {
        let app = router(Arc::new(RecordingService::new()));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<h1>Upload a Text File</h1>"));
        assert!(html.contains("action=\"/upload\""));
        assert!(html.contains("name=\"file\" accept=\".txt\""));
    }

    #[tokio::test]
    async fn upload_returns_report_attachment() {
        let service = Arc::new(RecordingService::new());
        let app = router(service.clone());

        let response = app
            .oneshot(upload_request(
                "/upload",
                "notes.TXT",
                "text/plain",
                "Hello, world! This is a test.",
            ))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers().clone();
        assert_eq!(headers[header::CONTENT_TYPE], "application/octet-stream");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"file_analysis_report.txt\""
        );
        let report = body_text(response).await;
        assert_eq!(
            headers[header::CONTENT_LENGTH],
            report.len().to_string().as_str()
        );
        assert!(report.starts_with("File Analysis Report\n\nTotal Characters: 29\nTotal Words: 6\n"));
        assert!(report.contains("Total Sentences: 2\n"));
        assert_eq!(service.recorded_calls().await, vec!["notes.TXT".to_string()]);
    }

    #[tokio::test]
    async fn wrong_extension_is_rejected_before_analysis() {
        let service = Arc::new(RecordingService::new());
        let app = router(service.clone());

        let response = app
            .oneshot(upload_request("/upload", "file.pdf", "text/plain", "text"))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "Invalid file extension. Only .txt files are allowed."
        );
        assert!(service.recorded_calls().await.is_empty());
        assert_eq!(service.metrics_snapshot().uploads_rejected, 1);
        assert_eq!(service.metrics_snapshot().documents_analyzed, 0);
    }

    #[tokio::test]
    async fn wrong_media_type_is_rejected() {
        let service = Arc::new(RecordingService::new());
        let app = router(service.clone());

        let response = app
            .oneshot(upload_request(
                "/upload",
                "notes.txt",
                "application/octet-stream",
                "text",
            ))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Invalid file or upload error.");
        assert!(service.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn analyze_returns_structured_result() {
        let app = router(Arc::new(RecordingService::new()));

        let response = app
            .oneshot(upload_request(
                "/analyze",
                "notes.txt",
                "text/plain",
                "a bb a",
            ))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).expect("json body");
        assert_eq!(json["result"]["total_words"], 3);
        assert_eq!(json["result"]["top_words"][0]["word"], "a");
        assert_eq!(json["result"]["top_words"][0]["count"], 2);
        assert_eq!(json["result"]["top_words"][1]["word"], "bb");
        assert_eq!(json["diagnostics"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn metrics_route_reports_counters() {
        let service = Arc::new(RecordingService::new());
        let app = router(service.clone());
        app.clone()
            .oneshot(upload_request("/upload", "a.txt", "text/plain", "one two"))
            .await
            .expect("upload");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).expect("json body");
        assert_eq!(json["documents_analyzed"], 1);
        assert_eq!(json["uploads_rejected"], 0);
    }
}
