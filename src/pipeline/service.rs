//! Pipeline service sequencing tokenization, statistics, annotation and report assembly.

use crate::{
    analysis::{TextStatistics, tokenize, top_words},
    annotation::{
        AnnotationClient, AnnotationError, Extractor, annotate, get_annotation_client,
    },
    config::Config,
    metrics::{AnalysisMetrics, MetricsSnapshot},
    pipeline::types::{PipelineError, PipelineOutput, PipelineStage},
    report::{AnalysisResult, ReportStore, render_report},
    upload::{ACCEPTED_MEDIA_TYPE, RawDocument},
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Runs one document at a time from raw bytes to a written report.
///
/// Construct the pipeline once at startup and share it through an `Arc`; runs share nothing
/// except the annotation client, the report directory and the metrics counters.
pub struct AnalysisPipeline {
    annotation_client: Box<dyn AnnotationClient>,
    extractors: Vec<Extractor>,
    store: ReportStore,
    metrics: Arc<AnalysisMetrics>,
}

/// Abstraction over the pipeline used by external surfaces (HTTP, CLI).
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Analyze an already validated upload.
    async fn analyze_document(
        &self,
        document: RawDocument,
    ) -> Result<PipelineOutput, PipelineError>;

    /// Count an upload that failed validation.
    fn record_rejection(&self);

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl AnalysisPipeline {
    /// Build a pipeline backed by the TextRazor client.
    pub fn new(config: &Config) -> Result<Self, AnnotationError> {
        tracing::info!("Initializing annotation client");
        let client = get_annotation_client(&config.annotation)?;
        Ok(Self::with_client(client, config))
    }

    /// Build a pipeline around an explicit annotation client.
    pub fn with_client(annotation_client: Box<dyn AnnotationClient>, config: &Config) -> Self {
        let extractors = config
            .annotation
            .extractors
            .iter()
            .filter_map(|name| {
                let extractor = Extractor::from_name(name);
                if extractor.is_none() {
                    tracing::warn!(extractor = %name, "Ignoring unsupported extractor");
                }
                extractor
            })
            .collect();
        Self {
            annotation_client,
            extractors,
            store: ReportStore::new(config.report_dir.clone()),
            metrics: Arc::new(AnalysisMetrics::new()),
        }
    }

    /// Read a file from disk and analyze it.
    pub async fn analyze_path(&self, path: &Path) -> Result<PipelineOutput, PipelineError> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut run = StageTracker::new(&filename);
        run.advance();
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(source) => {
                return Err(run.fail(PipelineError::UnreadableFile {
                    path: path.to_path_buf(),
                    source,
                }));
            }
        };
        let document = RawDocument {
            bytes,
            media_type: ACCEPTED_MEDIA_TYPE.to_string(),
            filename,
        };
        self.process(run, document).await
    }

    /// Analyze an uploaded document held in memory.
    pub async fn analyze(&self, document: RawDocument) -> Result<PipelineOutput, PipelineError> {
        let mut run = StageTracker::new(&document.filename);
        run.advance();
        self.process(run, document).await
    }

    async fn process(
        &self,
        mut run: StageTracker,
        document: RawDocument,
    ) -> Result<PipelineOutput, PipelineError> {
        run.advance();
        let tokens = tokenize(&document.bytes);

        run.advance();
        let (statistics, degraded) = TextStatistics::compute(&document.bytes, &tokens);
        for condition in degraded {
            tracing::debug!(filename = %document.filename, %condition, "Reporting 0.00 for empty input");
        }
        let ranked = top_words(&tokens.words);

        run.advance();
        let annotations = if tokens.words.is_empty() {
            tracing::debug!(filename = %document.filename, "No words to annotate");
            Default::default()
        } else {
            annotate(
                self.annotation_client.as_ref(),
                &tokens.normalized,
                &self.extractors,
            )
            .await
        };

        run.advance();
        let diagnostics: Vec<String> = annotations
            .failures
            .iter()
            .map(ToString::to_string)
            .collect();
        let result = AnalysisResult::assemble(statistics, ranked, annotations);
        let report = match self.store.write(render_report(&result)).await {
            Ok(report) => report,
            Err(error) => return Err(run.fail(error.into())),
        };

        run.advance();
        self.metrics.record_document(diagnostics.len() as u64);
        tracing::info!(
            filename = %document.filename,
            characters = result.total_characters,
            words = result.total_words,
            lines = result.total_lines,
            sentences = result.total_sentences,
            entities = result.entities.len(),
            categories = result.categories.len(),
            degraded_extractions = diagnostics.len(),
            "Document analyzed"
        );

        Ok(PipelineOutput {
            result,
            report,
            diagnostics,
        })
    }

    /// Current metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl AnalysisApi for AnalysisPipeline {
    async fn analyze_document(
        &self,
        document: RawDocument,
    ) -> Result<PipelineOutput, PipelineError> {
        self.analyze(document).await
    }

    fn record_rejection(&self) {
        self.metrics.record_rejection();
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        AnalysisPipeline::metrics_snapshot(self)
    }
}

/// Tracks and logs stage transitions for a single run.
struct StageTracker {
    filename: String,
    stage: PipelineStage,
}

impl StageTracker {
    fn new(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            stage: PipelineStage::Idle,
        }
    }

    fn advance(&mut self) {
        if let Some(next) = self.stage.successor() {
            tracing::debug!(filename = %self.filename, from = ?self.stage, to = ?next, "Pipeline stage");
            self.stage = next;
        }
    }

    fn fail(&mut self, error: PipelineError) -> PipelineError {
        debug_assert!(self.stage.can_fail(), "fatal error in {:?}", self.stage);
        tracing::warn!(filename = %self.filename, stage = ?self.stage, error = %error, "Pipeline failed");
        self.stage = PipelineStage::Failed;
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnalyzeResponse, OfflineAnnotationClient};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    /// Fails entity calls, succeeds for categories, and counts calls.
    struct FlakyClient {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AnnotationClient for FlakyClient {
        async fn analyze(&self, _text: &str) -> Result<AnalyzeResponse, AnnotationError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(AnnotationError::InvalidResponse("timed out".into()));
            }
            Ok(serde_json::from_value(json!({
                "ok": true,
                "response": { "categories": [{ "label": "science" }] }
            }))
            .expect("payload"))
        }
    }

    fn test_config() -> Config {
        let mut config = Config::offline();
        config.report_dir =
            Some(std::env::temp_dir().join(format!("filezer-pipeline-test-{}", Uuid::new_v4())));
        config
    }

    fn document(text: &str) -> RawDocument {
        RawDocument::new(text.as_bytes().to_vec(), Some("text/plain"), Some("doc.txt"))
            .expect("valid")
    }

    #[tokio::test]
    async fn produces_result_and_report() {
        let config = test_config();
        let pipeline = AnalysisPipeline::with_client(Box::new(OfflineAnnotationClient), &config);

        let output = pipeline
            .analyze(document("Hello, world! This is a test.\nHello again."))
            .await
            .expect("output");

        assert_eq!(output.result.total_words, 8);
        assert_eq!(output.result.total_sentences, 3);
        assert_eq!(output.result.total_lines, 2);
        assert_eq!(output.result.top_words[0].word, "hello");
        assert_eq!(output.result.top_words[0].count, 2);
        assert!(output.diagnostics.is_empty());

        let path = output.report.path().expect("artifact").to_path_buf();
        assert!(path.starts_with(config.report_dir.as_ref().expect("dir")));
        let bytes = output.report.into_bytes().await;
        let text = String::from_utf8(bytes).expect("utf8");
        assert!(text.starts_with("File Analysis Report\n\nTotal Characters: 42\n"));
        assert!(!path.exists());
        assert_eq!(pipeline.metrics_snapshot().documents_analyzed, 1);
    }

    #[tokio::test]
    async fn entity_failure_still_reaches_done() {
        let pipeline = AnalysisPipeline::with_client(
            Box::new(FlakyClient {
                calls: AtomicUsize::new(0),
            }),
            &test_config(),
        );

        let output = pipeline
            .analyze(document("Physics is fun."))
            .await
            .expect("output");

        assert!(output.result.entities.is_empty());
        assert_eq!(output.result.categories, vec!["science"]);
        assert_eq!(output.diagnostics.len(), 1);
        assert!(output.diagnostics[0].starts_with("Error performing entity recognition"));
        assert_eq!(pipeline.metrics_snapshot().annotation_failures, 1);
    }

    #[tokio::test]
    async fn empty_input_reports_zero_averages_without_annotating() {
        let client = FlakyClient {
            calls: AtomicUsize::new(0),
        };
        let pipeline = AnalysisPipeline::with_client(Box::new(client), &test_config());

        let output = pipeline.analyze(document("... !!! ???")).await.expect("output");

        assert_eq!(output.result.total_words, 0);
        assert_eq!(output.result.average_word_length, 0.0);
        assert_eq!(output.result.average_sentence_length, 0.0);
        assert!(output.diagnostics.is_empty());
        let text = String::from_utf8(output.report.into_bytes().await).expect("utf8");
        assert!(text.contains("Average Word Length: 0.00\n"));
    }

    #[tokio::test]
    async fn missing_file_is_unreadable() {
        let pipeline =
            AnalysisPipeline::with_client(Box::new(OfflineAnnotationClient), &test_config());
        let missing = std::env::temp_dir().join(format!("filezer-missing-{}.txt", Uuid::new_v4()));

        let error = pipeline.analyze_path(&missing).await.expect_err("unreadable");
        assert!(matches!(error, PipelineError::UnreadableFile { .. }));
        assert_eq!(pipeline.metrics_snapshot().documents_analyzed, 0);
    }

    #[tokio::test]
    async fn report_write_failure_is_fatal() {
        let mut config = test_config();
        let blocker = config.report_dir.clone().expect("dir");
        std::fs::write(&blocker, b"file in the way").expect("blocker");
        config.report_dir = Some(blocker.clone());
        let pipeline = AnalysisPipeline::with_client(Box::new(OfflineAnnotationClient), &config);

        let error = pipeline
            .analyze(document("Some words."))
            .await
            .expect_err("write fails");
        assert!(matches!(error, PipelineError::ReportWrite(_)));
        let _ = std::fs::remove_file(blocker);
    }

    #[test]
    fn stages_advance_in_order() {
        let mut stage = PipelineStage::Idle;
        let mut seen = vec![stage];
        while let Some(next) = stage.successor() {
            stage = next;
            seen.push(stage);
        }
        assert_eq!(
            seen,
            vec![
                PipelineStage::Idle,
                PipelineStage::Reading,
                PipelineStage::Tokenizing,
                PipelineStage::Computing,
                PipelineStage::Annotating,
                PipelineStage::Assembling,
                PipelineStage::Done,
            ]
        );
        assert!(!PipelineStage::Annotating.can_fail());
        assert!(PipelineStage::Reading.can_fail());
        assert!(PipelineStage::Assembling.can_fail());
    }
}
