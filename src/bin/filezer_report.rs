use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use filezer::{
    annotation::OfflineAnnotationClient,
    config::Config,
    logging,
    pipeline::AnalysisPipeline,
    report::REPORT_FILENAME,
    upload::validate_extension,
};

#[derive(Parser)]
#[command(
    name = "filezer-report",
    about = "Analyze a local .txt file and write a plain-text report"
)]
struct Cli {
    /// Text file to analyze.
    input: PathBuf,
    /// Where to write the report (defaults to `file_analysis_report.txt` next to the input).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Skip the annotation service; entities and categories stay empty.
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    logging::init_cli_tracing();

    let filename = cli
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    validate_extension(&filename).with_context(|| format!("cannot analyze {filename:?}"))?;

    let pipeline = if cli.offline {
        AnalysisPipeline::with_client(Box::new(OfflineAnnotationClient), &Config::offline())
    } else {
        let config = Config::from_env().context("failed to load configuration")?;
        AnalysisPipeline::new(&config).context("failed to build annotation client")?
    };

    let output = pipeline
        .analyze_path(&cli.input)
        .await
        .with_context(|| format!("failed to analyze {}", cli.input.display()))?;
    for diagnostic in &output.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    let destination = cli.output.unwrap_or_else(|| {
        cli.input
            .parent()
            .map(|dir| dir.join(REPORT_FILENAME))
            .unwrap_or_else(|| PathBuf::from(REPORT_FILENAME))
    });
    let bytes = output.report.into_bytes().await;
    tokio::fs::write(&destination, &bytes)
        .await
        .with_context(|| format!("failed to write {}", destination.display()))?;
    println!(
        "Wrote {} ({} words, {} sentences)",
        destination.display(),
        output.result.total_words,
        output.result.total_sentences
    );
    Ok(())
}
