//! Command-line driver for the questionnaire wizard.
//!
//! Runs the full flow in one pass: extract text and metadata from the given
//! documents, optionally take a reviewed metadata file in place of the
//! extracted one, call the generation webhook and write the resulting
//! spreadsheet. `--dump-metadata` stops after extraction so the record can
//! be reviewed and fed back with `--metadata`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use questgen::services::document::{DOCX_MIME, PDF_MIME, TXT_MIME};
use questgen::services::excel;
use questgen::{
    AppConfig, MakeWebhookClient, MetadataRecord, OpenAiGateway, UploadedDocument, WizardSession,
};

#[derive(Parser)]
#[command(name = "questgen", about = "Generate a market-research questionnaire from brief/KO documents")]
struct Cli {
    /// Brief and/or kick-off documents (.docx, .pdf or .txt)
    #[arg(required = true)]
    documents: Vec<PathBuf>,

    /// Reviewed metadata JSON to use instead of the extracted record
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// Print the extracted metadata as JSON and exit
    #[arg(long)]
    dump_metadata: bool,

    /// Directory the spreadsheet is written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn mime_for_path(path: &Path) -> Result<&'static str> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("docx") => Ok(DOCX_MIME),
        Some("pdf") => Ok(PDF_MIME),
        Some("txt") => Ok(TXT_MIME),
        _ => bail!("Unsupported file extension: {}", path.display()),
    }
}

fn load_uploads(paths: &[PathBuf]) -> Result<Vec<UploadedDocument>> {
    paths
        .iter()
        .map(|path| {
            let mime = mime_for_path(path)?;
            let data = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("document")
                .to_string();
            Ok(UploadedDocument::new(name, mime, data))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let mut session = WizardSession::new();
    session.attach_documents(load_uploads(&cli.documents)?)?;

    let ai = OpenAiGateway::new(config.ai);
    session.ensure_processed(&ai).await?;

    if cli.dump_metadata {
        println!("{}", serde_json::to_string_pretty(session.metadata())?);
        return Ok(());
    }
    if session.metadata_degraded() && cli.metadata.is_none() {
        eprintln!("warning: metadata extraction failed, continuing with an empty record");
    }

    session.confirm_processing()?;

    let form: MetadataRecord = match &cli.metadata {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&raw).context("Invalid metadata JSON")?
        }
        None => session.metadata().clone(),
    };
    session.submit_metadata(form)?;

    let webhook = MakeWebhookClient::new(config.webhook)?;
    session.generate(&webhook).await?;
    session.confirm_generation()?;
    session.finish_editing()?;

    let document = session
        .questionnaire()
        .context("No questionnaire after generation")?;
    let bytes = excel::to_xlsx_bytes(document)?;
    let file_name = excel::export_file_name(document, chrono::Local::now().naive_local());
    let out_path = cli.out_dir.join(&file_name);
    std::fs::write(&out_path, bytes)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    println!(
        "{} questions written to {}",
        session.question_count(),
        out_path.display()
    );
    Ok(())
}
