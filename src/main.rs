mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use precinct_analysis::{AnalysisOutcome, Analyzer};
use precinct_extract::{DocumentKind, RawDocument};
use precinct_models::ModelRegistry;

use crate::config::Config;

/// Structured analysis of police feedback documents.
#[derive(Debug, Parser)]
#[command(name = "precinct", version, about)]
struct Cli {
    /// Feedback document to analyze (PDF or plain text).
    file: PathBuf,

    /// Override the document kind inferred from the file extension.
    #[arg(long, value_enum)]
    kind: Option<KindArg>,

    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Print the report as a single JSON line.
    #[arg(long)]
    compact: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum KindArg {
    Pdf,
    Text,
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Pdf => Self::Pdf,
            KindArg::Text => Self::PlainText,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_subscriber();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    let kind = match cli.kind {
        Some(kind) => kind.into(),
        None => detect_kind(&cli.file)?,
    };
    let bytes = std::fs::read(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;

    let registry = ModelRegistry::global(&config.models)
        .await
        .context("model initialization failed")?;
    let analyzer = Analyzer::new(registry);

    match analyzer.analyze(RawDocument::new(bytes, kind)).await? {
        AnalysisOutcome::Report(report) => {
            let rendered = if cli.compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{rendered}");
            Ok(ExitCode::SUCCESS)
        }
        AnalysisOutcome::NoText => {
            eprintln!("no text extracted: nothing to analyze");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn detect_kind(path: &Path) -> anyhow::Result<DocumentKind> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    DocumentKind::from_extension(ext).with_context(|| {
        format!(
            "cannot infer document kind from '{}', pass --kind",
            path.display()
        )
    })
}

fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_kind_for_pdf_path() {
        let kind = detect_kind(Path::new("feedback.pdf")).unwrap();
        assert_eq!(kind, DocumentKind::Pdf);
    }

    #[test]
    fn detect_kind_for_text_paths() {
        assert_eq!(
            detect_kind(Path::new("notes.txt")).unwrap(),
            DocumentKind::PlainText
        );
        assert_eq!(
            detect_kind(Path::new("/tmp/report.md")).unwrap(),
            DocumentKind::PlainText
        );
    }

    #[test]
    fn detect_kind_rejects_unknown_extension() {
        assert!(detect_kind(Path::new("feedback.docx")).is_err());
        assert!(detect_kind(Path::new("no_extension")).is_err());
    }

    #[test]
    fn kind_arg_maps_to_document_kind() {
        assert_eq!(DocumentKind::from(KindArg::Pdf), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from(KindArg::Text), DocumentKind::PlainText);
    }

    #[test]
    fn cli_parses_minimal_invocation() {
        let cli = Cli::try_parse_from(["precinct", "feedback.pdf"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("feedback.pdf"));
        assert!(cli.kind.is_none());
        assert!(!cli.compact);
    }

    #[test]
    fn cli_parses_kind_override() {
        let cli =
            Cli::try_parse_from(["precinct", "blob.bin", "--kind", "text", "--compact"]).unwrap();
        assert!(matches!(cli.kind, Some(KindArg::Text)));
        assert!(cli.compact);
    }

    #[test]
    fn cli_requires_a_file() {
        assert!(Cli::try_parse_from(["precinct"]).is_err());
    }
}
