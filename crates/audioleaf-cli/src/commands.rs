//! Subcommand implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};
use clap::{Args, ValueEnum};
use tokio::sync::mpsc;
use tracing::debug;

use audioleaf_convert::{ConversionKind, ConversionService, ProgressCallback, SourceFile};
use audioleaf_core::{AudioleafConfig, Document, ExtractionProgress, ExtractionResult, PageSource};
use audioleaf_extractors::Orchestrator;

#[derive(Args)]
pub struct ExtractCommand {
    /// PDF or Word document to read
    file: PathBuf,

    /// Print the result as JSON instead of page blocks
    #[arg(long)]
    json: bool,
}

impl ExtractCommand {
    pub async fn execute(self, config: AudioleafConfig) -> Result<()> {
        let document = Document::from_path(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;

        let orchestrator = Orchestrator::builder(config.extraction).build();
        debug!(strategies = ?orchestrator.strategy_names(), "Extraction chain");

        let (tx, mut rx) = mpsc::unbounded_channel::<ExtractionProgress>();
        let printer = tokio::spawn(async move {
            while let Some(update) = rx.recv().await {
                eprintln!("[{:>3.0}%] {}", update.percent, update.step_label);
            }
        });

        let outcome = orchestrator
            .extract_with_progress(&document, Some(tx))
            .await;
        orchestrator.shutdown().await;
        // The sender is gone once extraction returns, so the printer drains and exits.
        let _ = printer.await;

        let result = outcome.map_err(|e| anyhow!(e.user_message()))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_pages(&result);
        }
        Ok(())
    }
}

fn print_pages(result: &ExtractionResult) {
    for page in result.pages() {
        println!(
            "--- Page {} ({}) ---",
            page.page_number,
            source_label(page.source)
        );
        println!("{}\n", page.text);
    }
    eprintln!(
        "{} page(s) extracted via {}",
        result.total_pages(),
        result.strategy()
    );
}

fn source_label(source: PageSource) -> &'static str {
    match source {
        PageSource::Parsed => "text layer",
        PageSource::Recognized => "ocr",
        PageSource::Heuristic => "heuristic",
        PageSource::Diagnostic => "note",
    }
}

/// Conversion direction as spelled on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Target {
    /// PDF to .docx
    Word,
    /// .docx or .doc to PDF
    Pdf,
}

impl From<Target> for ConversionKind {
    fn from(target: Target) -> Self {
        match target {
            Target::Word => ConversionKind::PdfToWord,
            Target::Pdf => ConversionKind::WordToPdf,
        }
    }
}

#[derive(Args)]
pub struct ConvertCommand {
    /// File to convert
    file: PathBuf,

    /// Output format
    #[arg(long, value_enum)]
    to: Target,

    /// Directory for the converted file
    #[arg(short, long, default_value = ".")]
    out: PathBuf,
}

impl ConvertCommand {
    pub async fn execute(self, config: AudioleafConfig) -> Result<()> {
        let source = SourceFile::from_path(&self.file)
            .await
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        let service = ConversionService::new(config.conversion)?;

        let on_progress: ProgressCallback = Arc::new(|percent: f32| {
            eprintln!("[{percent:>3.0}%] converting");
        });
        let converted = service
            .convert(&source, self.to.into(), Some(on_progress))
            .await?;

        let path = converted
            .save_to(&self.out)
            .await
            .with_context(|| format!("Failed to write into {}", self.out.display()))?;

        println!("{}", path.display());
        eprintln!(
            "{} bytes, {} ({})",
            converted.byte_size(),
            converted.media_type(),
            converted.location()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_maps_to_direction() {
        assert_eq!(ConversionKind::from(Target::Word), ConversionKind::PdfToWord);
        assert_eq!(ConversionKind::from(Target::Pdf), ConversionKind::WordToPdf);
    }

    #[test]
    fn test_source_labels_are_distinct() {
        let labels = [
            source_label(PageSource::Parsed),
            source_label(PageSource::Recognized),
            source_label(PageSource::Heuristic),
            source_label(PageSource::Diagnostic),
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_convert_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("lecture.pdf");
        std::fs::write(&input, b"%PDF-1.4 body").unwrap();

        let cmd = ConvertCommand {
            file: input,
            to: Target::Word,
            out: dir.path().to_path_buf(),
        };
        cmd.execute(AudioleafConfig::default()).await.unwrap();

        assert!(dir.path().join("lecture.docx").exists());
    }

    #[tokio::test]
    async fn test_extract_rejects_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, b"plain text").unwrap();

        let cmd = ExtractCommand {
            file: input,
            json: true,
        };
        let err = cmd.execute(AudioleafConfig::default()).await.unwrap_err();
        assert!(err.to_string().starts_with("Invalid file format"));
    }
}
