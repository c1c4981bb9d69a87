use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use quizscan_core::config_file::{self, ExtractionConfig};
use quizscan_ingest::QuestionPipeline;

mod output;

use output::ColorMode;

/// Extract multiple-choice questions from exam-sheet PDFs
#[derive(Parser, Debug)]
#[command(name = "quizscan", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Overrides for the `[extraction]` config table.
#[derive(Args, Debug, Default)]
struct ExtractionArgs {
    /// Tesseract language code(s), e.g. `eng+tur`
    #[arg(long)]
    ocr_lang: Option<String>,

    /// Embedded text must be longer than this to skip OCR
    #[arg(long)]
    min_direct_chars: Option<usize>,

    /// Page rendering resolution in DPI
    #[arg(long)]
    dpi: Option<u32>,
}

impl ExtractionArgs {
    fn apply(self, mut config: ExtractionConfig) -> ExtractionConfig {
        if self.ocr_lang.is_some() {
            config.ocr_language = self.ocr_lang;
        }
        if self.min_direct_chars.is_some() {
            config.min_direct_chars = self.min_direct_chars;
        }
        if self.dpi.is_some() {
            config.resolution = self.dpi;
        }
        config
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract questions from a PDF (or a plain-text file with --from-text)
    Extract {
        /// Path to the PDF or text file
        file_path: PathBuf,

        /// Treat the input as already-acquired text and only parse it
        #[arg(long)]
        from_text: bool,

        /// Print `{parsedCount, questions}` as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        extraction: ExtractionArgs,
    },

    /// Print the acquired text of a PDF and where it came from
    Text {
        /// Path to the PDF
        file_path: PathBuf,

        #[command(flatten)]
        extraction: ExtractionArgs,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    // CLI flags > env vars > config files > defaults
    let config = config_file::apply_env(config_file::load_config());

    match cli.command {
        Command::Extract {
            file_path,
            from_text,
            json,
            no_color,
            output,
            extraction,
        } => {
            let pipeline = QuestionPipeline::from_config(&extraction.apply(config.extraction()));
            extract(&pipeline, &file_path, from_text, json, no_color, output)
        }
        Command::Text {
            file_path,
            extraction,
        } => {
            let pipeline = QuestionPipeline::from_config(&extraction.apply(config.extraction()));
            print_text(&pipeline, &file_path)
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn extract(
    pipeline: &QuestionPipeline,
    file_path: &Path,
    from_text: bool,
    json: bool,
    no_color: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let color = ColorMode(!no_color && !json && output.is_none());
    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };

    let file_name = display_name(file_path);

    if from_text {
        let text = std::fs::read_to_string(file_path)?;
        let (questions, tiers) = pipeline.parse_text(&text);
        if json {
            writeln!(
                writer,
                "{}",
                serde_json::to_string_pretty(&output::questions_json(&questions))?
            )?;
        } else {
            output::print_questions(&mut writer, &questions, &tiers, color)?;
            writeln!(writer, "{}: {} question(s) parsed", file_name, questions.len())?;
        }
        return Ok(());
    }

    let bytes = std::fs::read(file_path)?;
    let result = pipeline.process(&bytes);

    if json {
        writeln!(
            writer,
            "{}",
            serde_json::to_string_pretty(&output::questions_json(&result.questions))?
        )?;
    } else {
        output::print_questions(&mut writer, &result.questions, &result.tiers, color)?;
        output::print_summary(
            &mut writer,
            &file_name,
            &result.acquisition,
            result.parsed_count(),
            color,
        )?;
    }
    Ok(())
}

fn print_text(pipeline: &QuestionPipeline, file_path: &Path) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }
    let bytes = std::fs::read(file_path)?;
    let acquisition = pipeline.acquirer().acquire_text(&bytes);

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", acquisition.text)?;
    eprintln!("source: {}", acquisition.source.as_str());
    for failure in &acquisition.failures {
        eprintln!("note: {}", failure);
    }
    Ok(())
}
