use std::io::Write;

use owo_colors::OwoColorize;
use quizscan_core::Question;
use quizscan_ingest::{Acquisition, TextSource};
use quizscan_parsing::ChoiceTier;

const LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn tier_label(tier: ChoiceTier) -> &'static str {
    match tier {
        ChoiceTier::Labeled => "labeled",
        ChoiceTier::LabeledLines => "labeled, line by line",
        ChoiceTier::Pipe => "pipe",
        ChoiceTier::Bare => "no choices found",
    }
}

/// Print every question with its four choice slots. `tiers` may be shorter
/// than `questions` (or empty) when the tier is unknown.
pub fn print_questions(
    w: &mut dyn Write,
    questions: &[Question],
    tiers: &[ChoiceTier],
    color: ColorMode,
) -> std::io::Result<()> {
    for (i, q) in questions.iter().enumerate() {
        let header = format!("[{}]", q.id);
        let tier = tiers.get(i).map(|t| format!(" ({})", tier_label(*t)));
        if color.enabled() {
            writeln!(
                w,
                "{} {}{}",
                header.bold().yellow(),
                q.text,
                tier.unwrap_or_default().dimmed()
            )?;
        } else {
            writeln!(w, "{} {}{}", header, q.text, tier.unwrap_or_default())?;
        }

        for (label, choice) in LABELS.iter().zip(&q.choices) {
            if choice.is_empty() {
                if color.enabled() {
                    writeln!(w, "    {}) {}", label, "(empty)".dimmed())?;
                } else {
                    writeln!(w, "    {}) (empty)", label)?;
                }
            } else {
                writeln!(w, "    {}) {}", label, choice)?;
            }
        }
        writeln!(w)?;
    }
    Ok(())
}

/// One-line summary of where the text came from and how many questions it
/// produced, followed by any recovered failures.
pub fn print_summary(
    w: &mut dyn Write,
    file_name: &str,
    acquisition: &Acquisition,
    parsed_count: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let source = match acquisition.source {
        TextSource::Direct => "embedded text".to_string(),
        TextSource::Recognition => format!("OCR of {} page(s)", acquisition.pages.len()),
        TextSource::Nothing => "no text".to_string(),
    };

    if color.enabled() {
        let count = format!("{} question(s)", parsed_count);
        let count = if parsed_count == 0 {
            count.red().to_string()
        } else {
            count.green().to_string()
        };
        writeln!(w, "{}: {} from {}", file_name.bold(), count, source)?;
    } else {
        writeln!(w, "{}: {} question(s) from {}", file_name, parsed_count, source)?;
    }

    for failure in &acquisition.failures {
        if color.enabled() {
            writeln!(w, "  {} {}", "note:".yellow(), failure)?;
        } else {
            writeln!(w, "  note: {}", failure)?;
        }
    }
    Ok(())
}

/// `{parsedCount, questions}`, the same shape the upload endpoint returns.
pub fn questions_json(questions: &[Question]) -> serde_json::Value {
    serde_json::json!({
        "parsedCount": questions.len(),
        "questions": questions,
    })
}
