use once_cell::sync::Lazy;
use regex::Regex;

use quizscan_core::{CHOICE_COUNT, QuestionDraft};

use crate::config::ParsingConfig;

/// A choice label anywhere in the text: `A)`, `B.`, `C )`.
static LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-D]\s*[).]").unwrap());

/// Which extraction tier produced a question's choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceTier {
    /// Inline `A) .. B) ..` label/value pairs.
    Labeled,
    /// Labels were present but too few pairs matched; choices taken line by line.
    LabeledLines,
    /// `question | a | b | c | d` shorthand.
    Pipe,
    /// No recognizable choices; the reviewer has to supply them.
    Bare,
}

/// One header-matching block after choice extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBlock {
    pub question: QuestionDraft,
    pub tier: ChoiceTier,
}

/// Turns acquired document text into unnormalized question drafts.
#[derive(Debug, Clone, Default)]
pub struct QuestionParser {
    config: ParsingConfig,
}

impl QuestionParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Parse `text` into drafts sorted by id (missing ids first).
    ///
    /// Drafts never carry an answer key or points; `choices` holds between
    /// zero and four entries.
    pub fn parse(&self, text: &str) -> Vec<QuestionDraft> {
        self.parse_blocks(text)
            .into_iter()
            .map(|b| b.question)
            .collect()
    }

    /// Like [`parse`](Self::parse), but also reports which tier each
    /// question's choices came from.
    pub fn parse_blocks(&self, text: &str) -> Vec<ParsedBlock> {
        let normalized = normalize_lines(text);
        let blocks = self.split_blocks(&normalized);
        let total = blocks.len();

        let mut parsed: Vec<ParsedBlock> = blocks
            .into_iter()
            .filter_map(|block| self.parse_block(block))
            .collect();
        parsed.sort_by_key(|b| b.question.sort_key());

        tracing::debug!(
            blocks = total,
            questions = parsed.len(),
            "segmented question blocks"
        );
        parsed
    }

    /// Split normalized text at every line that opens a new numbered question.
    fn split_blocks<'a>(&self, text: &'a str) -> Vec<&'a str> {
        static BLOCK_START_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\n\s*[0-9]+\s*[).]").unwrap());

        let re = self
            .config
            .block_start_re
            .as_ref()
            .unwrap_or(&BLOCK_START_RE);

        let mut blocks = Vec::new();
        let mut start = 0;
        for m in re.find_iter(text) {
            blocks.push(&text[start..m.start()]);
            start = if m.as_str().starts_with('\n') {
                m.start() + 1
            } else {
                m.start()
            };
        }
        blocks.push(&text[start..]);
        blocks
    }

    /// Match the block header and extract question text and choices.
    /// Returns `None` for preamble or noise that has no numbered header.
    fn parse_block(&self, block: &str) -> Option<ParsedBlock> {
        static HEADER_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"(?s)^\s*([0-9]+)\s*[).]\s*(.*)$").unwrap());

        let re = self.config.header_re.as_ref().unwrap_or(&HEADER_RE);
        let caps = re.captures(block)?;

        // Ordinals too large for u32 are treated as missing.
        let id = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
        let rest = caps
            .get(2)
            .map(|m| m.as_str().trim().replace('\r', ""))
            .unwrap_or_default();

        let (text, choices, tier) = self.extract_choices(&rest);
        Some(ParsedBlock {
            question: QuestionDraft::parsed(id, text, choices),
            tier,
        })
    }

    /// Ordered fallback tiers: labeled choices, then pipe shorthand, then a
    /// bare question.
    fn extract_choices(&self, working: &str) -> (String, Vec<String>, ChoiceTier) {
        if has_choice_labels(working) {
            return self.extract_labeled(working);
        }

        let delimiter = self.config.pipe_delimiter;
        if working.contains(delimiter) {
            let mut fields = working.split(delimiter).map(str::trim);
            let text = fields.next().unwrap_or_default().to_string();
            let choices = fields.take(CHOICE_COUNT).map(str::to_string).collect();
            return (text, choices, ChoiceTier::Pipe);
        }

        (working.to_string(), Vec::new(), ChoiceTier::Bare)
    }

    fn extract_labeled(&self, working: &str) -> (String, Vec<String>, ChoiceTier) {
        // Inline pairs: a label, optional punctuation, then everything up to the
        // next capital A-D. Values containing those capitals get cut short.
        static PAIR_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"([A-D])\s*[).]?\s*([^A-D]+)").unwrap());
        static LINE_LABEL_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^[A-D]\s*[).]?\s*").unwrap());

        // The first label decides where the prompt ends, even if that "label"
        // is really prose like "Part A." in the question itself.
        let cut = LABEL_RE.find(working).map_or(0, |m| m.start());
        let text = working[..cut].trim().to_string();
        let region = working[cut..].trim();

        let pairs: Vec<&str> = PAIR_RE
            .captures_iter(region)
            .map(|c| c.get(2).map_or("", |m| m.as_str()).trim())
            .collect();

        if pairs.len() >= self.config.min_choice_pairs {
            let choices = pairs
                .into_iter()
                .take(CHOICE_COUNT)
                .map(str::to_string)
                .collect();
            return (text, choices, ChoiceTier::Labeled);
        }

        let choices = region
            .split('\n')
            .map(|line| LINE_LABEL_RE.replace(line, "").trim().to_string())
            .filter(|line| !line.is_empty())
            .take(CHOICE_COUNT)
            .collect();
        (text, choices, ChoiceTier::LabeledLines)
    }
}

/// Parse `text` with the default configuration.
pub fn parse_questions(text: &str) -> Vec<QuestionDraft> {
    QuestionParser::new().parse(text)
}

/// Trim every line and drop blank ones. In-line content is untouched.
pub fn normalize_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether a choice label starts anywhere past the first character.
///
/// A lone label at offset 0 doesn't count: it would leave nothing in front of
/// it to be the question text.
fn has_choice_labels(text: &str) -> bool {
    LABEL_RE.find_iter(text).any(|m| m.start() > 0)
}
