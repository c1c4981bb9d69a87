pub mod config;
pub mod normalize;
pub mod parser;

pub use config::{ParsingConfig, ParsingConfigBuilder};
pub use normalize::{normalize, sort_and_normalize};
pub use parser::{ChoiceTier, ParsedBlock, QuestionParser, normalize_lines, parse_questions};
// Re-export domain types from core (canonical definitions live there)
pub use quizscan_core::{Question, QuestionDraft};

/// Parse and normalize in one step: text in, review-ready questions out.
///
/// Pipeline:
/// 1. Trim lines and drop blank ones
/// 2. Split into numbered question blocks, discarding preamble
/// 3. Extract question text and up to four choices per block
///    (labeled → line-by-line → pipe shorthand → bare)
/// 4. Sort by id and normalize to exactly four choice slots
pub fn extract_questions(text: &str) -> Vec<Question> {
    normalize(parse_questions(text))
}
