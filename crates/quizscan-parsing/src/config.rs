use regex::Regex;

/// Configuration for the question parser.
///
/// Regex fields are `Option<Regex>`; `None` means "use the built-in default".
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
/// `ParsingConfig::default()` gives the standard exam-sheet behavior.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    /// Regex marking the start of a new question block. Text is split at the
    /// start of each match; a leading `\n` in the match is consumed and the
    /// rest stays with the following block.
    pub(crate) block_start_re: Option<Regex>,
    /// Regex recognizing a block header. Must capture the ordinal as group 1
    /// and the remainder of the block as group 2.
    pub(crate) header_re: Option<Regex>,
    /// Separator for the `question | a | b | c | d` shorthand.
    pub(crate) pipe_delimiter: char,
    /// Minimum number of label/value pairs before inline choice extraction is
    /// trusted over line-by-line extraction (default: 2).
    pub(crate) min_choice_pairs: usize,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            block_start_re: None,
            header_re: None,
            pipe_delimiter: '|',
            min_choice_pairs: 2,
        }
    }
}

impl ParsingConfig {
    pub fn pipe_delimiter(&self) -> char {
        self.pipe_delimiter
    }

    pub fn min_choice_pairs(&self) -> usize {
        self.min_choice_pairs
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    block_start_re: Option<String>,
    header_re: Option<String>,
    pipe_delimiter: Option<char>,
    min_choice_pairs: Option<usize>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_start_regex(mut self, pattern: &str) -> Self {
        self.block_start_re = Some(pattern.to_string());
        self
    }

    pub fn header_regex(mut self, pattern: &str) -> Self {
        self.header_re = Some(pattern.to_string());
        self
    }

    pub fn pipe_delimiter(mut self, delimiter: char) -> Self {
        self.pipe_delimiter = Some(delimiter);
        self
    }

    pub fn min_choice_pairs(mut self, n: usize) -> Self {
        self.min_choice_pairs = Some(n);
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let compile = |opt: Option<String>| -> Result<Option<Regex>, regex::Error> {
            opt.map(|p| Regex::new(&p)).transpose()
        };

        Ok(ParsingConfig {
            block_start_re: compile(self.block_start_re)?,
            header_re: compile(self.header_re)?,
            pipe_delimiter: self.pipe_delimiter.unwrap_or('|'),
            min_choice_pairs: self.min_choice_pairs.unwrap_or(2),
        })
    }
}
