use regex::Regex;
use once_cell::sync::Lazy;
use std::fmt;

// @module: SRT document parsing and serialization

// @const: SRT timecode range, matched anywhere in the line
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{2}:\d{2}:\d{2},\d{3}\s*-->\s*\d{2}:\d{2}:\d{2},\d{3}").unwrap()
});

// @const: Two or more consecutive line breaks separate cues
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n{2,}").unwrap()
});

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Classification of a single subtitle line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Cue sequence number
    Index,
    /// `HH:MM:SS,mmm --> HH:MM:SS,mmm` line
    Timestamp,
    /// Translatable text
    Text,
    /// Empty after trimming
    Blank,
}

impl LineKind {
    /// Classify a line by its own content only
    pub fn classify(line: &str) -> Self {
        let trimmed = line.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            Self::Index
        } else if TIMESTAMP_REGEX.is_match(line) {
            Self::Timestamp
        } else if trimmed.is_empty() {
            Self::Blank
        } else {
            Self::Text
        }
    }
}

// @struct: One cue, kept as its raw lines
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    // @field: Raw lines in original order
    pub lines: Vec<String>,
}

impl Block {
    /// Creates a block from its lines
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Kind of the line at `index`
    pub fn line_kind(&self, index: usize) -> Option<LineKind> {
        self.lines.get(index).map(|line| LineKind::classify(line))
    }

    /// Positions of the translatable lines, in order
    pub fn text_line_indices(&self) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| LineKind::classify(line) == LineKind::Text)
            .map(|(idx, _)| idx)
            .collect()
    }
}

// @struct: Parsed subtitle document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubtitleDocument {
    // @field: Cues in file order
    pub blocks: Vec<Block>,
}

impl SubtitleDocument {
    /// Parse raw SRT text into blocks of lines.
    ///
    /// Never fails: anything that is not an index or timecode line is kept as
    /// text, so malformed files simply carry more translatable content.
    pub fn parse(content: &str) -> Self {
        let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
        let normalized = normalized.trim_start_matches(BYTE_ORDER_MARK);

        let blocks = BLOCK_SEPARATOR_REGEX
            .split(normalized)
            .filter(|chunk| !chunk.trim().is_empty())
            .map(|chunk| {
                let chunk = chunk.trim_end_matches('\n');
                Block::new(chunk.split('\n').map(str::to_string).collect())
            })
            .collect();

        Self { blocks }
    }

    /// Serialize back to SRT text with a single trailing line break
    pub fn to_srt_string(&self) -> String {
        let mut out = self
            .blocks
            .iter()
            .map(|block| block.lines.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n");
        out.push('\n');
        out
    }

    /// Number of cues
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document has no cues
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total number of translatable lines across all blocks
    pub fn text_line_count(&self) -> usize {
        self.blocks.iter().map(|b| b.text_line_indices().len()).sum()
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_srt_string())
    }
}

/// Decode uploaded bytes as UTF-8, dropping a BOM and replacing invalid sequences
pub fn decode_srt_bytes(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.trim_start_matches(BYTE_ORDER_MARK).to_string()
}
