/*!
 * Cue grouping into translation units.
 *
 * Ordinary dialogue lines of a cue are merged into one unit so a sentence
 * broken over two subtitle lines is translated as a whole. Short all-caps
 * lines such as `[DOOR OPENS]` or `SIRENS WAIL` stand alone so they are never
 * fused into the neighbouring sentence.
 */

use crate::subtitle_processor::SubtitleDocument;

use super::formatting::TagProtector;

/// Join token placed between merged lines; the reassembler splits on it
pub const LINE_SENTINEL: &str = "__NL__";

/// Longest line, in characters, still treated as a marker
pub const MAX_MARKER_CHARS: usize = 40;

/// One string sent to a backend, tied back to the lines it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    /// Text to translate
    pub text: String,
    /// Index of the block in the document
    pub block_index: usize,
    /// Line positions within that block, ascending
    pub line_indices: Vec<usize>,
}

impl TranslationUnit {
    /// Whether this unit merges more than one source line
    pub fn is_merged(&self) -> bool {
        self.line_indices.len() > 1
    }
}

/// Whether a text line is a short sound or stage cue
pub fn is_marker_line(line: &str) -> bool {
    let stripped = TagProtector::strip(line);
    let text = stripped.trim();
    if text.is_empty() || text.chars().count() > MAX_MARKER_CHARS {
        return false;
    }
    text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_lowercase)
}

/// Build the translation units for a whole document, in document order
pub fn group_document(document: &SubtitleDocument) -> Vec<TranslationUnit> {
    let mut units = Vec::new();
    for (block_index, block) in document.blocks.iter().enumerate() {
        let text_indices = block.text_line_indices();
        group_block(block_index, &block.lines, &text_indices, &mut units);
    }
    units
}

fn group_block(
    block_index: usize,
    lines: &[String],
    text_indices: &[usize],
    units: &mut Vec<TranslationUnit>,
) {
    let mut run: Vec<usize> = Vec::new();

    for &line_index in text_indices {
        let line = &lines[line_index];
        if is_marker_line(line) {
            flush_run(block_index, lines, &mut run, units);
            units.push(TranslationUnit {
                text: line.clone(),
                block_index,
                line_indices: vec![line_index],
            });
        } else {
            run.push(line_index);
        }
    }

    flush_run(block_index, lines, &mut run, units);
}

fn flush_run(
    block_index: usize,
    lines: &[String],
    run: &mut Vec<usize>,
    units: &mut Vec<TranslationUnit>,
) {
    if run.is_empty() {
        return;
    }
    let separator = format!(" {} ", LINE_SENTINEL);
    let text = run
        .iter()
        .map(|&idx| lines[idx].as_str())
        .collect::<Vec<_>>()
        .join(&separator);
    units.push(TranslationUnit {
        text,
        block_index,
        line_indices: std::mem::take(run),
    });
}
