/*!
 * Reassembly of translated units into the parsed document.
 *
 * A merged unit has to be split back into as many lines as it was built
 * from. The sentinel split is tried first, then embedded line breaks, and
 * finally a proportional reflow that cuts at word boundaries. Whatever the
 * backend did to whitespace, the line count of a cue never changes.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::subtitle_processor::SubtitleDocument;

use super::grouping::{LINE_SENTINEL, TranslationUnit};

static LINE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r?\n").unwrap()
});

/// Write one translated unit back into its block
pub fn reassemble_unit(document: &mut SubtitleDocument, unit: &TranslationUnit, translated: &str) {
    let Some(block) = document.blocks.get_mut(unit.block_index) else {
        return;
    };

    if unit.line_indices.len() == 1 {
        if let Some(line) = block.lines.get_mut(unit.line_indices[0]) {
            *line = collapse_whitespace(translated);
        }
        return;
    }

    let original_lengths: Vec<usize> = unit
        .line_indices
        .iter()
        .map(|&idx| block.lines.get(idx).map_or(0, |l| l.chars().count()))
        .collect();

    let parts = split_translation(translated, &original_lengths);
    for (&idx, part) in unit.line_indices.iter().zip(parts) {
        if let Some(line) = block.lines.get_mut(idx) {
            *line = part;
        }
    }
}

/// Split a merged translation into exactly `original_lengths.len()` lines
pub fn split_translation(translated: &str, original_lengths: &[usize]) -> Vec<String> {
    let n = original_lengths.len();

    let sentinel_parts: Vec<String> = translated
        .split(LINE_SENTINEL)
        .map(collapse_whitespace)
        .collect();
    if sentinel_parts.len() == n && sentinel_parts.iter().all(|p| !p.is_empty()) {
        return sentinel_parts;
    }

    let cleaned = translated.replace(LINE_SENTINEL, " ");
    let newline_parts: Vec<String> = LINE_BREAK_REGEX
        .split(&cleaned)
        .map(collapse_whitespace)
        .filter(|p| !p.is_empty())
        .collect();
    if newline_parts.len() == n {
        return newline_parts;
    }

    debug!(
        "Reflowing translation into {} lines (sentinel parts: {}, line parts: {})",
        n,
        sentinel_parts.len(),
        newline_parts.len()
    );
    reflow_to_lines(&cleaned, n, Some(original_lengths))
}

/// Single-spaced text with no line breaks, so one value is one line
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `text` into exactly `n` lines without breaking words where possible.
///
/// Cut positions are proportional to `original_lengths` when they are given
/// and sum to something, equal shares otherwise. Each cut moves to the first
/// space at or after the target, else the last space before it, else it
/// becomes a hard character cut.
pub fn reflow_to_lines(text: &str, n: usize, original_lengths: Option<&[usize]>) -> Vec<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if n <= 1 {
        return vec![collapsed];
    }

    let chars: Vec<char> = collapsed.chars().collect();
    let targets = cut_targets(chars.len(), n, original_lengths);

    let mut out = Vec::with_capacity(n);
    let mut start = 0;
    for target in targets.iter().take(n - 1) {
        while start < chars.len() && chars[start] == ' ' {
            start += 1;
        }
        let remaining = &chars[start..];
        let cut_target = remaining.len().min((*target).max(1));

        let cut = remaining[cut_target..]
            .iter()
            .position(|&c| c == ' ')
            .map(|offset| cut_target + offset)
            .or_else(|| remaining[..cut_target].iter().rposition(|&c| c == ' '))
            .unwrap_or(cut_target);

        let line: String = remaining[..cut].iter().collect();
        out.push(line.trim_end().to_string());
        start += cut;
    }

    let last: String = chars[start.min(chars.len())..].iter().collect();
    out.push(last.trim().to_string());

    out.resize(n, String::new());
    out
}

fn cut_targets(total_chars: usize, n: usize, original_lengths: Option<&[usize]>) -> Vec<usize> {
    let total = total_chars.max(1);
    match original_lengths {
        Some(lengths) if lengths.len() == n && lengths.iter().sum::<usize>() > 0 => {
            let sum: usize = lengths.iter().sum();
            lengths
                .iter()
                .map(|&len| ((len * total) as f64 / sum as f64).round() as usize)
                .collect()
        }
        _ => vec![(total as f64 / n as f64).round() as usize; n],
    }
}
