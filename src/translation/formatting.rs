/*!
 * Markup protection for translated text.
 *
 * Subtitle lines carry inline tags such as `<i>`, `<b>` or
 * `<font color="#ffff00">`. Machine translation backends tend to mangle
 * them, so every tag is swapped for an opaque placeholder before the text is
 * sent and swapped back once the translation comes in.
 */

use regex::{Regex, RegexBuilder};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use unicode_normalization::UnicodeNormalization;

/// Inline markup span: `<` up to the first `>`
pub static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>").unwrap()
});

/// Placeholder map for one translation unit.
///
/// Entries are kept in insertion order so that restoration replaces
/// `__TAG0__` before `__TAG1__` and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    entries: Vec<(String, String)>,
}

impl TagMap {
    /// Number of protected tags
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tag was protected
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Placeholder tokens in insertion order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(token, _)| token.as_str())
    }

    /// Put the original tags back, consuming the map
    pub fn restore(self, text: &str) -> String {
        let mut restored = text.to_string();
        for (token, original) in &self.entries {
            restored = restored.replace(token, original);
        }
        restored
    }
}

/// Replace markup tags with placeholders
pub struct TagProtector;

impl TagProtector {
    /// Build the placeholder token for the Nth tag
    pub fn placeholder(index: usize) -> String {
        format!("__TAG{}__", index)
    }

    /// Swap every tag for a placeholder, returning the protected text and its map
    pub fn protect(text: &str) -> (String, TagMap) {
        let mut map = TagMap::default();
        let protected = TAG_REGEX.replace_all(text, |caps: &regex::Captures<'_>| {
            let token = Self::placeholder(map.entries.len());
            map.entries.push((token.clone(), caps[0].to_string()));
            token
        });
        (protected.into_owned(), map)
    }

    /// Remove every tag, used when judging what a line says
    pub fn strip(text: &str) -> String {
        TAG_REGEX.replace_all(text, "").into_owned()
    }
}

/// Normalize backend output to Unicode NFC
pub fn nfc(text: &str) -> String {
    text.nfc().collect()
}

/// Phrase substitutions applied to source text before it reaches a backend
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    rules: Vec<(Regex, String)>,
}

impl Glossary {
    /// Compile a glossary from phrase -> replacement pairs.
    ///
    /// Phrases match case-insensitively on word boundaries. Entries whose
    /// pattern cannot be compiled are skipped.
    pub fn new(entries: &BTreeMap<String, String>) -> Self {
        let rules = entries
            .iter()
            .filter(|(phrase, _)| !phrase.trim().is_empty())
            .filter_map(|(phrase, replacement)| {
                let pattern = format!(r"\b{}\b", regex::escape(phrase.trim()));
                match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                    Ok(re) => Some((re, replacement.clone())),
                    Err(e) => {
                        log::warn!("Skipping glossary entry '{}': {}", phrase, e);
                        None
                    }
                }
            })
            .collect();
        Self { rules }
    }

    /// Whether the glossary has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in turn
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (re, replacement) in &self.rules {
            out = re.replace_all(&out, regex::NoExpand(replacement.as_str())).into_owned();
        }
        out
    }
}
