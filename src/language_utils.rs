//! Language utilities for translation backend codes
//!
//! The neural model server speaks FLORES-200 codes (`nob_Latn`), the remote
//! translation service and the filename convention use short ISO 639-1
//! codes (`nb`). This module maps between the two.

use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Short alias -> FLORES-200 code, in preference order for reverse lookups
const ALIASES: &[(&str, &str)] = &[
    ("en", "eng_Latn"), ("eng", "eng_Latn"),
    ("nb", "nob_Latn"), ("no", "nob_Latn"), ("nob", "nob_Latn"),
    ("nn", "nno_Latn"),
    ("sv", "swe_Latn"), ("da", "dan_Latn"), ("fi", "fin_Latn"),
    ("de", "deu_Latn"), ("fr", "fra_Latn"), ("es", "spa_Latn"),
    ("it", "ita_Latn"), ("pt", "por_Latn"), ("nl", "nld_Latn"),
    ("pl", "pol_Latn"), ("ru", "rus_Cyrl"), ("uk", "ukr_Cyrl"),
    ("zh", "zho_Hans"), ("ja", "jpn_Jpan"), ("ko", "kor_Hang"),
    ("tr", "tur_Latn"), ("ar", "arb_Arab"),
    ("cs", "ces_Latn"), ("hu", "hun_Latn"), ("ro", "ron_Latn"),
    ("el", "ell_Grek"), ("he", "heb_Hebr"), ("id", "ind_Latn"),
    ("vi", "vie_Latn"), ("th", "tha_Thai"), ("hi", "hin_Deva"),
    ("bn", "ben_Beng"), ("ur", "urd_Arab"), ("ta", "tam_Taml"),
    ("fa", "pes_Arab"), ("sr", "srp_Cyrl"), ("hr", "hrv_Latn"),
];

/// Suffix used when no code is available at all
pub const UNKNOWN_SUFFIX: &str = "und";

static ALIAS_TO_FLORES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    ALIASES.iter().copied().collect()
});

// First alias listed for a FLORES code wins, so two-letter forms are preferred
static FLORES_TO_SHORT: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (alias, flores) in ALIASES {
        map.entry(*flores).or_insert(*alias);
    }
    map
});

/// Whether a code is already in canonical `lll_Ssss` form
pub fn is_canonical(code: &str) -> bool {
    code.contains('_')
}

/// Normalize a short alias to its FLORES-200 code.
///
/// Codes that already contain `_` pass through untouched, unknown aliases
/// pass through trimmed.
pub fn normalize_lang_code(code: &str) -> String {
    let code = code.trim();
    if is_canonical(code) {
        return code.to_string();
    }
    ALIAS_TO_FLORES
        .get(code.to_lowercase().as_str())
        .map(|flores| flores.to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Short suffix for output filenames, e.g. `nob_Latn` -> `nb`
pub fn target_suffix_for_filename(code: &str) -> String {
    let canonical = normalize_lang_code(code);
    if let Some(short) = FLORES_TO_SHORT.get(canonical.as_str()) {
        return short.to_string();
    }
    let first = canonical.split('_').next().unwrap_or_default();
    let suffix: String = first.chars().take(3).collect::<String>().to_lowercase();
    if suffix.is_empty() {
        UNKNOWN_SUFFIX.to_string()
    } else {
        suffix
    }
}

/// Two-letter code for services that only accept ISO 639-1.
///
/// `auto` is kept as-is so the remote service can detect the language.
pub fn short_code(code: &str) -> String {
    let code = code.trim();
    if code.eq_ignore_ascii_case("auto") {
        return "auto".to_string();
    }
    if let Some(short) = FLORES_TO_SHORT.get(normalize_lang_code(code).as_str()) {
        if short.len() == 2 {
            return short.to_string();
        }
    }
    let first = code.split('_').next().unwrap_or_default().to_lowercase();
    if let Some(lang) = Language::from_639_3(&first) {
        if let Some(part1) = lang.to_639_1() {
            return part1.to_string();
        }
    }
    first.chars().take(2).collect()
}

/// Get the English language name for an alias or FLORES code
pub fn get_language_name(code: &str) -> Result<String> {
    let canonical = normalize_lang_code(code);
    let first = canonical.split('_').next().unwrap_or_default().to_lowercase();

    let language = match first.len() {
        2 => Language::from_639_1(&first),
        3 => Language::from_639_3(&first),
        _ => None,
    };

    language
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language code: {}", code))
}
