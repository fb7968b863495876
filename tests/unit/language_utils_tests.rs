/*!
 * Tests for language code utilities
 */

use srtxlate::language_utils::{
    UNKNOWN_SUFFIX, get_language_name, is_canonical, normalize_lang_code, short_code,
    target_suffix_for_filename,
};

#[test]
fn test_normalize_withNorwegianAliases_shouldAllMapToBokmal() {
    for alias in ["nb", "no", "nob", "NB"] {
        assert_eq!(normalize_lang_code(alias), "nob_Latn", "alias {}", alias);
    }
    assert_eq!(normalize_lang_code("nn"), "nno_Latn");
}

#[test]
fn test_normalize_withCanonicalCode_shouldPassThrough() {
    assert!(is_canonical("fra_Latn"));
    assert_eq!(normalize_lang_code("fra_Latn"), "fra_Latn");
    assert_eq!(normalize_lang_code("xyz_Abcd"), "xyz_Abcd");
}

#[test]
fn test_normalize_withUnknownAlias_shouldPassThroughUnchanged() {
    assert!(!is_canonical("klingon"));
    assert_eq!(normalize_lang_code("klingon"), "klingon");
}

#[test]
fn test_suffix_withAliasOrCanonical_shouldAgree() {
    assert_eq!(target_suffix_for_filename("nb"), "nb");
    assert_eq!(target_suffix_for_filename("no"), "nb");
    assert_eq!(target_suffix_for_filename("nob_Latn"), "nb");
    assert_eq!(target_suffix_for_filename("swe_Latn"), "sv");
}

#[test]
fn test_suffix_withUnlistedCanonical_shouldUseFirstSegment() {
    assert_eq!(target_suffix_for_filename("isl_Latn"), "isl");
    assert_eq!(target_suffix_for_filename("   "), UNKNOWN_SUFFIX);
}

#[test]
fn test_short_code_withCanonicalCodes_shouldReturnTwoLetters() {
    assert_eq!(short_code("eng_Latn"), "en");
    assert_eq!(short_code("nno_Latn"), "nn");
    assert_eq!(short_code("deu_Latn"), "de");
    assert_eq!(short_code("AUTO"), "auto");
}

#[test]
fn test_language_name_withFloresCode_shouldResolve() {
    assert_eq!(get_language_name("eng_Latn").unwrap(), "English");
    assert_eq!(get_language_name("de").unwrap(), "German");
    assert!(get_language_name("qq").is_err());
}
