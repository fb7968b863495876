/*!
 * # srtxlate - structure-preserving SRT translation
 *
 * A Rust library for translating SubRip subtitles through machine-translation
 * backends without disturbing the subtitle structure.
 *
 * ## Features
 *
 * - Lenient SRT parsing: malformed input is carried through, never rejected
 * - Markup protection: `<i>`, `<font ...>` and friends survive translation
 * - Cue grouping: dialogue lines are merged per cue, sound cues stand alone
 * - Backends:
 *   - NLLB-200 model server
 *   - CTranslate2 Marian model server
 *   - LibreTranslate
 *   - Pass-through
 * - Ordered fallback in `auto` mode with monotonic progress reporting
 * - Reflow of translated text back into the original number of lines
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT parsing and serialization
 * - `translation`: The translation pipeline:
 *   - `translation::core`: Parse, group, dispatch, reassemble, serialize
 *   - `translation::batch`: Batch dispatch with backend fallback
 *   - `translation::formatting`: Markup protection and normalisation
 *   - `translation::grouping`: Cue grouping
 *   - `translation::reflow`: Line reassembly
 *   - `translation::progress`: Progress reporting and job registry
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Language code normalization
 * - `providers`: Backend clients
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, TranslationEngine};
pub use subtitle_processor::{Block, LineKind, SubtitleDocument};
pub use translation::TranslationService;
pub use language_utils::{get_language_name, normalize_lang_code, target_suffix_for_filename};
pub use errors::{AppError, ProviderError, SubtitleError, TranslationError};
