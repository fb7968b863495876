/*!
 * Structure-preserving subtitle translation.
 *
 * This module contains the translation pipeline. It is split into several
 * submodules:
 *
 * - `core`: The service running parse, group, dispatch, reassemble, serialize
 * - `batch`: Batch dispatch with backend fallback
 * - `formatting`: Markup protection, NFC normalisation and the glossary
 * - `grouping`: Cue grouping into translation units
 * - `reflow`: Splitting translated units back into lines
 * - `progress`: Progress reporting and the job registry
 */

// Re-export main types for easier usage
pub use self::batch::BatchDispatcher;
pub use self::core::TranslationService;
pub use self::formatting::{Glossary, TagMap, TagProtector};
pub use self::grouping::{LINE_SENTINEL, TranslationUnit, group_document};
pub use self::progress::{JobProgress, JobStatus, ProgressRegistry, ProgressUpdate};

// Submodules
pub mod batch;
pub mod core;
pub mod formatting;
pub mod grouping;
pub mod progress;
pub mod reflow;
