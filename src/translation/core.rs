/*!
 * Core translation service implementation.
 *
 * `TranslationService` runs the whole pipeline for one document:
 * parse, group, dispatch, reassemble and serialize. Timing lines, indices
 * and the block layout come out exactly as they went in; only text lines
 * are replaced.
 */

use log::{debug, info};
use std::time::Instant;

use crate::app_config::{Config, TranslationEngine};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::{BackendKind, BackendSet};
use crate::subtitle_processor::{SubtitleDocument, decode_srt_bytes};

use super::batch::BatchDispatcher;
use super::formatting::Glossary;
use super::grouping::group_document;
use super::reflow::reassemble_unit;

/// Translation service for SRT documents
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Batches units and handles backend fallback
    dispatcher: BatchDispatcher,
}

impl TranslationService {
    /// Create a service with clients for every backend configured in `config`
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let glossary = Glossary::new(&config.glossary);
        let backends = BackendSet::from_config(&config.backends, glossary, config.batch_size)?;
        Ok(Self::with_backends(backends, config.batch_size))
    }

    /// Create a service over an explicit backend set
    pub fn with_backends(backends: BackendSet, batch_size: usize) -> Self {
        Self {
            dispatcher: BatchDispatcher::new(backends, batch_size),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.dispatcher.batch_size()
    }

    /// Translate an SRT document
    ///
    /// # Arguments
    /// * `content` - SRT text
    /// * `source_language` - Source language code, short or FLORES-200
    /// * `target_language` - Target language code, short or FLORES-200
    /// * `engine` - Backend selector
    /// * `progress` - Receives `(total_units, completed_units)`
    ///
    /// # Returns
    /// * The translated document in SRT form
    pub async fn translate_srt<F>(
        &self,
        content: &str,
        source_language: &str,
        target_language: &str,
        engine: TranslationEngine,
        progress: F,
    ) -> Result<String, TranslationError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let start_time = Instant::now();
        let mut document = SubtitleDocument::parse(content);
        let units = group_document(&document);

        info!(
            "Parsed {} cues into {} translation units ({} -> {}, engine {})",
            document.len(),
            units.len(),
            source_language,
            target_language,
            engine
        );

        if units.is_empty() {
            progress(0, 0);
            return Ok(document.to_srt_string());
        }

        let texts: Vec<String> = units.iter().map(|unit| unit.text.clone()).collect();
        let translated = self
            .dispatcher
            .dispatch(&texts, source_language, target_language, engine, progress)
            .await?;

        for (unit, text) in units.iter().zip(&translated) {
            reassemble_unit(&mut document, unit, text);
        }

        debug!("Document translated in {:.2}s", start_time.elapsed().as_secs_f64());
        Ok(document.to_srt_string())
    }

    /// Translate raw SRT bytes, decoded leniently as UTF-8
    pub async fn translate_srt_bytes<F>(
        &self,
        bytes: &[u8],
        source_language: &str,
        target_language: &str,
        engine: TranslationEngine,
        progress: F,
    ) -> Result<String, TranslationError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let content = decode_srt_bytes(bytes);
        self.translate_srt(&content, source_language, target_language, engine, progress)
            .await
    }

    /// Probe every configured backend
    pub async fn test_connection(&self) -> Vec<(BackendKind, Result<(), ProviderError>)> {
        let backends = self.dispatcher.backends();
        let mut results = Vec::new();
        for kind in backends.kinds() {
            if let Some(backend) = backends.get(kind) {
                results.push((kind, backend.test_connection().await));
            }
        }
        results
    }
}
