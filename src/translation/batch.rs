/*!
 * Batch dispatch of translation units to the backends.
 *
 * Units are sent in consecutive batches of at most `batch_size` strings,
 * one batch at a time. Every batch of a job goes to the same backend; when a
 * backend fails in `auto` mode, its partial output is thrown away and the
 * next backend starts again from the first unit.
 */

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::TranslationEngine;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::passthrough::Passthrough;
use crate::providers::{Backend, BackendKind, BackendSet, ensure_same_length};

use super::formatting::{TagMap, TagProtector, nfc};
use super::progress::ProgressReporter;

/// Sends units to backends in batches, with fallback and progress reporting
#[derive(Debug, Clone)]
pub struct BatchDispatcher {
    /// Available backends
    backends: BackendSet,

    /// Maximum number of units per request
    batch_size: usize,
}

impl BatchDispatcher {
    /// Create a new dispatcher; a zero batch size is treated as one
    pub fn new(backends: BackendSet, batch_size: usize) -> Self {
        Self {
            backends,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn backends(&self) -> &BackendSet {
        &self.backends
    }

    /// Translate every unit text, in order
    ///
    /// # Arguments
    /// * `texts` - Unit texts, one per translation unit
    /// * `source_language` - Source language code
    /// * `target_language` - Target language code
    /// * `engine` - A named backend or `auto`
    /// * `progress` - Receives `(total, completed)` after every batch
    ///
    /// # Returns
    /// * One translated string per input. An explicit engine's failure is
    ///   returned as `TranslationError::BackendFailed`; `auto` never fails and
    ///   returns the input unchanged when every backend failed.
    pub async fn dispatch<F>(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
        engine: TranslationEngine,
        progress: F,
    ) -> Result<Vec<String>, TranslationError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let mut reporter = ProgressReporter::new(texts.len(), progress);
        reporter.start();

        if texts.is_empty() {
            return Ok(Vec::new());
        }

        for kind in engine.fallback_chain() {
            let start_time = Instant::now();
            match self.run_backend(kind, texts, source_language, target_language, &mut reporter).await {
                Ok(translated) => {
                    info!(
                        "{} translated {} units in {:.2}s",
                        kind,
                        translated.len(),
                        start_time.elapsed().as_secs_f64()
                    );
                    reporter.finish();
                    return Ok(translated);
                }
                Err(e) if engine.falls_back_to_passthrough() => {
                    warn!("{} failed, trying next backend: {}", kind, e);
                }
                Err(e) => {
                    return Err(TranslationError::BackendFailed {
                        backend: kind.to_string(),
                        source: e,
                    });
                }
            }
        }

        warn!("No backend could translate the document, keeping the original text");
        reporter.finish();
        Ok(texts.to_vec())
    }

    fn resolve(&self, kind: BackendKind) -> Option<Arc<dyn Backend>> {
        match self.backends.get(kind) {
            Some(backend) => Some(backend),
            None if kind == BackendKind::Passthrough => Some(Arc::new(Passthrough)),
            None => None,
        }
    }

    /// Run every batch through one backend, all or nothing
    async fn run_backend<F>(
        &self,
        kind: BackendKind,
        texts: &[String],
        source_language: &str,
        target_language: &str,
        reporter: &mut ProgressReporter<F>,
    ) -> Result<Vec<String>, ProviderError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let backend = self
            .resolve(kind)
            .ok_or_else(|| ProviderError::Unsupported(format!("{} is not configured", kind)))?;

        let total_batches = texts.len().div_ceil(self.batch_size);
        info!("Translating {} units with {} in {} batches", texts.len(), kind, total_batches);

        let mut translated = Vec::with_capacity(texts.len());
        for (batch_index, batch) in texts.chunks(self.batch_size).enumerate() {
            let (protected, tag_maps): (Vec<String>, Vec<TagMap>) =
                batch.iter().map(|text| TagProtector::protect(text)).unzip();

            debug!(
                "Sending batch {}/{} ({} units) to {}",
                batch_index + 1,
                total_batches,
                protected.len(),
                kind
            );

            let output = backend
                .translate_batch(&protected, source_language, target_language)
                .await?;
            let output = ensure_same_length(protected.len(), output)?;

            translated.extend(
                output
                    .into_iter()
                    .zip(tag_maps)
                    .map(|(text, tags)| nfc(&tags.restore(&text))),
            );
            reporter.report(translated.len());
        }

        Ok(translated)
    }
}
