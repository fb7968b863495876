/*!
 * Translation backend implementations.
 *
 * This module contains client implementations for the supported backends:
 * - NLLB: local NLLB-200 model server (FLORES-200 codes)
 * - CT2: CTranslate2 Marian model server
 * - Libre: LibreTranslate service
 * - Passthrough: identity, the last resort when nothing else answers
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::BackendsConfig;
use crate::errors::ProviderError;
use crate::translation::formatting::Glossary;

/// Common trait for all translation backends
///
/// A backend translates an ordered batch of strings and returns the same
/// number of strings in the same order, or fails.
#[async_trait]
pub trait Backend: Send + Sync + Debug {
    /// Which kind of backend this is
    fn kind(&self) -> BackendKind;

    /// Translate a batch of strings
    ///
    /// # Arguments
    /// * `texts` - The strings to translate
    /// * `source` - Source language as given by the caller
    /// * `target` - Target language as given by the caller
    ///
    /// # Returns
    /// * `Result<Vec<String>, ProviderError>` - One translation per input
    async fn translate_batch(
        &self,
        texts: &[String],
        source: &str,
        target: &str,
    ) -> Result<Vec<String>, ProviderError>;

    /// Test the connection to the backend
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// The closed set of backend kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackendKind {
    Nllb,
    Ct2,
    Libre,
    Passthrough,
}

impl BackendKind {
    // @returns: Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Nllb => "NLLB",
            Self::Ct2 => "CTranslate2",
            Self::Libre => "LibreTranslate",
            Self::Passthrough => "Passthrough",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Check that a backend answered with one string per input
pub fn ensure_same_length(expected: usize, translated: Vec<String>) -> Result<Vec<String>, ProviderError> {
    if translated.len() != expected {
        return Err(ProviderError::ResponseMismatch {
            expected,
            actual: translated.len(),
        });
    }
    Ok(translated)
}

/// The backends available to a translation service, keyed by kind
#[derive(Debug, Clone, Default)]
pub struct BackendSet {
    backends: HashMap<BackendKind, Arc<dyn Backend>>,
}

impl BackendSet {
    /// Empty set, only the pass-through is ever implied
    pub fn new() -> Self {
        Self::default()
    }

    /// Build clients for every backend with a configured endpoint
    ///
    /// `batch_size` is the dispatcher's batch size, forwarded to the NLLB
    /// server as its batching hint.
    pub fn from_config(
        config: &BackendsConfig,
        glossary: Glossary,
        batch_size: usize,
    ) -> Result<Self, ProviderError> {
        let mut set = Self::new();

        if !config.nllb.endpoint.is_empty() {
            let client = nllb::NllbClient::new(&config.nllb, config, glossary)?.with_batch_size(batch_size);
            set.insert(Arc::new(client));
        }
        if !config.ct2.endpoint.is_empty() {
            set.insert(Arc::new(ct2::Ct2Client::new(&config.ct2, config)?));
        }
        if !config.libre.endpoint.is_empty() {
            set.insert(Arc::new(libre::LibreClient::new(&config.libre, config)?));
        }
        set.insert(Arc::new(passthrough::Passthrough));

        Ok(set)
    }

    /// Add or replace the backend for its kind
    pub fn insert(&mut self, backend: Arc<dyn Backend>) {
        self.backends.insert(backend.kind(), backend);
    }

    /// Builder form of `insert`
    pub fn with_backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.insert(backend);
        self
    }

    /// Look up a backend by kind
    pub fn get(&self, kind: BackendKind) -> Option<Arc<dyn Backend>> {
        self.backends.get(&kind).cloned()
    }

    /// Configured kinds, in priority order
    pub fn kinds(&self) -> Vec<BackendKind> {
        let mut kinds: Vec<_> = self.backends.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

pub mod transport;
pub mod nllb;
pub mod ct2;
pub mod libre;
pub mod passthrough;
pub mod mock;
