use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::app_config::{BackendsConfig, DEFAULT_BATCH_SIZE, ServerConfig};
use crate::errors::ProviderError;
use crate::language_utils::normalize_lang_code;
use crate::translation::formatting::Glossary;

use super::transport::JsonTransport;
use super::{Backend, BackendKind, ensure_same_length};

/// Request body of the model servers' `/translate` route
#[derive(Debug, Serialize)]
pub struct ModelServerRequest<'a> {
    /// Strings to translate
    pub q: &'a [String],
    /// Source language code
    pub source: String,
    /// Target language code
    pub target: String,
    /// Server-side batch size hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
}

/// Response body of the model servers' `/translate` route
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelServerResponse {
    /// One translation per input string
    #[serde(rename = "translatedText", default)]
    pub translated_text: Vec<String>,
}

/// Client for the NLLB-200 model server
#[derive(Debug)]
pub struct NllbClient {
    transport: JsonTransport,
    glossary: Glossary,
    // @field: Batch size hint sent with every request
    batch_size: usize,
}

impl NllbClient {
    /// Create a client from configuration
    pub fn new(server: &ServerConfig, common: &BackendsConfig, glossary: Glossary) -> Result<Self, ProviderError> {
        let transport = JsonTransport::new(
            &server.endpoint,
            server.timeout_secs,
            common.retry_count,
            common.retry_backoff_ms,
        )?;
        Ok(Self {
            transport,
            glossary,
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    /// Use the job's configured batch size as the server-side hint
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

#[async_trait]
impl Backend for NllbClient {
    fn kind(&self) -> BackendKind {
        BackendKind::Nllb
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source: &str,
        target: &str,
    ) -> Result<Vec<String>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let prepared: Vec<String> = if self.glossary.is_empty() {
            texts.to_vec()
        } else {
            texts.iter().map(|t| self.glossary.apply(t)).collect()
        };

        let request = ModelServerRequest {
            q: &prepared,
            source: normalize_lang_code(source),
            target: normalize_lang_code(target),
            batch_size: Some(self.batch_size),
        };

        let response: ModelServerResponse = self.transport.post_json("translate", &request).await?;
        ensure_same_length(texts.len(), response.translated_text)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.transport.get_ok("healthz").await
    }
}
