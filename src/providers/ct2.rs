use async_trait::async_trait;

use crate::app_config::{BackendsConfig, ServerConfig};
use crate::errors::ProviderError;
use crate::language_utils::short_code;

use super::nllb::{ModelServerRequest, ModelServerResponse};
use super::transport::JsonTransport;
use super::{Backend, BackendKind, ensure_same_length};

/// Client for the CTranslate2 Marian server.
///
/// The server picks its target-language token from a short code
/// (`nb`, `nn`), so canonical codes are shortened before sending.
#[derive(Debug)]
pub struct Ct2Client {
    transport: JsonTransport,
}

impl Ct2Client {
    /// Create a client from configuration
    pub fn new(server: &ServerConfig, common: &BackendsConfig) -> Result<Self, ProviderError> {
        let transport = JsonTransport::new(
            &server.endpoint,
            server.timeout_secs,
            common.retry_count,
            common.retry_backoff_ms,
        )?;
        Ok(Self { transport })
    }
}

#[async_trait]
impl Backend for Ct2Client {
    fn kind(&self) -> BackendKind {
        BackendKind::Ct2
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

        let request = ModelServerRequest {
            q: texts,
            source: short_code(source),
            target: short_code(target),
            batch_size: None,
        };

        let response: ModelServerResponse = self.transport.post_json("translate", &request).await?;
        ensure_same_length(texts.len(), response.translated_text)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.transport.get_ok("healthz").await
    }
}
