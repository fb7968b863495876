use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::app_config::{BackendsConfig, LibreConfig};
use crate::errors::ProviderError;
use crate::language_utils::short_code;

use super::transport::JsonTransport;
use super::{Backend, BackendKind, ensure_same_length};

/// LibreTranslate `/translate` request
#[derive(Debug, Serialize)]
pub struct LibreRequest<'a> {
    /// Strings to translate
    pub q: &'a [String],
    /// Two-letter source code, or `auto`
    pub source: String,
    /// Two-letter target code
    pub target: String,
    /// Always `text`; tags are already protected
    pub format: &'static str,
    /// API key when the instance requires one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<&'a str>,
}

/// A single translated item, as some instances answer with a list
#[derive(Debug, Deserialize)]
pub struct LibreItem {
    #[serde(rename = "translatedText", default)]
    pub translated_text: String,
}

/// LibreTranslate answers batches either as one object or as a list of items
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LibreResponse {
    Batch {
        #[serde(rename = "translatedText")]
        translated_text: Vec<String>,
    },
    Items(Vec<LibreItem>),
}

impl LibreResponse {
    /// Flatten either shape into the translated strings
    pub fn into_texts(self) -> Vec<String> {
        match self {
            Self::Batch { translated_text } => translated_text,
            Self::Items(items) => items.into_iter().map(|i| i.translated_text).collect(),
        }
    }
}

/// Client for a LibreTranslate instance
#[derive(Debug)]
pub struct LibreClient {
    transport: JsonTransport,
    api_key: String,
}

impl LibreClient {
    /// Create a client from configuration
    pub fn new(libre: &LibreConfig, common: &BackendsConfig) -> Result<Self, ProviderError> {
        let transport = JsonTransport::new(
            &libre.endpoint,
            libre.timeout_secs,
            common.retry_count,
            common.retry_backoff_ms,
        )?;
        Ok(Self {
            transport,
            api_key: libre.api_key.clone(),
        })
    }
}

#[async_trait]
impl Backend for LibreClient {
    fn kind(&self) -> BackendKind {
        BackendKind::Libre
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

        let request = LibreRequest {
            q: texts,
            source: short_code(source),
            target: short_code(target),
            format: "text",
            api_key: (!self.api_key.is_empty()).then_some(self.api_key.as_str()),
        };

        let response: LibreResponse = self.transport.post_json("translate", &request).await?;
        ensure_same_length(texts.len(), response.into_texts())
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.transport.get_ok("languages").await
    }
}
