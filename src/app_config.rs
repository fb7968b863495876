use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::default::Default;
use std::path::Path;
use url::Url;

use crate::providers::BackendKind;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (alias or FLORES-200)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (alias or FLORES-200)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Engine selector
    #[serde(default)]
    pub engine: TranslationEngine,

    /// Translation units per backend request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Backend endpoints and transport settings
    #[serde(default)]
    pub backends: BackendsConfig,

    /// Phrase replacements applied before text reaches the neural server
    #[serde(default = "default_glossary")]
    pub glossary: BTreeMap<String, String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Which backend(s) a job may use
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationEngine {
    // @engine: Try backends in priority order, pass through if all fail
    #[default]
    Auto,
    // @engine: Local NLLB model server only
    Nllb,
    // @engine: CTranslate2 Marian server only
    Ct2,
    // @engine: LibreTranslate only
    #[serde(alias = "libretranslate")]
    Libre,
    // @engine: No translation, also the offline last resort named argos
    #[serde(alias = "none", alias = "argos")]
    Passthrough,
}

impl TranslationEngine {
    /// Backends to try, in order
    pub fn fallback_chain(&self) -> Vec<BackendKind> {
        match self {
            Self::Auto => vec![BackendKind::Nllb, BackendKind::Libre],
            Self::Nllb => vec![BackendKind::Nllb],
            Self::Ct2 => vec![BackendKind::Ct2],
            Self::Libre => vec![BackendKind::Libre],
            Self::Passthrough => vec![BackendKind::Passthrough],
        }
    }

    /// Whether an all-failed chain ends in a pass-through instead of an error
    pub fn falls_back_to_passthrough(&self) -> bool {
        matches!(self, Self::Auto)
    }

    // @returns: Lowercase engine identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Auto => "auto".to_string(),
            Self::Nllb => "nllb".to_string(),
            Self::Ct2 => "ct2".to_string(),
            Self::Libre => "libre".to_string(),
            Self::Passthrough => "passthrough".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationEngine {
    type Err = crate::errors::TranslationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "nllb" => Ok(Self::Nllb),
            "ct2" => Ok(Self::Ct2),
            "libre" | "libretranslate" => Ok(Self::Libre),
            "passthrough" | "none" | "argos" => Ok(Self::Passthrough),
            other => Err(crate::errors::TranslationError::UnknownEngine(other.to_string())),
        }
    }
}

/// Endpoint settings for an HTTP model server
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    // @field: Service URL
    pub endpoint: String,

    // @field: Request timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// LibreTranslate settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LibreConfig {
    // @field: Service URL
    #[serde(default = "default_libre_endpoint")]
    pub endpoint: String,

    // @field: API key, sent only when non-empty
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Request timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LibreConfig {
    fn default() -> Self {
        Self {
            endpoint: default_libre_endpoint(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// All backend settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BackendsConfig {
    /// NLLB-200 model server
    #[serde(default = "default_nllb_server")]
    pub nllb: ServerConfig,

    /// CTranslate2 Marian server
    #[serde(default = "default_ct2_server")]
    pub ct2: ServerConfig,

    /// LibreTranslate service
    #[serde(default)]
    pub libre: LibreConfig,

    /// Retry count for transient failures
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff base for retries (in milliseconds), doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            nllb: default_nllb_server(),
            ct2: default_ct2_server(),
            libre: LibreConfig::default(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "nb".to_string()
}

/// Units per backend request when the config does not say otherwise
pub const DEFAULT_BATCH_SIZE: usize = 64;

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_nllb_endpoint() -> String {
    "http://localhost:6100".to_string()
}

fn default_ct2_endpoint() -> String {
    "http://localhost:6000".to_string()
}

fn default_libre_endpoint() -> String {
    "http://localhost:5000".to_string()
}

fn default_nllb_server() -> ServerConfig {
    ServerConfig {
        endpoint: default_nllb_endpoint(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_ct2_server() -> ServerConfig {
    ServerConfig {
        endpoint: default_ct2_endpoint(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_glossary() -> BTreeMap<String, String> {
    let mut glossary = BTreeMap::new();
    glossary.insert("removal men".to_string(), "movers".to_string());
    glossary.insert("removals men".to_string(), "movers".to_string());
    glossary
}

impl Config {
    /// Load a configuration file, or write and return the defaults if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(anyhow!("Source language must not be empty"));
        }
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language must not be empty"));
        }
        if self.batch_size == 0 {
            return Err(anyhow!("Batch size must be greater than zero"));
        }

        // Unknown codes are passed through to the backends, which may still accept them
        for code in [&self.source_language, &self.target_language] {
            if !code.eq_ignore_ascii_case("auto") && crate::language_utils::get_language_name(code).is_err() {
                warn!("Language code '{}' is not recognised, passing it through unchanged", code);
            }
        }

        let endpoints = [
            ("nllb", &self.backends.nllb.endpoint),
            ("ct2", &self.backends.ct2.endpoint),
            ("libre", &self.backends.libre.endpoint),
        ];
        for (name, endpoint) in endpoints {
            if endpoint.is_empty() {
                continue;
            }
            let url = Url::parse(endpoint)
                .with_context(|| format!("Invalid {} endpoint: {}", name, endpoint))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(anyhow!("Invalid {} endpoint scheme: {}", name, endpoint));
            }
        }

        if self.engine != TranslationEngine::Auto && self.engine != TranslationEngine::Passthrough {
            let selected = match self.engine {
                TranslationEngine::Nllb => &self.backends.nllb.endpoint,
                TranslationEngine::Ct2 => &self.backends.ct2.endpoint,
                _ => &self.backends.libre.endpoint,
            };
            if selected.is_empty() {
                return Err(anyhow!("No endpoint configured for engine '{}'", self.engine));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            engine: TranslationEngine::default(),
            batch_size: default_batch_size(),
            backends: BackendsConfig::default(),
            glossary: default_glossary(),
            log_level: LogLevel::default(),
        }
    }
}
