/*!
 * Mock backend implementations for testing.
 *
 * This module provides a mock backend that simulates different behaviors:
 * - `MockBackend::identity()` - Always succeeds, returns the input
 * - `MockBackend::prefixing()` - Always succeeds, tags every string
 * - `MockBackend::failing()` - Always fails with a connection error
 * - `MockBackend::fail_on_call(n)` - Fails on the Nth call only
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::translation::grouping::LINE_SENTINEL;

use super::{Backend, BackendKind};

/// Behavior mode for the mock backend
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Returns every string unchanged
    Identity,
    /// Prefixes every string with the given tag
    Prefix(String),
    /// Uppercases every string
    Uppercase,
    /// Always fails with a connection error
    Failing,
    /// Fails on the given 1-based call, succeeds (identity) otherwise
    FailOnCall(usize),
    /// Drops the last string of every batch
    DropLast,
    /// Removes the line sentinel, as a backend that "translates" it would
    DropSentinel,
    /// Replaces the line sentinel with a line break
    SentinelToNewline,
    /// Drops every markup placeholder token
    DropPlaceholders,
    /// Identity after a delay
    Slow { delay_ms: u64 },
}

/// Mock backend for testing dispatch and fallback behavior
#[derive(Debug)]
pub struct MockBackend {
    /// Kind this mock stands in for
    kind: BackendKind,
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter
    call_count: Arc<AtomicUsize>,
    /// Every batch received, in order
    received: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(kind: BackendKind, behavior: MockBehavior) -> Self {
        Self {
            kind,
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Identity mock standing in for the NLLB server
    pub fn identity() -> Self {
        Self::new(BackendKind::Nllb, MockBehavior::Identity)
    }

    /// Prefixing mock standing in for the NLLB server
    pub fn prefixing(prefix: &str) -> Self {
        Self::new(BackendKind::Nllb, MockBehavior::Prefix(prefix.to_string()))
    }

    /// Always-failing mock standing in for the NLLB server
    pub fn failing() -> Self {
        Self::new(BackendKind::Nllb, MockBehavior::Failing)
    }

    /// Mock failing on its Nth call only
    pub fn fail_on_call(call: usize) -> Self {
        Self::new(BackendKind::Nllb, MockBehavior::FailOnCall(call))
    }

    /// Same mock registered under another kind
    pub fn as_kind(mut self, kind: BackendKind) -> Self {
        self.kind = kind;
        self
    }

    /// Number of `translate_batch` calls so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Copy of every batch received
    pub fn received_batches(&self) -> Vec<Vec<String>> {
        self.received.lock().clone()
    }

    fn transform(&self, text: &str) -> String {
        match &self.behavior {
            MockBehavior::Prefix(prefix) => format!("{}{}", prefix, text),
            MockBehavior::Uppercase => text.to_uppercase(),
            MockBehavior::DropSentinel => text.replace(LINE_SENTINEL, ""),
            MockBehavior::SentinelToNewline => text.replace(&format!(" {} ", LINE_SENTINEL), "\n"),
            MockBehavior::DropPlaceholders => {
                let mut out = text.to_string();
                while let Some(start) = out.find("__TAG") {
                    match out[start + 5..].find("__") {
                        Some(end) => out.replace_range(start..start + 5 + end + 2, ""),
                        None => break,
                    }
                }
                out
            }
            _ => text.to_string(),
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        _source: &str,
        _target: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.received.lock().push(texts.to_vec());

        match &self.behavior {
            MockBehavior::Failing => {
                return Err(ProviderError::ConnectionError("Connection refused".into()));
            }
            MockBehavior::FailOnCall(n) if *n == call => {
                return Err(ProviderError::ApiError {
                    status_code: 503,
                    message: format!("Simulated failure on call {}", call),
                });
            }
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
            }
            _ => {}
        }

        let mut out: Vec<String> = texts.iter().map(|t| self.transform(t)).collect();
        if self.behavior == MockBehavior::DropLast {
            out.pop();
        }
        Ok(out)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Connection refused".into())),
            _ => Ok(()),
        }
    }
}
