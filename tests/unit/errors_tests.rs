/*!
 * Tests for error types and conversions
 */

use std::error::Error;
use std::path::PathBuf;
use srtxlate::errors::{AppError, ProviderError, SubtitleError, TranslationError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "Model loading".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("503"));
    assert!(display.contains("Model loading"));
}

#[test]
fn test_providerError_responseMismatch_shouldShowBothCounts() {
    let error = ProviderError::ResponseMismatch { expected: 3, actual: 2 };
    assert_eq!(error.to_string(), "Backend returned 2 translations for 3 inputs");
}

#[test]
fn test_providerError_isRetryable_shouldOnlyRetryTransientFailures() {
    assert!(ProviderError::ConnectionError("refused".into()).is_retryable());
    assert!(ProviderError::RequestFailed("reset".into()).is_retryable());
    assert!(ProviderError::ApiError { status_code: 502, message: String::new() }.is_retryable());
    assert!(!ProviderError::ApiError { status_code: 400, message: String::new() }.is_retryable());
    assert!(!ProviderError::ParseError("bad".into()).is_retryable());
    assert!(!ProviderError::ResponseMismatch { expected: 1, actual: 0 }.is_retryable());
    assert!(!ProviderError::Unsupported("ct2".into()).is_retryable());
}

#[test]
fn test_translationError_backendFailed_shouldExposeSource() {
    let error = TranslationError::BackendFailed {
        backend: "NLLB".to_string(),
        source: ProviderError::ConnectionError("refused".into()),
    };
    assert!(error.to_string().contains("NLLB"));
    assert!(error.source().is_some());
}

#[test]
fn test_appError_fromTranslationError_shouldWrap() {
    let app_error: AppError = TranslationError::UnknownEngine("deepl".into()).into();
    assert!(matches!(app_error, AppError::Translation(_)));
    assert!(app_error.to_string().contains("deepl"));
}

#[test]
fn test_appError_fromSubtitleError_shouldMentionPath() {
    let app_error: AppError = SubtitleError::UnsupportedFile(PathBuf::from("movie.vtt")).into();
    assert!(app_error.to_string().contains("movie.vtt"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let app_error: AppError = io.into();
    assert!(matches!(app_error, AppError::File(_)));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let app_error: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(app_error, AppError::Unknown(ref m) if m == "boom"));
}
