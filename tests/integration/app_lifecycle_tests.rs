/*!
 * Integration tests for the application controller over real files
 */

use anyhow::Result;
use std::fs;
use std::sync::Arc;
use srtxlate::app_config::{Config, TranslationEngine};
use srtxlate::app_controller::{Controller, FileOutcome, FolderSummary};
use srtxlate::errors::SubtitleError;
use srtxlate::providers::BackendSet;
use srtxlate::providers::mock::MockBackend;
use srtxlate::translation::{JobStatus, TranslationService};
use crate::common;

fn controller_with(mock: MockBackend) -> Controller {
    let config = Config {
        engine: TranslationEngine::Nllb,
        target_language: "nob_Latn".to_string(),
        ..Config::default()
    };
    let service = TranslationService::with_backends(BackendSet::new().with_backend(Arc::new(mock)), 8);
    Controller::with_service(config, service)
}

#[tokio::test]
async fn test_run_withSrtFile_shouldWriteSuffixedOutput() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = controller_with(MockBackend::prefixing("~"));

    let outcome = controller.run(input.clone(), None, false).await?;

    let expected = temp_dir.path().join("movie.nb.srt");
    assert_eq!(outcome, FileOutcome::Translated(expected.clone()));
    let content = fs::read_to_string(&expected)?;
    assert!(content.contains("00:00:05,000 --> 00:00:09,000"));
    assert!(content.contains("~[DOOR SLAMS]"));
    assert!(content.contains("<i>"));
    Ok(())
}

#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let existing = common::create_test_file(temp_dir.path(), "movie.nb.srt", "old")?;
    let controller = controller_with(MockBackend::identity());

    let outcome = controller.run(input.clone(), None, false).await?;
    assert_eq!(outcome, FileOutcome::Skipped(existing.clone()));
    assert_eq!(fs::read_to_string(&existing)?, "old");

    let outcome = controller.run(input, None, true).await?;
    assert_eq!(outcome, FileOutcome::Translated(existing.clone()));
    assert_ne!(fs::read_to_string(&existing)?, "old");
    Ok(())
}

#[tokio::test]
async fn test_run_withExplicitOutputFile_shouldWriteThere() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let target = temp_dir.path().join("out/custom.srt");
    let controller = controller_with(MockBackend::identity());

    let outcome = controller.run(input, Some(target.clone()), false).await?;

    assert_eq!(outcome, FileOutcome::Translated(target.clone()));
    assert!(target.exists());
    Ok(())
}

#[tokio::test]
async fn test_run_withNonSrtFile_shouldRejectIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.vtt", "WEBVTT\n")?;
    let controller = controller_with(MockBackend::identity());

    let err = controller.run(input, None, false).await.unwrap_err();

    assert!(err.downcast_ref::<SubtitleError>().is_some());
    Ok(())
}

#[tokio::test]
async fn test_run_withFailingBackend_shouldMarkJobFailedAndWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = controller_with(MockBackend::failing());

    assert!(controller.run(input, None, false).await.is_err());

    assert!(!temp_dir.path().join("movie.nb.srt").exists());
    let jobs = controller.registry().snapshot();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].1.status, JobStatus::Failed);
    Ok(())
}

#[tokio::test]
async fn test_run_folder_withMixedFiles_shouldTranslateSkipAndIgnoreOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "a.srt")?;
    common::create_test_subtitle(temp_dir.path(), "season/b.srt")?;
    common::create_test_subtitle(temp_dir.path(), "c.srt")?;
    common::create_test_file(temp_dir.path(), "c.nb.srt", "already done")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "ignore me")?;
    let controller = controller_with(MockBackend::identity());

    let summary = controller.run_folder(temp_dir.path().to_path_buf(), false).await?;

    assert_eq!(summary, FolderSummary { translated: 2, skipped: 1, failed: 0 });
    assert!(temp_dir.path().join("a.nb.srt").exists());
    assert!(temp_dir.path().join("season/b.nb.srt").exists());
    assert!(!temp_dir.path().join("c.nb.nb.srt").exists());
    Ok(())
}

#[tokio::test]
async fn test_run_folder_withNoSubtitles_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "notes.txt", "x")?;
    let controller = controller_with(MockBackend::identity());

    assert!(controller.run_folder(temp_dir.path().to_path_buf(), false).await.is_err());
    Ok(())
}

#[test]
fn test_with_config_withInvalidConfig_shouldFail() {
    let config = Config {
        batch_size: 0,
        ..Config::default()
    };
    assert!(Controller::with_config(config).is_err());
}

#[test]
fn test_registry_afterBlockingRun_shouldHoldFinishedJob() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = controller_with(MockBackend::identity());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(controller.run(input, None, false))?;

    let jobs = controller.registry().snapshot();
    assert_eq!(jobs.len(), 1);
    let (_, job) = &jobs[0];
    assert_eq!(job.status, JobStatus::Finished);
    assert!(job.progress.is_complete());
    assert!(job.progress.total > 0);
    Ok(())
}
