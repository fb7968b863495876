/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;
use srtxlate::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "exists.srt", "1\n")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

#[test]
fn test_dir_exists_withNonExistentDir_shouldReturnFalse() {
    assert!(!FileManager::dir_exists("./non_existent_directory_12345"));
}

#[test]
fn test_is_srt_file_withVariousExtensions_shouldMatchCaseInsensitively() {
    assert!(FileManager::is_srt_file("movie.srt"));
    assert!(FileManager::is_srt_file("MOVIE.SRT"));
    assert!(!FileManager::is_srt_file("movie.vtt"));
    assert!(!FileManager::is_srt_file("movie"));
}

#[test]
fn test_output_path_withoutOutputDir_shouldSitNextToInput() {
    let output = FileManager::output_path_for("/tmp/input/movie.srt", None, "nob_Latn");
    assert_eq!(output, Path::new("/tmp/input/movie.nb.srt"));
}

#[test]
fn test_output_path_withOutputDir_shouldUseIt() {
    let output = FileManager::output_path_for("/tmp/input/movie.en.srt", Some(Path::new("/tmp/out")), "nn");
    assert_eq!(output, Path::new("/tmp/out/movie.en.nn.srt"));
}

#[test]
fn test_is_translated_output_withTargetSuffix_shouldDetectIt() {
    assert!(FileManager::is_translated_output("movie.nb.srt", "nb"));
    assert!(FileManager::is_translated_output("movie.nb.srt", "nob_Latn"));
    assert!(!FileManager::is_translated_output("movie.en.srt", "nb"));
    assert!(!FileManager::is_translated_output("movie.srt", "nb"));
}

#[test]
fn test_find_srt_files_withNestedDirs_shouldFindAllSorted() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "b.srt", "1\n")?;
    common::create_test_file(temp_dir.path(), "sub/a.srt", "1\n")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "x")?;

    let files = FileManager::find_srt_files(temp_dir.path())?;

    assert_eq!(files.len(), 2);
    let mut sorted = files.clone();
    sorted.sort();
    assert_eq!(files, sorted);
    Ok(())
}

#[test]
fn test_read_srt_withBom_shouldStripIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "bom.srt", "\u{feff}1\n00:00:01,000 --> 00:00:02,000\nHi\n")?;

    let content = FileManager::read_srt(&path)?;

    assert!(content.starts_with('1'));
    Ok(())
}

#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deep/er/out.srt");

    FileManager::write_to_file(&path, "content")?;

    assert_eq!(std::fs::read_to_string(&path)?, "content");
    Ok(())
}
