use anyhow::{Context, Result, anyhow};
use chrono::Duration as ChronoDuration;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::{ProviderError, SubtitleError};
use crate::file_utils::FileManager;
use crate::language_utils::get_language_name;
use crate::providers::BackendKind;
use crate::translation::{ProgressRegistry, TranslationService};

// @module: Application controller for subtitle processing

/// How long finished jobs stay visible in the progress registry
const FINISHED_JOB_TTL_MINUTES: i64 = 30;

/// Result of processing one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Translation written to this path
    Translated(PathBuf),
    /// Output already existed and overwriting was not forced
    Skipped(PathBuf),
}

/// Counters reported after a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub translated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Pipeline shared by every file of the run
    service: TranslationService,

    // @field: Job progress, polled by front ends
    registry: Arc<ProgressRegistry>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let service = TranslationService::from_config(&config)
            .context("Failed to create translation backends")?;
        Ok(Self::with_service(config, service))
    }

    /// Create a controller around an existing service
    pub fn with_service(config: Config, service: TranslationService) -> Self {
        Self {
            config,
            service,
            registry: Arc::new(ProgressRegistry::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registry every job of this controller reports to
    pub fn registry(&self) -> Arc<ProgressRegistry> {
        Arc::clone(&self.registry)
    }

    /// Translate one `.srt` file
    ///
    /// `output` may be a file path or a directory; without it the result is
    /// written next to the input as `<stem>.<suffix>.srt`.
    pub async fn run(&self, input_file: PathBuf, output: Option<PathBuf>, force_overwrite: bool) -> Result<FileOutcome> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(&input_file, output.as_deref(), &multi_progress, force_overwrite).await
    }

    async fn run_with_progress(
        &self,
        input_file: &Path,
        output: Option<&Path>,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<FileOutcome> {
        let start_time = Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        if !FileManager::is_srt_file(input_file) {
            return Err(SubtitleError::UnsupportedFile(input_file.to_path_buf()).into());
        }

        let output_path = self.resolve_output_path(input_file, output);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, translation already exists (use -f to force overwrite)", input_file);
            return Ok(FileOutcome::Skipped(output_path));
        }

        let content = FileManager::read_srt(input_file)?;

        info!(
            "Translating {:?} from {} to {} with engine {}",
            input_file.file_name().unwrap_or_default(),
            Self::language_label(&self.config.source_language),
            Self::language_label(&self.config.target_language),
            self.config.engine
        );

        let job_id = self.registry.register();
        let progress_bar = multi_progress.add(ProgressBar::new(0));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} units ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let bar = progress_bar.clone();
        let registry = Arc::clone(&self.registry);
        let on_progress = move |total: usize, completed: usize| {
            bar.set_length(total as u64);
            bar.set_position(completed as u64);
            registry.update(job_id, total, completed);
        };

        let result = self
            .service
            .translate_srt(
                &content,
                &self.config.source_language,
                &self.config.target_language,
                self.config.engine,
                on_progress,
            )
            .await;

        self.registry.finish(job_id, result.is_ok());
        self.registry.sweep_expired(ChronoDuration::minutes(FINISHED_JOB_TTL_MINUTES));

        let translated = match result {
            Ok(translated) => {
                progress_bar.finish_and_clear();
                translated
            }
            Err(e) => {
                progress_bar.abandon();
                return Err(anyhow::Error::new(e).context(format!("Failed to translate {:?}", input_file)));
            }
        };

        FileManager::write_to_file(&output_path, &translated)?;
        info!(
            "Success: {} ({})",
            output_path.display(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(FileOutcome::Translated(output_path))
    }

    /// Translate every `.srt` under a directory, recursively
    ///
    /// Files that already are translations into the target language are
    /// ignored; a failing file is logged and counted, the run goes on.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let target = &self.config.target_language;
        let files: Vec<PathBuf> = FileManager::find_srt_files(&input_dir)?
            .into_iter()
            .filter(|path| !FileManager::is_translated_output(path, target))
            .collect();

        if files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        let mut summary = FolderSummary::default();
        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            match self.run_with_progress(file, None, &multi_progress, force_overwrite).await {
                Ok(FileOutcome::Translated(_)) => summary.translated += 1,
                Ok(FileOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.failed += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");
        info!(
            "Folder processing completed in {}: {} translated, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.translated,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }

    /// Probe every configured backend
    pub async fn check_backends(&self) -> Vec<(BackendKind, Result<(), ProviderError>)> {
        self.service.test_connection().await
    }

    fn resolve_output_path(&self, input_file: &Path, output: Option<&Path>) -> PathBuf {
        let target = &self.config.target_language;
        match output {
            Some(path) if path.is_dir() || path.extension().is_none() => {
                FileManager::output_path_for(input_file, Some(path), target)
            }
            Some(path) => path.to_path_buf(),
            None => FileManager::output_path_for(input_file, None, target),
        }
    }

    fn language_label(code: &str) -> String {
        match get_language_name(code) {
            Ok(name) => format!("{} ({})", name, code),
            Err(_) => code.to_string(),
        }
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
