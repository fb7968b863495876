// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info};
use std::io::Write;
use std::path::PathBuf;

use srtxlate::app_config::{self, Config, TranslationEngine};
use srtxlate::app_controller::{Controller, FileOutcome};

/// CLI wrapper for TranslationEngine to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliEngine {
    Auto,
    Nllb,
    Ct2,
    #[value(alias = "libretranslate")]
    Libre,
    #[value(alias = "none", alias = "argos")]
    Passthrough,
}

impl From<CliEngine> for TranslationEngine {
    fn from(cli_engine: CliEngine) -> Self {
        match cli_engine {
            CliEngine::Auto => TranslationEngine::Auto,
            CliEngine::Nllb => TranslationEngine::Nllb,
            CliEngine::Ct2 => TranslationEngine::Ct2,
            CliEngine::Libre => TranslationEngine::Libre,
            CliEngine::Passthrough => TranslationEngine::Passthrough,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate an .srt file or every .srt file under a directory (default command)
    Translate(TranslateArgs),

    /// Check that every configured backend answers
    Check(TranslateArgs),

    /// Generate shell completions for srtxlate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct TranslateArgs {
    /// Input .srt file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file or directory (defaults to next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Source language code (e.g., 'en', 'eng_Latn')
    #[arg(short, long, env = "DEFAULT_SOURCE")]
    source_language: Option<String>,

    /// Target language code (e.g., 'nb', 'nob_Latn')
    #[arg(short, long, env = "DEFAULT_TARGET")]
    target_language: Option<String>,

    /// Translation engine to use
    #[arg(short, long, value_enum, env = "DEFAULT_ENGINE")]
    engine: Option<CliEngine>,

    /// Translation units per backend request
    #[arg(long)]
    batch_size: Option<usize>,

    /// NLLB model server URL
    #[arg(long, env = "NLLB_ENDPOINT")]
    nllb_endpoint: Option<String>,

    /// CTranslate2 model server URL
    #[arg(long, env = "CT2_ENDPOINT")]
    ct2_endpoint: Option<String>,

    /// LibreTranslate URL
    #[arg(long, env = "LIBRE_ENDPOINT")]
    libre_endpoint: Option<String>,

    /// LibreTranslate API key
    #[arg(long, env = "LIBRE_API_KEY", hide_env_values = true)]
    libre_api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

/// srtxlate - structure-preserving SRT subtitle translation
///
/// Translates the text of SubRip subtitles through a machine-translation
/// backend while keeping indices, timings and line layout intact.
#[derive(Parser, Debug)]
#[command(name = "srtxlate")]
#[command(version)]
#[command(about = "Structure-preserving SRT subtitle translation")]
#[command(long_about = "srtxlate translates SubRip subtitles through a machine-translation backend.

EXAMPLES:
    srtxlate movie.srt                          # Translate using default config
    srtxlate -f movie.srt                       # Force overwrite existing output
    srtxlate -s en -t nn movie.srt              # Translate from English to Nynorsk
    srtxlate -e libre movie.srt                 # Use LibreTranslate only
    srtxlate --log-level debug /movies/         # Process an entire directory
    srtxlate check                              # Probe configured backends
    srtxlate completions bash > srtxlate.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

ENGINES:
    auto        - NLLB server, then LibreTranslate, then untranslated text
    nllb        - NLLB-200 model server (FLORES-200 codes)
    ct2         - CTranslate2 Marian model server
    libre       - LibreTranslate service
    passthrough - No translation (aliases: none, argos)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and label for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, label) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, label, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace is the ceiling; the effective level is set once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "srtxlate", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        Some(Commands::Check(args)) => run_check(args).await,
        None => run_translate(cli.translate).await,
    }
}

/// Load the config file and apply command line and environment overrides
fn load_config(options: &TranslateArgs) -> Result<Config> {
    if let Some(level) = options.log_level {
        log::set_max_level(app_config::LogLevel::from(level).to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)?;

    if let Some(source) = &options.source_language {
        config.source_language = source.clone();
    }
    if let Some(target) = &options.target_language {
        config.target_language = target.clone();
    }
    if let Some(engine) = options.engine {
        config.engine = engine.into();
    }
    if let Some(batch_size) = options.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(endpoint) = &options.nllb_endpoint {
        config.backends.nllb.endpoint = endpoint.clone();
    }
    if let Some(endpoint) = &options.ct2_endpoint {
        config.backends.ct2.endpoint = endpoint.clone();
    }
    if let Some(endpoint) = &options.libre_endpoint {
        config.backends.libre.endpoint = endpoint.clone();
    }
    if let Some(api_key) = &options.libre_api_key {
        config.backends.libre.api_key = api_key.clone();
    }
    if let Some(level) = options.log_level {
        config.log_level = level.into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let input_path = options
        .input_path
        .clone()
        .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

    let config = load_config(&options)?;
    let controller = Controller::with_config(config)?;

    if input_path.is_file() {
        match controller.run(input_path, options.output.clone(), options.force_overwrite).await? {
            FileOutcome::Translated(path) => println!("{}", path.display()),
            FileOutcome::Skipped(path) => info!("Kept existing {}", path.display()),
        }
    } else if input_path.is_dir() {
        let summary = controller.run_folder(input_path, options.force_overwrite).await?;
        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) failed to translate", summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}

async fn run_check(options: TranslateArgs) -> Result<()> {
    let config = load_config(&options)?;
    let controller = Controller::with_config(config)?;

    let mut failures = 0;
    for (kind, result) in controller.check_backends().await {
        match result {
            Ok(()) => info!("{}: OK", kind),
            Err(e) => {
                error!("{}: {}", kind, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!("{} backend(s) unreachable", failures));
    }
    Ok(())
}
