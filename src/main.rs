// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use app_controller::{AuditPaths, Controller};

mod analysis;
mod app_config;
mod app_controller;
mod checks;
mod corpus;
mod errors;
mod extraction;
mod file_utils;
mod knowledge;
mod language_utils;
mod qa_service;
mod report;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Audit EN->ZH translations against the knowledge bases (default command)
    Audit(AuditArgs),

    /// Generate shell completions for floraqa
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct AuditArgs {
    /// Key unit records (JSON array)
    #[arg(short, long)]
    keys: Option<PathBuf>,

    /// Description unit records (JSON array)
    #[arg(short, long)]
    descriptions: Option<PathBuf>,

    /// Morphology glossary records (JSON array)
    #[arg(short, long)]
    glossary: Option<PathBuf>,

    /// Person-name authority records (JSON array)
    #[arg(short, long)]
    names: Option<PathBuf>,

    /// Report output path
    #[arg(short, long, default_value = "qa_report.json")]
    out: PathBuf,

    /// Force overwrite of an existing report
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Maximum units scored concurrently
    #[arg(long)]
    max_concurrent: Option<usize>,
}

/// FloraQA - reference-free QA for EN->ZH botanical translations
///
/// Audits machine-translated taxonomic keys and descriptions against a
/// morphology term glossary and a person-name authority file, without any
/// human reference translation.
#[derive(Parser, Debug)]
#[command(name = "floraqa")]
#[command(version = "1.0.0")]
#[command(about = "Knowledge-base-driven QA for botanical translations")]
#[command(long_about = "FloraQA grades EN->ZH translation units against domain knowledge bases
and writes a JSON report with row-wise flags, corpus KPIs and term drift.

EXAMPLES:
    floraqa -k keys.json -d descriptions.json -g glossary.json -n names.json
    floraqa -k keys.json -o report.json -f          # keys only, overwrite report
    floraqa --log-level debug -d descriptions.json  # verbose run
    floraqa completions bash > floraqa.bash         # generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Key unit records (JSON array)
    #[arg(short, long)]
    keys: Option<PathBuf>,

    /// Description unit records (JSON array)
    #[arg(short, long)]
    descriptions: Option<PathBuf>,

    /// Morphology glossary records (JSON array)
    #[arg(short, long)]
    glossary: Option<PathBuf>,

    /// Person-name authority records (JSON array)
    #[arg(short, long)]
    names: Option<PathBuf>,

    /// Report output path
    #[arg(short, long, default_value = "qa_report.json")]
    out: PathBuf,

    /// Force overwrite of an existing report
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Maximum units scored concurrently
    #[arg(long)]
    max_concurrent: Option<usize>,
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

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "floraqa", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Audit(args)) => run_audit(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let audit_args = AuditArgs {
                keys: cli.keys,
                descriptions: cli.descriptions,
                glossary: cli.glossary,
                names: cli.names,
                out: cli.out,
                force_overwrite: cli.force_overwrite,
                config_path: cli.config_path,
                log_level: cli.log_level,
                max_concurrent: cli.max_concurrent,
            };
            run_audit(audit_args).await
        }
    }
}

async fn run_audit(options: AuditArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(max_concurrent) = options.max_concurrent {
        if max_concurrent == 0 {
            return Err(anyhow!("--max-concurrent must be at least 1"));
        }
        config.engine.max_concurrent_units = max_concurrent;
    }

    // Validate the configuration after loading and overriding
    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller and run the audit
    let controller = Controller::with_config(config)?;
    let paths = AuditPaths {
        keys: options.keys,
        descriptions: options.descriptions,
        glossary: options.glossary,
        names: options.names,
        out: options.out,
    };

    controller.run(&paths, options.force_overwrite).await
}
