mod commands;
mod config;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use tidelog_db::{JsonFileGateway, LoadOutcome, Logbook, PersistenceGateway, SqliteGateway};
use tidelog_logging::{init_tracing, LogEvent, LogFormat, Logger};

use commands::Command;
use config::{Backend, Config};

#[derive(Parser, Debug)]
#[command(
    name = "tidelog",
    about = "Log and review water-sports sessions",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Storage backend (default: from config, else sqlite)
    #[arg(long, value_enum, global = true)]
    backend: Option<BackendChoice>,

    /// Database or JSON file to use instead of the default location
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Event output format (default: from config, else pretty)
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormatChoice>,

    /// Show debug diagnostics and store load details
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendChoice {
    Sqlite,
    Json,
}

impl From<BackendChoice> for Backend {
    fn from(choice: BackendChoice) -> Self {
        match choice {
            BackendChoice::Sqlite => Backend::Sqlite,
            BackendChoice::Json => Backend::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    let log_format = match cli.log_format {
        Some(choice) => choice.into(),
        None => config.logging.format()?.unwrap_or_default(),
    };
    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level()
    };
    init_tracing(level, log_format);

    let logger = match &config.logging.file {
        Some(path) => Logger::with_file(log_format, path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?,
        None => Logger::new(log_format),
    };

    let backend = cli
        .backend
        .map(Backend::from)
        .or(config.storage.backend)
        .unwrap_or_default();
    let data_path = cli.data.clone().or_else(|| config.storage.path.clone());
    let gateway = open_gateway(backend, data_path)?;
    let location = gateway.location();

    let (mut logbook, outcome) = Logbook::open(gateway)
        .with_context(|| format!("Failed to load logbook from {}", location))?;

    match outcome {
        LoadOutcome::Recovered { reason } => {
            logger.log(&LogEvent::StoreRecovered { location, reason });
        }
        LoadOutcome::Loaded { dates, sessions } if cli.verbose => {
            logger.log(&LogEvent::StoreLoaded {
                location,
                dates,
                sessions,
            });
        }
        _ => {}
    }

    commands::handle_command(cli.command, &mut logbook, &logger, &config.display)
}

fn open_gateway(backend: Backend, path: Option<PathBuf>) -> Result<Box<dyn PersistenceGateway>> {
    let gateway: Box<dyn PersistenceGateway> = match backend {
        Backend::Sqlite => {
            let gateway = match path {
                Some(path) => SqliteGateway::open_at(&path)
                    .with_context(|| format!("Failed to open database {}", path.display()))?,
                None => SqliteGateway::open().with_context(|| {
                    format!(
                        "Failed to open database {}",
                        SqliteGateway::default_path().display()
                    )
                })?,
            };
            Box::new(gateway)
        }
        Backend::Json => {
            let path = path.unwrap_or_else(JsonFileGateway::default_path);
            Box::new(JsonFileGateway::new(path))
        }
    };
    tracing::debug!(location = %gateway.location(), ?backend, "Using storage");
    Ok(gateway)
}
