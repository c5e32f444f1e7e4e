//! # Ruptela Decode
//!
//! Decode Ruptela GPS tracker packets from standard input.
//!
//! Each input line holds one hex-encoded packet. Each decoded packet (or, in
//! batch mode, each record) is written to standard output as one JSON message.

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use ruptela_decoder::config::{Config, LoggingConfig};
use ruptela_decoder::processor::PacketProcessor;
use ruptela_decoder::stream::{StreamRunner, WriterSink};

/// File name prefix for rolling log files
const LOG_FILE_NAME: &str = "ruptela-decode.log";

/// Main entry point for the Ruptela decoder
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration from the path given as the first argument, or
///      fall back to defaults
///    - Set up logging to stderr or a rolling log file
///
/// 2. **Main Loop**
///    - Decode hex packets from stdin line by line
///    - Write JSON messages to stdout
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Shutdown**
///    - Log line, packet, failure and message counts
///
/// # Errors
///
/// Returns error if:
/// - Configuration file cannot be loaded
/// - Reading stdin or writing stdout fails
///
/// # Examples
///
/// ```bash
/// echo 00090356307042441013107F68 | ruptela-decode config/default.toml
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => Config::default(),
    };

    // Held until exit so buffered log lines are flushed
    let _log_guard = init_logging(&config.logging);

    info!("Ruptela decoder v{} starting...", env!("CARGO_PKG_VERSION"));

    let processor = PacketProcessor::from_config(&config);
    let mut runner = StreamRunner::new(processor, WriterSink::stdout());
    let reader = BufReader::new(tokio::io::stdin());

    tokio::select! {
        result = runner.run(reader) => {
            result.context("Packet stream failed")?;
            info!("End of input");
        }

        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    let stats = runner.stats();
    info!(
        "Processed {} lines: {} decoded, {} failed, {} messages written",
        stats.lines, stats.decoded, stats.failed, stats.messages
    );

    Ok(())
}

/// Initialize the tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(logging: &LoggingConfig) -> WorkerGuard {
    let (writer, guard) = match &logging.directory {
        Some(directory) => {
            tracing_appender::non_blocking(tracing_appender::rolling::daily(directory, LOG_FILE_NAME))
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(logging.directory.is_none())
        .init();

    guard
}
