use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};

/// Log to stderr at `default_spec` unless `RUST_LOG` says otherwise.
///
/// Keep the returned handle alive for as long as logging is needed.
pub fn setup_logging(default_spec: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(default_spec)?
        .format(flexi_logger::colored_default_format)
        .start()
}
