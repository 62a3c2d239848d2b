//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup, after the configured level is known.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Initialise the global tracing subscriber.
///
/// `level` accepts standard level strings: `"error"`, `"warn"`, `"info"`,
/// `"debug"`, `"trace"`. The configured level takes precedence; `RUST_LOG`
/// is only consulted when `level` does not parse.
pub fn init(level: &str) -> Result<(), AppError> {
    let filter = match EnvFilter::try_new(level) {
        Ok(filter) => filter,
        Err(level_err) => EnvFilter::try_from_default_env().map_err(|env_err| {
            AppError::Logger(format!(
                "invalid log level '{level}': {level_err}; RUST_LOG parse failed: {env_err}"
            ))
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))?;

    Ok(())
}

/// Parse a log level string into a [`LevelFilter`], returning an error on
/// unrecognised values. Useful for validating config before initialising.
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_accepts_standard_levels() {
        for lvl in ["error", "warn", "info", "debug", "trace"] {
            assert!(parse_level(lvl).is_ok(), "level {lvl} should parse");
        }
    }

    #[test]
    fn parse_level_rejects_garbage() {
        assert!(parse_level("loud").is_err());
    }

    #[test]
    fn parse_level_rejects_empty() {
        assert!(parse_level("").is_err());
    }
}
