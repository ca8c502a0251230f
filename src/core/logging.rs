// Logging setup - installs the global tracing subscriber

use crate::core::config::Config;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, thiserror::Error)]
#[error("Failed to install log subscriber: {0}")]
pub struct LoggingError(String);

/// Parse a level name, falling back to INFO for anything unrecognized
pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse::<LevelFilter>().unwrap_or(LevelFilter::INFO)
}

/// Install a fmt subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str, json: bool) -> Result<(), LoggingError> {
    let filter = EnvFilter::builder()
        .with_default_directive(parse_level(level).into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);

    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init()
    };

    result.map_err(|e| LoggingError(e.to_string()))
}

/// Install a subscriber from the application configuration
pub fn init_from_config(config: &Config) -> Result<(), LoggingError> {
    init_logging(&config.log_level, config.json_logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::DEBUG);
        assert_eq!(parse_level(" WARN "), LevelFilter::WARN);
        assert_eq!(parse_level("chatty"), LevelFilter::INFO);
    }

    #[test]
    fn test_second_init_is_an_error() {
        let _ = init_logging("info", false);
        assert!(init_logging("debug", true).is_err());

        let mut config = Config::default();
        config.json_logs = true;
        assert!(init_from_config(&config).is_err());
    }
}
