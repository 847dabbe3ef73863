use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer,
};

/// Crates whose events pass the default filter.
const LOG_TARGETS: &[&str] = &["todo_server", "todo_core", "tower_http"];

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default level when RUST_LOG is not set.
    pub level: Level,
    /// Whether to emit JSON lines instead of human-readable output.
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
        }
    }
}

/// `RUST_LOG` when set, otherwise `level` for this service's crates.
pub fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

fn default_directives(level: Level) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global stdout subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = env_filter(config.level);

    let layer = if config.json_format {
        fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_filter(filter)
            .boxed()
    };

    tracing_subscriber::registry().with(layer).try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_info_text() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.json_format);
    }

    #[test]
    fn default_directives_cover_every_crate() {
        assert_eq!(
            default_directives(Level::DEBUG),
            "todo_server=DEBUG,todo_core=DEBUG,tower_http=DEBUG"
        );
    }
}
