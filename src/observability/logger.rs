//! Tracing subscriber setup
//!
//! `RUST_LOG` wins when set; otherwise [`DEFAULT_LOG_FILTER`], or a
//! debug-level filter in verbose mode. Logs go to stderr so `dump` output
//! on stdout stays clean JSON.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "hyperlekce=info,tower_http=info";

const VERBOSE_LOG_FILTER: &str = "hyperlekce=debug,tower_http=debug,sqlx=info";

/// Logging options taken from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct LogConfig {
    pub verbose: bool,
}

impl LogConfig {
    fn filter(&self) -> EnvFilter {
        let fallback = if self.verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(config: LogConfig) {
    let _ = tracing_subscriber::registry()
        .with(config.filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(LogConfig::default());
        init_logging(LogConfig { verbose: true });
        tracing::info!("logging initialized");
    }
}
