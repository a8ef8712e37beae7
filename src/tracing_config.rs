//! Tracing setup for the `smart-log` binary.
//!
//! Nothing is installed unless `SMART_LOG_LOG` (or `RUST_LOG`) is set.
//! `SMART_LOG_FORMAT=json` switches to one JSON object per event; the
//! default is plain text. Output always goes to stderr, stdout is reserved
//! for command results.
//!
//! ```bash
//! SMART_LOG_LOG=debug smart-log delete --file src/App.vue
//! SMART_LOG_LOG="smart_log::classify=debug" SMART_LOG_FORMAT=json smart-log insert --file a.ts --at 3:7
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_VAR: &str = "SMART_LOG_LOG";
const FORMAT_VAR: &str = "SMART_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(FORMAT_VAR).unwrap_or_default())
    }
}

/// `SMART_LOG_LOG` wins over `RUST_LOG`
fn build_filter() -> EnvFilter {
    match std::env::var(LOG_VAR) {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber if logging was requested
pub fn init_tracing() {
    if std::env::var(LOG_VAR).is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
