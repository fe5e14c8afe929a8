//! Telemetry
//!
//! One-shot tracing setup for the binary. `RUST_LOG` wins when set;
//! otherwise the configured level applies globally and to this crate.
//! Debug builds log human-readable output, release builds log JSON.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `log_level` comes from config when available; `None` means "info".
/// A second call is a no-op, the first installation wins.
pub fn init(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    #[cfg(debug_assertions)]
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().pretty().with_target(false))
        .try_init()
        .ok();

    #[cfg(not(debug_assertions))]
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_current_span(true))
        .try_init()
        .ok();
}

fn default_filter(level: &str) -> String {
    format!("{level},nucleon_engine={level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_scopes_crate() {
        assert_eq!(default_filter("debug"), "debug,nucleon_engine=debug");
        assert_eq!(default_filter("warn"), "warn,nucleon_engine=warn");
    }
}
