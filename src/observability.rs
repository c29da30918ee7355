//! This module provides observability and diagnostics for the integer leaf arrays.
//!
//! Sentinel rewrites are the one place where a single write can touch every null
//! cell of a leaf, so they are worth seeing in the logs. The `log_metric!` macro
//! emits structured key/value events through the `log` facade at trace level;
//! `init_logging` wires the facade to `env_logger` for tests, benches and tools.

use std::sync::Once;

use log::LevelFilter;

/// Logs a structured key-value metric string at trace level.
///
/// The arguments are only formatted when trace logging is enabled.
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        if ::log::log_enabled!(::log::Level::Trace) {
            // Collect each pair as a JSON string fragment
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            ::log::trace!("INTLEAF_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` backend at `level`. Only the first call has any effect.
pub fn init_logging(level: LevelFilter) {
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(true);
        builder.filter_level(level);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())
        });

        let _ = builder.try_init();
    });
}
