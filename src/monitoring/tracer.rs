/*!
 * Structured Tracing
 * Subscriber setup for the simulator's tracing output
 *
 * Logs go to stderr so the memory grid printed on stdout stays clean.
 */

use tracing::info;
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a given `-v` count
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (overrides the verbosity default)
/// - MEMSIM_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing(verbosity: u8) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let use_json = std::env::var("MEMSIM_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    // try_init so repeated initialization (tests, multiple runs) is harmless
    let initialized = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if initialized.is_ok() {
        info!(json = use_json, "Structured tracing initialized");
    }
}
