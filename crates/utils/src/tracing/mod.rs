use lifeguard_core::{DEFAULT_LOG_FILTER, LIFEGUARD_LOG_VAR};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// Installs a compact stderr formatter. The filter comes from `LIFEGUARD_LOG`,
/// then `RUST_LOG`, then falls back to `warn`.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .compact()
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Initialize tracing for test binaries
///
/// Output goes through the test writer so it is captured per test. Calling
/// this more than once, or after another subscriber was installed, is fine.
pub fn init_for_tests() {
    let fmt_layer = fmt::layer().with_test_writer().with_ansi(false).compact();

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init();
}

/// Build the filter used by [`init`] and [`init_for_tests`]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LIFEGUARD_LOG_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Create a span covering the teardown of one test's resources
pub fn teardown_span(test_name: &str, entries: usize) -> Span {
    span!(Level::DEBUG, "teardown", test_name = %test_name, entries = %entries)
}
