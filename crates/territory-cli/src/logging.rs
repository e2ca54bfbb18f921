use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "TERRITORY_LOG";
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Filter from `directive`, falling back to [`DEFAULT_DIRECTIVE`] when it
/// is absent or does not parse.
pub fn filter_from(directive: Option<&str>) -> EnvFilter {
    directive
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber, writing to stderr.
///
/// A second call is a no-op.
pub fn init(json: bool) {
    let directive = std::env::var(LOG_ENV).ok();
    let filter = filter_from(directive.as_deref());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if installed.is_ok() {
        tracing::debug!(json, "logging initialized");
    }
}
