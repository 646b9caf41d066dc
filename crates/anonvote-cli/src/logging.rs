//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Filter comes from `RUST_LOG`, default
/// `info`. Logs go to stderr so stdout carries only command output.
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
