//! Logging initialization.

use tracing::Level;
use tracing_subscriber::fmt;

/// Install a stderr subscriber so stdout stays clean for results.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
