//! Tracing setup: filtered stderr output plus an append-only debug log.
//! Every failure here is swallowed — diagnostics must never break a command.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber. `ENGRAM_LOG` controls stderr verbosity
/// (default: warn); the debug log always records at debug.
pub fn init(agents_home: &Path) {
    let stderr_filter =
        EnvFilter::try_from_env("ENGRAM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(stderr_filter);

    let file_layer = open_debug_log(agents_home).map(|file| {
        tracing_subscriber::fmt::layer()
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .with_filter(EnvFilter::new("debug"))
    });

    // Failure means a subscriber is already set; either way, carry on.
    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
}

fn open_debug_log(agents_home: &Path) -> Option<std::fs::File> {
    let path = agents_home.join("memory").join("debug.log");
    std::fs::create_dir_all(path.parent()?).ok()?;
    OpenOptions::new().create(true).append(true).open(path).ok()
}
