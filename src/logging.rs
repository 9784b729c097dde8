//! Logging setup for chaosboard hosts.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

/// Parse log level string to tracing Level.
fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// `RUST_LOG` directives when set and valid, otherwise everything at `level`.
fn build_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return filter,
            Err(err) => eprintln!("ignoring invalid {}: {err}", EnvFilter::DEFAULT_ENV),
        }
    }
    EnvFilter::default().add_directive(LevelFilter::from_level(parse_level(level)).into())
}

/// Install a console subscriber at `level`. A non-empty `RUST_LOG` replaces
/// the configured level entirely.
///
/// Returns `false` if a global subscriber was already installed, which is
/// expected when a host embeds the board or tests run in one process.
pub fn init(level: &str) -> bool {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(rust_log.as_deref(), level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .is_ok()
}
