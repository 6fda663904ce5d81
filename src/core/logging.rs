//! Tracing targets and an optional subscriber setup.
//!
//! Every event emitted by this crate uses one of the targets below, so a
//! filter such as `RUST_LOG=docsync::sync=debug` isolates one layer.
//! Installing a subscriber is left to the host application; [`init_tracing`]
//! is a convenience for binaries and demos.

use tracing::Level;
use tracing_subscriber::EnvFilter;

pub const TARGET_PREFIX: &str = "docsync";

pub mod targets {
    pub const CODEC: &str = "docsync::codec";
    pub const GATEWAY: &str = "docsync::gateway";
    pub const SYNC: &str = "docsync::sync";
    pub const STORE: &str = "docsync::store";
    pub const ENGINE: &str = "docsync::engine";
}

/// Environment variable consulted by [`level_from_env`].
pub const LOG_LEVEL_ENV: &str = "DOCSYNC_LOG_LEVEL";

pub fn parse_level(s: &str) -> Option<Level> {
    match s.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

pub fn level_from_env(default: Level) -> Level {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|s| parse_level(&s))
        .unwrap_or(default)
}

/// Installs a compact `fmt` subscriber filtered to this crate's targets.
///
/// `RUST_LOG` directives take precedence when set. Returns `false` if a
/// global subscriber was already installed.
pub fn init_tracing(default: Level) -> bool {
    let level = level_from_env(default);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{TARGET_PREFIX}={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .is_ok()
}
