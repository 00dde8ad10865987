//! Logging setup using tracing_subscriber.

use std::io::IsTerminal;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "HOSTLENS_LOG";

/// Initializes a tracing subscriber writing to stderr.
///
/// The filter comes from `HOSTLENS_LOG`; without it, `default_level` applies
/// to this crate and everything else stays at `warn`.
pub fn init(default_level: &str) {
    // Tests call this repeatedly.
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,hostlens={}", default_level)));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .init();

        tracing::debug!("logging initialized");
    });
}
