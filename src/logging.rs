// src/logging.rs
use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive, e.g. `ZKS_LOG=zks=debug`.
pub const LOG_ENV: &str = "ZKS_LOG";

static INIT: Once = Once::new();

/// Starts the stderr subscriber. Safe to call more than once.
///
/// `ZKS_LOG` takes precedence, then `RUST_LOG`. Without either, `verbosity` picks the level:
/// 0 shows warnings, 1 info and 2 or more debug.
pub fn init(verbosity: u8) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

        if let Err(e) = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init()
        {
            eprintln!("Failed to initialize logging: {e}");
        }
    });
}

const fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
