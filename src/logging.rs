//! Logging setup for the command-line tool.
//!
//! Diagnostics go to stderr so that reports written to stdout stay clean for
//! piping. `RUST_LOG` overrides the default level.

use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to set the global tracing subscriber.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install a stderr subscriber.
///
/// `verbose` lowers the default level from `warn` to `debug`; an explicit
/// `RUST_LOG` always wins.
pub fn init(verbose: bool) -> Result<(), LoggingError> {
    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let subscriber = Registry::default()
        .with(build_env_filter(verbose))
        .with(stderr_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}
