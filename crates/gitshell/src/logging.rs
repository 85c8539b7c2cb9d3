//! Log output setup.
//!
//! The library logs through the `log` facade and `tracing`. Binaries call
//! [`init`] once to route both to a formatted stderr subscriber.

use tracing_subscriber::EnvFilter;

/// Error returned when a global logger or subscriber is already installed.
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// `default_filter`.
///
/// # Panics
/// Panics if a global logger or subscriber was already set.
pub fn init(default_filter: &str) {
    if let Err(e) = try_init(default_filter) {
        panic!("failed to initialize logging: {}", e);
    }
}

/// Like [`init`], but reports an already-installed logger as an error.
pub fn try_init(default_filter: &str) -> Result<(), InitError> {
    tracing_log::LogTracer::init()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!("logging initialized");
    Ok(())
}
