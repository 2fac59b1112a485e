//! Log output setup.

use gamesmith_error::ConfigError;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects `debug` for the
/// Gamesmith crates and `info` for everything else. `json` switches to one
/// JSON object per line for log shippers.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(verbose: bool, json: bool) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!(
            "info,gamesmith_core={level},gamesmith_models={level},gamesmith_storage={level},\
             gamesmith_pipeline={level},gamesmith_server={level},gamesmith={level},tower_http={level}"
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| ConfigError::new(format!("Failed to initialize logging: {}", e)))
}
