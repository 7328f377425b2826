//! Tracing subscriber setup.
//!
//! The filter is read from `GRAYSCALE_LOG` (same syntax as `RUST_LOG`). Without
//! it, the crate logs at `info`, or `debug` when verbose output is requested.

use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV_VAR;

/// Builds the log filter for the given verbosity.
#[must_use]
pub fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "grayscale_lib=debug,grayscale=debug" } else { "info" };
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Installs a stderr subscriber. Later calls are ignored.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init(false);
        init(true);
    }

    #[test]
    fn test_env_filter_builds() {
        let filter = env_filter(true);
        assert!(!filter.to_string().is_empty());
    }
}
