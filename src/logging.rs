//! Tracing setup for hosts embedding the portal layer.
//!
//! The crate itself only emits `tracing` events; installing a subscriber is left to
//! the host. [`init`] is a convenience that wires the `PORTAL_*` environment knobs
//! into a `tracing-subscriber` fmt layer.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

/// Default filter directive when `RUST_LOG` is unset.
pub fn default_directive(config: &EnvConfig) -> String {
    let level = if config.debug { "debug" } else { "info" };
    format!("tape_portal={level}")
}

fn build_filter(config: &EnvConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(config)))
}

/// Installs a global subscriber.
///
/// Events go to `config.write_log` (appended, no ANSI) when set, otherwise to
/// stderr. Returns `Ok(false)` when a global subscriber was already installed.
pub fn init(config: &EnvConfig) -> io::Result<bool> {
    let filter = build_filter(config);

    let installed = match config.write_log.as_deref() {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
                .is_ok()
        }
        None => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
                .is_ok()
        }
    };

    if installed {
        tracing::debug!(log_file = ?config.write_log, "portal tracing initialized");
    }
    Ok(installed)
}
