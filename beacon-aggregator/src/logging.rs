//! Tracing subscriber setup for host binaries, mirroring `sequencer_utils::logging`'s
//! `#[clap(flatten)]`-able `Config` + `init()` convention.
//!
//! The aggregator itself never installs a subscriber; it only emits `tracing` events.
//! This module exists for binaries that embed the aggregator and want the same
//! log-format switch every other binary in this codebase exposes.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct Config {
    /// Log output format.
    #[clap(long, env = "RUST_LOG_FORMAT", default_value = "compact")]
    pub log_format: LogFormat,
}

impl Config {
    /// Installs a global `tracing_subscriber`, honoring `RUST_LOG` for filtering.
    ///
    /// Idempotent-ish in practice: a second call just fails to set the global default
    /// and is ignored, matching how `setup_test` is called from every test in this
    /// codebase's `staking-cli` tests.
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let result = match self.log_format {
            LogFormat::Json => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .try_init(),
            LogFormat::Compact => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .compact()
                .try_init(),
        };
        if let Err(err) = result {
            tracing::debug!("tracing subscriber already installed: {err}");
        }
    }
}

/// Installs a test-scoped subscriber. Safe to call from every test.
#[cfg(test)]
pub fn setup_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
