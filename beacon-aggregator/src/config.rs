//! Environment and CLI configuration.

/// The literal environment variable the source reads: present and non-empty means
/// `allow_syncing = true`; absence, or any other state, leaves it `false`. Note this is
/// *presence*, not a boolean parse — `ALLOW_SYNCING_BEACON_NODE=false` still enables it.
pub const ALLOW_SYNCING_ENV_VAR: &str = "ALLOW_SYNCING_BEACON_NODE";

/// Reads [`ALLOW_SYNCING_ENV_VAR`] directly from the process environment.
pub fn allow_syncing_from_env() -> bool {
    std::env::var(ALLOW_SYNCING_ENV_VAR)
        .map(|v| !v.is_empty())
        .unwrap_or(false)
}

/// CLI-flattenable configuration for a host binary, mirroring how this codebase's
/// binaries expose every `env`-backed setting through `clap` instead of leaving it
/// README-only (see `state-relay-server`'s `Args`).
#[derive(clap::Args, Debug, Clone, Default)]
pub struct AggregatorConfig {
    /// Mirrors `ALLOW_SYNCING_BEACON_NODE`: presence of any non-empty value means true.
    #[clap(long, env = ALLOW_SYNCING_ENV_VAR, default_value = "")]
    allow_syncing_beacon_node: String,
}

impl AggregatorConfig {
    pub fn allow_syncing(&self) -> bool {
        !self.allow_syncing_beacon_node.is_empty()
    }
}
