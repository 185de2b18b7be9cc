//! The aggregator's public error taxonomy.
//!
//! Per-upstream errors are never surfaced directly; only these terminal kinds cross the
//! public API. A conceptual "upstream error" kind (per-attempt passthrough) has no
//! variant here: it is logged at the call site (`dispatch/failover.rs`,
//! `dispatch/sync_status.rs`) and folded into `anyhow::Error` rather than ever reaching a
//! caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No upstream reported `is_syncing = false` and `allow_syncing` is off.
    ///
    /// Raised only by [`crate::Aggregator::best_sync_status`].
    #[error("beacon node syncing, no upstream reported fully synced")]
    SyncingUnavailable,

    /// Every upstream failed a sequential-failover or publish operation.
    ///
    /// Carries the *last* upstream's error, per the "only the last error is embedded"
    /// propagation policy; earlier failures are observability-only (logged at `warn`).
    #[error("all upstreams unavailable: {source:#}")]
    AllUpstreamsFailed {
        /// HTTP status of the last attempt, or 0 if it never reached a transport.
        status: u16,
        #[source]
        source: anyhow::Error,
    },

    /// The last publish outcome collected was HTTP 202: broadcast, but the block failed
    /// beacon-node validation, and no other upstream produced a real success.
    #[error("block broadcast but failed validation (HTTP {status})")]
    BroadcastButInvalid { status: u16 },

    /// `GetWithdrawals` hit an upstream whose error text indicates withdrawals are not
    /// yet active on that fork. Not a transport failure: the fork simply predates the
    /// feature.
    #[error("withdrawals are not available before the Capella fork")]
    WithdrawalsPreCapella,
}

/// Substring the source relay matches on to distinguish a pre-Capella rejection from a
/// genuine transport failure.
pub(crate) const WITHDRAWALS_PRE_CAPELLA_MARKER: &str = "Withdrawals not enabled before capella";
