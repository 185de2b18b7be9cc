//! Class B — concurrent sync-status reduction.
//!
//! Grounded in `catchup.rs`'s `on_providers`: spawn one task per upstream, reduce with a
//! `parking_lot::Mutex`-protected accumulator instead of racing via `FuturesUnordered`
//! directly, since every task must run to completion (not just the first) for the
//! reduction rule to be correct.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{aggregator::Aggregator, error::Error, types::SyncStatus};

#[derive(Default)]
struct Reducer {
    best: Option<SyncStatus>,
    found_synced: bool,
}

impl Aggregator {
    /// Reduces every upstream's sync status to a single "best" one.
    ///
    /// Does **not** update `preferred_index`: this is a health probe, not a data read.
    pub async fn best_sync_status(&self) -> Result<SyncStatus, Error> {
        let reducer = Arc::new(Mutex::new(Reducer::default()));
        let mut handles = Vec::with_capacity(self.upstreams.len());
        for upstream in self.upstreams.iter().cloned() {
            let reducer = reducer.clone();
            handles.push(tokio::spawn(async move {
                match upstream.sync_status().await {
                    Ok(status) => {
                        let mut reducer = reducer.lock();
                        if reducer.found_synced {
                            // Already locked in a finished upstream; nothing can improve on it.
                            return;
                        }
                        if !status.is_syncing {
                            reducer.best = Some(status);
                            reducer.found_synced = true;
                        } else if reducer.best.is_none() {
                            reducer.best = Some(status);
                        }
                    },
                    Err(err) => {
                        tracing::warn!(upstream = %upstream.uri(), error = %err, "sync_status failed");
                    },
                }
            }));
        }
        for handle in handles {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "sync_status task panicked");
            }
        }

        let Reducer { best, found_synced } = Arc::try_unwrap(reducer)
            .expect("all reducer tasks joined, no outstanding clones")
            .into_inner();

        if !found_synced && !self.allow_syncing {
            return Err(Error::SyncingUnavailable);
        }
        best.ok_or_else(|| Error::AllUpstreamsFailed {
            status: 0,
            source: anyhow::anyhow!("all upstreams unavailable"),
        })
    }

    /// Supplement: best-effort current slot across all upstreams, tolerating individual
    /// failures. Unlike [`Aggregator::best_sync_status`] this makes no synced-only
    /// guarantee and never errors unless every upstream fails.
    pub async fn best_current_slot(&self) -> Result<u64, Error> {
        let best = Arc::new(Mutex::new(Option::<u64>::None));
        let mut handles = Vec::with_capacity(self.upstreams.len());
        for upstream in self.upstreams.iter().cloned() {
            let best = best.clone();
            handles.push(tokio::spawn(async move {
                match upstream.current_slot().await {
                    Ok(slot) => {
                        let mut best = best.lock();
                        *best = Some(best.map_or(slot, |existing| existing.max(slot)));
                    },
                    Err(err) => {
                        tracing::warn!(upstream = %upstream.uri(), error = %err, "current_slot failed");
                    },
                }
            }));
        }
        for handle in handles {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "current_slot task panicked");
            }
        }
        let best = *best.lock();
        best.ok_or_else(|| Error::AllUpstreamsFailed {
            status: 0,
            source: anyhow::anyhow!("all upstreams unavailable"),
        })
    }
}
