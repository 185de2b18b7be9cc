//! The aggregator's state and the rotated-view helper shared by every dispatch class.

use std::sync::{atomic::AtomicUsize, Arc};

use crate::{config::allow_syncing_from_env, upstream::Upstream};

/// Fronts a fleet of beacon-node upstreams behind a single logical client.
///
/// `preferred_index` is the only mutable state: it is read and written
/// with `Relaxed` ordering because no operation here establishes a happens-before
/// relationship through it — it is pure affinity, not a synchronization primitive.
pub struct Aggregator {
    pub(crate) upstreams: Vec<Arc<dyn Upstream>>,
    pub(crate) preferred_index: AtomicUsize,
    pub(crate) allow_syncing: bool,
}

impl Aggregator {
    /// Builds an aggregator over `upstreams`, in operator-supplied priority order.
    ///
    /// `allow_syncing` is read from `ALLOW_SYNCING_BEACON_NODE` at construction time.
    /// Use [`Aggregator::with_allow_syncing`] to override it programmatically.
    ///
    /// # Panics
    /// If `upstreams` is empty.
    pub fn new(upstreams: Vec<Arc<dyn Upstream>>) -> Self {
        assert!(
            !upstreams.is_empty(),
            "Aggregator requires at least one upstream"
        );
        Self {
            upstreams,
            preferred_index: AtomicUsize::new(0),
            allow_syncing: allow_syncing_from_env(),
        }
    }

    /// Overrides `allow_syncing`, bypassing the environment variable.
    pub fn with_allow_syncing(mut self, allow_syncing: bool) -> Self {
        self.allow_syncing = allow_syncing;
        self
    }

    /// Builds an aggregator from a [`crate::config::AggregatorConfig`] parsed by a host
    /// binary's `clap::Parser`.
    pub fn from_config(
        upstreams: Vec<Arc<dyn Upstream>>,
        config: &crate::config::AggregatorConfig,
    ) -> Self {
        Self::new(upstreams).with_allow_syncing(config.allow_syncing())
    }

    /// The rotated view used by Class A/C dispatch: the upstream at `preferred_index`
    /// swapped to the front of a fresh copy, leaving every other position in its
    /// original order.
    ///
    /// A position `k` in the returned vector is the *rotated index* that, on success,
    /// Class A/C store back into `preferred_index` verbatim, which is only correct for
    /// `k == 0` or the swap target; other positions get subtly misattributed affinity.
    /// Kept as-is rather than silently corrected, since operators may be relying on the
    /// observed behavior.
    pub(crate) fn rotated_view(&self) -> Vec<Arc<dyn Upstream>> {
        let preferred = self
            .preferred_index
            .load(std::sync::atomic::Ordering::Relaxed);
        let mut view = self.upstreams.clone();
        if preferred != 0 && preferred < view.len() {
            view.swap(0, preferred);
        }
        view
    }

    pub(crate) fn set_preferred_index(&self, rotated_index: usize) {
        self.preferred_index
            .store(rotated_index, std::sync::atomic::Ordering::Relaxed);
    }

    /// Current affinity, as a position in the underlying (unrotated) upstream list.
    pub fn preferred_index(&self) -> usize {
        self.preferred_index
            .load(std::sync::atomic::Ordering::Relaxed)
    }

    /// `GetURI` of the currently preferred upstream.
    pub fn preferred_uri(&self) -> String {
        self.upstreams[self.preferred_index()].uri()
    }

    /// `GetURI` of every upstream, in construction order.
    pub fn beacon_uris(&self) -> Vec<String> {
        self.upstreams.iter().map(|u| u.uri()).collect()
    }

    pub fn allow_syncing(&self) -> bool {
        self.allow_syncing
    }

    pub fn upstream_count(&self) -> usize {
        self.upstreams.len()
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("upstreams", &self.beacon_uris())
            .field("preferred_index", &self.preferred_index())
            .field("allow_syncing", &self.allow_syncing)
            .finish()
    }
}
