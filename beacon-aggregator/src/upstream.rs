//! The single-instance upstream contract.
//!
//! This crate never implements [`Upstream`] itself: the per-upstream HTTP client that
//! issues REST calls and opens SSE streams against one physical beacon node is an
//! external collaborator. The aggregator only consumes it.

use std::fmt::Debug;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::types::{
    ConsensusSpec, ForkSchedule, Genesis, HeadEvent, PayloadAttributesEvent, ProposerDuties,
    Randao, SignedBeaconBlock, SyncStatus, ValidatorMap, Withdrawals,
};

/// One logical beacon (consensus-layer) node.
///
/// Implementors are expected to enforce their own request timeouts: the aggregator
/// imposes none and will serialize on a hanging upstream during sequential failover.
#[async_trait]
pub trait Upstream: Send + Sync + Debug {
    /// A stable identifier for logging and affinity introspection, typically the
    /// upstream's base URL.
    fn uri(&self) -> String;

    /// Current sync status. Errors are dropped by `best_sync_status`'s reducer, never
    /// surfaced.
    async fn sync_status(&self) -> anyhow::Result<SyncStatus>;

    /// Best-effort current head slot, used by the `best_current_slot` probe.
    async fn current_slot(&self) -> anyhow::Result<u64>;

    /// Subscribe to SSE `head` events, forwarding each to `sender` until the stream ends
    /// or errors. Long-running; the aggregator spawns one call per upstream and never
    /// cancels it.
    async fn subscribe_to_head_events(&self, sender: mpsc::Sender<HeadEvent>);

    /// Subscribe to SSE `payload_attributes` events. Same contract as
    /// [`Upstream::subscribe_to_head_events`].
    async fn subscribe_to_payload_attributes_events(
        &self,
        sender: mpsc::Sender<PayloadAttributesEvent>,
    );

    async fn get_state_validators(&self, state_id: &str) -> anyhow::Result<ValidatorMap>;
    async fn get_proposer_duties(&self, epoch: u64) -> anyhow::Result<ProposerDuties>;
    async fn get_genesis(&self) -> anyhow::Result<Genesis>;
    async fn get_spec(&self) -> anyhow::Result<ConsensusSpec>;
    async fn get_fork_schedule(&self) -> anyhow::Result<ForkSchedule>;
    async fn get_block(&self, block_id: &str) -> anyhow::Result<SignedBeaconBlock>;
    async fn get_randao(&self, slot: u64) -> anyhow::Result<Randao>;
    async fn get_withdrawals(&self, slot: u64) -> anyhow::Result<Withdrawals>;

    /// Publish a signed block. Returns the upstream's HTTP-like status code; errors are
    /// reserved for transport-level failures so that HTTP 202 ("broadcast but failed
    /// validation") can be distinguished from a reachability failure.
    async fn publish_block(&self, block: &SignedBeaconBlock) -> anyhow::Result<u16>;
}
