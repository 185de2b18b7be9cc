//! Class A — sequential failover with affinity.
//!
//! One generic dispatcher backs all eight read operations, the same way
//! `StatePeers::fetch` in this codebase's `catchup.rs` backs every `StateCatchup` method:
//! iterate a priority-ordered peer list, stop at the first success, log and continue past
//! failures.

use std::future::Future;
use std::sync::Arc;

use crate::{
    aggregator::Aggregator,
    error::{Error, WITHDRAWALS_PRE_CAPELLA_MARKER},
    types::{
        ConsensusSpec, ForkSchedule, Genesis, ProposerDuties, Randao, SignedBeaconBlock,
        ValidatorMap, Withdrawals,
    },
    upstream::Upstream,
};

impl Aggregator {
    /// Runs `op` against each upstream in the rotated view until one succeeds.
    ///
    /// `update_affinity` is `false` for `get_spec` and `get_block`: those two reads never
    /// move `preferred_index` on success, unlike the other six. Kept as an intentional
    /// asymmetry rather than unified, since the reason for it predates this crate.
    async fn failover<T, F, Fut>(&self, op_name: &'static str, update_affinity: bool, op: F) -> Result<T, Error>
    where
        F: Fn(Arc<dyn Upstream>) -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let view = self.rotated_view();
        let mut last_err: Option<anyhow::Error> = None;
        for (rotated_index, upstream) in view.iter().enumerate() {
            match op(upstream.clone()).await {
                Ok(value) => {
                    if update_affinity {
                        self.set_preferred_index(rotated_index);
                    }
                    return Ok(value);
                },
                Err(err) => {
                    tracing::warn!(
                        op = op_name,
                        upstream = %upstream.uri(),
                        error = %err,
                        "upstream request failed, trying next upstream"
                    );
                    last_err = Some(err);
                },
            }
        }
        Err(Error::AllUpstreamsFailed {
            status: 0,
            source: last_err.unwrap_or_else(|| anyhow::anyhow!("no upstreams configured")),
        })
    }

    pub async fn get_state_validators(&self, state_id: &str) -> Result<ValidatorMap, Error> {
        let state_id = state_id.to_string();
        self.failover("get_state_validators", true, move |u| {
            let state_id = state_id.clone();
            async move { u.get_state_validators(&state_id).await }
        })
        .await
    }

    pub async fn get_proposer_duties(&self, epoch: u64) -> Result<ProposerDuties, Error> {
        self.failover("get_proposer_duties", true, move |u| async move {
            u.get_proposer_duties(epoch).await
        })
        .await
    }

    pub async fn get_genesis(&self) -> Result<Genesis, Error> {
        self.failover("get_genesis", true, move |u| async move { u.get_genesis().await })
            .await
    }

    /// Does **not** update affinity on success, unlike the other six reads.
    pub async fn get_spec(&self) -> Result<ConsensusSpec, Error> {
        self.failover("get_spec", false, move |u| async move { u.get_spec().await })
            .await
    }

    pub async fn get_fork_schedule(&self) -> Result<ForkSchedule, Error> {
        self.failover("get_fork_schedule", true, move |u| async move {
            u.get_fork_schedule().await
        })
        .await
    }

    /// Does **not** update affinity on success, unlike the other six reads.
    pub async fn get_block(&self, block_id: &str) -> Result<SignedBeaconBlock, Error> {
        let block_id = block_id.to_string();
        self.failover("get_block", false, move |u| {
            let block_id = block_id.clone();
            async move { u.get_block(&block_id).await }
        })
        .await
    }

    pub async fn get_randao(&self, slot: u64) -> Result<Randao, Error> {
        self.failover("get_randao", true, move |u| async move { u.get_randao(slot).await })
            .await
    }

    /// Short-circuits with [`Error::WithdrawalsPreCapella`] the moment an upstream's
    /// error text contains the Capella marker, without consulting the remaining
    /// upstreams.
    pub async fn get_withdrawals(&self, slot: u64) -> Result<Withdrawals, Error> {
        let view = self.rotated_view();
        let mut last_err: Option<anyhow::Error> = None;
        for (rotated_index, upstream) in view.iter().enumerate() {
            match upstream.get_withdrawals(slot).await {
                Ok(value) => {
                    self.set_preferred_index(rotated_index);
                    return Ok(value);
                },
                Err(err) => {
                    if err.to_string().contains(WITHDRAWALS_PRE_CAPELLA_MARKER) {
                        tracing::info!(
                            upstream = %upstream.uri(),
                            "withdrawals unavailable before Capella on this upstream"
                        );
                        return Err(Error::WithdrawalsPreCapella);
                    }
                    tracing::warn!(
                        op = "get_withdrawals",
                        upstream = %upstream.uri(),
                        error = %err,
                        "upstream request failed, trying next upstream"
                    );
                    last_err = Some(err);
                },
            }
        }
        Err(Error::AllUpstreamsFailed {
            status: 0,
            source: last_err.unwrap_or_else(|| anyhow::anyhow!("no upstreams configured")),
        })
    }
}
