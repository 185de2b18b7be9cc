//! Hand-rolled mock upstream for unit tests, in the style of this codebase's `catchup.rs`
//! `PeerScore` tests: scripted responses, no mocking framework.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::mpsc;

use crate::{
    types::{
        ConsensusSpec, ForkSchedule, Genesis, HeadEvent, PayloadAttributesEvent, ProposerDuties,
        Randao, SignedBeaconBlock, SyncStatus, ValidatorMap, Withdrawals,
    },
    upstream::Upstream,
};

/// What a [`MockUpstream`] read operation should do when called.
#[derive(Debug, Clone)]
pub(crate) enum Scripted<T> {
    Ok(T),
    Err(String),
}

/// A test double implementing the full [`Upstream`] contract.
///
/// Every operation shares one `response` script for simplicity (tests that need
/// different behavior per-operation construct several mocks and only exercise the
/// relevant methods). `calls` counts total invocations across all read operations.
#[derive(Debug)]
pub(crate) struct MockUpstream {
    pub uri: String,
    pub response: Scripted<serde_json::Value>,
    pub sync_status: Scripted<SyncStatus>,
    pub current_slot: Scripted<u64>,
    pub publish: Scripted<u16>,
    pub publish_delay: std::time::Duration,
    pub calls: AtomicUsize,
}

impl MockUpstream {
    pub fn succeeding(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            response: Scripted::Ok(json!({"uri": uri})),
            sync_status: Scripted::Ok(SyncStatus {
                is_syncing: false,
                extra: Default::default(),
            }),
            current_slot: Scripted::Ok(0),
            publish: Scripted::Ok(200),
            publish_delay: std::time::Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(uri: &str, message: &str) -> Self {
        Self {
            uri: uri.to_string(),
            response: Scripted::Err(message.to_string()),
            sync_status: Scripted::Err(message.to_string()),
            current_slot: Scripted::Err(message.to_string()),
            publish: Scripted::Err(message.to_string()),
            publish_delay: std::time::Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_sync_status(mut self, status: SyncStatus) -> Self {
        self.sync_status = Scripted::Ok(status);
        self
    }

    pub fn with_current_slot(mut self, slot: u64) -> Self {
        self.current_slot = Scripted::Ok(slot);
        self
    }

    pub fn with_publish(mut self, outcome: Scripted<u16>) -> Self {
        self.publish = outcome;
        self
    }

    pub fn with_publish_delay(mut self, delay: std::time::Duration) -> Self {
        self.publish_delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn read_response(&self) -> anyhow::Result<serde_json::Value> {
        self.record();
        match &self.response {
            Scripted::Ok(v) => Ok(v.clone()),
            Scripted::Err(e) => Err(anyhow::anyhow!(e.clone())),
        }
    }
}

#[async_trait]
impl Upstream for MockUpstream {
    fn uri(&self) -> String {
        self.uri.clone()
    }

    async fn sync_status(&self) -> anyhow::Result<SyncStatus> {
        match &self.sync_status {
            Scripted::Ok(status) => Ok(status.clone()),
            Scripted::Err(e) => Err(anyhow::anyhow!(e.clone())),
        }
    }

    async fn current_slot(&self) -> anyhow::Result<u64> {
        match &self.current_slot {
            Scripted::Ok(slot) => Ok(*slot),
            Scripted::Err(e) => Err(anyhow::anyhow!(e.clone())),
        }
    }

    async fn subscribe_to_head_events(&self, sender: mpsc::Sender<HeadEvent>) {
        let _ = sender.send(HeadEvent(json!({"uri": self.uri}))).await;
    }

    async fn subscribe_to_payload_attributes_events(
        &self,
        sender: mpsc::Sender<PayloadAttributesEvent>,
    ) {
        let _ = sender
            .send(PayloadAttributesEvent(json!({"uri": self.uri})))
            .await;
    }

    async fn get_state_validators(&self, _state_id: &str) -> anyhow::Result<ValidatorMap> {
        self.read_response()
    }

    async fn get_proposer_duties(&self, _epoch: u64) -> anyhow::Result<ProposerDuties> {
        self.read_response()
    }

    async fn get_genesis(&self) -> anyhow::Result<Genesis> {
        self.read_response()
    }

    async fn get_spec(&self) -> anyhow::Result<ConsensusSpec> {
        self.read_response()
    }

    async fn get_fork_schedule(&self) -> anyhow::Result<ForkSchedule> {
        self.read_response()
    }

    async fn get_block(&self, _block_id: &str) -> anyhow::Result<SignedBeaconBlock> {
        self.read_response()
    }

    async fn get_randao(&self, _slot: u64) -> anyhow::Result<Randao> {
        self.read_response()
    }

    async fn get_withdrawals(&self, _slot: u64) -> anyhow::Result<Withdrawals> {
        self.read_response()
    }

    async fn publish_block(&self, _block: &SignedBeaconBlock) -> anyhow::Result<u16> {
        self.record();
        if !self.publish_delay.is_zero() {
            tokio::time::sleep(self.publish_delay).await;
        }
        match &self.publish {
            Scripted::Ok(status) => Ok(*status),
            Scripted::Err(e) => Err(anyhow::anyhow!(e.clone())),
        }
    }
}
