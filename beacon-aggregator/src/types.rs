//! Data types shared between the aggregator and its upstreams.
//!
//! Most beacon-API response bodies are opaque to this crate: the aggregator forwards
//! them verbatim and never inspects their contents. They are modeled as
//! [`serde_json::Value`] aliases rather than typed structs, matching the "wire schemas
//! are an external collaborator's concern" scope cut.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of `GET /eth/v1/node/syncing`, or equivalent.
///
/// `is_syncing` is the only field the aggregator's reduction logic inspects; everything
/// else is forwarded verbatim via `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStatus {
    pub is_syncing: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An SSE `head` event, opaque to the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadEvent(pub Value);

/// An SSE `payload_attributes` event, opaque to the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadAttributesEvent(pub Value);

/// Map of validator identifiers to validator records, as returned by
/// `GET /eth/v1/beacon/states/{state_id}/validators`.
pub type ValidatorMap = Value;

/// Proposer duties for an epoch.
pub type ProposerDuties = Value;

/// Genesis information.
pub type Genesis = Value;

/// The running consensus-layer spec (fork versions, constants, ...).
pub type ConsensusSpec = Value;

/// The fork schedule.
pub type ForkSchedule = Value;

/// A (possibly signed) beacon block, used both as `GetBlock`'s response and
/// `PublishBlock`'s request body.
pub type SignedBeaconBlock = Value;

/// RANDAO reveal for a slot.
pub type Randao = Value;

/// Withdrawals for a slot.
pub type Withdrawals = Value;

/// Internal result of one upstream's publish attempt, used to reduce the publish race.
#[derive(Debug, Clone)]
pub(crate) struct PublishOutcome {
    pub rotated_index: usize,
    pub status: u16,
    pub error: Option<String>,
}
