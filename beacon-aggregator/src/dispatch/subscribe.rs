//! Class D — event fan-in.
//!
//! One long-running task per upstream, all forwarding into the same caller-owned
//! channel. No deduplication, no ordering guarantee across upstreams, no cancellation:
//! subscription tasks live for the process lifetime, matching the source's behavior.

use tokio::sync::mpsc;

use crate::{
    aggregator::Aggregator,
    types::{HeadEvent, PayloadAttributesEvent},
};

impl Aggregator {
    /// Spawns one subscription task per upstream, each pushing into `sender`.
    ///
    /// `sender` is owned by the caller: the aggregator never closes it. If `sender`'s
    /// channel is bounded and fills up, the affected upstream's subscription task blocks
    /// — backpressure is inherited, not managed here.
    pub fn subscribe_to_head_events(&self, sender: mpsc::Sender<HeadEvent>) {
        for upstream in self.upstreams.iter().cloned() {
            let sender = sender.clone();
            tokio::spawn(async move {
                tracing::debug!(upstream = %upstream.uri(), "subscribing to head events");
                upstream.subscribe_to_head_events(sender).await;
                tracing::info!(upstream = %upstream.uri(), "head event subscription ended");
            });
        }
    }

    /// Same contract as [`Aggregator::subscribe_to_head_events`], for payload-attributes
    /// events.
    pub fn subscribe_to_payload_attributes_events(&self, sender: mpsc::Sender<PayloadAttributesEvent>) {
        for upstream in self.upstreams.iter().cloned() {
            let sender = sender.clone();
            tokio::spawn(async move {
                tracing::debug!(upstream = %upstream.uri(), "subscribing to payload attributes events");
                upstream.subscribe_to_payload_attributes_events(sender).await;
                tracing::info!(upstream = %upstream.uri(), "payload attributes event subscription ended");
            });
        }
    }
}
