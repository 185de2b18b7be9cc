//! Class C — first-success publish race.

use tokio::sync::mpsc;

use crate::{aggregator::Aggregator, error::Error, types::{PublishOutcome, SignedBeaconBlock}};

impl Aggregator {
    /// Races `PublishBlock` across every upstream in the rotated view, returning the
    /// first real success (any 2xx other than 202).
    ///
    /// HTTP 202 ("broadcast but failed validation") and transport errors are tracked as
    /// the last-seen outcome but never treated as success, even if they arrive first.
    /// The channel is sized to the upstream count so that outstanding tasks never block
    /// writing after this function returns early.
    pub async fn publish_block(&self, block: &SignedBeaconBlock) -> Result<u16, Error> {
        let view = self.rotated_view();
        let (tx, mut rx) = mpsc::channel::<PublishOutcome>(view.len());

        for (rotated_index, upstream) in view.iter().cloned().enumerate() {
            let tx = tx.clone();
            let block = block.clone();
            tokio::spawn(async move {
                let outcome = match upstream.publish_block(&block).await {
                    Ok(status) => PublishOutcome {
                        rotated_index,
                        status,
                        error: None,
                    },
                    Err(err) => PublishOutcome {
                        rotated_index,
                        status: 0,
                        error: Some(err.to_string()),
                    },
                };
                // Bounded to `view.len()`: every task sends exactly once, so this never blocks.
                let _ = tx.send(outcome).await;
            });
        }
        // Drop our own clone so `rx` closes once every spawned task has sent its outcome.
        drop(tx);

        let mut last_outcome: Option<PublishOutcome> = None;
        while let Some(outcome) = rx.recv().await {
            let upstream_uri = view[outcome.rotated_index].uri();
            if let Some(err) = &outcome.error {
                tracing::warn!(upstream = %upstream_uri, error = %err, "publish failed");
                last_outcome = Some(outcome);
                continue;
            }
            if outcome.status == 202 {
                tracing::warn!(upstream = %upstream_uri, "block broadcast but failed validation");
                last_outcome = Some(outcome);
                continue;
            }
            self.set_preferred_index(outcome.rotated_index);
            return Ok(outcome.status);
        }

        match last_outcome {
            Some(PublishOutcome { status: 202, .. }) => Err(Error::BroadcastButInvalid { status: 202 }),
            Some(PublishOutcome { status, error: Some(msg), .. }) => Err(Error::AllUpstreamsFailed {
                status,
                source: anyhow::anyhow!(msg),
            }),
            Some(PublishOutcome { status, .. }) => Err(Error::AllUpstreamsFailed {
                status,
                source: anyhow::anyhow!("publish failed with no further detail"),
            }),
            None => Err(Error::AllUpstreamsFailed {
                status: 0,
                source: anyhow::anyhow!("no upstreams configured"),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use std::{sync::Arc, time::Duration};

    use serde_json::json;

    use super::*;
    use crate::{
        logging::setup_test,
        test_support::{MockUpstream, Scripted},
        upstream::Upstream,
        Aggregator,
    };

    /// `U0` returns 202 quickly, `U1` returns a real 200 a bit later, `U2` errors. The
    /// race must wait past the early 202 and report `U1`'s success.
    #[tokio::test]
    async fn publish_race_skips_202_for_a_later_real_success() {
        setup_test();
        let u0: Arc<dyn Upstream> = Arc::new(
            MockUpstream::succeeding("u0")
                .with_publish(Scripted::Ok(202))
                .with_publish_delay(Duration::from_millis(5)),
        );
        let u1: Arc<dyn Upstream> = Arc::new(
            MockUpstream::succeeding("u1")
                .with_publish(Scripted::Ok(200))
                .with_publish_delay(Duration::from_millis(20)),
        );
        let u2: Arc<dyn Upstream> = Arc::new(MockUpstream::failing("u2", "unreachable"));
        let agg = Aggregator::new(vec![u0, u1, u2]);

        let status = agg.publish_block(&json!({"block": "x"})).await.expect("u1 should win");
        assert_eq!(status, 200);
        assert_eq!(agg.preferred_index(), 1);
    }

    /// Every upstream either errors or returns 202 — no real success, so the terminal
    /// error reflects the last outcome collected.
    #[tokio::test]
    async fn publish_race_all_fail_or_broadcast_invalid() {
        setup_test();
        let u0: Arc<dyn Upstream> = Arc::new(MockUpstream::failing("u0", "unreachable"));
        let u1: Arc<dyn Upstream> =
            Arc::new(MockUpstream::succeeding("u1").with_publish(Scripted::Ok(202)));
        let u2: Arc<dyn Upstream> = Arc::new(MockUpstream::failing("u2", "unreachable"));
        let agg = Aggregator::new(vec![u0, u1, u2]);

        let err = agg.publish_block(&json!({"block": "x"})).await.unwrap_err();
        assert!(matches!(
            err,
            Error::BroadcastButInvalid { .. } | Error::AllUpstreamsFailed { .. }
        ));
    }

    /// A 202 arriving before a real success is never mistaken for one, even when it is
    /// first in the rotated view.
    #[tokio::test]
    async fn publish_race_first_arrival_202_does_not_win() {
        setup_test();
        let u0: Arc<dyn Upstream> =
            Arc::new(MockUpstream::succeeding("u0").with_publish(Scripted::Ok(202)));
        let u1: Arc<dyn Upstream> = Arc::new(
            MockUpstream::succeeding("u1")
                .with_publish(Scripted::Ok(200))
                .with_publish_delay(Duration::from_millis(10)),
        );
        let agg = Aggregator::new(vec![u0, u1]);

        let status = agg.publish_block(&json!({"block": "x"})).await.expect("u1 should win");
        assert_eq!(status, 200);
    }
}
