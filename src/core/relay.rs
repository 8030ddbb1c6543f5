use crate::core::aggregator::LineAggregator;
use crate::core::extractor::ExchangeExtractor;
use crate::domain::model::{ExchangePayload, ExchangeRecord};
use crate::domain::ports::{ContextSource, ExchangeSink};
use chrono::{SecondsFormat, Utc};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Spawns the background delivery worker feeding the sink from a bounded
/// queue. Delivery is best-effort: each attempt is independent, outcomes are
/// logged, and nothing is retried or reported back to the parsing side.
pub fn spawn_delivery_worker<S>(
    sink: S,
    capacity: usize,
) -> (mpsc::Sender<ExchangeRecord>, JoinHandle<()>)
where
    S: ExchangeSink + 'static,
{
    let (tx, mut rx) = mpsc::channel::<ExchangeRecord>(capacity);
    let handle = tokio::spawn(async move {
        while let Some(record) = rx.recv().await {
            // Timestamp reflects send time, not parse time.
            let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
            let payload = ExchangePayload::from_record(record, ts);
            tracing::info!(
                "🚀 Sending exchange to collector: {} {} -> {} {}",
                payload.input_qty,
                payload.input_item_id,
                payload.output_qty,
                payload.output_item_id
            );
            match sink.deliver(payload).await {
                Ok(()) => tracing::info!("✅ Exchange data sent successfully"),
                Err(e) => tracing::error!("❌ Failed to send exchange data: {}", e),
            }
        }
    });
    (tx, handle)
}

/// Ties the line aggregator and extractor to a context source and the
/// delivery queue. Owns all parsing state; feed it every chat line, in
/// arrival order, from a single task.
pub struct ChatRelay<C: ContextSource> {
    aggregator: LineAggregator,
    extractor: ExchangeExtractor,
    context: C,
    deliveries: mpsc::Sender<ExchangeRecord>,
}

impl<C: ContextSource> ChatRelay<C> {
    pub fn new(context: C, deliveries: mpsc::Sender<ExchangeRecord>) -> Self {
        Self {
            aggregator: LineAggregator::new(),
            extractor: ExchangeExtractor::new(),
            context,
            deliveries,
        }
    }

    /// Handles one incoming chat line. Never blocks on delivery: a full
    /// queue drops the record with a warning rather than stalling the
    /// line stream.
    pub fn on_chat_line(&mut self, line: &str, now: Instant) {
        let Some(block) = self.aggregator.observe(line, now) else {
            return;
        };

        let ctx = self.context.block_context();
        let Some(record) = self.extractor.extract(&block, &ctx) else {
            return;
        };

        match self.deliveries.try_send(record) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(record)) => {
                tracing::warn!(
                    "Delivery queue full, dropping exchange {}",
                    record.hash_id
                );
            }
            Err(mpsc::error::TrySendError::Closed(record)) => {
                tracing::warn!(
                    "Delivery worker stopped, dropping exchange {}",
                    record.hash_id
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BlockContext, Position};
    use crate::utils::error::Result;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedContext;

    impl ContextSource for FixedContext {
        fn block_context(&self) -> BlockContext {
            BlockContext {
                observer: "Steve".to_string(),
                dimension: "minecraft:overworld".to_string(),
                position: Position::new(10, 64, -3),
            }
        }
    }

    struct ChannelSink {
        tx: mpsc::Sender<ExchangePayload>,
    }

    #[async_trait]
    impl ExchangeSink for ChannelSink {
        async fn deliver(&self, payload: ExchangePayload) -> Result<()> {
            let _ = self.tx.send(payload).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn full_block_reaches_the_sink() {
        let (sink_tx, mut sink_rx) = mpsc::channel(8);
        let (tx, _handle) = spawn_delivery_worker(ChannelSink { tx: sink_tx }, 8);
        let mut relay = ChatRelay::new(FixedContext, tx);

        let start = Instant::now();
        let lines = [
            "(3/5) exchanges present",
            "Input: 1 Diamond",
            "Output: 2 Sand",
            "4 exchanges available",
        ];
        for (i, line) in lines.iter().enumerate() {
            relay.on_chat_line(line, start + Duration::from_millis(i as u64 * 100));
        }

        let payload = tokio::time::timeout(Duration::from_secs(2), sink_rx.recv())
            .await
            .expect("delivery timed out")
            .expect("sink channel closed");

        assert_eq!(payload.player, "Steve");
        assert_eq!(payload.input_qty, 1);
        assert_eq!(payload.input_item_id, "Diamond");
        assert_eq!(payload.output_qty, 2);
        assert_eq!(payload.output_item_id, "Sand");
        assert_eq!(payload.exchange_possible, 4);
        assert_eq!(payload.loc_src, "chat_relay");
        assert!(!payload.ts.is_empty());
    }

    #[tokio::test]
    async fn chatter_without_a_block_delivers_nothing() {
        let (sink_tx, mut sink_rx) = mpsc::channel(8);
        let (tx, _handle) = spawn_delivery_worker(ChannelSink { tx: sink_tx }, 8);
        let mut relay = ChatRelay::new(FixedContext, tx);

        let start = Instant::now();
        relay.on_chat_line("hello there", start);
        relay.on_chat_line("Output: 2 Sand", start);
        relay.on_chat_line("4 exchanges available", start);

        let outcome =
            tokio::time::timeout(Duration::from_millis(200), sink_rx.recv()).await;
        assert!(outcome.is_err(), "no payload should have been delivered");
    }
}
