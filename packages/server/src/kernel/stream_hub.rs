//! In-process pub/sub hub backing the import change feed.
//!
//! Topics are opaque strings. The import pipeline publishes job rows under
//! `scrape_job:{job_id}` and `supplier_imports:{supplier_id}`; SSE endpoints
//! subscribe by topic and forward whatever arrives.
//!
//! # Usage
//!
//! Producers:
//!   hub.publish("scrape_job:0193...", json!({"type": "scrape_job", "status": "mapping"})).await;
//!
//! Consumers:
//!   let rx = hub.subscribe("scrape_job:0193...").await;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Messages buffered per topic before slow subscribers start lagging.
pub const DEFAULT_TOPIC_CAPACITY: usize = 256;

/// Topic-keyed broadcast hub. Cloning shares the same channels.
#[derive(Clone)]
pub struct StreamHub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<serde_json::Value>>>>,
    capacity: usize,
}

impl StreamHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TOPIC_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Publish to a topic. Returns how many subscribers received it (0 when
    /// nobody is listening).
    pub async fn publish(&self, topic: &str, value: serde_json::Value) -> usize {
        let channels = self.channels.read().await;
        match channels.get(topic) {
            Some(tx) => tx.send(value).unwrap_or(0),
            None => 0,
        }
    }

    /// Subscribe to a topic, creating its channel on first use.
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<serde_json::Value> {
        let mut channels = self.channels.write().await;
        channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    pub async fn subscriber_count(&self, topic: &str) -> usize {
        self.channels
            .read()
            .await
            .get(topic)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// Drop channels nobody listens to. Returns the number removed.
    pub async fn cleanup(&self) -> usize {
        let mut channels = self.channels.write().await;
        let before = channels.len();
        channels.retain(|_, tx| tx.receiver_count() > 0);
        before - channels.len()
    }
}

impl Default for StreamHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let hub = StreamHub::new();
        let mut rx = hub.subscribe("scrape_job:1").await;

        let value = serde_json::json!({"type": "scrape_job", "status": "mapping"});
        assert_eq!(hub.publish("scrape_job:1", value.clone()).await, 1);

        assert_eq!(rx.recv().await.unwrap(), value);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_dropped() {
        let hub = StreamHub::new();
        let delivered = hub
            .publish("scrape_job:nobody", serde_json::json!({"status": "failed"}))
            .await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_observers_are_independent() {
        let hub = StreamHub::new();
        let mut first = hub.subscribe("supplier_imports:a").await;
        let second = hub.subscribe("supplier_imports:a").await;
        assert_eq!(hub.subscriber_count("supplier_imports:a").await, 2);

        drop(second);
        let value = serde_json::json!({"status": "completed"});
        assert_eq!(hub.publish("supplier_imports:a", value.clone()).await, 1);
        assert_eq!(first.recv().await.unwrap(), value);
    }

    #[tokio::test]
    async fn test_cleanup_removes_abandoned_topics() {
        let hub = StreamHub::new();
        let rx = hub.subscribe("scrape_job:gone").await;
        let _kept = hub.subscribe("scrape_job:kept").await;

        drop(rx);
        assert_eq!(hub.cleanup().await, 1);
        assert_eq!(hub.channels.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags() {
        let hub = StreamHub::with_capacity(2);
        let mut rx = hub.subscribe("scrape_job:slow").await;

        for n in 0..5 {
            hub.publish("scrape_job:slow", serde_json::json!({ "n": n })).await;
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
    }
}
