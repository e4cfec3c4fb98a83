//! Push-only progress messages for operators.
//!
//! Delivery is best-effort: pushing never blocks and never fails the caller.

use std::sync::Arc;
use tokio::sync::broadcast;

pub trait LogSink: Send + Sync {
    fn push(&self, message: &str);
}

pub type SharedLogSink = Arc<dyn LogSink>;

/// Mirrors messages into the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn push(&self, message: &str) {
        tracing::info!(target: "price_scraper::progress", "{}", message);
    }
}

/// Fans messages out to any number of subscribers.
///
/// Slow subscribers lose the oldest messages; with no subscribers messages
/// are dropped.
#[derive(Debug, Clone)]
pub struct BroadcastLogSink {
    sender: broadcast::Sender<String>,
}

impl BroadcastLogSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }
}

impl LogSink for BroadcastLogSink {
    fn push(&self, message: &str) {
        tracing::debug!(target: "price_scraper::progress", "{}", message);
        let _ = self.sender.send(message.to_string());
    }
}

/// Drains whatever is currently buffered for `receiver`.
pub fn drain(receiver: &mut broadcast::Receiver<String>) -> Vec<String> {
    let mut messages = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(message) => messages.push(message),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    messages
}
