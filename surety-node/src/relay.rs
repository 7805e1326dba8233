//! Delivery of ledger events to external observers.
//!
//! The runtime pushes envelopes into an unbounded channel and never waits on
//! delivery. A tokio task drains the channel and hands each envelope to every
//! registered sink in order.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use surety_common::LedgerEvent;

/// Target for the audit log of domain events.
pub const EVENTS_TARGET: &str = "events";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub seq: u64,
    pub call_id: Uuid,
    pub emitted_at: DateTime<Utc>,
    pub event: LedgerEvent,
}

#[async_trait]
pub trait EventSink: Send + Sync {
    fn name(&self) -> &str;
    async fn deliver(&self, envelope: &EventEnvelope) -> Result<(), String>;
}

/// Writes every event to the `events` tracing target.
#[derive(Debug, Default, Clone)]
pub struct LogSink;

#[async_trait]
impl EventSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, envelope: &EventEnvelope) -> Result<(), String> {
        let payload = serde_json::to_string(&envelope.event).map_err(|e| e.to_string())?;
        info!(
            target: "events",
            seq = envelope.seq,
            call_id = %envelope.call_id,
            "{} {}",
            envelope.event.name(),
            payload
        );
        Ok(())
    }
}

pub type EventSender = mpsc::UnboundedSender<EventEnvelope>;

pub struct EventRelay {
    tx: EventSender,
    worker: JoinHandle<u64>,
}

impl EventRelay {
    /// Starts the delivery task. Must be called inside a tokio runtime.
    pub fn spawn(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<EventEnvelope>();

        let worker = tokio::spawn(async move {
            let mut delivered = 0u64;
            while let Some(envelope) = rx.recv().await {
                for sink in &sinks {
                    if let Err(e) = sink.deliver(&envelope).await {
                        warn!("⚠️ Sink {} falhou no evento #{}: {}", sink.name(), envelope.seq, e);
                    }
                }
                delivered += 1;
            }
            delivered
        });

        Self { tx, worker }
    }

    pub fn sender(&self) -> EventSender {
        self.tx.clone()
    }

    /// Closes the channel once every other sender is dropped, waits for the
    /// backlog to drain and returns the number of envelopes delivered.
    pub async fn shutdown(self) -> u64 {
        drop(self.tx);
        match self.worker.await {
            Ok(delivered) => {
                info!("📪 Relay drained {} events", delivered);
                delivered
            }
            Err(e) => {
                warn!("⚠️ Relay task ended abnormally: {}", e);
                0
            }
        }
    }
}
