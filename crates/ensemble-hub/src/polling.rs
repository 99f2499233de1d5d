//! Polling event source — fetches new messages from the hub on an
//! interval and feeds them into a room session's channel.
//!
//! Used when no push transport is available. Ordering within a poll
//! batch follows the hub's message order, so the session still sees
//! strict arrival order.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use ensemble_core::types::RoomEvent;

use crate::client::HubClient;
use crate::events::WireMessage;
use crate::source::EventSource;

pub struct PollingSource {
    client: HubClient,
    room: String,
    interval: Duration,
    cancel: CancellationToken,
}

impl PollingSource {
    pub fn new(client: HubClient, room: impl Into<String>, interval: Duration) -> Self {
        Self {
            client,
            room: room.into(),
            interval: interval.max(Duration::from_secs(1)),
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the polling task when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

#[async_trait]
impl EventSource for PollingSource {
    async fn start(&self, tx: mpsc::Sender<RoomEvent>) -> Result<()> {
        let client = self.client.clone();
        let room = self.room.clone();
        let cancel = self.cancel.clone();
        let poll_interval = self.interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut last_seen: Option<DateTime<Utc>> = Some(Utc::now());

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("Polling source for room '{}' stopped", room);
                        break;
                    }
                    _ = interval.tick() => {
                        match client.fetch_messages(&room, last_seen, None).await {
                            Ok(messages) => {
                                if let Some(latest) = messages.last() {
                                    last_seen = Some(latest.timestamp);
                                }
                                for message in messages {
                                    let event = wire_to_event(message);
                                    if tx.send(event).await.is_err() {
                                        // Session torn down
                                        return;
                                    }
                                }
                            }
                            Err(e) => {
                                warn!("Polling room '{}' failed: {:#}", room, e);
                            }
                        }
                    }
                }
            }
        });

        Ok(())
    }

    fn name(&self) -> &str {
        "polling"
    }
}

fn wire_to_event(message: WireMessage) -> RoomEvent {
    RoomEvent::Message(message.into())
}
