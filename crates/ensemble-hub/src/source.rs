//! Transport seam — anything that can deliver room events into a
//! session's channel implements `EventSource`.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use ensemble_core::types::RoomEvent;

/// A live transport that feeds one room's event stream.
///
/// Implementations spawn their own listening task and push decoded
/// events into `tx`; the session loop on the receiving end guarantees
/// strict arrival-order processing.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Start delivering events, sending them to the provided sender
    async fn start(&self, tx: mpsc::Sender<RoomEvent>) -> Result<()>;

    /// A short name for logging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ensemble_core::types::{Message, MessageKind};

    /// Source that replays a fixed script of events
    struct ScriptedSource {
        events: Vec<RoomEvent>,
    }

    #[async_trait]
    impl EventSource for ScriptedSource {
        async fn start(&self, tx: mpsc::Sender<RoomEvent>) -> Result<()> {
            for event in self.events.clone() {
                tx.send(event).await?;
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_scripted_source_delivers_in_order() {
        let source = ScriptedSource {
            events: vec![
                RoomEvent::System("one".into()),
                RoomEvent::Message(Message {
                    id: "m-1".into(),
                    sender_id: "a-1".into(),
                    sender_name: "Ada".into(),
                    content: "two".into(),
                    mentions: vec![],
                    timestamp: Utc::now(),
                    kind: MessageKind::User,
                }),
            ],
        };

        let (tx, mut rx) = mpsc::channel(8);
        source.start(tx).await.unwrap();

        assert!(matches!(rx.recv().await, Some(RoomEvent::System(s)) if s == "one"));
        assert!(matches!(rx.recv().await, Some(RoomEvent::Message(m)) if m.id == "m-1"));
        assert!(rx.recv().await.is_none());
    }
}
