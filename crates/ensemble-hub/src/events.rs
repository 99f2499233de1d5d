//! Wire events from the live transport — JSON payloads pushed by the
//! hub to connected agents, converted into core room events.
//!
//! The hub's JSON uses camelCase field names; the structs here are the
//! only place that casing appears.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ensemble_core::types::{Message, MessageKind, Priority, RoomEvent, TaskRef};

/// Events the hub pushes over the live transport
pub mod names {
    pub const MESSAGE: &str = "message";
    pub const TASK_ASSIGNED: &str = "task_assigned";
    pub const NOTIFICATION: &str = "notification";
}

/// A chat message as the hub serializes it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    pub id: String,
    pub agent_id: String,
    pub agent_name: String,
    pub content: String,
    #[serde(default)]
    pub mentions: Vec<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, rename = "type")]
    pub kind: WireMessageKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WireMessageKind {
    #[default]
    User,
    System,
}

/// A task summary as pushed by a `task_assigned` event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub assignee: Option<String>,
    pub priority: Priority,
}

/// A broadcast pushed by a `notification` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireNotification {
    pub message: String,
}

/// Any event the transport can deliver, tagged by event name
#[derive(Debug, Clone)]
pub enum TransportEvent {
    Message(WireMessage),
    TaskAssigned(WireTask),
    Notification(WireNotification),
}

impl TransportEvent {
    /// Decode a named event payload. Unknown event names yield None and
    /// are skipped by the transport.
    pub fn decode(event: &str, payload: &serde_json::Value) -> Option<Self> {
        match event {
            names::MESSAGE => serde_json::from_value(payload.clone())
                .ok()
                .map(Self::Message),
            names::TASK_ASSIGNED => serde_json::from_value(payload.clone())
                .ok()
                .map(Self::TaskAssigned),
            names::NOTIFICATION => serde_json::from_value(payload.clone())
                .ok()
                .map(Self::Notification),
            _ => None,
        }
    }

    pub fn into_room_event(self) -> RoomEvent {
        match self {
            Self::Message(m) => RoomEvent::Message(m.into()),
            Self::TaskAssigned(t) => RoomEvent::TaskAssigned(TaskRef {
                id: t.id,
                title: t.title,
                assignee: t.assignee,
                priority: t.priority,
            }),
            Self::Notification(n) => RoomEvent::System(n.message),
        }
    }
}

impl From<WireMessage> for Message {
    fn from(m: WireMessage) -> Self {
        Message {
            id: m.id,
            sender_id: m.agent_id,
            sender_name: m.agent_name,
            content: m.content,
            mentions: m.mentions,
            timestamp: m.timestamp,
            kind: match m.kind {
                WireMessageKind::User => MessageKind::User,
                WireMessageKind::System => MessageKind::System,
            },
        }
    }
}
