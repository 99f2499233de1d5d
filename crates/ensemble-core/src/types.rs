//! Shared types for ensemble-core

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task/role priority, ordered from least to most urgent.
///
/// Roles in the catalog only use `Low`..`High`; `Critical` is reserved
/// for incident-style quick assignments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Parse a priority from a string (e.g. from CLI args or hub payloads)
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Whether a message came from an agent or from the hub itself
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    User,
    System,
}

/// A message delivered from the live transport.
///
/// The id is issued by the hub and treated as opaque; the mention list
/// is extracted server-side from the content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    #[serde(default)]
    pub mentions: Vec<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub kind: MessageKind,
}

/// Summary of a task as delivered by a `task_assigned` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub assignee: Option<String>,
    pub priority: Priority,
}

/// One event on a room's inbound stream, consumed by the session loop
#[derive(Debug, Clone)]
pub enum RoomEvent {
    Message(Message),
    TaskAssigned(TaskRef),
    System(String),
}
