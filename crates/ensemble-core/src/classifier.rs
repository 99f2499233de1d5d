//! Streaming notification classifier.
//!
//! Each inbound message is processed to completion before the next:
//! mention check first, then keyword check (first-match-wins, only when
//! no mention fired), then an unconditional append to the room's
//! message history. Task and system notifications come from explicit
//! events, not message content.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, RoutingError};
use crate::history::MessageHistory;
use crate::types::{Message, TaskRef};

/// What an agent wants to be alerted about: its own name in mention
/// lists, plus case-insensitive substring keyword watches.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    agent_name: String,
    agent_name_lower: String,
    keywords: Vec<String>,
}

impl WatchConfig {
    pub fn new(agent_name: impl Into<String>) -> Self {
        let agent_name = agent_name.into();
        let agent_name_lower = agent_name.to_lowercase();
        Self {
            agent_name,
            agent_name_lower,
            keywords: Vec::new(),
        }
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// Add a keyword watch. Blank patterns are rejected: an empty
    /// substring would match every message.
    pub fn watch(&mut self, pattern: impl Into<String>) -> Result<()> {
        let pattern = pattern.into();
        if pattern.trim().is_empty() {
            return Err(RoutingError::InvalidWatchPattern(pattern));
        }
        self.keywords.push(pattern);
        Ok(())
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Mention,
    Keyword,
    Task,
    System,
}

/// What triggered a notification, with its originating reference
#[derive(Debug, Clone, Serialize)]
pub enum NotificationPayload {
    Mention { message: Message },
    Keyword { pattern: String, message: Message },
    Task { task: TaskRef },
    System { text: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: String,
    pub payload: NotificationPayload,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self.payload {
            NotificationPayload::Mention { .. } => NotificationKind::Mention,
            NotificationPayload::Keyword { .. } => NotificationKind::Keyword,
            NotificationPayload::Task { .. } => NotificationKind::Task,
            NotificationPayload::System { .. } => NotificationKind::System,
        }
    }
}

/// Filter for notification queries
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationFilter {
    pub unread_only: bool,
    pub kind: Option<NotificationKind>,
}

/// Per-stream classifier state: the watch configuration and the bounded
/// notification list. Retention is capped at the same bound as message
/// history; the oldest notifications are evicted first.
#[derive(Debug)]
pub struct Classifier {
    watch: WatchConfig,
    notifications: VecDeque<Notification>,
    capacity: usize,
}

impl Classifier {
    pub fn new(watch: WatchConfig, capacity: usize) -> Self {
        Self {
            watch,
            notifications: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn watch_config(&self) -> &WatchConfig {
        &self.watch
    }

    pub fn watch_config_mut(&mut self) -> &mut WatchConfig {
        &mut self.watch
    }

    /// Classify one message and append it to history. Returns the id of
    /// the notification emitted, if any. A message that both mentions
    /// the watcher and contains a watched keyword produces exactly one
    /// mention notification.
    pub fn ingest(&mut self, message: Message, history: &mut MessageHistory) -> Option<String> {
        let emitted = if self.is_mentioned(&message) {
            debug!("Mention of '{}' in message {}", self.watch.agent_name, message.id);
            Some(self.push(NotificationPayload::Mention {
                message: message.clone(),
            }))
        } else if let Some(pattern) = self.first_keyword_hit(&message) {
            debug!("Keyword '{}' hit in message {}", pattern, message.id);
            Some(self.push(NotificationPayload::Keyword {
                pattern,
                message: message.clone(),
            }))
        } else {
            None
        };
        history.append(message);
        emitted
    }

    /// Record an explicit task-assigned event
    pub fn task_assigned(&mut self, task: TaskRef) -> String {
        self.push(NotificationPayload::Task { task })
    }

    /// Record an explicit system broadcast
    pub fn system_event(&mut self, text: impl Into<String>) -> String {
        self.push(NotificationPayload::System { text: text.into() })
    }

    /// Notifications matching the filter, most recent last
    pub fn notifications(&self, filter: NotificationFilter) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| !filter.unread_only || !n.read)
            .filter(|n| filter.kind.is_none_or(|kind| n.kind() == kind))
            .collect()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Mark a notification read. Returns false for unknown ids.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    fn is_mentioned(&self, message: &Message) -> bool {
        message
            .mentions
            .iter()
            .any(|name| name.to_lowercase() == self.watch.agent_name_lower)
    }

    /// First watched keyword appearing in the content, in configured
    /// order
    fn first_keyword_hit(&self, message: &Message) -> Option<String> {
        let content = message.content.to_lowercase();
        self.watch
            .keywords
            .iter()
            .find(|pattern| content.contains(&pattern.to_lowercase()))
            .cloned()
    }

    fn push(&mut self, payload: NotificationPayload) -> String {
        if self.notifications.len() == self.capacity {
            self.notifications.pop_front();
        }
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            payload,
            timestamp: Utc::now(),
            read: false,
        };
        let id = notification.id.clone();
        self.notifications.push_back(notification);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageKind, Priority};

    fn msg(id: &str, content: &str, mentions: &[&str]) -> Message {
        Message {
            id: id.into(),
            sender_id: "a-9".into(),
            sender_name: "Sender".into(),
            content: content.into(),
            mentions: mentions.iter().map(|s| s.to_string()).collect(),
            timestamp: Utc::now(),
            kind: MessageKind::User,
        }
    }

    fn classifier() -> Classifier {
        let mut watch = WatchConfig::new("Ada");
        watch.watch("urgent").unwrap();
        watch.watch("deploy").unwrap();
        Classifier::new(watch, 100)
    }

    #[test]
    fn test_watch_rejects_blank_pattern() {
        let mut watch = WatchConfig::new("Ada");
        assert!(matches!(
            watch.watch("   "),
            Err(RoutingError::InvalidWatchPattern(_))
        ));
        assert!(watch.keywords().is_empty());
    }

    #[test]
    fn test_mention_case_insensitive() {
        let mut c = classifier();
        let mut history = MessageHistory::new(10);
        let id = c.ingest(msg("m-1", "hey there", &["ADA"]), &mut history);
        assert!(id.is_some());
        let all = c.notifications(NotificationFilter::default());
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].kind(), NotificationKind::Mention);
    }

    #[test]
    fn test_keyword_first_match_wins_in_configured_order() {
        let mut c = classifier();
        let mut history = MessageHistory::new(10);
        c.ingest(msg("m-1", "please DEPLOY this urgent fix", &[]), &mut history);
        let all = c.notifications(NotificationFilter::default());
        assert_eq!(all.len(), 1);
        match &all[0].payload {
            NotificationPayload::Keyword { pattern, message } => {
                // "urgent" is configured before "deploy"
                assert_eq!(pattern, "urgent");
                assert_eq!(message.id, "m-1");
            }
            other => panic!("expected keyword payload, got {other:?}"),
        }
    }

    #[test]
    fn test_mention_suppresses_keyword() {
        let mut c = classifier();
        let mut history = MessageHistory::new(10);
        c.ingest(msg("m-1", "urgent: look at this, Ada", &["Ada"]), &mut history);
        let all = c.notifications(NotificationFilter::default());
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].kind(), NotificationKind::Mention);
    }

    #[test]
    fn test_ordering_matches_arrival_and_history_gets_everything() {
        let mut c = classifier();
        let mut history = MessageHistory::new(10);
        c.ingest(msg("m-1", "ping", &["Ada"]), &mut history);
        c.ingest(msg("m-2", "this is urgent", &[]), &mut history);
        c.ingest(msg("m-3", "nothing to see", &[]), &mut history);

        let kinds: Vec<NotificationKind> = c
            .notifications(NotificationFilter::default())
            .iter()
            .map(|n| n.kind())
            .collect();
        assert_eq!(kinds, vec![NotificationKind::Mention, NotificationKind::Keyword]);

        let ids: Vec<&str> = history.recent(10).iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m-1", "m-2", "m-3"]);
    }

    #[test]
    fn test_plain_message_emits_nothing_but_is_logged() {
        let mut c = classifier();
        let mut history = MessageHistory::new(10);
        assert!(c.ingest(msg("m-1", "hello world", &[]), &mut history).is_none());
        assert!(c.notifications(NotificationFilter::default()).is_empty());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_task_and_system_events() {
        let mut c = classifier();
        c.task_assigned(TaskRef {
            id: "t-1".into(),
            title: "Fix login".into(),
            assignee: Some("Ada".into()),
            priority: Priority::High,
        });
        c.system_event("room maintenance at midnight");

        let tasks = c.notifications(NotificationFilter {
            kind: Some(NotificationKind::Task),
            ..Default::default()
        });
        assert_eq!(tasks.len(), 1);
        let systems = c.notifications(NotificationFilter {
            kind: Some(NotificationKind::System),
            ..Default::default()
        });
        assert_eq!(systems.len(), 1);
    }

    #[test]
    fn test_mark_read_and_unread_filter() {
        let mut c = classifier();
        let mut history = MessageHistory::new(10);
        let id = c.ingest(msg("m-1", "hi", &["Ada"]), &mut history).unwrap();

        assert_eq!(c.unread_count(), 1);
        assert!(c.mark_read(&id));
        assert!(!c.mark_read("no-such-id"));
        assert_eq!(c.unread_count(), 0);

        let unread = c.notifications(NotificationFilter {
            unread_only: true,
            ..Default::default()
        });
        assert!(unread.is_empty());

        // Still present without the filter; it is not re-created
        let all = c.notifications(NotificationFilter::default());
        assert_eq!(all.len(), 1);
        assert!(all[0].read);
    }

    #[test]
    fn test_notification_retention_is_bounded() {
        let watch = WatchConfig::new("Ada");
        let mut c = Classifier::new(watch, 5);
        for i in 0..12 {
            c.system_event(format!("broadcast {i}"));
        }
        let all = c.notifications(NotificationFilter::default());
        assert_eq!(all.len(), 5);
        match &all[0].payload {
            NotificationPayload::System { text } => assert_eq!(text, "broadcast 7"),
            other => panic!("unexpected payload {other:?}"),
        }
    }
}
