//! Per-room session state and the event loop that feeds it.
//!
//! Each room owns its assignment map, classifier state, and message
//! history, fed by a single-consumer channel so events are processed
//! strictly in arrival order. The read-only catalog and template tables
//! are shared across rooms; everything here is room-local.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::classifier::{Classifier, NotificationFilter, Notification, WatchConfig};
use crate::error::Result;
use crate::history::MessageHistory;
use crate::quick::{QUICK_ASSIGNMENTS, QuickMatch};
use crate::roles::catalog::CATALOG;
use crate::roles::AssignmentMap;
use crate::types::RoomEvent;

/// All mutable state for one agent's view of one room
pub struct RoomSession {
    room: String,
    assignments: AssignmentMap,
    classifier: Classifier,
    history: MessageHistory,
}

impl RoomSession {
    pub fn new(room: impl Into<String>, watch: WatchConfig, history_capacity: usize) -> Self {
        let room = room.into();
        info!("Opened session for room '{}'", room);
        Self {
            room,
            assignments: AssignmentMap::new(),
            // Notification retention shares the history bound
            classifier: Classifier::new(watch, history_capacity),
            history: MessageHistory::new(history_capacity),
        }
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    /// Apply one event. Messages run the full classification pipeline;
    /// task/system events record their notification directly. Returns
    /// the id of any notification emitted.
    pub fn handle(&mut self, event: RoomEvent) -> Option<String> {
        match event {
            RoomEvent::Message(message) => self.classifier.ingest(message, &mut self.history),
            RoomEvent::TaskAssigned(task) => Some(self.classifier.task_assigned(task)),
            RoomEvent::System(text) => Some(self.classifier.system_event(text)),
        }
    }

    /// Consume events until the channel closes or the token is
    /// cancelled. Each event is processed to completion before the next
    /// is considered; after cancellation no further event is applied.
    pub async fn run(
        mut self,
        mut rx: mpsc::Receiver<RoomEvent>,
        cancel: CancellationToken,
    ) -> Self {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Session for room '{}' cancelled, tearing down", self.room);
                    rx.close();
                    break;
                }
                event = rx.recv() => {
                    match event {
                        Some(event) => {
                            debug!("Room '{}' event: {:?}", self.room, event);
                            self.handle(event);
                        }
                        None => {
                            info!("Event stream for room '{}' closed", self.room);
                            break;
                        }
                    }
                }
            }
        }
        self
    }

    /// Assign a catalog role to an agent in this room
    pub fn assign_role(
        &mut self,
        agent_id: impl Into<String>,
        agent_name: impl Into<String>,
        role_key: &str,
    ) -> Result<()> {
        self.assignments.assign(&CATALOG, agent_id, agent_name, role_key)
    }

    /// Drop an agent's assignment when it leaves the room
    pub fn agent_left(&mut self, agent_id: &str) {
        if self.assignments.remove(agent_id).is_some() {
            debug!("Agent '{}' left room '{}'", agent_id, self.room);
        }
    }

    /// Route a quick assignment against this room's current roles
    pub fn match_quick(&self, key: &str) -> Result<QuickMatch<'static>> {
        QUICK_ASSIGNMENTS.match_assignment(&CATALOG, key, &self.assignments)
    }

    pub fn notifications(&self, filter: NotificationFilter) -> Vec<&Notification> {
        self.classifier.notifications(filter)
    }

    pub fn mark_read(&mut self, id: &str) -> bool {
        self.classifier.mark_read(id)
    }

    pub fn assignments(&self) -> &AssignmentMap {
        &self.assignments
    }

    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn classifier_mut(&mut self) -> &mut Classifier {
        &mut self.classifier
    }
}
