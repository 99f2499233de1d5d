//! ensemble-core - Role & task routing engine for agent collaboration rooms
//!
//! This crate provides:
//! - Static role catalog grouped by category, validated at load
//! - Template-driven task generation with `{name}` placeholders
//! - Quick-assignment matching that routes incidents to suitable agents
//! - Streaming notification classifier (mentions, keyword watches,
//!   task and system events) over a bounded message history
//! - Per-room session state fed by a single-consumer event channel

pub mod classifier;
pub mod error;
pub mod history;
pub mod quick;
pub mod roles;
pub mod session;
pub mod templates;
pub mod types;

// Re-export main types for convenience
pub use classifier::{
    Classifier, Notification, NotificationFilter, NotificationKind, NotificationPayload,
    WatchConfig,
};
pub use error::RoutingError;
pub use history::MessageHistory;
pub use quick::{QUICK_ASSIGNMENTS, QuickAssignment, QuickMatch};
pub use roles::{AssignmentMap, CATALOG, Role, RoleAssignment, RoleCatalog, RoleCategory};
pub use session::RoomSession;
pub use templates::{RenderedTask, TEMPLATES, TaskTemplate, extract_placeholders};
pub use types::{Message, MessageKind, Priority, RoomEvent, TaskRef};

/// Validate the shipped static tables against each other. Run once at
/// startup; failures indicate an inconsistent build, not bad input.
pub fn validate_tables() -> error::Result<()> {
    CATALOG.validate()?;
    templates::validate_against_catalog(&CATALOG)?;
    quick::validate_against_catalog(&CATALOG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_tables_are_consistent() {
        validate_tables().unwrap();
    }

    #[test]
    fn test_crate_exports() {
        // Just verify that all main types are exported
        let _ = std::mem::size_of::<MessageHistory>();
        let _ = std::mem::size_of::<Classifier>();
        let _ = std::mem::size_of::<AssignmentMap>();
        let _ = std::mem::size_of::<Message>();
        let _ = std::mem::size_of::<RoutingError>();
    }
}
