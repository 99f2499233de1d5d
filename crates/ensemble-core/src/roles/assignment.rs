//! Per-room mapping of agents to their assigned roles.
//!
//! The map preserves insertion order because the quick-assignment
//! matcher reports candidates in the order agents were assigned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, RoutingError};
use crate::roles::catalog::RoleCatalog;

/// A role bound to one agent in one room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub agent_id: String,
    pub agent_name: String,
    pub role_key: String,
    pub assigned_at: DateTime<Utc>,
}

/// Insertion-ordered agent → RoleAssignment map for a single room.
///
/// At most one assignment per agent: re-assigning overwrites in place,
/// keeping the agent's original position.
#[derive(Debug, Default)]
pub struct AssignmentMap {
    entries: Vec<RoleAssignment>,
}

impl AssignmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a role to an agent, validating the role key against the
    /// catalog. Overwrites any prior assignment for the same agent.
    pub fn assign(
        &mut self,
        catalog: &RoleCatalog,
        agent_id: impl Into<String>,
        agent_name: impl Into<String>,
        role_key: &str,
    ) -> Result<()> {
        if catalog.get(role_key).is_none() {
            return Err(RoutingError::RoleNotFound(role_key.to_string()));
        }
        let agent_id = agent_id.into();
        let assignment = RoleAssignment {
            agent_id: agent_id.clone(),
            agent_name: agent_name.into(),
            role_key: role_key.to_string(),
            assigned_at: Utc::now(),
        };
        if let Some(existing) = self.entries.iter_mut().find(|a| a.agent_id == agent_id) {
            debug!(
                "Re-assigning agent '{}': {} -> {}",
                agent_id, existing.role_key, role_key
            );
            *existing = assignment;
        } else {
            info!("Assigned role '{}' to agent '{}'", role_key, agent_id);
            self.entries.push(assignment);
        }
        Ok(())
    }

    pub fn get(&self, agent_id: &str) -> Option<&RoleAssignment> {
        self.entries.iter().find(|a| a.agent_id == agent_id)
    }

    /// Remove an agent's assignment (e.g. when it leaves the room)
    pub fn remove(&mut self, agent_id: &str) -> Option<RoleAssignment> {
        let pos = self.entries.iter().position(|a| a.agent_id == agent_id)?;
        Some(self.entries.remove(pos))
    }

    /// Assignments in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &RoleAssignment> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::catalog::CATALOG;

    #[test]
    fn test_assign_and_get() {
        let mut map = AssignmentMap::new();
        map.assign(&CATALOG, "a-1", "Ada", "SENIOR_DEVELOPER").unwrap();
        let a = map.get("a-1").unwrap();
        assert_eq!(a.role_key, "SENIOR_DEVELOPER");
        assert_eq!(a.agent_name, "Ada");
    }

    #[test]
    fn test_assign_unknown_role() {
        let mut map = AssignmentMap::new();
        let err = map.assign(&CATALOG, "a-1", "Ada", "WIZARD").unwrap_err();
        assert_eq!(err, RoutingError::RoleNotFound("WIZARD".into()));
        assert!(map.is_empty());
    }

    #[test]
    fn test_reassign_overwrites_in_place() {
        let mut map = AssignmentMap::new();
        map.assign(&CATALOG, "a-1", "Ada", "SENIOR_DEVELOPER").unwrap();
        map.assign(&CATALOG, "a-2", "Bo", "QA_ENGINEER").unwrap();
        map.assign(&CATALOG, "a-1", "Ada", "BACKEND_ENGINEER").unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a-1").unwrap().role_key, "BACKEND_ENGINEER");

        // a-1 keeps its original position
        let order: Vec<&str> = map.iter().map(|a| a.agent_id.as_str()).collect();
        assert_eq!(order, vec!["a-1", "a-2"]);
    }

    #[test]
    fn test_remove() {
        let mut map = AssignmentMap::new();
        map.assign(&CATALOG, "a-1", "Ada", "SENIOR_DEVELOPER").unwrap();
        assert!(map.remove("a-1").is_some());
        assert!(map.remove("a-1").is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_iter_preserves_insertion_order() {
        let mut map = AssignmentMap::new();
        for (id, role) in [
            ("a-3", "QA_ENGINEER"),
            ("a-1", "SENIOR_DEVELOPER"),
            ("a-2", "DATA_ANALYST"),
        ] {
            map.assign(&CATALOG, id, id, role).unwrap();
        }
        let order: Vec<&str> = map.iter().map(|a| a.agent_id.as_str()).collect();
        assert_eq!(order, vec!["a-3", "a-1", "a-2"]);
    }
}
