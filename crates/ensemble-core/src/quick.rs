//! Quick assignments — prebuilt incident-response task patterns with
//! suggested roles, and the matcher that routes them to suitable agents.

use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::{Result, RoutingError};
use crate::roles::{AssignmentMap, RoleCatalog};
use crate::types::Priority;

/// An incident-style task pattern with suggested roles
#[derive(Debug, Clone, Serialize)]
pub struct QuickAssignment {
    pub title: &'static str,
    pub description: &'static str,
    pub priority: Priority,
    /// Role keys suited to this incident class, in preference order
    pub suggested_roles: &'static [&'static str],
    /// Template used as the structural basis for the created task
    pub template: &'static str,
}

/// Result of matching a quick assignment against a room's assignments
#[derive(Debug)]
pub struct QuickMatch<'a> {
    pub key: &'static str,
    pub assignment: &'a QuickAssignment,
    /// Agent ids whose assigned role is in the suggested list, in
    /// assignment-map order. Empty means the caller falls back to
    /// manual assignment — a normal outcome, not a failure.
    pub candidates: Vec<String>,
}

pub struct QuickAssignmentTable {
    assignments: Vec<(&'static str, QuickAssignment)>,
}

impl QuickAssignmentTable {
    pub fn get(&self, key: &str) -> Option<&QuickAssignment> {
        self.assignments
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, a)| a)
    }

    pub fn assignment_keys(&self) -> Vec<&'static str> {
        self.assignments.iter().map(|(k, _)| *k).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &QuickAssignment)> {
        self.assignments.iter().map(|(k, a)| (*k, a))
    }

    /// Find every agent whose current role makes it a candidate for the
    /// given quick assignment. Selection among multiple candidates is
    /// the caller's decision; all are returned.
    pub fn match_assignment<'a>(
        &'a self,
        catalog: &RoleCatalog,
        key: &str,
        assignments: &AssignmentMap,
    ) -> Result<QuickMatch<'a>> {
        let (key, assignment) = self
            .assignments
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(k, a)| (*k, a))
            .ok_or_else(|| RoutingError::AssignmentNotFound(key.to_string()))?;

        // A suggested role missing from the catalog is a data
        // inconsistency, fatal to this call only.
        for role in assignment.suggested_roles {
            if catalog.get(role).is_none() {
                return Err(RoutingError::InconsistentCatalog {
                    referrer: key.to_string(),
                    role: role.to_string(),
                });
            }
        }

        let candidates: Vec<String> = assignments
            .iter()
            .filter(|a| assignment.suggested_roles.contains(&a.role_key.as_str()))
            .map(|a| a.agent_id.clone())
            .collect();

        debug!(
            "Quick assignment '{}' matched {} candidate(s)",
            key,
            candidates.len()
        );

        Ok(QuickMatch {
            key,
            assignment,
            candidates,
        })
    }
}

/// The process-wide quick-assignment table
pub static QUICK_ASSIGNMENTS: LazyLock<QuickAssignmentTable> = LazyLock::new(|| {
    QuickAssignmentTable {
        assignments: vec![
            (
                "EMERGENCY_BUG_FIX",
                QuickAssignment {
                    title: "Emergency Bug Fix",
                    description: "Critical bug requiring immediate attention",
                    priority: Priority::Critical,
                    suggested_roles: &["SENIOR_DEVELOPER", "BACKEND_ENGINEER"],
                    template: "BUG_FIX",
                },
            ),
            (
                "SECURITY_INCIDENT",
                QuickAssignment {
                    title: "Security Incident Response",
                    description: "Security incident requiring immediate investigation",
                    priority: Priority::Critical,
                    suggested_roles: &["SECURITY_ANALYST", "DEVOPS_ENGINEER"],
                    template: "SECURITY_AUDIT",
                },
            ),
            (
                "NEW_FEATURE_REQUEST",
                QuickAssignment {
                    title: "New Feature Development",
                    description: "Implement new feature based on requirements",
                    priority: Priority::Medium,
                    suggested_roles: &[
                        "FRONTEND_SPECIALIST",
                        "BACKEND_ENGINEER",
                        "SENIOR_DEVELOPER",
                    ],
                    template: "FEATURE_IMPLEMENTATION",
                },
            ),
            (
                "PERFORMANCE_ISSUE",
                QuickAssignment {
                    title: "Performance Optimization",
                    description: "Investigate and resolve performance issues",
                    priority: Priority::High,
                    suggested_roles: &["SENIOR_DEVELOPER", "DEVOPS_ENGINEER", "DATA_ANALYST"],
                    template: "DATA_ANALYSIS",
                },
            ),
            (
                "CODE_REVIEW_REQUEST",
                QuickAssignment {
                    title: "Code Review Required",
                    description: "Review and approve code changes",
                    priority: Priority::Medium,
                    suggested_roles: &["SENIOR_DEVELOPER", "QA_ENGINEER"],
                    template: "CODE_REVIEW",
                },
            ),
        ],
    }
});

/// Check quick-assignment invariants against the catalog and template
/// table: non-empty suggested roles, every role resolvable, and the
/// basis template present.
pub fn validate_against_catalog(catalog: &RoleCatalog) -> Result<()> {
    for (key, assignment) in QUICK_ASSIGNMENTS.iter() {
        if assignment.suggested_roles.is_empty() {
            return Err(RoutingError::NoSuggestedRoles(key.to_string()));
        }
        for role in assignment.suggested_roles {
            if catalog.get(role).is_none() {
                return Err(RoutingError::InconsistentCatalog {
                    referrer: key.to_string(),
                    role: role.to_string(),
                });
            }
        }
        if crate::templates::TEMPLATES.get(assignment.template).is_none() {
            return Err(RoutingError::TemplateNotFound(assignment.template.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::catalog::CATALOG;

    fn room_with(entries: &[(&str, &str)]) -> AssignmentMap {
        let mut map = AssignmentMap::new();
        for (agent, role) in entries {
            map.assign(&CATALOG, *agent, *agent, role).unwrap();
        }
        map
    }

    #[test]
    fn test_match_returns_suggested_agents_in_map_order() {
        let map = room_with(&[
            ("dana", "DEVOPS_ENGINEER"),
            ("ada", "SENIOR_DEVELOPER"),
            ("tess", "TECHNICAL_WRITER"),
            ("bo", "BACKEND_ENGINEER"),
        ]);
        let m = QUICK_ASSIGNMENTS
            .match_assignment(&CATALOG, "EMERGENCY_BUG_FIX", &map)
            .unwrap();
        assert_eq!(m.candidates, vec!["ada", "bo"]);
        assert_eq!(m.assignment.priority, Priority::Critical);
        assert_eq!(m.assignment.template, "BUG_FIX");
    }

    #[test]
    fn test_match_no_candidates_is_normal() {
        let map = room_with(&[("tess", "TECHNICAL_WRITER")]);
        let m = QUICK_ASSIGNMENTS
            .match_assignment(&CATALOG, "SECURITY_INCIDENT", &map)
            .unwrap();
        assert!(m.candidates.is_empty());
    }

    #[test]
    fn test_match_unknown_key() {
        let map = room_with(&[]);
        let err = QUICK_ASSIGNMENTS
            .match_assignment(&CATALOG, "ALIEN_INVASION", &map)
            .unwrap_err();
        assert_eq!(err, RoutingError::AssignmentNotFound("ALIEN_INVASION".into()));
    }

    #[test]
    fn test_multiple_candidates_all_presented() {
        let map = room_with(&[
            ("ada", "SENIOR_DEVELOPER"),
            ("quinn", "QA_ENGINEER"),
        ]);
        let m = QUICK_ASSIGNMENTS
            .match_assignment(&CATALOG, "CODE_REVIEW_REQUEST", &map)
            .unwrap();
        assert_eq!(m.candidates, vec!["ada", "quinn"]);
    }

    #[test]
    fn test_table_validates_against_catalog() {
        validate_against_catalog(&CATALOG).unwrap();
    }

    #[test]
    fn test_all_suggested_roles_nonempty() {
        for (key, a) in QUICK_ASSIGNMENTS.iter() {
            assert!(!a.suggested_roles.is_empty(), "{key}");
        }
    }
}
