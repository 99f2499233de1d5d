//! Error taxonomy for the routing engine.
//!
//! Lookup failures are returned to the immediate caller and never cross
//! room boundaries; nothing here terminates the hosting process.

use thiserror::Error;

/// Errors that can occur in catalog lookups, rendering, and matching
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("Unknown role: {0}")]
    RoleNotFound(String),

    #[error("Unknown task template: {0}")]
    TemplateNotFound(String),

    #[error("Unknown quick assignment: {0}")]
    AssignmentNotFound(String),

    #[error("Template '{template}' is missing variables: {}", .missing.join(", "))]
    MissingVariables {
        template: String,
        missing: Vec<String>,
    },

    #[error("Invalid watch pattern: {0:?}")]
    InvalidWatchPattern(String),

    #[error("'{referrer}' references role '{role}' which is not in the catalog")]
    InconsistentCatalog { referrer: String, role: String },

    #[error("Role '{0}' has an empty capability set")]
    EmptyCapabilities(String),

    #[error("Quick assignment '{0}' has no suggested roles")]
    NoSuggestedRoles(String),
}

/// Result type alias for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = RoutingError::RoleNotFound("WIZARD".into());
        assert_eq!(err.to_string(), "Unknown role: WIZARD");

        let err = RoutingError::MissingVariables {
            template: "BUG_FIX".into(),
            missing: vec!["bug_description".into(), "severity".into()],
        };
        assert!(err.to_string().contains("bug_description, severity"));

        let err = RoutingError::InconsistentCatalog {
            referrer: "EMERGENCY_BUG_FIX".into(),
            role: "GHOST".into(),
        };
        assert!(err.to_string().contains("EMERGENCY_BUG_FIX"));
        assert!(err.to_string().contains("GHOST"));
    }
}
