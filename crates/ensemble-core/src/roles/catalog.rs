//! Static role catalog — immutable role definitions grouped by category.
//!
//! The catalog is defined once at process start and never mutated, so it
//! can be shared across rooms and streams without locking.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{Result, RoutingError};
use crate::types::Priority;

/// Closed set of role categories. Callers must not assume new
/// categories appear without a catalog update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RoleCategory {
    Development,
    Analysis,
    Management,
    Quality,
    Operations,
    Documentation,
    Research,
}

impl RoleCategory {
    pub const ALL: [RoleCategory; 7] = [
        Self::Development,
        Self::Analysis,
        Self::Management,
        Self::Quality,
        Self::Operations,
        Self::Documentation,
        Self::Research,
    ];

    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" => Some(Self::Development),
            "analysis" => Some(Self::Analysis),
            "management" => Some(Self::Management),
            "quality" => Some(Self::Quality),
            "operations" => Some(Self::Operations),
            "documentation" => Some(Self::Documentation),
            "research" => Some(Self::Research),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "Development"),
            Self::Analysis => write!(f, "Analysis"),
            Self::Management => write!(f, "Management"),
            Self::Quality => write!(f, "Quality"),
            Self::Operations => write!(f, "Operations"),
            Self::Documentation => write!(f, "Documentation"),
            Self::Research => write!(f, "Research"),
        }
    }
}

/// A role definition: a named bundle of responsibilities and
/// capabilities assignable to an agent in a room.
#[derive(Debug, Clone, Serialize)]
pub struct Role {
    pub name: &'static str,
    pub category: RoleCategory,
    pub description: &'static str,
    /// Briefing text handed to an agent when the role is assigned
    pub prompt: &'static str,
    pub capabilities: &'static [&'static str],
    pub default_tasks: &'static [&'static str],
    pub priority: Priority,
}

/// Ordered, immutable registry of roles keyed by stable role key
pub struct RoleCatalog {
    roles: Vec<(&'static str, Role)>,
}

impl RoleCatalog {
    pub fn get(&self, key: &str) -> Option<&Role> {
        self.roles.iter().find(|(k, _)| *k == key).map(|(_, r)| r)
    }

    /// All roles in the given category, in catalog order
    pub fn roles_in_category(&self, category: RoleCategory) -> Vec<(&'static str, &Role)> {
        self.roles
            .iter()
            .filter(|(_, r)| r.category == category)
            .map(|(k, r)| (*k, r))
            .collect()
    }

    pub fn role_keys(&self) -> Vec<&'static str> {
        self.roles.iter().map(|(k, _)| *k).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Role)> {
        self.roles.iter().map(|(k, r)| (*k, r))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Check catalog invariants: every role has at least one capability.
    /// Cross-table references (templates, quick assignments) are checked
    /// by their own modules against this catalog.
    pub fn validate(&self) -> Result<()> {
        for (key, role) in &self.roles {
            if role.capabilities.is_empty() {
                return Err(RoutingError::EmptyCapabilities((*key).to_string()));
            }
        }
        Ok(())
    }
}

/// The process-wide role catalog
pub static CATALOG: LazyLock<RoleCatalog> = LazyLock::new(|| RoleCatalog {
    roles: vec![
        (
            "SENIOR_DEVELOPER",
            Role {
                name: "Senior Developer",
                category: RoleCategory::Development,
                description: "Lead developer for complex coding tasks, architecture decisions, and code reviews",
                prompt: "You are a Senior Developer in this collaborative workspace. You lead complex \
                         development tasks, make architectural decisions, conduct thorough code reviews, \
                         mentor other agents, and break large features into manageable tasks. Provide \
                         detailed technical analysis, consider edge cases, and document your decisions.",
                capabilities: &["code_review", "architecture", "mentoring", "complex_debugging"],
                default_tasks: &[
                    "Review and approve code changes",
                    "Design system architecture",
                    "Lead technical discussions",
                    "Establish coding standards",
                ],
                priority: Priority::High,
            },
        ),
        (
            "FRONTEND_SPECIALIST",
            Role {
                name: "Frontend Specialist",
                category: RoleCategory::Development,
                description: "UI/UX focused developer specializing in user interfaces and frontend technologies",
                prompt: "You are a Frontend Specialist focused on exceptional user experiences: modern \
                         frontend frameworks, accessibility, responsive design, and frontend performance. \
                         Consider the user experience in every decision.",
                capabilities: &["ui_design", "frontend_frameworks", "responsive_design", "accessibility"],
                default_tasks: &[
                    "Implement responsive UI components",
                    "Optimize frontend performance",
                    "Ensure accessibility compliance",
                    "Create interactive prototypes",
                ],
                priority: Priority::Medium,
            },
        ),
        (
            "BACKEND_ENGINEER",
            Role {
                name: "Backend Engineer",
                category: RoleCategory::Development,
                description: "Server-side development specialist focusing on APIs, databases, and system integration",
                prompt: "You are a Backend Engineer responsible for server-side development: API design, \
                         database optimization, scalability, security, and third-party integration. \
                         Prioritize security, scalability, and maintainability.",
                capabilities: &["api_development", "database_design", "server_architecture", "security"],
                default_tasks: &[
                    "Design and implement APIs",
                    "Optimize database queries",
                    "Implement security measures",
                    "Monitor system performance",
                ],
                priority: Priority::High,
            },
        ),
        (
            "DATA_ANALYST",
            Role {
                name: "Data Analyst",
                category: RoleCategory::Analysis,
                description: "Specialist in data analysis, visualization, and insights generation",
                prompt: "You are a Data Analyst responsible for extracting insights from data: statistical \
                         analysis, visualization, trend identification, data cleaning, and forecasting. \
                         Always validate data quality and provide actionable insights.",
                capabilities: &["statistical_analysis", "data_visualization", "reporting", "predictive_modeling"],
                default_tasks: &[
                    "Analyze data trends and patterns",
                    "Create comprehensive reports",
                    "Build interactive dashboards",
                    "Validate data quality",
                ],
                priority: Priority::Medium,
            },
        ),
        (
            "SECURITY_ANALYST",
            Role {
                name: "Security Analyst",
                category: RoleCategory::Analysis,
                description: "Cybersecurity specialist focused on threat detection and security assessment",
                prompt: "You are a Security Analyst responsible for maintaining system security: \
                         vulnerability assessment, threat detection, incident response, security code \
                         reviews, and risk mitigation. Approach every task with a security-first mindset.",
                capabilities: &["vulnerability_assessment", "threat_detection", "compliance", "incident_response"],
                default_tasks: &[
                    "Conduct security assessments",
                    "Monitor for threats and anomalies",
                    "Review code for security issues",
                    "Develop security policies",
                ],
                priority: Priority::High,
            },
        ),
        (
            "PROJECT_MANAGER",
            Role {
                name: "Project Manager",
                category: RoleCategory::Management,
                description: "Coordinates projects, manages timelines, and ensures deliverable quality",
                prompt: "You are a Project Manager coordinating team efforts: project planning, resource \
                         allocation, risk management, stakeholder communication, and deliverable reviews. \
                         Keep projects on track and communicate clearly.",
                capabilities: &["project_planning", "resource_management", "risk_assessment", "team_coordination"],
                default_tasks: &[
                    "Create project timelines and milestones",
                    "Coordinate team activities",
                    "Monitor project progress",
                    "Manage stakeholder communications",
                ],
                priority: Priority::High,
            },
        ),
        (
            "SCRUM_MASTER",
            Role {
                name: "Scrum Master",
                category: RoleCategory::Management,
                description: "Agile facilitator focused on team productivity and process improvement",
                prompt: "You are a Scrum Master facilitating agile processes: running ceremonies, removing \
                         blockers, coaching on agile practice, and protecting the team from distractions. \
                         Focus on productivity and continuous process improvement.",
                capabilities: &["agile_facilitation", "process_improvement", "team_coaching", "impediment_removal"],
                default_tasks: &[
                    "Facilitate daily standups and retrospectives",
                    "Remove team blockers and impediments",
                    "Track sprint progress and metrics",
                    "Coach team on agile practices",
                ],
                priority: Priority::Medium,
            },
        ),
        (
            "QA_ENGINEER",
            Role {
                name: "QA Engineer",
                category: RoleCategory::Quality,
                description: "Quality assurance specialist focused on testing and bug detection",
                prompt: "You are a QA Engineer ensuring software quality through comprehensive testing: \
                         test case design, automation, bug reporting, performance testing, and quality \
                         metrics. Think like an end user when testing functionality.",
                capabilities: &["test_automation", "bug_detection", "performance_testing", "quality_metrics"],
                default_tasks: &[
                    "Design and execute test cases",
                    "Develop automated testing scripts",
                    "Perform regression testing",
                    "Report and track bugs",
                ],
                priority: Priority::Medium,
            },
        ),
        (
            "DEVOPS_ENGINEER",
            Role {
                name: "DevOps Engineer",
                category: RoleCategory::Operations,
                description: "Infrastructure and deployment specialist focused on CI/CD and system operations",
                prompt: "You are a DevOps Engineer responsible for infrastructure and operations: CI/CD \
                         pipelines, infrastructure as code, container orchestration, monitoring, and \
                         disaster recovery. Prioritize automation, reliability, and scalability.",
                capabilities: &["cicd_pipelines", "infrastructure_automation", "container_orchestration", "monitoring"],
                default_tasks: &[
                    "Set up CI/CD pipelines",
                    "Automate infrastructure deployment",
                    "Monitor system performance",
                    "Implement backup and recovery",
                ],
                priority: Priority::High,
            },
        ),
        (
            "TECHNICAL_WRITER",
            Role {
                name: "Technical Writer",
                category: RoleCategory::Documentation,
                description: "Documentation specialist focused on clear technical communication",
                prompt: "You are a Technical Writer creating clear, comprehensive documentation: API docs, \
                         user guides, technical specifications, tutorials, and knowledge base upkeep. \
                         Focus on clarity, accuracy, and user-friendliness.",
                capabilities: &["api_documentation", "user_guides", "technical_specs", "knowledge_management"],
                default_tasks: &[
                    "Create API documentation",
                    "Write user guides and tutorials",
                    "Maintain knowledge base",
                    "Review and update existing docs",
                ],
                priority: Priority::Low,
            },
        ),
        (
            "RESEARCH_ANALYST",
            Role {
                name: "Research Analyst",
                category: RoleCategory::Research,
                description: "Specialist in market research, competitive analysis, and trend identification",
                prompt: "You are a Research Analyst gathering and analyzing information to support \
                         decisions: market and competitive research, trend assessment, user research, and \
                         feasibility studies. Provide thorough, unbiased research with clear recommendations.",
                capabilities: &["market_research", "competitive_analysis", "trend_analysis", "user_research"],
                default_tasks: &[
                    "Conduct market and competitive research",
                    "Analyze industry trends",
                    "Gather user feedback and insights",
                    "Create research reports",
                ],
                priority: Priority::Medium,
            },
        ),
    ],
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_known_role() {
        let role = CATALOG.get("SENIOR_DEVELOPER").unwrap();
        assert_eq!(role.name, "Senior Developer");
        assert_eq!(role.category, RoleCategory::Development);
        assert_eq!(role.priority, Priority::High);
    }

    #[test]
    fn test_get_unknown_role() {
        assert!(CATALOG.get("WIZARD").is_none());
    }

    #[test]
    fn test_every_role_appears_in_its_category_listing() {
        for (key, role) in CATALOG.iter() {
            let in_category = CATALOG.roles_in_category(role.category);
            assert!(
                in_category.iter().any(|(k, _)| *k == key),
                "{key} missing from {} listing",
                role.category
            );
        }
    }

    #[test]
    fn test_category_listing_only_contains_that_category() {
        for category in RoleCategory::ALL {
            for (_, role) in CATALOG.roles_in_category(category) {
                assert_eq!(role.category, category);
            }
        }
    }

    #[test]
    fn test_development_contains_senior_developer() {
        let dev = CATALOG.roles_in_category(RoleCategory::Development);
        assert!(dev.iter().any(|(k, _)| *k == "SENIOR_DEVELOPER"));
    }

    #[test]
    fn test_catalog_validates() {
        CATALOG.validate().unwrap();
    }

    #[test]
    fn test_all_roles_have_capabilities_and_tasks() {
        for (key, role) in CATALOG.iter() {
            assert!(!role.capabilities.is_empty(), "{key} has no capabilities");
            assert!(!role.default_tasks.is_empty(), "{key} has no default tasks");
        }
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            RoleCategory::from_string("development"),
            Some(RoleCategory::Development)
        );
        assert_eq!(RoleCategory::from_string("Quality"), Some(RoleCategory::Quality));
        assert_eq!(RoleCategory::from_string("unknown"), None);
    }

    #[test]
    fn test_role_keys_stable_order() {
        let keys = CATALOG.role_keys();
        assert_eq!(keys.first(), Some(&"SENIOR_DEVELOPER"));
        assert_eq!(keys.len(), CATALOG.len());
    }
}
