//! Task template engine — renders parameterized task descriptions.
//!
//! Placeholders use a closed `{name}` syntax. Rendering is pure: it
//! never mutates the template table and returns a fresh value each
//! call. Missing variables are not an error by default — unresolved
//! placeholders render literally, and callers can discover a template's
//! placeholder set up front via [`extract_placeholders`].

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use crate::error::{Result, RoutingError};
use crate::types::Priority;

/// A parameterized task definition
#[derive(Debug, Clone, Serialize)]
pub struct TaskTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub priority: Priority,
    /// Role the task defaults to when no candidate matching happens
    pub assigned_role: Option<&'static str>,
    pub estimated_hours: u32,
    pub checklist: &'static [&'static str],
}

/// A task produced by rendering a template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub assigned_role: Option<String>,
    pub estimated_hours: u32,
    pub checklist: Vec<String>,
}

pub struct TemplateTable {
    templates: Vec<(&'static str, TaskTemplate)>,
}

impl TemplateTable {
    pub fn get(&self, key: &str) -> Option<&TaskTemplate> {
        self.templates
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, t)| t)
    }

    pub fn template_keys(&self) -> Vec<&'static str> {
        self.templates.iter().map(|(k, _)| *k).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &TaskTemplate)> {
        self.templates.iter().map(|(k, t)| (*k, t))
    }

    /// Render a template, leaving any unsupplied placeholder literal
    pub fn render(&self, key: &str, vars: &HashMap<String, String>) -> Result<RenderedTask> {
        let template = self
            .get(key)
            .ok_or_else(|| RoutingError::TemplateNotFound(key.to_string()))?;
        Ok(RenderedTask {
            title: substitute(template.title, vars),
            description: substitute(template.description, vars),
            priority: template.priority,
            assigned_role: template.assigned_role.map(str::to_string),
            estimated_hours: template.estimated_hours,
            checklist: template.checklist.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Render, failing if any placeholder is left unresolved
    pub fn render_strict(&self, key: &str, vars: &HashMap<String, String>) -> Result<RenderedTask> {
        let template = self
            .get(key)
            .ok_or_else(|| RoutingError::TemplateNotFound(key.to_string()))?;
        let mut required = extract_placeholders(template.title);
        required.extend(extract_placeholders(template.description));
        let missing: Vec<String> = required
            .into_iter()
            .filter(|name| !vars.contains_key(name))
            .collect();
        if !missing.is_empty() {
            return Err(RoutingError::MissingVariables {
                template: key.to_string(),
                missing,
            });
        }
        self.render(key, vars)
    }

    /// Every distinct placeholder referenced by a template's title and
    /// description, or TemplateNotFound
    pub fn placeholders(&self, key: &str) -> Result<BTreeSet<String>> {
        let template = self
            .get(key)
            .ok_or_else(|| RoutingError::TemplateNotFound(key.to_string()))?;
        let mut names = extract_placeholders(template.title);
        names.extend(extract_placeholders(template.description));
        Ok(names)
    }
}

/// Collect the distinct `{name}` placeholders in a pattern string.
/// A marker must be non-empty and contain no nested braces.
pub fn extract_placeholders(text: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if let Some(rel) = text[i + 1..].find(['{', '}']) {
                let j = i + 1 + rel;
                if bytes[j] == b'}' && j > i + 1 {
                    names.insert(text[i + 1..j].to_string());
                    i = j + 1;
                    continue;
                }
                // nested or stray '{' — resume scanning from it
                i = j;
                continue;
            }
        }
        i += 1;
    }
    names
}

/// Replace each supplied `{name}` with its value; unknown placeholders
/// are left as-is
fn substitute(text: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if let Some(rel) = text[i + 1..].find(['{', '}']) {
                let j = i + 1 + rel;
                if bytes[j] == b'}' && j > i + 1 {
                    let name = &text[i + 1..j];
                    match vars.get(name) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(&text[i..=j]),
                    }
                    i = j + 1;
                    continue;
                }
                out.push_str(&text[i..j]);
                i = j;
                continue;
            }
        }
        let ch = text[i..].chars().next().unwrap_or('\u{fffd}');
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

/// The process-wide task template table
pub static TEMPLATES: LazyLock<TemplateTable> = LazyLock::new(|| TemplateTable {
    templates: vec![
        (
            "CODE_REVIEW",
            TaskTemplate {
                title: "Code Review: {feature_name}",
                description: "Review code changes for {feature_name}, focusing on:\n\
                              - Code quality and standards\n\
                              - Security vulnerabilities\n\
                              - Performance implications\n\
                              - Documentation completeness",
                priority: Priority::High,
                assigned_role: Some("SENIOR_DEVELOPER"),
                estimated_hours: 2,
                checklist: &[
                    "Review code for standards compliance",
                    "Check for security vulnerabilities",
                    "Verify performance considerations",
                    "Ensure adequate documentation",
                    "Test functionality manually",
                ],
            },
        ),
        (
            "FEATURE_IMPLEMENTATION",
            TaskTemplate {
                title: "Implement Feature: {feature_name}",
                description: "Develop and implement {feature_name} according to specifications:\n\
                              - Follow design requirements\n\
                              - Implement proper error handling\n\
                              - Add unit tests\n\
                              - Update documentation",
                priority: Priority::Medium,
                assigned_role: None,
                estimated_hours: 8,
                checklist: &[
                    "Analyze requirements and design",
                    "Implement core functionality",
                    "Add error handling and validation",
                    "Write unit tests",
                    "Update documentation",
                    "Conduct self-review",
                ],
            },
        ),
        (
            "BUG_FIX",
            TaskTemplate {
                title: "Fix Bug: {bug_description}",
                description: "Investigate and fix bug: {bug_description}\n\
                              - Reproduce the issue\n\
                              - Identify root cause\n\
                              - Implement fix\n\
                              - Add regression tests",
                priority: Priority::High,
                assigned_role: None,
                estimated_hours: 4,
                checklist: &[
                    "Reproduce the bug",
                    "Investigate root cause",
                    "Implement fix",
                    "Add regression tests",
                    "Verify fix works",
                    "Update documentation if needed",
                ],
            },
        ),
        (
            "DATA_ANALYSIS",
            TaskTemplate {
                title: "Data Analysis: {dataset_name}",
                description: "Analyze {dataset_name} to extract insights:\n\
                              - Clean and preprocess data\n\
                              - Perform statistical analysis\n\
                              - Create visualizations\n\
                              - Generate actionable insights",
                priority: Priority::Medium,
                assigned_role: Some("DATA_ANALYST"),
                estimated_hours: 6,
                checklist: &[
                    "Clean and validate data",
                    "Perform exploratory analysis",
                    "Create visualizations",
                    "Identify trends and patterns",
                    "Generate insights report",
                ],
            },
        ),
        (
            "SECURITY_AUDIT",
            TaskTemplate {
                title: "Security Audit: {system_component}",
                description: "Conduct security audit of {system_component}:\n\
                              - Vulnerability assessment\n\
                              - Penetration testing\n\
                              - Compliance check\n\
                              - Risk assessment report",
                priority: Priority::High,
                assigned_role: Some("SECURITY_ANALYST"),
                estimated_hours: 8,
                checklist: &[
                    "Scan for vulnerabilities",
                    "Conduct penetration tests",
                    "Review compliance requirements",
                    "Assess security risks",
                    "Document findings and recommendations",
                ],
            },
        ),
        (
            "PROJECT_PLANNING",
            TaskTemplate {
                title: "Project Planning: {project_name}",
                description: "Create comprehensive project plan for {project_name}:\n\
                              - Define scope and requirements\n\
                              - Create timeline and milestones\n\
                              - Allocate resources\n\
                              - Identify risks",
                priority: Priority::High,
                assigned_role: Some("PROJECT_MANAGER"),
                estimated_hours: 4,
                checklist: &[
                    "Define project scope",
                    "Gather requirements",
                    "Create timeline and milestones",
                    "Identify required resources",
                    "Assess potential risks",
                    "Create communication plan",
                ],
            },
        ),
        (
            "SPRINT_PLANNING",
            TaskTemplate {
                title: "Sprint Planning: Sprint {sprint_number}",
                description: "Plan and organize Sprint {sprint_number}:\n\
                              - Review backlog items\n\
                              - Estimate story points\n\
                              - Set sprint goals\n\
                              - Assign tasks to team members",
                priority: Priority::Medium,
                assigned_role: Some("SCRUM_MASTER"),
                estimated_hours: 2,
                checklist: &[
                    "Review and prioritize backlog",
                    "Estimate user stories",
                    "Set sprint goals",
                    "Assign tasks to team",
                    "Schedule sprint ceremonies",
                ],
            },
        ),
    ],
});

/// Check that every template's default role exists in the catalog
pub fn validate_against_catalog(catalog: &crate::roles::RoleCatalog) -> Result<()> {
    for (key, template) in TEMPLATES.iter() {
        if let Some(role) = template.assigned_role {
            if catalog.get(role).is_none() {
                return Err(RoutingError::InconsistentCatalog {
                    referrer: key.to_string(),
                    role: role.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::catalog::CATALOG;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extract_placeholders() {
        let names = extract_placeholders("Fix {bug} in {module} before {bug} spreads");
        assert_eq!(names.len(), 2);
        assert!(names.contains("bug"));
        assert!(names.contains("module"));
    }

    #[test]
    fn test_extract_placeholders_ignores_empty_and_stray() {
        assert!(extract_placeholders("{} { unclosed").is_empty());
        let names = extract_placeholders("{{nested} and {ok}");
        assert!(names.contains("nested"));
        assert!(names.contains("ok"));
    }

    #[test]
    fn test_render_complete_vars_leaves_no_markers() {
        for key in TEMPLATES.template_keys() {
            let placeholders = TEMPLATES.placeholders(key).unwrap();
            let complete: HashMap<String, String> = placeholders
                .iter()
                .map(|name| (name.clone(), "value".to_string()))
                .collect();
            let rendered = TEMPLATES.render(key, &complete).unwrap();
            assert!(extract_placeholders(&rendered.title).is_empty(), "{key}");
            assert!(extract_placeholders(&rendered.description).is_empty(), "{key}");
        }
    }

    #[test]
    fn test_render_substitutes_values() {
        let rendered = TEMPLATES
            .render("CODE_REVIEW", &vars(&[("feature_name", "login flow")]))
            .unwrap();
        assert_eq!(rendered.title, "Code Review: login flow");
        assert!(rendered.description.contains("login flow"));
        assert_eq!(rendered.priority, Priority::High);
        assert_eq!(rendered.assigned_role.as_deref(), Some("SENIOR_DEVELOPER"));
        assert_eq!(rendered.checklist.len(), 5);
    }

    #[test]
    fn test_render_missing_var_renders_literally() {
        let rendered = TEMPLATES.render("BUG_FIX", &vars(&[])).unwrap();
        assert_eq!(rendered.title, "Fix Bug: {bug_description}");
    }

    #[test]
    fn test_render_unknown_template() {
        let err = TEMPLATES.render("NOPE", &vars(&[])).unwrap_err();
        assert_eq!(err, RoutingError::TemplateNotFound("NOPE".into()));
    }

    #[test]
    fn test_render_is_idempotent() {
        let v = vars(&[("feature_name", "search")]);
        let a = TEMPLATES.render("FEATURE_IMPLEMENTATION", &v).unwrap();
        let b = TEMPLATES.render("FEATURE_IMPLEMENTATION", &v).unwrap();
        assert_eq!(a, b);
        // Template table is untouched
        assert!(
            TEMPLATES
                .get("FEATURE_IMPLEMENTATION")
                .unwrap()
                .title
                .contains("{feature_name}")
        );
    }

    #[test]
    fn test_render_strict_reports_missing() {
        let err = TEMPLATES.render_strict("CODE_REVIEW", &vars(&[])).unwrap_err();
        assert_eq!(
            err,
            RoutingError::MissingVariables {
                template: "CODE_REVIEW".into(),
                missing: vec!["feature_name".into()],
            }
        );
    }

    #[test]
    fn test_render_strict_ok_when_complete() {
        let rendered = TEMPLATES
            .render_strict("SPRINT_PLANNING", &vars(&[("sprint_number", "14")]))
            .unwrap();
        assert_eq!(rendered.title, "Sprint Planning: Sprint 14");
    }

    #[test]
    fn test_templates_validate_against_catalog() {
        validate_against_catalog(&CATALOG).unwrap();
    }

    #[test]
    fn test_estimated_hours_positive() {
        for (key, template) in TEMPLATES.iter() {
            assert!(template.estimated_hours > 0, "{key}");
        }
    }
}
