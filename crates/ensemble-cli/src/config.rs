use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EnsembleConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub hub: HubConfig,
    #[serde(default)]
    pub watch: WatchSettings,
    #[serde(default)]
    pub history: HistorySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
        }
    }
}

fn default_agent_name() -> String {
    "ensemble-agent".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    #[serde(default = "default_hub_url")]
    pub url: String,
    /// Seconds between message polls when no push transport exists
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            url: default_hub_url(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

fn default_hub_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_poll_interval() -> u64 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WatchSettings {
    /// Keywords to be notified about when they appear in any message
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

fn default_history_capacity() -> usize {
    1000
}

/// Default config directory: ~/.config/ensemble (or platform equivalent)
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ensemble")
}

impl EnsembleConfig {
    /// Load from the given path, or the default location. A missing
    /// file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_dir().join("config.toml"),
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config at {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnsembleConfig::default();
        assert_eq!(config.hub.url, "http://localhost:3000");
        assert_eq!(config.history.capacity, 1000);
        assert!(config.watch.keywords.is_empty());
    }

    #[test]
    fn test_parse_partial_config() {
        let raw = r#"
            [agent]
            name = "Ada"

            [watch]
            keywords = ["urgent", "deploy"]
        "#;
        let config: EnsembleConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.agent.name, "Ada");
        assert_eq!(config.watch.keywords, vec!["urgent", "deploy"]);
        // Unspecified sections fall back to defaults
        assert_eq!(config.hub.poll_interval_secs, 2);
        assert_eq!(config.history.capacity, 1000);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = EnsembleConfig::load(Some(Path::new("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config.agent.name, "ensemble-agent");
    }
}
