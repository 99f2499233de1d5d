//! HTTP client for the room/task hub.
//!
//! The hub owns rooms, agents, tasks, and durable message storage; this
//! client only supplies data and reads it back. Message history is
//! served cache-first from the core's local history — these endpoints
//! are the fallback.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use ensemble_core::types::Priority;

use crate::events::WireMessage;

/// Capabilities an agent advertises when joining a room
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Capabilities {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expertise: Option<String>,
}

/// Result of joining a room
#[derive(Debug, Clone)]
pub struct JoinedRoom {
    pub room: String,
    pub agent_id: String,
    pub agent_name: String,
    pub current_agents: usize,
}

/// A task to create through the hub
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub creator: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checklist: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<u32>,
}

/// A task as the hub reports it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubTask {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub assignee: Option<String>,
    pub priority: Priority,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Filters for listing tasks
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Deserialize)]
struct JoinResponse {
    #[serde(rename = "currentAgents")]
    current_agents: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
struct TasksResponse {
    tasks: Vec<HubTask>,
}

/// Client for the room/task hub HTTP API
#[derive(Debug, Clone)]
pub struct HubClient {
    client: Client,
    base_url: String,
}

impl HubClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Join a room, generating a fresh agent id for this session
    pub async fn join_room(
        &self,
        room: &str,
        agent_name: &str,
        capabilities: Capabilities,
    ) -> Result<JoinedRoom> {
        let agent_id = Uuid::new_v4().to_string();
        let url = format!("{}/api/join/{}", self.base_url, room);
        let body = serde_json::json!({
            "agentId": agent_id,
            "agentName": agent_name,
            "capabilities": capabilities,
        });

        let response = self.post_json(&url, &body).await?;
        let joined: JoinResponse = response
            .json()
            .await
            .context("Failed to parse join response")?;

        info!(
            "Joined room '{}' as '{}' ({} agents present)",
            room,
            agent_name,
            joined.current_agents.len()
        );
        Ok(JoinedRoom {
            room: room.to_string(),
            agent_id,
            agent_name: agent_name.to_string(),
            current_agents: joined.current_agents.len(),
        })
    }

    pub async fn leave_room(&self, agent_id: &str) -> Result<()> {
        let url = format!("{}/api/leave", self.base_url);
        let body = serde_json::json!({ "agentId": agent_id });
        self.post_json(&url, &body).await?;
        info!("Left room (agent {})", agent_id);
        Ok(())
    }

    /// Send a message to the current room
    pub async fn send_message(&self, agent_id: &str, content: &str) -> Result<()> {
        let url = format!("{}/api/send", self.base_url);
        let body = serde_json::json!({
            "agentId": agent_id,
            "content": content,
        });
        self.post_json(&url, &body).await?;
        debug!("Sent message ({} bytes)", content.len());
        Ok(())
    }

    /// Send a message tagged for a specific agent: `@target text`
    pub async fn send_tagged(&self, agent_id: &str, target: &str, text: &str) -> Result<()> {
        self.send_message(agent_id, &format!("@{target} {text}")).await
    }

    /// Create a task in a room through the hub
    pub async fn create_task(&self, room: &str, task: &NewTask) -> Result<()> {
        let url = format!("{}/api/tasks/{}", self.base_url, room);
        self.post_json(&url, task).await?;
        info!("Created task '{}' in room '{}'", task.title, room);
        Ok(())
    }

    /// Fetch messages from the hub, used when the local history cannot
    /// answer (e.g. a `since` older than the cache)
    pub async fn fetch_messages(
        &self,
        room: &str,
        since: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<WireMessage>> {
        let url = format!("{}/api/messages/{}", self.base_url, room);
        let mut request = self.client.get(&url);
        if let Some(since) = since {
            request = request.query(&[("since", since.to_rfc3339())]);
        }
        request = request.query(&[("limit", limit.unwrap_or(50))]);

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to fetch messages for room '{room}'"))?;
        let response = Self::check_status(response).await?;
        let parsed: MessagesResponse = response
            .json()
            .await
            .context("Failed to parse messages response")?;
        Ok(parsed.messages)
    }

    /// List tasks in a room, optionally filtered
    pub async fn fetch_tasks(&self, room: &str, query: &TaskQuery) -> Result<Vec<HubTask>> {
        let url = format!("{}/api/tasks/{}", self.base_url, room);
        let mut request = self.client.get(&url);
        if let Some(status) = &query.status {
            request = request.query(&[("status", status)]);
        }
        if let Some(assignee) = &query.assignee {
            request = request.query(&[("assignee", assignee)]);
        }
        if let Some(priority) = query.priority {
            request = request.query(&[("priority", priority.to_string())]);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to fetch tasks for room '{room}'"))?;
        let response = Self::check_status(response).await?;
        let parsed: TasksResponse = response
            .json()
            .await
            .context("Failed to parse tasks response")?;
        Ok(parsed.tasks)
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to reach hub at {url}"))?;
        Self::check_status(response).await
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!("Hub request failed with status {status}: {error_text}"));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HubClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_new_task_serializes_camel_case() {
        let task = NewTask {
            title: "Fix login".into(),
            description: "investigate".into(),
            priority: Priority::High,
            assignee: Some("Ada".into()),
            creator: "Bo".into(),
            checklist: vec!["Reproduce the bug".into()],
            estimated_hours: Some(4),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["priority"], "high");
        assert_eq!(json["estimatedHours"], 4);
        assert_eq!(json["checklist"][0], "Reproduce the bug");
    }

    #[test]
    fn test_new_task_omits_empty_optionals() {
        let task = NewTask {
            title: "T".into(),
            description: "D".into(),
            priority: Priority::Medium,
            assignee: None,
            creator: "Bo".into(),
            checklist: vec![],
            estimated_hours: None,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("assignee").is_none());
        assert!(json.get("checklist").is_none());
        assert!(json.get("estimatedHours").is_none());
    }

    #[test]
    fn test_hub_task_deserialize() {
        let json = r#"{
            "id": "t-1",
            "title": "Fix login",
            "description": "investigate",
            "priority": "high",
            "status": "todo",
            "createdAt": "2025-06-01T12:00:00Z"
        }"#;
        let task: HubTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, "todo");
        assert!(task.assignee.is_none());
    }
}
