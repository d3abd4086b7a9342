//! Direct API client module
//!
//! A typed client for the upstream task API plus a scripted exercise run
//! for manual verification. Talks to upstream directly, bypassing the
//! proxy.

use anyhow::Result;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Task priority as understood by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// A task record as returned by the upstream API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_priority() -> Priority {
    Priority::Medium
}

/// Payload for creating a task.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

/// Partial update payload; only set fields go on the wire.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Direct client for the upstream task API.
pub struct TaskApiClient {
    client: Client,
    base_url: String,
}

impl TaskApiClient {
    /// Create a client for the given upstream base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// List all tasks.
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let response = self
            .client
            .get(format!("{}/tasks/", self.base_url))
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Create a task; upstream assigns the id.
    pub async fn create_task(&self, task: &NewTask) -> Result<Task> {
        let response = self
            .client
            .post(format!("{}/tasks/", self.base_url))
            .json(task)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Apply a partial update to a task.
    pub async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Task> {
        let response = self
            .client
            .patch(format!("{}/tasks/{id}", self.base_url))
            .json(patch)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Mark a task completed.
    pub async fn complete_task(&self, id: Uuid) -> Result<Task> {
        self.update_task(
            id,
            &TaskPatch {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    /// Delete a task; upstream confirms with 204.
    pub async fn delete_task(&self, id: Uuid) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/tasks/{id}", self.base_url))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("upstream replied {status}: {text}");
        }
        Ok(response)
    }
}

/// Scripted run against the upstream API: list, create, list, complete,
/// delete, list.
///
/// Step failures are logged but do not abort later independent steps; the
/// steps that need the created id are skipped when creation fails. A
/// failed delete leaves the task behind.
pub async fn run_exercise(base_url: &str) -> Result<()> {
    let client = TaskApiClient::new(base_url);

    tracing::info!(base_url = %base_url, "Starting task API exercise");

    log_task_list(&client, "initial").await;

    let payload = NewTask {
        title: "Learn Rust".to_string(),
        description: Some("Scripted exercise against the task API".to_string()),
        priority: Priority::High,
        completed: false,
        due_date: None,
        tags: vec!["rust-client".to_string()],
    };

    let created = match client.create_task(&payload).await {
        Ok(task) => {
            tracing::info!(id = %task.id, title = %task.title, "Task created");
            Some(task)
        }
        Err(e) => {
            tracing::error!(error = %e, "Task creation failed");
            None
        }
    };

    if let Some(task) = created {
        log_task_list(&client, "after create").await;

        match client.complete_task(task.id).await {
            Ok(updated) => {
                tracing::info!(
                    id = %updated.id,
                    completed = %updated.completed,
                    "Task marked completed"
                );
            }
            Err(e) => tracing::error!(error = %e, "Completing task failed"),
        }

        match client.delete_task(task.id).await {
            Ok(()) => tracing::info!(id = %task.id, "Task deleted"),
            Err(e) => tracing::error!(error = %e, "Deleting task failed"),
        }

        log_task_list(&client, "after cleanup").await;
    }

    Ok(())
}

async fn log_task_list(client: &TaskApiClient, stage: &str) {
    match client.list_tasks().await {
        Ok(tasks) => {
            tracing::info!(stage, count = tasks.len(), "Listed tasks");
            for task in &tasks {
                tracing::info!(
                    id = %task.id,
                    priority = %task.priority,
                    title = %task.title,
                    "Task"
                );
            }
        }
        Err(e) => tracing::error!(stage, error = %e, "Listing tasks failed"),
    }
}
