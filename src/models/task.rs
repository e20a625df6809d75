use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "PENDENTE")]
    Pending,
    #[serde(rename = "EM_ANDAMENTO")]
    InProgress,
    #[serde(rename = "CONCLUIDA")]
    Completed,
}

/// Visual grouping of a status, mapped to colors by the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Warning,
    Info,
    Success,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Wire value used by the backend, both in JSON bodies and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDENTE",
            Self::InProgress => "EM_ANDAMENTO",
            Self::Completed => "CONCLUIDA",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    pub fn category(&self) -> StatusCategory {
        match self {
            Self::Pending => StatusCategory::Warning,
            Self::InProgress => StatusCategory::Info,
            Self::Completed => StatusCategory::Success,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Pending => Self::InProgress,
            Self::InProgress => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::InProgress => Self::Pending,
            Self::Completed => Self::InProgress,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDENTE" => Ok(Self::Pending),
            "EM_ANDAMENTO" => Ok(Self::InProgress),
            "CONCLUIDA" => Ok(Self::Completed),
            other => anyhow::bail!("invalid task status: {other}"),
        }
    }
}

/// A task as returned by the backend. Timestamps are kept as the server
/// sent them and only parsed for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao", default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub status: TaskStatus,
    #[serde(rename = "dataCriacao", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "dataAtualizacao", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

// The backend column is nullable, so `"descricao": null` is legal.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Task {
    /// Whether the task was modified after creation.
    pub fn was_updated(&self) -> bool {
        match (&self.created_at, &self.updated_at) {
            (Some(created), Some(updated)) => created != updated,
            (None, Some(_)) => true,
            _ => false,
        }
    }
}

/// Body of a create or full-replacement update. Never carries an id or
/// timestamps; those belong to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDraft {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    pub status: TaskStatus,
}

impl TaskDraft {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
        }
    }

    /// Overwrites only the fields that were given. Used to build a full
    /// replacement from the stored record plus a partial edit.
    pub fn with_changes(
        mut self,
        title: Option<String>,
        description: Option<String>,
        status: Option<TaskStatus>,
    ) -> Self {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(status) = status {
            self.status = status;
        }
        self
    }
}
