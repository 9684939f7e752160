use serde::{Deserialize, Serialize};
use std::fmt;

/// Display and persisted length of a task title.
pub const TITLE_LIMIT: usize = 10;
/// Display and persisted length of a task description.
pub const DESCRIPTION_LIMIT: usize = 50;

const ELLIPSIS: &str = "...";

/// Server-assigned task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Low,
    High,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Low => "Low",
            Difficulty::High => "High",
        }
    }

    /// Exact, case-sensitive match against the wire spelling.
    pub fn parse(s: &str) -> Option<Difficulty> {
        match s {
            "Low" => Some(Difficulty::Low),
            "High" => Some(Difficulty::High),
            _ => None,
        }
    }

    pub fn toggled(self) -> Difficulty {
        match self {
            Difficulty::Low => Difficulty::High,
            Difficulty::High => Difficulty::Low,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task record as returned by the API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    #[serde(rename = "_id", alias = "id")]
    pub id: TaskId,
    pub task: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub completed: bool,
    pub difficulty: Difficulty,
}

impl Task {
    pub fn display_title(&self) -> String {
        truncate(&self.task, TITLE_LIMIT)
    }

    pub fn display_description(&self) -> String {
        truncate(&self.description, DESCRIPTION_LIMIT)
    }
}

/// Body of `POST /api/tasks` and `PUT /api/tasks/{id}`.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct TaskPayload {
    pub task: String,
    pub description: String,
    pub completed: bool,
    pub difficulty: Difficulty,
}

/// Body of `PUT /api/tasks/{id}/status`.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct StatusPayload {
    pub completed: bool,
}

/// Shortens `text` to `max` chars followed by `...` when it is longer than `max`.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
