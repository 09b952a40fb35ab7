//! Task-related entity definitions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Identifier of a task. Assigned by the store unless supplied on creation.
pub type TaskId = i64;

/// Status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Open,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Every member of the enumeration, in lifecycle order.
    pub const ALL: [TaskStatus; 3] = [Self::Open, Self::InProgress, Self::Done];

    /// Converts the status to a string for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Parses a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier.
    pub id: TaskId,
    /// Owning user.
    pub user_id: UserId,
    /// Title, never empty.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Current status. The only field that changes after creation.
    pub status: TaskStatus,
    /// Assigned by the store at creation.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a task.
///
/// Every field is optional at the type level so that requests with missing
/// values reach the store and are rejected there as invalid input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Explicit identifier; assigned by the store when absent.
    #[serde(default)]
    pub id: Option<TaskId>,
    /// Owning user. Required.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Title. Required.
    #[serde(default)]
    pub title: String,
    /// Description; empty when absent.
    #[serde(default)]
    pub description: Option<String>,
    /// Initial status as text; `open` when absent.
    #[serde(default)]
    pub status: Option<String>,
}

impl NewTask {
    /// Creates a task input for the given owner and title.
    pub fn new(user_id: UserId, title: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Sets an explicit identifier.
    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}
