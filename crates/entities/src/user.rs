//! User-related entity definitions.

use serde::{Deserialize, Serialize};

/// Identifier of a user. Assigned by the store unless supplied on creation.
pub type UserId = i64;

/// A user of the service. Owns zero or more tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address, unique across all users.
    pub email: String,
}

/// Input for creating a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Explicit identifier; assigned by the store when absent.
    #[serde(default)]
    pub id: Option<UserId>,
    /// Display name; empty when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address. Required.
    #[serde(default)]
    pub email: String,
}

impl NewUser {
    /// Creates a user input with the given email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    /// Sets an explicit identifier.
    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
