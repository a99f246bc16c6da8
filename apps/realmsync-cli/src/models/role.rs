//! Realm role models

use serde::{Deserialize, Serialize};

use super::RemoteEntity;

/// Realm role as listed by, and sent to, the roles endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRepresentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RoleRepresentation {
    /// Create/update payload. The description is always sent, empty or not.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: Some(description.into()),
        }
    }
}

impl RemoteEntity for RoleRepresentation {
    const KIND: &'static str = "role";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn key(&self) -> &str {
        &self.name
    }
}

/// Entry of a role-mapping request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleMapping {
    pub id: String,
    pub name: String,
}
