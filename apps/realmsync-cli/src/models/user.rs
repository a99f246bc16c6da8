//! User models

use serde::{Deserialize, Serialize};

use super::RemoteEntity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRepresentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credentials: Vec<CredentialRepresentation>,
}

impl UserRepresentation {
    /// Create/update payload: an enabled user with one password credential.
    pub fn new(
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password: impl Into<String>,
        temporary: bool,
    ) -> Self {
        Self {
            id: None,
            username: username.into(),
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            enabled: Some(true),
            credentials: vec![CredentialRepresentation::password(password, temporary)],
        }
    }
}

impl RemoteEntity for UserRepresentation {
    const KIND: &'static str = "user";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn key(&self) -> &str {
        &self.username
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRepresentation {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub temporary: bool,
}

impl CredentialRepresentation {
    pub fn password(value: impl Into<String>, temporary: bool) -> Self {
        Self {
            kind: "password".to_string(),
            value: value.into(),
            temporary,
        }
    }
}

/// Split a display name at its first space into first and last name.
///
/// A name with no space is all first name.
pub fn split_name(full_name: &str) -> (&str, &str) {
    let full_name = full_name.trim();
    match full_name.split_once(' ') {
        Some((first, last)) => (first, last.trim()),
        None => (full_name, ""),
    }
}
