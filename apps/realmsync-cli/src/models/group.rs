//! Group models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::RemoteEntity;

/// Attribute key holding a group's description.
pub const DESCRIPTION_ATTRIBUTE: &str = "name";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRepresentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Vec<String>>,
    /// Only present on single-group reads.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub realm_roles: Vec<String>,
}

impl GroupRepresentation {
    /// Create/update payload carrying the description as an attribute.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(DESCRIPTION_ATTRIBUTE.to_string(), vec![description.into()]);
        Self {
            id: None,
            name: name.into(),
            attributes,
            realm_roles: Vec::new(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.attributes
            .get(DESCRIPTION_ATTRIBUTE)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn has_realm_role(&self, role: &str) -> bool {
        self.realm_roles.iter().any(|r| r == role)
    }
}

impl RemoteEntity for GroupRepresentation {
    const KIND: &'static str = "group";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn key(&self) -> &str {
        &self.name
    }
}
