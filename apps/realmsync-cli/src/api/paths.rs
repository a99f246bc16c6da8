use urlencoding::encode;

/// Admin endpoints for a single realm.
///
/// Every name and id is percent-encoded as a single path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealmPaths {
    base: String,
}

impl RealmPaths {
    pub fn new(realm: &str) -> Self {
        Self {
            base: format!("/admin/realms/{}", encode(realm)),
        }
    }

    pub fn roles(&self) -> String {
        format!("{}/roles", self.base)
    }

    pub fn role(&self, name: &str) -> String {
        format!("{}/roles/{}", self.base, encode(name))
    }

    pub fn role_by_id(&self, id: &str) -> String {
        format!("{}/roles-by-id/{}", self.base, encode(id))
    }

    pub fn groups(&self) -> String {
        format!("{}/groups", self.base)
    }

    pub fn group(&self, id: &str) -> String {
        format!("{}/groups/{}", self.base, encode(id))
    }

    pub fn group_realm_roles(&self, id: &str) -> String {
        format!("{}/groups/{}/role-mappings/realm", self.base, encode(id))
    }

    pub fn users(&self) -> String {
        format!("{}/users", self.base)
    }

    pub fn user(&self, id: &str) -> String {
        format!("{}/users/{}", self.base, encode(id))
    }

    pub fn user_groups(&self, id: &str) -> String {
        format!("{}/users/{}/groups", self.base, encode(id))
    }

    pub fn user_group(&self, user_id: &str, group_id: &str) -> String {
        format!(
            "{}/users/{}/groups/{}",
            self.base,
            encode(user_id),
            encode(group_id)
        )
    }
}
