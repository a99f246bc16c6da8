//! Admin API representations

mod group;
mod role;
mod user;

pub use group::GroupRepresentation;
pub use role::{RoleMapping, RoleRepresentation};
pub use user::{split_name, CredentialRepresentation, UserRepresentation};

use serde::de::DeserializeOwned;

/// A realm object addressable by server id and matched by a natural key.
pub trait RemoteEntity: DeserializeOwned {
    /// Human name of the collection, used in logs and reports.
    const KIND: &'static str;

    fn id(&self) -> Option<&str>;

    /// Role and group name, or username.
    fn key(&self) -> &str;
}
