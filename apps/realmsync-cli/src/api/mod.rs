//! Admin REST API access: token acquisition, the request client, and
//! realm-scoped endpoint paths.

mod auth;
mod client;
mod error;
mod paths;

pub use auth::{AccessToken, AdminAuthenticator, TOKEN_PATH};
pub use client::KeycloakClient;
pub use error::{ApiError, ApiResult};
pub use paths::RealmPaths;
