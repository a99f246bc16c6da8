//! Admin token acquisition via the password grant.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{error, info};

use crate::api::error::{ApiError, ApiResult};
use crate::config::LoaderConfig;

/// Token endpoint of the master realm, where administrators live.
pub const TOKEN_PATH: &str = "/realms/master/protocol/openid-connect/token";

/// Bearer credential for the admin API.
#[derive(Debug)]
pub struct AccessToken {
    token_type: String,
    access_token: SecretString,
}

impl AccessToken {
    pub fn new(token_type: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            token_type: token_type.into(),
            access_token: SecretString::from(access_token.into()),
        }
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Value of the `Authorization` header, e.g. `Bearer eyJ...`.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token.expose_secret())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Obtains admin tokens from the master realm.
#[derive(Debug)]
pub struct AdminAuthenticator {
    client: Client,
    token_url: String,
    username: String,
    password: SecretString,
    client_id: String,
}

impl AdminAuthenticator {
    pub fn new(config: &LoaderConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token_url: format!("{}{}", config.host, TOKEN_PATH),
            username: config.admin_name.clone(),
            password: SecretString::from(config.admin_password.expose_secret().to_string()),
            client_id: config.admin_client_id.clone(),
        })
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Run the password grant. Any failure here ends the run.
    pub async fn authorize(&self) -> ApiResult<AccessToken> {
        let params = [
            ("username", self.username.as_str()),
            ("password", self.password.expose_secret()),
            ("client_id", self.client_id.as_str()),
            ("grant_type", "password"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                error!(url = %self.token_url, error = %e, "token request failed");
                match ApiError::from(e) {
                    ApiError::Connection(msg) => ApiError::Connection(msg),
                    other => ApiError::Auth(format!("token request failed: {other}")),
                }
            })?;

        let status = response.status();
        info!("POST {} {}", TOKEN_PATH, status.as_u16());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "token request rejected");
            return Err(ApiError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Auth(format!("invalid token response: {e}")))?;

        info!(user = %self.username, "admin token acquired");

        Ok(AccessToken::new(token.token_type, token.access_token))
    }
}
