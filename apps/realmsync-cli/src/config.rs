//! Loader configuration, read from the environment.
//!
//! `.env` files are loaded by the binary before [`LoaderConfig::from_env`]
//! runs, so every key below may also come from there.

use std::time::Duration;

use secrecy::SecretString;

const DEFAULT_REALM: &str = "master";
const DEFAULT_HOST: &str = "http://127.0.0.1:8080";
const DEFAULT_ADMIN_NAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";
const DEFAULT_ADMIN_CLIENT_ID: &str = "admin-cli";
const DEFAULT_REQUEST_DELAY_MS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_PASSWORD: &str = "password";

/// Settings for one loader run.
#[derive(Debug)]
pub struct LoaderConfig {
    /// Realm the sheet is reconciled into.
    pub realm: String,

    /// Base URL of the identity provider, without a trailing slash.
    pub host: String,

    /// Master-realm administrator used for the password grant.
    pub admin_name: String,
    pub admin_password: SecretString,
    pub admin_client_id: String,

    /// Pause before every admin API request.
    pub request_delay: Duration,

    /// Per-request timeout for the HTTP client.
    pub request_timeout: Duration,

    /// Initial credential given to newly created users.
    pub default_user_password: SecretString,
    pub temporary_password: bool,
}

impl LoaderConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// This allows tests to supply variables without mutating process-global
    /// environment state.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let realm = non_empty(&reader, "REALM").unwrap_or_else(|| DEFAULT_REALM.to_string());

        let host = non_empty(&reader, "HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host.trim_end_matches('/').to_string();
        if !host.starts_with("http://") && !host.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "HOST".into(),
                format!("expected an http(s) URL, got '{host}'"),
            ));
        }

        let admin_name =
            non_empty(&reader, "ADMIN_NAME").unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string());
        let admin_password = SecretString::from(
            reader("ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string()),
        );
        let admin_client_id = non_empty(&reader, "ADMIN_CLIENT_ID")
            .unwrap_or_else(|| DEFAULT_ADMIN_CLIENT_ID.to_string());

        let request_delay = Duration::from_millis(parse_u64(
            &reader,
            "REQUEST_DELAY_MS",
            DEFAULT_REQUEST_DELAY_MS,
        )?);
        let request_timeout = Duration::from_secs(parse_u64(
            &reader,
            "REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "REQUEST_TIMEOUT_SECS".into(),
                "must be greater than zero".into(),
            ));
        }

        let default_user_password = SecretString::from(
            reader("DEFAULT_USER_PASSWORD").unwrap_or_else(|_| DEFAULT_USER_PASSWORD.to_string()),
        );
        let temporary_password = match non_empty(&reader, "TEMPORARY_PASSWORD") {
            Some(value) => parse_bool(&value)
                .ok_or_else(|| ConfigError::InvalidValue("TEMPORARY_PASSWORD".into(), value))?,
            None => false,
        };

        Ok(Self {
            realm,
            host,
            admin_name,
            admin_password,
            admin_client_id,
            request_delay,
            request_timeout,
            default_user_password,
            temporary_password,
        })
    }
}

fn non_empty<F>(reader: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    reader(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_u64<F>(reader: &F, key: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    match non_empty(reader, key) {
        Some(value) => value
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidValue(key.into(), e.to_string())),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
