//! HTTP client wrapper for the admin REST API

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::api::auth::AccessToken;
use crate::api::error::{ApiError, ApiResult};
use crate::config::LoaderConfig;

/// Authenticated client bound to one identity provider host.
///
/// Every request waits `request_delay` first, is logged with its status,
/// and fails on any non-2xx response.
#[derive(Debug, Clone)]
pub struct KeycloakClient {
    client: Client,
    host: String,
    request_delay: Duration,
}

impl KeycloakClient {
    /// Create a client that sends `token` on every request.
    pub fn new(config: &LoaderConfig, token: &AccessToken) -> ApiResult<Self> {
        let mut auth = HeaderValue::from_str(&token.authorization())
            .map_err(|e| ApiError::InvalidHeader(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            host: config.host.clone(),
            request_delay: config.request_delay,
        })
    }

    /// GET `endpoint` and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.search(endpoint, &[]).await
    }

    /// GET `endpoint` with query parameters and decode the JSON body.
    pub async fn search<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let body = self
            .send(Method::GET, endpoint, query, None::<&()>)
            .await?
            .ok_or_else(|| ApiError::Decode {
                endpoint: endpoint.to_string(),
                message: "empty response body".to_string(),
            })?;

        serde_json::from_value(body).map_err(|e| {
            let err = ApiError::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            };
            error!(endpoint, error = %err, "failed to decode response");
            err
        })
    }

    /// POST a JSON body. Returns the response body, if any.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<Option<Value>> {
        self.send(Method::POST, endpoint, &[], Some(body)).await
    }

    /// PUT a JSON body. Returns the response body, if any.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<Option<Value>> {
        self.send(Method::PUT, endpoint, &[], Some(body)).await
    }

    /// PUT with no body, as membership endpoints expect.
    pub async fn put_empty(&self, endpoint: &str) -> ApiResult<Option<Value>> {
        self.send(Method::PUT, endpoint, &[], None::<&()>).await
    }

    pub async fn delete(&self, endpoint: &str) -> ApiResult<()> {
        self.send(Method::DELETE, endpoint, &[], None::<&()>)
            .await
            .map(|_| ())
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> ApiResult<Option<Value>> {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        let url = format!("{}{}", self.host, endpoint);
        let mut request = self.client.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = ApiError::from(e);
                error!(%method, endpoint, error = %err, "request failed");
                return Err(err);
            }
        };

        let status = response.status();
        info!("{} {} {}", method, endpoint, status.as_u16());

        let text = response.text().await?;

        if !status.is_success() {
            let err = ApiError::Status {
                method: method.to_string(),
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: text,
            };
            error!(error = %err, "request rejected");
            return Err(err);
        }

        if text.trim().is_empty() {
            return Ok(None);
        }

        // non-JSON success bodies are kept as plain strings
        Ok(Some(
            serde_json::from_str(&text).unwrap_or(Value::String(text)),
        ))
    }
}
