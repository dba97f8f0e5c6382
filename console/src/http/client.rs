//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::errors::ConsoleError;

/// HTTP client for backend communication
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<SecretString>,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(
        base_url: &str,
        token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ConsoleError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for `path` with an already encoded query string
    pub fn url(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(query) if !query.is_empty() => format!("{}{}?{}", self.base_url, path, query),
            _ => format!("{}{}", self.base_url, path),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            ),
            None => request,
        }
    }

    async fn read_json<T: DeserializeOwned>(
        method: &str,
        response: Response,
    ) -> Result<T, ConsoleError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("HTTP {} failed: {} - {}", method, status, body);
            return Err(ConsoleError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Make a GET request; `query` is appended verbatim
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<T, ConsoleError> {
        let url = self.url(path, query);
        debug!("GET {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        Self::read_json("GET", response).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ConsoleError> {
        let url = self.url(path, None);
        debug!("PUT {}", url);

        let response = self
            .authorize(self.client.put(&url).json(body))
            .send()
            .await?;
        Self::read_json("PUT", response).await
    }
}
