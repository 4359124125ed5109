use crate::domain::ports::Credentials;
use crate::utils::error::{ActiniaError, Result};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// HTTP plumbing shared by every object of one session.
///
/// Holds the versioned API root (`{base_url}/api/{version}`), the
/// credentials and a pooled [`Client`]. Resource objects keep an
/// `Arc<Connection>` so they can issue their own requests.
#[derive(Debug)]
pub struct Connection {
    client: Client,
    api_root: Url,
    credentials: Option<Credentials>,
}

impl Connection {
    pub fn new(
        base_url: &str,
        api_version: &str,
        credentials: Option<Credentials>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut api_root =
            Url::parse(base_url).map_err(|e| ActiniaError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: base_url.to_string(),
                reason: format!("Invalid URL format: {}", e),
            })?;

        api_root
            .path_segments_mut()
            .map_err(|_| ActiniaError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(["api", api_version]);

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_root,
            credentials,
        })
    }

    /// Same server and HTTP pool, different user.
    pub fn with_credentials(&self, credentials: Option<Credentials>) -> Self {
        Self {
            client: self.client.clone(),
            api_root: self.api_root.clone(),
            credentials,
        }
    }

    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Resolve path segments below the API root. Segments are percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        tracing::debug!("📡 {} {}", method, url);

        let request = self.client.request(method, url);
        match &self.credentials {
            Some(c) => request.basic_auth(&c.user, Some(&c.password)),
            None => request,
        }
    }

    pub async fn get(&self, segments: &[&str]) -> Result<serde_json::Value> {
        self.send(self.request(Method::GET, segments)).await
    }

    pub async fn get_with_query(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value> {
        self.send(self.request(Method::GET, segments).query(query)).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<serde_json::Value> {
        let mut request = self.request(Method::POST, segments);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await
    }

    pub async fn post_multipart(&self, segments: &[&str], form: Form) -> Result<serde_json::Value> {
        self.send(self.request(Method::POST, segments).multipart(form))
            .await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<serde_json::Value> {
        self.send(self.request(Method::PUT, segments).json(body))
            .await
    }

    pub async fn delete(&self, segments: &[&str]) -> Result<serde_json::Value> {
        self.send(self.request(Method::DELETE, segments)).await
    }

    pub async fn delete_with_body<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<serde_json::Value> {
        self.send(self.request(Method::DELETE, segments).json(body))
            .await
    }

    async fn send(&self, request: RequestBuilder) -> Result<serde_json::Value> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("📡 response status: {}", status);

        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "no message".to_string());
            tracing::debug!("❌ actinia error {}: {}", status, message);
            return Err(ActiniaError::api(status.as_u16(), message));
        }

        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Pull a human readable message out of an actinia error body.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(json) => ["message", "error"]
            .iter()
            .find_map(|key| json.get(key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .or_else(|| Some(trimmed.to_string())),
        Err(_) => Some(trimmed.to_string()),
    }
}

/// Take `field` out of a response object and deserialize it.
pub fn extract_field<T: DeserializeOwned>(mut response: serde_json::Value, field: &str) -> Result<T> {
    let value = response
        .get_mut(field)
        .map(serde_json::Value::take)
        .ok_or_else(|| ActiniaError::unexpected(format!("response has no '{}' field", field)))?;
    Ok(serde_json::from_value(value)?)
}

/// Payload of a resource endpoint lives in `process_results`.
pub fn process_results<T: DeserializeOwned>(response: serde_json::Value) -> Result<T> {
    extract_field(response, "process_results")
}
