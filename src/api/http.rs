//! HTTP utilities for admin API calls

use std::time::Duration;

use reqwest::{Client, ClientBuilder, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and drops non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let char_count = body.chars().count();
    let truncated = if char_count > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Transport settings shared by the admin and tracking clients
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Skip TLS certificate verification. On by default: admin consoles usually run with a
    /// self-signed certificate.
    pub accept_invalid_certs: bool,
    /// Timeout applied to every request
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            accept_invalid_certs: true,
            timeout: None,
            user_agent: concat!("gophish-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    /// Require valid TLS certificates
    pub fn verify_certs(mut self) -> Self {
        self.accept_invalid_certs = false;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn builder(&self) -> ClientBuilder {
        let mut builder = Client::builder()
            .user_agent(self.user_agent.clone())
            .danger_accept_invalid_certs(self.accept_invalid_certs);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder
    }
}

/// HTTP client wrapper for admin API calls
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let client = options.builder().build()?;
        Ok(Self {
            client,
            timeout: None,
        })
    }

    /// Same connection pool, with a timeout on each request made through the copy
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            client: self.client.clone(),
            timeout: Some(timeout),
        }
    }

    /// Make a GET request
    pub async fn get<T>(&self, url: &str, token: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        self.execute(Method::GET, url, token, None).await
    }

    /// Make a POST request with a JSON body
    pub async fn post<T>(&self, url: &str, token: &str, body: &Value) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        self.execute(Method::POST, url, token, Some(body)).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put<T>(&self, url: &str, token: &str, body: &Value) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        self.execute(Method::PUT, url, token, Some(body)).await
    }

    /// Make a DELETE request
    pub async fn delete<T>(&self, url: &str, token: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        self.execute(Method::DELETE, url, token, None).await
    }

    async fn execute<T>(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), url);
        if !token.is_empty() {
            request = request.bearer_auth(token);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&text));
            return Err(Error::Status {
                method,
                url: url.to_string(),
                status,
                body: text,
            });
        }

        decode(url, &text)
    }
}

/// Decode a success body. Empty and `null` bodies decode to the default value.
fn decode<T>(url: &str, text: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if text.trim().is_empty() {
        return Ok(T::default());
    }

    let value: Value = serde_json::from_str(text).map_err(|source| Error::Decode {
        url: url.to_string(),
        source,
    })?;
    if value.is_null() {
        return Ok(T::default());
    }

    serde_json::from_value(value).map_err(|source| Error::Decode {
        url: url.to_string(),
        source,
    })
}
