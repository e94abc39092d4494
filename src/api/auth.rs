//! Login bootstrap
//!
//! The admin console has no token endpoint. An API key is obtained the way a browser
//! would: fetch the login form for its CSRF token, post the credentials with the session
//! cookie, then scrape the key from the settings page. Any failure aborts the flow.

use regex::Regex;
use reqwest::{Client, StatusCode};

use super::http::ClientOptions;
use crate::error::{Error, Result};

/// Default marker for the login form's CSRF field
pub const DEFAULT_CSRF_PATTERN: &str = r#"name="csrf_token"\s*value="([^"]+)""#;

/// Default marker for the API key assignment on the settings page
pub const DEFAULT_API_KEY_PATTERN: &str = r#"api_key\s*:\s*"([^"]+)""#;

/// Patterns used to scrape the login and settings pages.
///
/// Each pattern must have one capture group holding the value.
#[derive(Debug, Clone)]
pub struct LoginPatterns {
    pub csrf_token: Regex,
    pub api_key: Regex,
}

impl LoginPatterns {
    pub fn new(csrf_token: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            csrf_token: Regex::new(csrf_token)?,
            api_key: Regex::new(api_key)?,
        })
    }
}

impl Default for LoginPatterns {
    fn default() -> Self {
        Self::new(DEFAULT_CSRF_PATTERN, DEFAULT_API_KEY_PATTERN)
            .expect("default login patterns are valid")
    }
}

/// Obtains an API key from a username and password
#[derive(Debug, Clone)]
pub struct Bootstrap {
    base_url: String,
    options: ClientOptions,
    patterns: LoginPatterns,
}

impl Bootstrap {
    pub fn new(base_url: &str, options: &ClientOptions) -> Result<Self> {
        Ok(Self {
            base_url: super::client::normalize_base_url(base_url)?,
            options: options.clone(),
            patterns: LoginPatterns::default(),
        })
    }

    /// Override the scraping patterns
    pub fn with_patterns(mut self, patterns: LoginPatterns) -> Self {
        self.patterns = patterns;
        self
    }

    /// Run the login flow and return the API key
    pub async fn api_key(&self, username: &str, password: &str) -> Result<String> {
        // Fresh cookie jar per login so sessions never leak between runs
        let client = self.options.builder().cookie_store(true).build()?;
        let login_url = format!("{}/login", self.base_url);

        let login_page = fetch_page(&client, &login_url).await?;
        let csrf_token = extract_csrf_token(&login_page, &self.patterns.csrf_token)?;

        tracing::debug!("POST {}", login_url);
        let response = client
            .post(&login_url)
            .form(&[
                ("username", username),
                ("password", password),
                ("csrf_token", csrf_token.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            tracing::error!("Login rejected for {}: {}", username, status);
            return Err(Error::LoginRejected { status });
        }

        let settings = fetch_page(&client, &format!("{}/settings", self.base_url)).await?;
        let api_key = extract_api_key(&settings, &self.patterns.api_key)?;

        tracing::info!("Obtained API key for {}", username);
        Ok(api_key)
    }
}

/// Run the login flow with default patterns
pub async fn bootstrap(
    base_url: &str,
    username: &str,
    password: &str,
    options: &ClientOptions,
) -> Result<String> {
    Bootstrap::new(base_url, options)?
        .api_key(username, password)
        .await
}

async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    tracing::debug!("GET {}", url);
    let response = client.get(url).send().await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(status_error(url, status, body));
    }
    Ok(body)
}

fn status_error(url: &str, status: StatusCode, body: String) -> Error {
    Error::Status {
        method: reqwest::Method::GET,
        url: url.to_string(),
        status,
        body,
    }
}

fn capture(html: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Pull the CSRF token out of the login form, undoing HTML entity escaping
pub fn extract_csrf_token(html: &str, pattern: &Regex) -> Result<String> {
    let raw = capture(html, pattern).ok_or(Error::MarkerNotFound {
        marker: "csrf_token",
        page: "login",
    })?;
    Ok(html_escape::decode_html_entities(&raw).into_owned())
}

/// Pull the API key out of the settings page script
pub fn extract_api_key(html: &str, pattern: &Regex) -> Result<String> {
    capture(html, pattern).ok_or(Error::MarkerNotFound {
        marker: "api_key",
        page: "settings",
    })
}
