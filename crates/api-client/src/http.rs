//! HTTP transport for the Feedline REST API
//!
//! This module provides request/response types, error handling, client
//! configuration and the reqwest-backed client used by the comment service.

use reqwest::{Client as ReqwestClient, Response as ReqwestResponse};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// API error with HTTP status and message
///
/// Covers both transport failures (status `0`) and errors reported by the
/// server, either through a non-2xx status or an unsuccessful envelope.
///
/// # Examples
/// ```
/// use api_client::http::ApiError;
///
/// let error = ApiError::new(404, "NotFound", "Comment not found");
/// assert_eq!(error.status(), 404);
/// assert!(!error.is_network_error());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code (0 when the request never got a response)
    status: u16,
    /// Error code (e.g., "NetworkError", "NotFound")
    code: String,
    /// Human-readable error message
    message: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Get the error code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a network-related failure rather than a rejection
    ///
    /// Network failure statuses: 0, 408, 425, 429, 500, 502, 503, 504, 522, 524
    pub fn is_network_error(&self) -> bool {
        matches!(
            self.status,
            0 | 408 | 425 | 429 | 500 | 502 | 503 | 504 | 522 | 524
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API error {}: {} - {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Errors raised while building a [`ClientConfig`] from the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),

    /// The timeout value could not be parsed as seconds
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),
}

// =============================================================================
// Request Types
// =============================================================================

/// HTTP method for API requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request
    Get,
    /// POST request
    Post,
    /// DELETE request
    Delete,
}

impl HttpMethod {
    /// Method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// API request parameters
///
/// A path relative to the configured base URL, plus headers and an optional
/// JSON body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Path below the base URL (e.g., "/comments/p1")
    pub path: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (POST only)
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    fn with_method(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create a new GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::with_method(HttpMethod::Get, path)
    }

    /// Create a new POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::with_method(HttpMethod::Post, path)
    }

    /// Create a new DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::with_method(HttpMethod::Delete, path)
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body from JSON
    pub fn json_body<T: Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(value)?);
        Ok(self)
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// API response with status and decoded data
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// HTTP status code
    pub status: u16,
    /// Response data
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Create a new response
    pub fn new(status: u16, data: T) -> Self {
        Self { status, data }
    }

    /// Check if the response is successful (2xx status)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Error body returned by the API on failure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code, when the server provides one
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Environment variable holding the API base URL
pub const ENV_API_URL: &str = "FEEDLINE_API_URL";
/// Environment variable holding the bearer token
pub const ENV_TOKEN: &str = "FEEDLINE_TOKEN";
/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "FEEDLINE_TIMEOUT_SECS";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base API URL (e.g., "http://localhost:5000/api")
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Headers included in every request
    pub default_headers: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("Feedline/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// Create a new config with a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Build a config from `FEEDLINE_API_URL`, `FEEDLINE_TOKEN` and
    /// `FEEDLINE_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(ENV_API_URL).ok_or(ConfigError::MissingVar(ENV_API_URL))?;
        let mut config = Self::new(base_url);

        if let Some(token) = lookup(ENV_TOKEN).filter(|t| !t.is_empty()) {
            config = config.with_bearer_token(token);
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Authenticate every request with a bearer token
    pub fn with_bearer_token(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.with_header("Authorization", value)
    }
}

// =============================================================================
// Client Implementation
// =============================================================================

/// HTTP client for the Feedline REST API
///
/// # Examples
/// ```
/// use api_client::http::{ApiRequest, ClientConfig, HttpClient};
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::new("http://localhost:5000/api");
///     let client = HttpClient::new(config)?;
///
///     let request = ApiRequest::get("/comments/p1");
///     let response = client.execute::<serde_json::Value>(request).await?;
///     println!("status {}", response.status);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// HTTP client
    client: ReqwestClient,
    /// Configuration
    config: ClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ApiError::new(0, "ClientError", format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Execute a request and decode a JSON response
    pub async fn execute<T>(&self, request: ApiRequest) -> Result<ApiResponse<T>, ApiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.config.base_url, request.path);
        tracing::debug!("{} {}", request.method.as_str(), url);

        let mut req = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        for (key, value) in &request.headers {
            req = req.header(key, value);
        }

        if let Some(body) = &request.body {
            req = req.header("Content-Type", "application/json").body(body.clone());
        }

        let response = req.send().await.map_err(|e| {
            ApiError::new(0, "NetworkError", format!("Request failed: {}", e))
        })?;

        self.parse_response(response).await
    }

    /// Parse a reqwest response into an `ApiResponse`
    async fn parse_response<T>(&self, response: ReqwestResponse) -> Result<ApiResponse<T>, ApiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status().as_u16();

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();

            return match serde_json::from_str::<ApiErrorResponse>(&error_body) {
                Ok(ApiErrorResponse { error, message }) if error.is_some() || message.is_some() => {
                    Err(ApiError::new(
                        status,
                        error.unwrap_or_else(|| "Unknown".to_string()),
                        message.unwrap_or_default(),
                    ))
                }
                _ => Err(ApiError::new(
                    status,
                    "Unknown",
                    format!("HTTP {}: {}", status, error_body),
                )),
            };
        }

        let body = response.text().await.map_err(|e| {
            ApiError::new(0, "ParseError", format!("Failed to read response: {}", e))
        })?;

        let data: T = serde_json::from_str(&body).map_err(|e| {
            ApiError::new(0, "ParseError", format!("Failed to parse JSON: {}", e))
        })?;

        Ok(ApiResponse::new(status, data))
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

// =============================================================================
// Tests
// =============================================================================
