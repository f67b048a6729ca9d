//! HTTP transport
//!
//! A [`Transport`] performs exactly one request and hands back the raw body
//! together with its [`Status`]. It never retries and never follows
//! redirects: the create scripts answer `302 Found` for "already exists" and
//! that status has to reach the caller untouched.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

use crate::config::{ClientOptions, ConnectionConfig};
use crate::error::{NexusError, Result};
use crate::status::Status;

/// HTTP methods used against the Nexus REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// Request body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Body {
    #[default]
    Empty,
    /// Serialized JSON document, sent as `application/json`
    Json(Vec<u8>),
    /// Raw string, sent as `text/plain` (script run arguments)
    Text(String),
}

impl Body {
    /// Serialize a value into a JSON body
    pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Body::Json(serde_json::to_vec(value)?))
    }

    /// Body as text, for logging and assertions
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Empty => None,
            Body::Json(bytes) => std::str::from_utf8(bytes).ok(),
            Body::Text(text) => Some(text),
        }
    }
}

/// Raw response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: Status,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: Status, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Performs single HTTP requests against the server
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, url: &str, body: Body) -> Result<Response>;
}

/// reqwest-backed transport with basic authentication
pub struct HttpTransport {
    client: reqwest::Client,
    username: String,
    password: String,
    verbose: bool,
}

impl HttpTransport {
    /// Request timeout
    pub const TIMEOUT_SECS: u64 = 30;

    /// Create a transport for the configured server
    pub fn new(config: &ConnectionConfig, options: &ClientOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            // 302 is a meaningful answer from the scripts API
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(options.skip_tls_verification)
            .timeout(Duration::from_secs(Self::TIMEOUT_SECS))
            .build()
            .map_err(|e| NexusError::Network {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            username: config.username.clone(),
            password: config.password.clone(),
            verbose: options.verbose,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: Method, url: &str, body: Body) -> Result<Response> {
        let mut request = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        }
        .basic_auth(&self.username, Some(&self.password));

        if self.verbose {
            tracing::trace!("{} {}\n{}", method, url, body.as_text().unwrap_or_default());
        }

        request = match body {
            Body::Empty => request,
            Body::Json(bytes) => request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes),
            Body::Text(text) => request
                .header(reqwest::header::CONTENT_TYPE, "text/plain")
                .body(text),
        };

        let response = request.send().await?;
        let status = Status::from(response.status());
        let bytes = response.bytes().await.map_err(|e| NexusError::Network {
            message: e.to_string(),
        })?;

        if self.verbose {
            tracing::trace!(
                "{} {} -> {}\n{}",
                method,
                url,
                status,
                String::from_utf8_lossy(&bytes)
            );
        }

        Ok(Response::new(status, bytes.to_vec()))
    }
}
