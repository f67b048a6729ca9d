//! Mock transport for testing
//!
//! Answers requests from an in-memory route table and records every request,
//! so manager logic can be tested without a Nexus server.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use crate::client::SCRIPT_API;
use crate::error::Result;
use crate::script::ScriptOutput;
use crate::status::Status;
use crate::transport::{Body, Method, Response, Transport};

/// A request seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub body: Body,
}

impl RecordedRequest {
    /// Body as text (empty for bodiless requests)
    pub fn body_text(&self) -> String {
        self.body.as_text().unwrap_or_default().to_string()
    }

    /// Body parsed as JSON
    pub fn body_json(&self) -> Value {
        serde_json::from_str(&self.body_text()).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    path: String,
    body_contains: Option<String>,
    response: Response,
}

impl Route {
    fn matches(&self, method: Method, url: &str, body: &Body) -> bool {
        self.method == method
            && url.ends_with(&self.path)
            && self
                .body_contains
                .as_deref()
                .is_none_or(|needle| body.as_text().unwrap_or_default().contains(needle))
    }
}

/// In-memory transport for testing
///
/// Routes are matched in registration order; the first route whose method,
/// URL suffix and optional body fragment match wins. Unmatched requests get
/// `404 Not Found`.
#[derive(Clone, Default)]
pub struct MockTransport {
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    /// Create a mock with no routes
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method` requests whose URL ends with `path`
    pub fn route(self, method: Method, path: &str, status: Status, body: &str) -> Self {
        self.push(Route {
            method,
            path: path.to_string(),
            body_contains: None,
            response: Response::new(status, body.as_bytes().to_vec()),
        })
    }

    /// Answer runs of script `name` with `result` wrapped in the usual envelope
    pub fn script(self, name: &str, result: Value) -> Self {
        self.script_when(name, None, result)
    }

    /// Like [`MockTransport::script`], but only for arguments containing `fragment`
    pub fn script_with(self, name: &str, fragment: &str, result: Value) -> Self {
        self.script_when(name, Some(fragment), result)
    }

    fn script_when(self, name: &str, fragment: Option<&str>, result: Value) -> Self {
        let envelope = ScriptOutput::wrap(name, &result);
        self.push(Route {
            method: Method::Post,
            path: format!("{}/{}/run", SCRIPT_API, name),
            body_contains: fragment.map(String::from),
            response: Response::new(Status::Ok, envelope.into_bytes()),
        })
    }

    fn push(self, route: Route) -> Self {
        self.routes.lock().unwrap().push(route);
        self
    }

    /// All requests seen so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests that ran script `name`
    pub fn script_runs(&self, name: &str) -> Vec<RecordedRequest> {
        let suffix = format!("{}/{}/run", SCRIPT_API, name);
        self.requests()
            .into_iter()
            .filter(|r| r.method == Method::Post && r.url.ends_with(&suffix))
            .collect()
    }

    /// Whether any request was sent at all
    pub fn is_untouched(&self) -> bool {
        self.requests.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, method: Method, url: &str, body: Body) -> Result<Response> {
        let response = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|route| route.matches(method, url, &body))
            .map(|route| route.response.clone())
            .unwrap_or_else(|| Response::new(Status::NotFound, Vec::new()));

        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            body,
        });

        Ok(response)
    }
}
