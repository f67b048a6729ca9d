//! Nexus client and script invoker
//!
//! Every operation in this crate goes through [`NexusClient`]: it knows the
//! server base URL, owns the [`Transport`] and runs server-side scripts.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::{ClientOptions, ConnectionConfig};
use crate::error::{NexusError, Result};
use crate::script::{ScriptOutput, ScriptResult};
use crate::status::Status;
use crate::transport::{Body, HttpTransport, Method, Response, Transport};

/// Base path of the REST API
pub const API_BASE: &str = "service/rest";
/// Scripts endpoint, relative to [`API_BASE`]
pub const SCRIPT_API: &str = "v1/script";
/// Repository listing endpoint, relative to [`API_BASE`]
pub const REPOSITORY_PATH: &str = "v1/repositories";

/// Entry point for talking to a Nexus server
pub struct NexusClient {
    base_url: String,
    transport: Box<dyn Transport>,
    options: ClientOptions,
}

impl NexusClient {
    /// Create a client with an arbitrary transport
    pub fn new(
        base_url: impl Into<String>,
        transport: Box<dyn Transport>,
        options: ClientOptions,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            options,
        }
    }

    /// Create a client backed by [`HttpTransport`]
    pub fn connect(config: &ConnectionConfig, options: ClientOptions) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config, &options)?;
        Ok(Self::new(config.nexus_url.clone(), Box::new(transport), options))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Directory holding the groovy sources
    pub fn scripts_dir(&self) -> &Path {
        &self.options.scripts_dir
    }

    /// Path of the groovy source for script `name`
    pub fn script_path(&self, name: &str) -> PathBuf {
        self.options.scripts_dir.join(format!("{}.groovy", name))
    }

    /// `{base}/service/rest/v1/script`
    pub fn scripts_url(&self) -> String {
        format!("{}/{}/{}", self.base_url, API_BASE, SCRIPT_API)
    }

    /// `{base}/service/rest/v1/script/{name}`
    pub fn script_url(&self, name: &str) -> String {
        format!("{}/{}", self.scripts_url(), name)
    }

    /// `{base}/service/rest/v1/script/{name}/run`
    pub fn script_run_url(&self, name: &str) -> String {
        format!("{}/run", self.script_url(name))
    }

    /// `{base}/service/rest/v1/repositories`
    pub fn repositories_url(&self) -> String {
        format!("{}/{}/{}", self.base_url, API_BASE, REPOSITORY_PATH)
    }

    /// Send one raw request
    pub async fn send(&self, method: Method, url: &str, body: Body) -> Result<Response> {
        self.transport.send(method, url, body).await
    }

    /// GET `url` and decode the JSON body, requiring `200 OK`
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        context: &str,
    ) -> Result<T> {
        let response = self.send(Method::Get, url, Body::Empty).await?;
        if response.status != Status::Ok {
            return Err(NexusError::server(context));
        }
        serde_json::from_slice(&response.body).map_err(|e| NexusError::decode(context, e))
    }

    /// Run a server-side script with a raw string argument
    ///
    /// The argument is sent verbatim as the request body. The response is an
    /// envelope whose `result` field is itself JSON, so it is decoded twice.
    pub async fn run_script(&self, name: &str, argument: &str) -> Result<ScriptResult> {
        if name.is_empty() {
            return Err(NexusError::validation("name is a required parameter"));
        }

        let response = self
            .send(
                Method::Post,
                &self.script_run_url(name),
                Body::Text(argument.to_string()),
            )
            .await?;

        match response.status {
            Status::Ok => {
                if self.options.reports_success() {
                    tracing::debug!("The script {:?} was executed successfully", name);
                }
            }
            Status::NotFound => {
                return Err(NexusError::ScriptNotFound {
                    name: name.to_string(),
                });
            }
            _ => return Err(NexusError::server(format!("RunScript {}", name))),
        }

        ScriptOutput::decode(&response.body)
    }

    /// Run a script with a serialized argument
    pub async fn run_script_with<T: Serialize + ?Sized>(
        &self,
        name: &str,
        argument: &T,
    ) -> Result<ScriptResult> {
        let payload = serde_json::to_string(argument)?;
        self.run_script(name, &payload).await
    }
}
