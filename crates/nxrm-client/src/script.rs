//! Server-side scripts
//!
//! Scripts are uploaded from local groovy sources and later run through
//! [`NexusClient::run_script`]. Everything else in this crate depends on the
//! fixed set in [`NEXUS_SCRIPTS`] being present on the server, which is what
//! [`Scripts::init`] takes care of.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::NexusClient;
use crate::error::{NexusError, Result};
use crate::privilege::Privilege;
use crate::repository::{Attributes, Repository};
use crate::resource::{Exists, Outcome, Report, require};
use crate::role::Role;
use crate::selector::ContentSelector;
use crate::status::Status;
use crate::transport::{Body, Method};

/// Scripts uploaded by `script init`, in upload order
pub const NEXUS_SCRIPTS: &[&str] = &[
    "get-repo",
    "create-hosted-repo",
    "create-proxy-repo",
    "create-group-repo",
    "update-group-members",
    "delete-repo",
    "get-content-selectors",
    "create-content-selector",
    "update-content-selector",
    "delete-content-selector",
    "get-privileges",
    "create-privilege",
    "update-privilege",
    "delete-privilege",
    "get-roles",
    "create-role",
    "update-role",
    "delete-role",
];

/// Script type understood by Nexus
pub const SCRIPT_TYPE: &str = "groovy";

/// Script definition as stored by Nexus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub name: String,
    #[serde(rename = "type")]
    pub script_type: String,
    #[serde(default)]
    pub content: String,
}

impl Script {
    /// Create a groovy script definition
    pub fn groovy(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script_type: SCRIPT_TYPE.to_string(),
            content: content.into(),
        }
    }
}

/// Response envelope of a script run
///
/// `result` holds the script's own JSON document as a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptOutput {
    pub name: String,
    pub result: String,
}

impl ScriptOutput {
    /// Decode an envelope and the JSON document nested in its `result`
    pub fn decode(body: &[u8]) -> Result<ScriptResult> {
        let output: ScriptOutput =
            serde_json::from_slice(body).map_err(|e| NexusError::decode("script envelope", e))?;
        serde_json::from_str(&output.result)
            .map_err(|e| NexusError::decode(format!("result of script {:?}", output.name), e))
    }

    /// Build the envelope the server would return for `result`
    pub fn wrap(name: &str, result: &serde_json::Value) -> String {
        let output = ScriptOutput {
            name: name.to_string(),
            result: result.to_string(),
        };
        serde_json::to_string(&output).unwrap_or_default()
    }
}

/// Decoded result of a script run
///
/// Which fields are populated depends on the script: repository scripts
/// fill the repository fields, the `get-*` scripts fill one of the lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptResult {
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "type")]
    pub repo_type: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub recipe: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub content_selectors: Vec<ContentSelector>,
    #[serde(default)]
    pub privileges: Vec<Privilege>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl ScriptResult {
    /// Repository described by a `get-repo` result
    pub fn into_repository(self) -> Repository {
        Repository {
            name: self.name,
            url: self.url,
            repo_type: self.repo_type,
            format: self.format,
            recipe: self.recipe,
            attributes: self.attributes,
        }
    }
}

/// Script management
pub struct Scripts<'a> {
    client: &'a NexusClient,
}

impl NexusClient {
    pub fn scripts(&self) -> Scripts<'_> {
        Scripts { client: self }
    }
}

impl Scripts<'_> {
    /// Names of all scripts on the server, sorted
    pub async fn list(&self) -> Result<Vec<String>> {
        let scripts: Vec<Script> = self
            .client
            .get_json(&self.client.scripts_url(), "getScripts")
            .await?;
        let mut names: Vec<String> = scripts.into_iter().map(|s| s.name).collect();
        names.sort();
        Ok(names)
    }

    /// Fetch one script definition
    pub async fn get(&self, name: &str) -> Result<Script> {
        require(name, "name is a required parameter")?;
        let response = self
            .client
            .send(Method::Get, &self.client.script_url(name), Body::Empty)
            .await?;
        match response.status {
            Status::Ok => serde_json::from_slice(&response.body)
                .map_err(|e| NexusError::decode("getScript", e)),
            Status::NotFound => Err(NexusError::NotFound {
                kind: Self::KIND,
                name: name.to_string(),
            }),
            _ => Err(NexusError::server("getScript")),
        }
    }

    /// Read the local groovy source of script `name`
    pub fn read_source(&self, name: &str) -> Result<Script> {
        require(name, "name is a required parameter")?;
        let path = self.client.script_path(name);
        let content = std::fs::read_to_string(&path).map_err(|source| NexusError::ScriptSource {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Script::groovy(name, content))
    }

    /// Upload script `name` unless it already exists
    pub async fn add(&self, name: &str) -> Result<Report> {
        require(name, "name is a required parameter")?;
        if self.exists(name).await? {
            tracing::debug!("The script {:?} already exists in nexus", name);
            return Ok(Report::new(Self::KIND, name, Outcome::AlreadyExists));
        }

        let body = Body::json(&self.read_source(name)?)?;
        let response = self
            .client
            .send(Method::Post, &self.client.scripts_url(), body)
            .await?;
        self.expect_no_content(response.status, "AddScript", name)?;
        if self.client.options().reports_success() {
            tracing::debug!("The script {:?} is added to nexus", name);
        }
        Ok(Report::new(Self::KIND, name, Outcome::Created))
    }

    /// Replace the content of an existing script
    pub async fn update(&self, name: &str) -> Result<Report> {
        require(name, "name is a required parameter")?;
        if !self.exists(name).await? {
            tracing::debug!("The script {:?} was not found in nexus", name);
            return Ok(Report::new(Self::KIND, name, Outcome::NotFound));
        }

        let body = Body::json(&self.read_source(name)?)?;
        let response = self
            .client
            .send(Method::Put, &self.client.script_url(name), body)
            .await?;
        self.expect_no_content(response.status, "UpdateScript", name)?;
        if self.client.options().reports_success() {
            tracing::debug!("The script {:?} is updated in nexus", name);
        }
        Ok(Report::new(Self::KIND, name, Outcome::Updated))
    }

    /// Upload or replace script `name`
    pub async fn add_or_update(&self, name: &str) -> Result<Report> {
        require(name, "name is a required parameter")?;
        if self.exists(name).await? {
            self.update(name).await
        } else {
            self.add(name).await
        }
    }

    /// Delete script `name`
    pub async fn delete(&self, name: &str) -> Result<Report> {
        require(name, "name is a required parameter")?;
        if !self.exists(name).await? {
            tracing::debug!("The script {:?} was not found in nexus", name);
            return Ok(Report::new(Self::KIND, name, Outcome::NotFound));
        }

        let response = self
            .client
            .send(Method::Delete, &self.client.script_url(name), Body::Empty)
            .await?;
        self.expect_no_content(response.status, "DeleteScript", name)?;
        if self.client.options().reports_success() {
            tracing::debug!("The script {:?} is deleted from nexus", name);
        }
        Ok(Report::new(Self::KIND, name, Outcome::Deleted))
    }

    /// Upload or refresh every script in [`NEXUS_SCRIPTS`], stopping at the first failure
    pub async fn init(&self) -> Result<Vec<Report>> {
        let mut reports = Vec::with_capacity(NEXUS_SCRIPTS.len());
        for name in NEXUS_SCRIPTS {
            reports.push(self.add_or_update(name).await?);
        }
        Ok(reports)
    }

    fn expect_no_content(&self, status: Status, context: &str, name: &str) -> Result<()> {
        if status == Status::NoContent {
            Ok(())
        } else {
            Err(NexusError::server(format!("{} {}", context, name)))
        }
    }
}

#[async_trait]
impl Exists for Scripts<'_> {
    const KIND: &'static str = "Script";

    /// Any answer other than `200 OK` counts as absent.
    ///
    /// This differs from repositories, where an ambiguous status is an error.
    async fn exists(&self, name: &str) -> Result<bool> {
        require(name, "name is a required parameter")?;
        let response = self
            .client
            .send(Method::Get, &self.client.script_url(name), Body::Empty)
            .await?;
        Ok(response.status == Status::Ok)
    }
}
