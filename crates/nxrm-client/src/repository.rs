//! Repository management
//!
//! Hosted, proxy and group repositories are created through the
//! `create-*-repo` scripts. The payload is a [`Repository`] whose `recipe`
//! is always `{format}-{kind}` and whose attributes depend on both the
//! format (maven2, docker, everything else) and the kind.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::client::NexusClient;
use crate::error::{NexusError, Result};
use crate::resource::{Exists, NameArg, Outcome, Report, require, split_list};
use crate::status::Status;

/// Formats accepted on the command line (`maven` is sent as `maven2`)
pub const REPO_FORMATS: &[&str] = &[
    "maven", "npm", "nuget", "bower", "pypi", "raw", "rubygems", "yum", "docker",
];

const GET_REPO_SCRIPT: &str = "get-repo";
const CREATE_HOSTED_REPO_SCRIPT: &str = "create-hosted-repo";
const CREATE_PROXY_REPO_SCRIPT: &str = "create-proxy-repo";
const CREATE_GROUP_REPO_SCRIPT: &str = "create-group-repo";
const UPDATE_GROUP_MEMBERS_SCRIPT: &str = "update-group-members";
const DELETE_REPO_SCRIPT: &str = "delete-repo";

const DEFAULT_BLOB_STORE: &str = "default";
const PROXY_MAX_AGE_MINUTES: i64 = 1440;
const NEGATIVE_CACHE_TTL_MINUTES: i64 = 1440;

static REMOTE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://").expect("valid regex"));

/// Repository as exchanged with the repository scripts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub repo_type: String,
    pub format: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub recipe: String,
    pub attributes: Attributes,
}

impl Repository {
    /// Whether the recipe names a group repository
    pub fn is_group(&self) -> bool {
        self.recipe.contains("group")
    }

    /// Whether this repository stores `format` content
    pub fn has_format(&self, format: &str) -> bool {
        self.format == format || self.recipe.starts_with(&format!("{}-", format))
    }

    /// Current group members (empty for non-group repositories)
    pub fn member_names(&self) -> &[String] {
        self.attributes
            .group
            .as_ref()
            .map(|g| g.member_names.as_slice())
            .unwrap_or_default()
    }
}

/// Format and kind specific settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Attributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<Storage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maven: Option<Maven>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<Proxy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub httpclient: Option<HttpClient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_cache: Option<NegativeCache>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker: Option<Docker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_proxy: Option<DockerProxy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<Cleanup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Storage {
    pub blob_store_name: String,
    pub write_policy: String,
    pub strict_content_type_validation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Maven {
    pub version_policy: String,
    pub layout_policy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Proxy {
    pub remote_url: String,
    pub content_max_age: i64,
    pub metadata_max_age: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpClient {
    pub blocked: bool,
    pub auto_block: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<HttpClientAuth>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientAuth {
    #[serde(rename = "type")]
    pub auth_type: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Docker {
    #[serde(rename = "httpPort")]
    pub http_port: Option<u16>,
    #[serde(rename = "httpsPort")]
    pub https_port: Option<u16>,
    pub force_basic_auth: bool,
    pub v1_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DockerProxy {
    pub index_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Group {
    pub member_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NegativeCache {
    pub enabled: bool,
    pub time_to_live: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cleanup {
    pub policy_name: String,
}

/// Entry of `GET /service/rest/v1/repositories`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySummary {
    pub name: String,
    pub format: String,
    #[serde(rename = "type")]
    pub repo_type: String,
    pub url: String,
}

/// Repository kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoKind {
    Hosted,
    Proxy,
    Group,
}

impl RepoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoKind::Hosted => "hosted",
            RepoKind::Proxy => "proxy",
            RepoKind::Group => "group",
        }
    }

    /// `{format}-{kind}`, with `format` already normalized
    pub fn recipe(&self, format: &str) -> String {
        format!("{}-{}", format, self.as_str())
    }

    fn create_script(&self) -> &'static str {
        match self {
            RepoKind::Hosted => CREATE_HOSTED_REPO_SCRIPT,
            RepoKind::Proxy => CREATE_PROXY_REPO_SCRIPT,
            RepoKind::Group => CREATE_GROUP_REPO_SCRIPT,
        }
    }
}

impl fmt::Display for RepoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller input for the create operations
///
/// Fields that do not apply to a kind are ignored. Docker ports use `0` for
/// "not set".
#[derive(Debug, Clone, Default)]
pub struct NewRepository {
    pub name: String,
    pub format: String,
    pub blob_store_name: String,
    pub releases: bool,
    pub docker_http_port: u16,
    pub docker_https_port: u16,
    /// Proxy only
    pub remote_url: String,
    /// Proxy only
    pub proxy_username: String,
    /// Proxy only
    pub proxy_password: String,
    /// Group only, comma separated
    pub members: String,
}

/// Normalize and check a repository format
pub fn validate_repository_format(format: &str) -> Result<String> {
    require(format, "format is a required parameter")?;
    if !REPO_FORMATS.contains(&format) {
        return Err(NexusError::InvalidFormat {
            value: format.to_string(),
            available: format!("[{}]", REPO_FORMATS.join(" ")),
        });
    }
    if format == "maven" {
        Ok("maven2".to_string())
    } else {
        Ok(format.to_string())
    }
}

/// Accept only `http://` and `https://` remote URLs
pub fn validate_remote_url(url: &str) -> Result<()> {
    if REMOTE_URL.is_match(url) {
        Ok(())
    } else {
        Err(NexusError::InvalidRemoteUrl {
            url: url.to_string(),
        })
    }
}

/// Proxy credentials are all or nothing
pub fn validate_proxy_auth(username: &str, password: &str) -> Result<()> {
    if username.is_empty() == password.is_empty() {
        Ok(())
    } else {
        Err(NexusError::validation(
            "You need to provide both proxy-user and proxy-pass to set credentials to a proxy repository",
        ))
    }
}

pub fn version_policy(releases: bool) -> &'static str {
    if releases { "RELEASE" } else { "SNAPSHOT" }
}

pub fn write_policy(releases: bool) -> &'static str {
    if releases { "ALLOW_ONCE" } else { "ALLOW" }
}

fn blob_store_name(name: &str) -> String {
    if name.is_empty() {
        DEFAULT_BLOB_STORE.to_string()
    } else {
        name.to_string()
    }
}

/// Build the create payload for `kind`
///
/// `format` must already be normalized. Group members are passed in already
/// validated; other kinds ignore them.
pub fn build_repository(
    kind: RepoKind,
    format: &str,
    spec: &NewRepository,
    members: Vec<String>,
) -> Result<Repository> {
    let mut attributes = Attributes {
        storage: Some(Storage {
            blob_store_name: blob_store_name(&spec.blob_store_name),
            write_policy: write_policy(spec.releases).to_string(),
            strict_content_type_validation: true,
        }),
        ..Attributes::default()
    };

    match format {
        "maven2" => {
            attributes.maven = Some(Maven {
                version_policy: version_policy(spec.releases).to_string(),
                layout_policy: "STRICT".to_string(),
            });
        }
        "docker" => {
            attributes.docker = Some(docker_attributes(spec)?);
            if kind == RepoKind::Proxy {
                attributes.docker_proxy = Some(DockerProxy {
                    index_type: "REGISTRY".to_string(),
                });
            }
        }
        _ => {}
    }

    match kind {
        RepoKind::Hosted => {}
        RepoKind::Proxy => {
            attributes.proxy = Some(Proxy {
                remote_url: spec.remote_url.clone(),
                content_max_age: -1,
                metadata_max_age: PROXY_MAX_AGE_MINUTES,
            });
            attributes.httpclient = Some(HttpClient {
                blocked: false,
                auto_block: true,
                authentication: (!spec.proxy_username.is_empty()).then(|| HttpClientAuth {
                    auth_type: "username".to_string(),
                    username: spec.proxy_username.clone(),
                    password: spec.proxy_password.clone(),
                }),
            });
            attributes.negative_cache = Some(NegativeCache {
                enabled: true,
                time_to_live: NEGATIVE_CACHE_TTL_MINUTES,
            });
        }
        RepoKind::Group => {
            attributes.group = Some(Group {
                member_names: members,
            });
        }
    }

    Ok(Repository {
        name: spec.name.clone(),
        format: format.to_string(),
        recipe: kind.recipe(format),
        attributes,
        ..Repository::default()
    })
}

fn docker_attributes(spec: &NewRepository) -> Result<Docker> {
    if spec.docker_http_port == 0 && spec.docker_https_port == 0 {
        return Err(NexusError::validation(
            "You need to specify either a http port or a https port or both for creating a docker repository",
        ));
    }
    Ok(Docker {
        http_port: (spec.docker_http_port != 0).then_some(spec.docker_http_port),
        https_port: (spec.docker_https_port != 0).then_some(spec.docker_https_port),
        force_basic_auth: true,
        v1_enabled: false,
    })
}

/// Why a candidate group member was left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No such repository
    NotFound,
    /// Stores a different format than the group
    WrongFormat { expected: String },
    /// Same name as the group itself
    SelfReference,
    /// Already in the group (add)
    AlreadyMember,
    /// Not in the group (remove)
    NotAMember,
}

/// Candidate member that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMember {
    pub name: String,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            SkipReason::NotFound => write!(
                f,
                "Repository {:?} was not found in Nexus, hence it cannot be added to the group repository",
                self.name
            ),
            SkipReason::WrongFormat { expected } => write!(
                f,
                "Repository {:?} is not a {:?} format repository, hence it cannot be added to the group repository",
                self.name, expected
            ),
            SkipReason::SelfReference => write!(
                f,
                "Member {:?} is the group itself, cannot add a group repository as a member in the same group",
                self.name
            ),
            SkipReason::AlreadyMember => write!(
                f,
                "Member {:?} already exists in the group, hence not adding the member again",
                self.name
            ),
            SkipReason::NotAMember => write!(
                f,
                "Member {:?} was not found in the group, hence cannot remove the member from the group",
                self.name
            ),
        }
    }
}

/// Result of validating candidate members against a group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberCheck {
    pub valid: Vec<String>,
    pub skipped: Vec<SkippedMember>,
}

/// Result of a group membership change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipChange {
    pub report: Report,
    /// Members added or removed
    pub changed: Vec<String>,
    pub skipped: Vec<SkippedMember>,
    /// Member list sent to the server
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberAction {
    Add,
    Remove,
}

/// Repository management
pub struct Repositories<'a> {
    client: &'a NexusClient,
}

impl NexusClient {
    pub fn repositories(&self) -> Repositories<'_> {
        Repositories { client: self }
    }
}

impl Repositories<'_> {
    /// All repositories known to the server
    pub async fn summaries(&self) -> Result<Vec<RepositorySummary>> {
        self.client
            .get_json(&self.client.repositories_url(), "getRepositories")
            .await
    }

    /// Repository names, optionally restricted to one format
    pub async fn list(&self, format: Option<&str>) -> Result<Vec<String>> {
        let format = format
            .filter(|f| !f.is_empty())
            .map(validate_repository_format)
            .transpose()?;
        Ok(self
            .summaries()
            .await?
            .into_iter()
            .filter(|r| format.as_deref().is_none_or(|f| r.format == f))
            .map(|r| r.name)
            .collect())
    }

    /// Fetch a repository, `None` when the server reports it missing
    pub async fn lookup(&self, name: &str) -> Result<Option<Repository>> {
        require(name, "name is a required parameter")?;
        let result = self
            .client
            .run_script_with(GET_REPO_SCRIPT, &NameArg { name })
            .await?;
        match result.status {
            Status::Ok => Ok(Some(result.into_repository())),
            Status::NotFound => Ok(None),
            _ => Err(NexusError::server(format!("getRepository {}", name))),
        }
    }

    /// Fetch a repository that must exist
    pub async fn get(&self, name: &str) -> Result<Repository> {
        self.lookup(name).await?.ok_or_else(|| NexusError::NotFound {
            kind: Self::KIND,
            name: name.to_string(),
        })
    }

    pub async fn create_hosted(&self, spec: &NewRepository) -> Result<Report> {
        if spec.name.is_empty() || spec.format.is_empty() {
            return Err(NexusError::validation(
                "name and format are required parameters to create a hosted repository",
            ));
        }
        let format = validate_repository_format(&spec.format)?;
        let repository = build_repository(RepoKind::Hosted, &format, spec, Vec::new())?;
        self.create(RepoKind::Hosted, &repository).await
    }

    pub async fn create_proxy(&self, spec: &NewRepository) -> Result<Report> {
        if spec.name.is_empty() || spec.format.is_empty() || spec.remote_url.is_empty() {
            return Err(NexusError::validation(
                "name, format and remote-url are required parameters to create a proxy repository",
            ));
        }
        let format = validate_repository_format(&spec.format)?;
        validate_proxy_auth(&spec.proxy_username, &spec.proxy_password)?;
        validate_remote_url(&spec.remote_url)?;
        let repository = build_repository(RepoKind::Proxy, &format, spec, Vec::new())?;
        self.create(RepoKind::Proxy, &repository).await
    }

    pub async fn create_group(&self, spec: &NewRepository) -> Result<Report> {
        let candidates = split_list(&spec.members);
        if spec.name.is_empty() || spec.format.is_empty() || candidates.is_empty() {
            return Err(NexusError::validation(
                "name, format and members are required parameters",
            ));
        }
        let format = validate_repository_format(&spec.format)?;
        if format == "docker" {
            // Fail on ports before any member lookup reaches the server
            docker_attributes(spec)?;
        }

        let check = self.check_members(&spec.name, &candidates, &format).await?;
        let repository = build_repository(RepoKind::Group, &format, spec, check.valid)?;
        self.create(RepoKind::Group, &repository).await
    }

    async fn create(&self, kind: RepoKind, repository: &Repository) -> Result<Report> {
        let result = self
            .client
            .run_script_with(kind.create_script(), repository)
            .await?;
        match result.status {
            Status::Ok => Ok(Report::new(Self::KIND, &repository.name, Outcome::Created)),
            Status::Found => Ok(Report::new(
                Self::KIND,
                &repository.name,
                Outcome::AlreadyExists,
            )),
            _ => Err(NexusError::OperationFailed {
                action: "creating",
                kind: Self::KIND,
                name: repository.name.clone(),
            }),
        }
    }

    /// Validate each candidate independently against the group `group_name`
    ///
    /// Fails only when no candidate survives.
    pub async fn check_members(
        &self,
        group_name: &str,
        candidates: &[String],
        format: &str,
    ) -> Result<MemberCheck> {
        let mut check = MemberCheck::default();
        let mut seen: HashSet<&str> = HashSet::new();
        for candidate in candidates {
            if !seen.insert(candidate.as_str()) {
                continue;
            }
            let reason = if candidate == group_name {
                Some(SkipReason::SelfReference)
            } else {
                match self.lookup(candidate).await? {
                    None => Some(SkipReason::NotFound),
                    Some(repo) if !repo.has_format(format) => Some(SkipReason::WrongFormat {
                        expected: format.to_string(),
                    }),
                    Some(_) => None,
                }
            };

            match reason {
                None => check.valid.push(candidate.clone()),
                Some(reason) => {
                    let skipped = SkippedMember {
                        name: candidate.clone(),
                        reason,
                    };
                    tracing::warn!("{}", skipped);
                    check.skipped.push(skipped);
                }
            }
        }

        if check.valid.is_empty() {
            return Err(NexusError::validation(
                "At least one valid group member should be provided to add to a group repository",
            ));
        }
        Ok(check)
    }

    /// Add members to an existing group repository
    pub async fn add_members(&self, name: &str, members: &str) -> Result<MembershipChange> {
        self.change_members(name, members, MemberAction::Add).await
    }

    /// Remove members from an existing group repository
    pub async fn remove_members(&self, name: &str, members: &str) -> Result<MembershipChange> {
        self.change_members(name, members, MemberAction::Remove)
            .await
    }

    async fn change_members(
        &self,
        name: &str,
        members: &str,
        action: MemberAction,
    ) -> Result<MembershipChange> {
        require(name, "name is a required parameter")?;
        let candidates = split_list(members);
        if candidates.is_empty() {
            return Err(NexusError::validation(
                "name, format and members are required parameters",
            ));
        }

        let Some(mut repo) = self.lookup(name).await? else {
            return Ok(MembershipChange {
                report: Report::new(Self::KIND, name, Outcome::NotFound),
                changed: Vec::new(),
                skipped: Vec::new(),
                members: Vec::new(),
            });
        };
        if !repo.is_group() {
            return Err(NexusError::NotAGroup {
                name: name.to_string(),
            });
        }

        let format = repo.format.clone();
        let check = self.check_members(name, &candidates, &format).await?;
        let mut current = repo.member_names().to_vec();
        let mut changed = Vec::new();
        let mut skipped = check.skipped;

        for member in check.valid {
            let present = current.contains(&member);
            match (action, present) {
                (MemberAction::Add, false) => {
                    tracing::info!("Member {:?} is added to the group {:?}", member, name);
                    current.push(member.clone());
                    changed.push(member);
                }
                (MemberAction::Remove, true) => {
                    tracing::info!("Member {:?} is removed from the group {:?}", member, name);
                    current.retain(|m| m != &member);
                    changed.push(member);
                }
                (MemberAction::Add, true) | (MemberAction::Remove, false) => {
                    let reason = if action == MemberAction::Add {
                        SkipReason::AlreadyMember
                    } else {
                        SkipReason::NotAMember
                    };
                    let entry = SkippedMember {
                        name: member,
                        reason,
                    };
                    tracing::warn!("{}", entry);
                    skipped.push(entry);
                }
            }
        }

        if current.is_empty() {
            return Err(NexusError::validation(format!(
                "Group repository {:?} must keep at least one member",
                name
            )));
        }

        repo.attributes.group = Some(Group {
            member_names: current.clone(),
        });
        let payload = Repository {
            name: name.to_string(),
            format,
            attributes: repo.attributes,
            ..Repository::default()
        };
        let result = self
            .client
            .run_script_with(UPDATE_GROUP_MEMBERS_SCRIPT, &payload)
            .await?;
        let outcome = match result.status {
            Status::Ok => Outcome::Updated,
            Status::NotFound => Outcome::NotFound,
            _ => {
                return Err(NexusError::OperationFailed {
                    action: "updating",
                    kind: Self::KIND,
                    name: name.to_string(),
                });
            }
        };

        Ok(MembershipChange {
            report: Report::new(Self::KIND, name, outcome),
            changed,
            skipped,
            members: current,
        })
    }

    /// Delete a repository
    pub async fn delete(&self, name: &str) -> Result<Report> {
        require(name, "name is a required parameter")?;
        let result = self
            .client
            .run_script_with(DELETE_REPO_SCRIPT, &NameArg { name })
            .await?;
        match result.status {
            Status::Ok => Ok(Report::new(Self::KIND, name, Outcome::Deleted)),
            Status::NotFound => Ok(Report::new(Self::KIND, name, Outcome::NotFound)),
            _ => Err(NexusError::OperationFailed {
                action: "deleting",
                kind: Self::KIND,
                name: name.to_string(),
            }),
        }
    }
}

#[async_trait]
impl Exists for Repositories<'_> {
    const KIND: &'static str = "Repository";

    /// `404 Not Found` means absent; any status other than `200 OK` is an error.
    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.lookup(name).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientOptions;
    use crate::mock::MockTransport;
    use crate::transport::Method;
    use serde_json::json;

    fn client(mock: &MockTransport) -> NexusClient {
        NexusClient::new(
            "http://nexus.local",
            Box::new(mock.clone()),
            ClientOptions::default(),
        )
    }

    fn found(name: &str, recipe: &str, members: &[&str]) -> serde_json::Value {
        let format = recipe.split('-').next().unwrap();
        json!({
            "status": "200 OK",
            "name": name,
            "format": format,
            "recipe": recipe,
            "url": format!("http://nexus.local/repository/{}", name),
            "attributes": {"group": {"memberNames": members}}
        })
    }

    fn missing() -> serde_json::Value {
        json!({"status": "404 Not Found"})
    }

    fn arg(name: &str) -> String {
        format!(r#""name":"{}""#, name)
    }

    #[test]
    fn test_validate_repository_format() {
        assert_eq!(validate_repository_format("maven").unwrap(), "maven2");
        for format in REPO_FORMATS.iter().filter(|f| **f != "maven") {
            assert_eq!(validate_repository_format(format).unwrap(), *format);
        }
        assert!(matches!(
            validate_repository_format("maven2"),
            Err(NexusError::InvalidFormat { .. })
        ));
        assert!(validate_repository_format("helm").is_err());
        assert!(validate_repository_format("").is_err());
    }

    #[test]
    fn test_validate_remote_url() {
        assert!(validate_remote_url("http://repo1.maven.org/maven2/").is_ok());
        assert!(validate_remote_url("https://registry.npmjs.org").is_ok());
        assert!(validate_remote_url("ftp://example.com").is_err());
        assert!(validate_remote_url("repo1.maven.org").is_err());
        assert!(validate_remote_url(" https://example.com").is_err());
        assert!(validate_remote_url("HTTP://example.com").is_err());
        assert!(validate_remote_url("").is_err());
    }

    #[test]
    fn test_validate_proxy_auth() {
        assert!(validate_proxy_auth("", "").is_ok());
        assert!(validate_proxy_auth("user", "pass").is_ok());
        assert!(validate_proxy_auth("user", "").is_err());
        assert!(validate_proxy_auth("", "pass").is_err());
    }

    #[test]
    fn test_recipe_for_all_kinds() {
        for format in REPO_FORMATS {
            let normalized = validate_repository_format(format).unwrap();
            for kind in [RepoKind::Hosted, RepoKind::Proxy, RepoKind::Group] {
                let spec = NewRepository {
                    name: "r".to_string(),
                    format: format.to_string(),
                    docker_http_port: 8082,
                    remote_url: "https://example.com".to_string(),
                    ..NewRepository::default()
                };
                let repo =
                    build_repository(kind, &normalized, &spec, vec!["m".to_string()]).unwrap();
                assert_eq!(repo.recipe, format!("{}-{}", normalized, kind));
            }
        }
    }

    #[test]
    fn test_hosted_maven_payload() {
        let spec = NewRepository {
            name: "lib".to_string(),
            format: "maven".to_string(),
            releases: true,
            ..NewRepository::default()
        };
        let repo = build_repository(RepoKind::Hosted, "maven2", &spec, Vec::new()).unwrap();
        let storage = repo.attributes.storage.as_ref().unwrap();
        assert_eq!(storage.blob_store_name, "default");
        assert_eq!(storage.write_policy, "ALLOW_ONCE");
        assert!(storage.strict_content_type_validation);
        assert_eq!(repo.attributes.maven.as_ref().unwrap().version_policy, "RELEASE");
        assert_eq!(repo.attributes.maven.as_ref().unwrap().layout_policy, "STRICT");
        assert!(repo.attributes.proxy.is_none());

        let snapshots = NewRepository {
            releases: false,
            ..spec
        };
        let repo = build_repository(RepoKind::Hosted, "maven2", &snapshots, Vec::new()).unwrap();
        assert_eq!(repo.attributes.storage.unwrap().write_policy, "ALLOW");
        assert_eq!(repo.attributes.maven.unwrap().version_policy, "SNAPSHOT");
    }

    #[test]
    fn test_proxy_payload() {
        let spec = NewRepository {
            name: "central".to_string(),
            format: "docker".to_string(),
            docker_https_port: 8443,
            remote_url: "https://registry-1.docker.io".to_string(),
            proxy_username: "u".to_string(),
            proxy_password: "p".to_string(),
            ..NewRepository::default()
        };
        let repo = build_repository(RepoKind::Proxy, "docker", &spec, Vec::new()).unwrap();
        let json = serde_json::to_value(&repo).unwrap();

        assert_eq!(json["recipe"], "docker-proxy");
        assert_eq!(json["attributes"]["proxy"]["remoteUrl"], "https://registry-1.docker.io");
        assert_eq!(json["attributes"]["proxy"]["contentMaxAge"], -1);
        assert_eq!(json["attributes"]["proxy"]["metadataMaxAge"], 1440);
        assert_eq!(json["attributes"]["negativeCache"]["enabled"], true);
        assert_eq!(json["attributes"]["negativeCache"]["timeToLive"], 1440);
        assert_eq!(json["attributes"]["httpclient"]["autoBlock"], true);
        assert_eq!(json["attributes"]["httpclient"]["blocked"], false);
        assert_eq!(json["attributes"]["httpclient"]["authentication"]["username"], "u");
        assert_eq!(json["attributes"]["dockerProxy"]["indexType"], "REGISTRY");
        assert_eq!(json["attributes"]["docker"]["httpsPort"], 8443);
        assert!(json["attributes"]["docker"]["httpPort"].is_null());
        assert_eq!(json["attributes"]["docker"]["forceBasicAuth"], true);
    }

    #[test]
    fn test_docker_requires_a_port() {
        let spec = NewRepository {
            name: "images".to_string(),
            format: "docker".to_string(),
            ..NewRepository::default()
        };
        for kind in [RepoKind::Hosted, RepoKind::Proxy, RepoKind::Group] {
            assert!(matches!(
                build_repository(kind, "docker", &spec, vec!["m".to_string()]),
                Err(NexusError::Validation { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_create_hosted_maven() {
        let mock = MockTransport::new().script("create-hosted-repo", json!({"status": "200 OK"}));
        let spec = NewRepository {
            name: "lib".to_string(),
            format: "maven".to_string(),
            releases: false,
            ..NewRepository::default()
        };
        let report = client(&mock).repositories().create_hosted(&spec).await.unwrap();
        assert_eq!(report.outcome, Outcome::Created);

        let runs = mock.script_runs("create-hosted-repo");
        assert_eq!(runs.len(), 1);
        let payload = runs[0].body_json();
        assert_eq!(payload["name"], "lib");
        assert_eq!(payload["format"], "maven2");
        assert_eq!(payload["recipe"], "maven2-hosted");
        assert_eq!(payload["attributes"]["maven"]["versionPolicy"], "SNAPSHOT");
        assert_eq!(payload["attributes"]["storage"]["writePolicy"], "ALLOW");
    }

    #[tokio::test]
    async fn test_create_already_exists() {
        let mock = MockTransport::new().script("create-hosted-repo", json!({"status": "302 Found"}));
        let spec = NewRepository {
            name: "lib".to_string(),
            format: "raw".to_string(),
            ..NewRepository::default()
        };
        let report = client(&mock).repositories().create_hosted(&spec).await.unwrap();
        assert_eq!(report.outcome, Outcome::AlreadyExists);
    }

    #[tokio::test]
    async fn test_create_failure() {
        let mock = MockTransport::new().script(
            "create-hosted-repo",
            json!({"status": "500 Internal Server Error", "message": "boom"}),
        );
        let spec = NewRepository {
            name: "lib".to_string(),
            format: "raw".to_string(),
            ..NewRepository::default()
        };
        let result = client(&mock).repositories().create_hosted(&spec).await;
        assert!(matches!(result, Err(NexusError::OperationFailed { action: "creating", .. })));
    }

    #[tokio::test]
    async fn test_create_proxy_without_remote_url() {
        let mock = MockTransport::new();
        let spec = NewRepository {
            name: "central".to_string(),
            format: "maven".to_string(),
            ..NewRepository::default()
        };
        let result = client(&mock).repositories().create_proxy(&spec).await;
        assert!(matches!(result, Err(NexusError::Validation { .. })));
        assert!(mock.is_untouched());
    }

    #[tokio::test]
    async fn test_create_proxy_invalid_url() {
        let mock = MockTransport::new();
        let spec = NewRepository {
            name: "central".to_string(),
            format: "maven".to_string(),
            remote_url: "repo1.maven.org/maven2".to_string(),
            ..NewRepository::default()
        };
        let result = client(&mock).repositories().create_proxy(&spec).await;
        assert!(matches!(result, Err(NexusError::InvalidRemoteUrl { .. })));
        assert!(mock.is_untouched());
    }

    #[tokio::test]
    async fn test_create_docker_without_ports_sends_nothing() {
        let mock = MockTransport::new();
        let spec = NewRepository {
            name: "images".to_string(),
            format: "docker".to_string(),
            members: "docker-hosted".to_string(),
            ..NewRepository::default()
        };
        let repos = client(&mock);
        assert!(repos.repositories().create_hosted(&spec).await.is_err());
        assert!(repos.repositories().create_group(&spec).await.is_err());
        assert!(mock.is_untouched());
    }

    #[tokio::test]
    async fn test_create_group_filters_members() {
        let mock = MockTransport::new()
            .script_with("get-repo", &arg("maven-releases"), found("maven-releases", "maven2-hosted", &[]))
            .script_with("get-repo", &arg("npm-hosted"), found("npm-hosted", "npm-hosted", &[]))
            .script_with("get-repo", &arg("ghost"), missing())
            .script("create-group-repo", json!({"status": "200 OK"}));
        let spec = NewRepository {
            name: "maven-public".to_string(),
            format: "maven".to_string(),
            members: "maven-releases, npm-hosted, ghost, maven-public, maven-releases".to_string(),
            ..NewRepository::default()
        };
        let report = client(&mock).repositories().create_group(&spec).await.unwrap();
        assert_eq!(report.outcome, Outcome::Created);

        let payload = mock.script_runs("create-group-repo")[0].body_json();
        assert_eq!(payload["recipe"], "maven2-group");
        assert_eq!(
            payload["attributes"]["group"]["memberNames"],
            json!(["maven-releases"])
        );
    }

    #[tokio::test]
    async fn test_create_group_without_valid_members() {
        let mock = MockTransport::new().script("get-repo", missing());
        let spec = NewRepository {
            name: "maven-public".to_string(),
            format: "maven".to_string(),
            members: "ghost".to_string(),
            ..NewRepository::default()
        };
        let result = client(&mock).repositories().create_group(&spec).await;
        assert!(matches!(result, Err(NexusError::Validation { .. })));
        assert!(mock.script_runs("create-group-repo").is_empty());
    }

    #[tokio::test]
    async fn test_check_members_rejects_self_and_wrong_format() {
        let mock = MockTransport::new()
            .script_with("get-repo", &arg("maven-releases"), found("maven-releases", "maven2-hosted", &[]))
            .script_with("get-repo", &arg("nuget-hosted"), found("nuget-hosted", "nuget-hosted", &[]));
        let candidates = vec![
            "maven-public".to_string(),
            "nuget-hosted".to_string(),
            "maven-releases".to_string(),
        ];
        let check = client(&mock)
            .repositories()
            .check_members("maven-public", &candidates, "maven2")
            .await
            .unwrap();

        assert_eq!(check.valid, vec!["maven-releases"]);
        assert_eq!(check.skipped.len(), 2);
        assert_eq!(check.skipped[0].reason, SkipReason::SelfReference);
        assert_eq!(
            check.skipped[1].reason,
            SkipReason::WrongFormat {
                expected: "maven2".to_string()
            }
        );
        // The group itself is never looked up as a member
        assert_eq!(mock.script_runs("get-repo").len(), 2);
    }

    #[tokio::test]
    async fn test_check_members_looks_up_duplicates_once() {
        let mock = MockTransport::new()
            .script_with("get-repo", &arg("maven-releases"), found("maven-releases", "maven2-hosted", &[]))
            .script("get-repo", json!({"status": "404 Not Found"}));
        let candidates = vec![
            "ghost".to_string(),
            "ghost".to_string(),
            "maven-releases".to_string(),
        ];
        let check = client(&mock)
            .repositories()
            .check_members("maven-public", &candidates, "maven2")
            .await
            .unwrap();

        assert_eq!(check.valid, vec!["maven-releases"]);
        assert_eq!(check.skipped.len(), 1);
        assert_eq!(check.skipped[0].name, "ghost");
        assert_eq!(check.skipped[0].reason, SkipReason::NotFound);
        assert_eq!(mock.script_runs("get-repo").len(), 2);
    }

    #[tokio::test]
    async fn test_add_members_is_idempotent() {
        let mock = MockTransport::new()
            .script_with(
                "get-repo",
                &arg("maven-public"),
                found("maven-public", "maven2-group", &["maven-releases"]),
            )
            .script_with("get-repo", &arg("maven-releases"), found("maven-releases", "maven2-hosted", &[]))
            .script_with("get-repo", &arg("maven-snapshots"), found("maven-snapshots", "maven2-hosted", &[]))
            .script("update-group-members", json!({"status": "200 OK"}));

        let change = client(&mock)
            .repositories()
            .add_members("maven-public", "maven-releases,maven-snapshots")
            .await
            .unwrap();

        assert_eq!(change.report.outcome, Outcome::Updated);
        assert_eq!(change.changed, vec!["maven-snapshots"]);
        assert_eq!(change.members, vec!["maven-releases", "maven-snapshots"]);
        assert_eq!(change.skipped[0].reason, SkipReason::AlreadyMember);

        let payload = mock.script_runs("update-group-members")[0].body_json();
        assert_eq!(payload["name"], "maven-public");
        assert_eq!(
            payload["attributes"]["group"]["memberNames"],
            json!(["maven-releases", "maven-snapshots"])
        );
    }

    #[tokio::test]
    async fn test_add_members_to_non_group() {
        let mock = MockTransport::new()
            .script_with("get-repo", &arg("maven-releases"), found("maven-releases", "maven2-hosted", &[]))
            .script("update-group-members", json!({"status": "200 OK"}));

        let result = client(&mock)
            .repositories()
            .add_members("maven-releases", "maven-snapshots")
            .await;
        assert!(matches!(result, Err(NexusError::NotAGroup { .. })));
        assert!(mock.script_runs("update-group-members").is_empty());
    }

    #[tokio::test]
    async fn test_add_members_to_missing_group() {
        let mock = MockTransport::new().script("get-repo", missing());
        let change = client(&mock)
            .repositories()
            .add_members("maven-public", "maven-releases")
            .await
            .unwrap();
        assert_eq!(change.report.outcome, Outcome::NotFound);
        assert!(mock.script_runs("update-group-members").is_empty());
    }

    #[tokio::test]
    async fn test_remove_members() {
        let mock = MockTransport::new()
            .script_with(
                "get-repo",
                &arg("maven-public"),
                found("maven-public", "maven2-group", &["maven-releases", "maven-snapshots"]),
            )
            .script_with("get-repo", &arg("maven-releases"), found("maven-releases", "maven2-hosted", &[]))
            .script_with("get-repo", &arg("maven-central"), found("maven-central", "maven2-proxy", &[]))
            .script("update-group-members", json!({"status": "200 OK"}));

        let change = client(&mock)
            .repositories()
            .remove_members("maven-public", "maven-releases, maven-central")
            .await
            .unwrap();

        assert_eq!(change.changed, vec!["maven-releases"]);
        assert_eq!(change.members, vec!["maven-snapshots"]);
        assert_eq!(change.skipped[0].reason, SkipReason::NotAMember);
    }

    #[tokio::test]
    async fn test_remove_last_member_rejected() {
        let mock = MockTransport::new()
            .script_with(
                "get-repo",
                &arg("maven-public"),
                found("maven-public", "maven2-group", &["maven-releases"]),
            )
            .script_with("get-repo", &arg("maven-releases"), found("maven-releases", "maven2-hosted", &[]))
            .script("update-group-members", json!({"status": "200 OK"}));

        let result = client(&mock)
            .repositories()
            .remove_members("maven-public", "maven-releases")
            .await;
        assert!(matches!(result, Err(NexusError::Validation { .. })));
        assert!(mock.script_runs("update-group-members").is_empty());
    }

    #[tokio::test]
    async fn test_exists() {
        let mock = MockTransport::new()
            .script_with("get-repo", &arg("lib"), found("lib", "raw-hosted", &[]))
            .script_with("get-repo", &arg("ghost"), missing())
            .script_with("get-repo", &arg("broken"), json!({"status": "500 Internal Server Error"}));
        let nexus = client(&mock);
        let repos = nexus.repositories();

        assert!(repos.exists("lib").await.unwrap());
        assert!(!repos.exists("ghost").await.unwrap());
        assert!(matches!(repos.exists("broken").await, Err(NexusError::Server { .. })));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let mock = MockTransport::new().script("get-repo", missing());
        let result = client(&mock).repositories().get("ghost").await;
        assert!(matches!(result, Err(NexusError::NotFound { kind: "Repository", .. })));
    }

    #[tokio::test]
    async fn test_list_by_format() {
        let mock = MockTransport::new().route(
            Method::Get,
            "v1/repositories",
            Status::Ok,
            r#"[
                {"name":"maven-central","format":"maven2","type":"proxy","url":"http://nexus.local/repository/maven-central"},
                {"name":"nuget-hosted","format":"nuget","type":"hosted","url":"http://nexus.local/repository/nuget-hosted"},
                {"name":"maven-releases","format":"maven2","type":"hosted","url":"http://nexus.local/repository/maven-releases"}
            ]"#,
        );
        let nexus = client(&mock);
        let repos = nexus.repositories();

        assert_eq!(repos.list(None).await.unwrap().len(), 3);
        assert_eq!(
            repos.list(Some("maven")).await.unwrap(),
            vec!["maven-central", "maven-releases"]
        );
        assert!(repos.list(Some("helm")).await.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let mock = MockTransport::new()
            .script_with("delete-repo", &arg("lib"), json!({"status": "200 OK"}))
            .script_with("delete-repo", &arg("ghost"), missing());
        let nexus = client(&mock);

        assert_eq!(
            nexus.repositories().delete("lib").await.unwrap().outcome,
            Outcome::Deleted
        );
        assert_eq!(
            nexus.repositories().delete("ghost").await.unwrap().outcome,
            Outcome::NotFound
        );
        assert!(nexus.repositories().delete("").await.is_err());
    }
}
