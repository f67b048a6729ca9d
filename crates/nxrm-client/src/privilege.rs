//! Repository content selector privileges
//!
//! A privilege grants `read` and/or `write` on the content of one repository
//! matched by one content selector. Both must exist before the privilege is
//! created or pointed at them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::NexusClient;
use crate::error::{NexusError, Result};
use crate::resource::{Exists, NameArg, NoArg, Outcome, Report, require, split_list};
use crate::status::Status;

pub const PRIVILEGE_TYPE: &str = "repository-content-selector";
pub const DEFAULT_PRIVILEGE_DESCRIPTION: &str = "Custom privilege created from the CLI";
/// Actions a content selector privilege may grant
pub const PRIVILEGE_ACTIONS: &[&str] = &["read", "write"];
const DEFAULT_ACTION: &str = "read";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Privilege {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub privilege_type: String,
    pub attributes: PrivilegeAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrivilegeAttributes {
    pub content_selector: String,
    pub repository: String,
    pub actions: Vec<String>,
}

/// Caller input for create and update
///
/// Empty fields mean "default" on create and "keep" on update.
#[derive(Debug, Clone, Default)]
pub struct PrivilegeSpec {
    pub name: String,
    pub description: String,
    pub selector: String,
    pub repository: String,
    /// Comma separated
    pub actions: String,
}

/// Parse a comma separated action list, `None` when it is empty
pub fn parse_actions(actions: &str) -> Result<Option<Vec<String>>> {
    let mut parsed: Vec<String> = Vec::new();
    for action in split_list(actions) {
        let action = action.to_lowercase();
        if !PRIVILEGE_ACTIONS.contains(&action.as_str()) {
            return Err(NexusError::validation(format!(
                "{:?} is not a valid privilege action. Available actions are : [{}]",
                action,
                PRIVILEGE_ACTIONS.join(" ")
            )));
        }
        if !parsed.contains(&action) {
            parsed.push(action);
        }
    }
    Ok((!parsed.is_empty()).then_some(parsed))
}

/// Privilege management
pub struct Privileges<'a> {
    client: &'a NexusClient,
}

impl NexusClient {
    pub fn privileges(&self) -> Privileges<'_> {
        Privileges { client: self }
    }
}

impl Privileges<'_> {
    pub async fn list(&self) -> Result<Vec<Privilege>> {
        let result = self.client.run_script_with("get-privileges", &NoArg {}).await?;
        if result.status != Status::Ok {
            return Err(NexusError::server("getPrivileges"));
        }
        Ok(result.privileges)
    }

    pub async fn get(&self, name: &str) -> Result<Option<Privilege>> {
        Ok(self.list().await?.into_iter().find(|p| p.name == name))
    }

    pub async fn create(&self, spec: &PrivilegeSpec) -> Result<Report> {
        if spec.name.is_empty() || spec.selector.is_empty() || spec.repository.is_empty() {
            return Err(NexusError::validation(
                "name, selector and repository are required parameters to create a privilege",
            ));
        }
        let actions = parse_actions(&spec.actions)?
            .unwrap_or_else(|| vec![DEFAULT_ACTION.to_string()]);

        if self.exists(&spec.name).await? {
            tracing::debug!("Privilege {:?} already exists", spec.name);
            return Ok(Report::new(Self::KIND, &spec.name, Outcome::AlreadyExists));
        }
        self.check_targets(&spec.selector, &spec.repository).await?;

        let privilege = Privilege {
            name: spec.name.clone(),
            description: if spec.description.is_empty() {
                DEFAULT_PRIVILEGE_DESCRIPTION.to_string()
            } else {
                spec.description.clone()
            },
            privilege_type: PRIVILEGE_TYPE.to_string(),
            attributes: PrivilegeAttributes {
                content_selector: spec.selector.clone(),
                repository: spec.repository.clone(),
                actions,
            },
        };
        self.run("create-privilege", "creating", &spec.name, &privilege)
            .await?;
        Ok(Report::new(Self::KIND, &spec.name, Outcome::Created))
    }

    /// Overlay the non-empty fields of `spec` on an existing privilege
    pub async fn update(&self, spec: &PrivilegeSpec) -> Result<Report> {
        require(&spec.name, "name is a required parameter")?;
        let actions = parse_actions(&spec.actions)?;

        let Some(mut privilege) = self.get(&spec.name).await? else {
            tracing::debug!("Privilege {:?} was not found", spec.name);
            return Ok(Report::new(Self::KIND, &spec.name, Outcome::NotFound));
        };

        if !spec.description.is_empty() {
            privilege.description = spec.description.clone();
        }
        if let Some(actions) = actions {
            privilege.attributes.actions = actions;
        }
        if !spec.selector.is_empty() {
            privilege.attributes.content_selector = spec.selector.clone();
        }
        if !spec.repository.is_empty() {
            privilege.attributes.repository = spec.repository.clone();
        }
        if !spec.selector.is_empty() || !spec.repository.is_empty() {
            self.check_targets(
                &privilege.attributes.content_selector,
                &privilege.attributes.repository,
            )
            .await?;
        }

        self.run("update-privilege", "updating", &spec.name, &privilege)
            .await?;
        Ok(Report::new(Self::KIND, &spec.name, Outcome::Updated))
    }

    pub async fn delete(&self, name: &str) -> Result<Report> {
        require(name, "name is a required parameter")?;
        if !self.exists(name).await? {
            tracing::debug!("Privilege {:?} was not found", name);
            return Ok(Report::new(Self::KIND, name, Outcome::NotFound));
        }
        self.run("delete-privilege", "deleting", name, &NameArg { name })
            .await?;
        Ok(Report::new(Self::KIND, name, Outcome::Deleted))
    }

    /// The selector and the repository a privilege points at must both exist
    async fn check_targets(&self, selector: &str, repository: &str) -> Result<()> {
        let selectors = self.client.selectors();
        if !selectors.exists(selector).await? {
            return Err(NexusError::NotFound {
                kind: "Content selector",
                name: selector.to_string(),
            });
        }
        let repositories = self.client.repositories();
        if !repositories.exists(repository).await? {
            return Err(NexusError::NotFound {
                kind: "Repository",
                name: repository.to_string(),
            });
        }
        Ok(())
    }

    async fn run<T: Serialize>(
        &self,
        script: &str,
        action: &'static str,
        name: &str,
        arg: &T,
    ) -> Result<()> {
        let result = self.client.run_script_with(script, arg).await?;
        if result.status == Status::Ok {
            Ok(())
        } else {
            Err(NexusError::OperationFailed {
                action,
                kind: Self::KIND,
                name: name.to_string(),
            })
        }
    }
}

#[async_trait]
impl Exists for Privileges<'_> {
    const KIND: &'static str = "Privilege";

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.get(name).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientOptions;
    use crate::mock::MockTransport;
    use serde_json::json;

    fn client(mock: &MockTransport) -> NexusClient {
        NexusClient::new(
            "http://nexus.local",
            Box::new(mock.clone()),
            ClientOptions::default(),
        )
    }

    fn server() -> MockTransport {
        MockTransport::new()
            .script(
                "get-privileges",
                json!({
                    "status": "200 OK",
                    "privileges": [{
                        "name": "maven-read",
                        "description": "read maven",
                        "type": "repository-content-selector",
                        "attributes": {
                            "contentSelector": "maven-only",
                            "repository": "maven-releases",
                            "actions": ["read"]
                        }
                    }]
                }),
            )
            .script(
                "get-content-selectors",
                json!({"status": "200 OK", "contentSelectors": [{"name": "maven-only"}]}),
            )
            .script_with(
                "get-repo",
                r#""name":"maven-releases""#,
                json!({"status": "200 OK", "name": "maven-releases", "recipe": "maven2-hosted"}),
            )
            .script("get-repo", json!({"status": "404 Not Found"}))
    }

    fn spec(name: &str) -> PrivilegeSpec {
        PrivilegeSpec {
            name: name.to_string(),
            selector: "maven-only".to_string(),
            repository: "maven-releases".to_string(),
            ..PrivilegeSpec::default()
        }
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(parse_actions("").unwrap(), None);
        assert_eq!(
            parse_actions("read, WRITE,read").unwrap(),
            Some(vec!["read".to_string(), "write".to_string()])
        );
        assert!(parse_actions("read,delete").is_err());
    }

    #[tokio::test]
    async fn test_list() {
        let mock = server();
        let privileges = client(&mock).privileges().list().await.unwrap();
        assert_eq!(privileges.len(), 1);
        assert_eq!(privileges[0].attributes.content_selector, "maven-only");
        assert_eq!(mock.script_runs("get-privileges")[0].body_json(), json!({}));
    }

    #[tokio::test]
    async fn test_create_with_defaults() {
        let mock = server().script("create-privilege", json!({"status": "200 OK"}));
        let report = client(&mock).privileges().create(&spec("maven-write")).await.unwrap();
        assert_eq!(report.outcome, Outcome::Created);

        let payload = mock.script_runs("create-privilege")[0].body_json();
        assert_eq!(payload["type"], PRIVILEGE_TYPE);
        assert_eq!(payload["description"], DEFAULT_PRIVILEGE_DESCRIPTION);
        assert_eq!(payload["attributes"]["contentSelector"], "maven-only");
        assert_eq!(payload["attributes"]["actions"], json!(["read"]));
    }

    #[tokio::test]
    async fn test_create_existing() {
        let mock = server();
        let report = client(&mock).privileges().create(&spec("maven-read")).await.unwrap();
        assert_eq!(report.outcome, Outcome::AlreadyExists);
        assert!(mock.script_runs("create-privilege").is_empty());
    }

    #[tokio::test]
    async fn test_create_invalid_action_sends_nothing() {
        let mock = server();
        let privilege = PrivilegeSpec {
            actions: "browse".to_string(),
            ..spec("maven-browse")
        };
        let result = client(&mock).privileges().create(&privilege).await;
        assert!(matches!(result, Err(NexusError::Validation { .. })));
        assert!(mock.is_untouched());
    }

    #[tokio::test]
    async fn test_create_unknown_repository() {
        let mock = server().script("create-privilege", json!({"status": "200 OK"}));
        let privilege = PrivilegeSpec {
            repository: "ghost".to_string(),
            ..spec("ghost-read")
        };
        let result = client(&mock).privileges().create(&privilege).await;
        assert!(matches!(result, Err(NexusError::NotFound { kind: "Repository", .. })));
        assert!(mock.script_runs("create-privilege").is_empty());
    }

    #[tokio::test]
    async fn test_update_overlays_actions() {
        let mock = server().script("update-privilege", json!({"status": "200 OK"}));
        let update = PrivilegeSpec {
            name: "maven-read".to_string(),
            actions: "read,write".to_string(),
            ..PrivilegeSpec::default()
        };
        let report = client(&mock).privileges().update(&update).await.unwrap();
        assert_eq!(report.outcome, Outcome::Updated);

        let payload = mock.script_runs("update-privilege")[0].body_json();
        assert_eq!(payload["description"], "read maven");
        assert_eq!(payload["attributes"]["repository"], "maven-releases");
        assert_eq!(payload["attributes"]["actions"], json!(["read", "write"]));
        // Targets are unchanged, so they are not looked up again
        assert!(mock.script_runs("get-repo").is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let mock = server();
        let nexus = client(&mock);
        let update = PrivilegeSpec {
            name: "ghost".to_string(),
            description: "x".to_string(),
            ..PrivilegeSpec::default()
        };
        assert_eq!(
            nexus.privileges().update(&update).await.unwrap().outcome,
            Outcome::NotFound
        );
        assert_eq!(
            nexus.privileges().delete("ghost").await.unwrap().outcome,
            Outcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let mock = server().script("delete-privilege", json!({"status": "200 OK"}));
        let report = client(&mock).privileges().delete("maven-read").await.unwrap();
        assert_eq!(report.outcome, Outcome::Deleted);
    }
}
