//! Role management
//!
//! Roles are identified by `id`. A role aggregates other roles (its members)
//! and privileges. Entries that do not resolve on the server are logged and
//! skipped rather than failing the whole request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::client::NexusClient;
use crate::error::{NexusError, Result};
use crate::resource::{Exists, NoArg, Outcome, Report, require, split_list};
use crate::status::Status;

pub const DEFAULT_ROLE_DESCRIPTION: &str = "Custom role created from the CLI";
pub const DEFAULT_ROLE_SOURCE: &str = "Nexus";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
    pub source: String,
    /// Member role ids
    pub roles: Vec<String>,
    /// Privilege names
    pub privileges: Vec<String>,
}

/// Caller input for create and update
#[derive(Debug, Clone, Default)]
pub struct RoleSpec {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Comma separated role ids
    pub members: String,
    /// Comma separated privilege names
    pub privileges: String,
    /// Required by update when members or privileges are given
    pub action: Option<RoleAction>,
}

/// How an update applies members and privileges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleAction {
    Add,
    Remove,
}

impl FromStr for RoleAction {
    type Err = NexusError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(RoleAction::Add),
            "remove" => Ok(RoleAction::Remove),
            other => Err(NexusError::validation(format!(
                "{:?} is not a valid action. Available actions are : [add remove]",
                other
            ))),
        }
    }
}

/// Apply `action` for `entries` to `current`, logging what is skipped
fn apply(
    current: &mut Vec<String>,
    entries: Vec<String>,
    action: RoleAction,
    what: &str,
    id: &str,
) {
    for entry in entries {
        let present = current.contains(&entry);
        match (action, present) {
            (RoleAction::Add, false) => {
                tracing::info!("{} {:?} is added to the role {:?}", what, entry, id);
                current.push(entry);
            }
            (RoleAction::Remove, true) => {
                tracing::info!("{} {:?} is removed from the role {:?}", what, entry, id);
                current.retain(|e| e != &entry);
            }
            (RoleAction::Add, true) => {
                tracing::warn!("{} {:?} already exists in the role {:?}", what, entry, id);
            }
            (RoleAction::Remove, false) => {
                tracing::warn!("{} {:?} was not found in the role {:?}", what, entry, id);
            }
        }
    }
}

/// Role management
pub struct Roles<'a> {
    client: &'a NexusClient,
}

impl NexusClient {
    pub fn roles(&self) -> Roles<'_> {
        Roles { client: self }
    }
}

impl Roles<'_> {
    pub async fn list(&self) -> Result<Vec<Role>> {
        let result = self.client.run_script_with("get-roles", &NoArg {}).await?;
        if result.status != Status::Ok {
            return Err(NexusError::server("getRoles"));
        }
        Ok(result.roles)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Role>> {
        Ok(self.list().await?.into_iter().find(|r| r.id == id))
    }

    pub async fn create(&self, spec: &RoleSpec) -> Result<Report> {
        require(&spec.id, "id is a required parameter")?;
        let members = split_list(&spec.members);
        let privileges = split_list(&spec.privileges);
        if members.is_empty() && privileges.is_empty() {
            return Err(NexusError::validation(
                "At least one member role or privilege is required to create a role",
            ));
        }

        let roles = self.list().await?;
        if roles.iter().any(|r| r.id == spec.id) {
            tracing::debug!("Role {:?} already exists", spec.id);
            return Ok(Report::new(Self::KIND, &spec.id, Outcome::AlreadyExists));
        }

        let members = self.valid_members(&spec.id, members, &roles);
        let privileges = self.valid_privileges(&spec.id, privileges).await?;
        if members.is_empty() && privileges.is_empty() {
            return Err(NexusError::validation(
                "At least one valid member role or privilege should be provided",
            ));
        }

        let role = Role {
            id: spec.id.clone(),
            name: if spec.name.is_empty() {
                spec.id.clone()
            } else {
                spec.name.clone()
            },
            description: if spec.description.is_empty() {
                DEFAULT_ROLE_DESCRIPTION.to_string()
            } else {
                spec.description.clone()
            },
            source: DEFAULT_ROLE_SOURCE.to_string(),
            roles: members,
            privileges,
        };
        self.run("create-role", "creating", &role).await?;
        Ok(Report::new(Self::KIND, &spec.id, Outcome::Created))
    }

    pub async fn update(&self, spec: &RoleSpec) -> Result<Report> {
        require(&spec.id, "id is a required parameter")?;
        let members = split_list(&spec.members);
        let privileges = split_list(&spec.privileges);
        let changes_entries = !members.is_empty() || !privileges.is_empty();
        if changes_entries && spec.action.is_none() {
            return Err(NexusError::validation(
                "action (add or remove) is required to update members or privileges of a role",
            ));
        }

        let roles = self.list().await?;
        let Some(mut role) = roles.iter().find(|r| r.id == spec.id).cloned() else {
            tracing::debug!("Role {:?} was not found", spec.id);
            return Ok(Report::new(Self::KIND, &spec.id, Outcome::NotFound));
        };

        if !spec.name.is_empty() {
            role.name = spec.name.clone();
        }
        if !spec.description.is_empty() {
            role.description = spec.description.clone();
        }
        if let Some(action) = spec.action.filter(|_| changes_entries) {
            // Stale entries must stay removable after the target is gone
            let (members, privileges) = match action {
                RoleAction::Add => (
                    self.valid_members(&spec.id, members, &roles),
                    self.valid_privileges(&spec.id, privileges).await?,
                ),
                RoleAction::Remove => (members, privileges),
            };
            apply(&mut role.roles, members, action, "Member", &spec.id);
            apply(&mut role.privileges, privileges, action, "Privilege", &spec.id);
        }

        self.run("update-role", "updating", &role).await?;
        Ok(Report::new(Self::KIND, &spec.id, Outcome::Updated))
    }

    pub async fn delete(&self, id: &str) -> Result<Report> {
        require(id, "id is a required parameter")?;
        let Some(role) = self.get(id).await? else {
            tracing::debug!("Role {:?} was not found", id);
            return Ok(Report::new(Self::KIND, id, Outcome::NotFound));
        };
        self.run("delete-role", "deleting", &role).await?;
        Ok(Report::new(Self::KIND, id, Outcome::Deleted))
    }

    /// Keep the candidates that are existing roles other than `id`
    fn valid_members(&self, id: &str, candidates: Vec<String>, roles: &[Role]) -> Vec<String> {
        let mut valid: Vec<String> = Vec::new();
        for candidate in candidates {
            if candidate == id {
                tracing::warn!("Role {:?} cannot be a member of itself, skipping", candidate);
            } else if !roles.iter().any(|r| r.id == candidate) {
                tracing::warn!("Role {:?} was not found in nexus, skipping", candidate);
            } else if !valid.contains(&candidate) {
                valid.push(candidate);
            }
        }
        valid
    }

    /// Keep the candidates that are existing privileges
    async fn valid_privileges(&self, id: &str, candidates: Vec<String>) -> Result<Vec<String>> {
        if candidates.is_empty() {
            return Ok(candidates);
        }
        let known = self.client.privileges().list().await?;
        let mut valid: Vec<String> = Vec::new();
        for candidate in candidates {
            if !known.iter().any(|p| p.name == candidate) {
                tracing::warn!(
                    "Privilege {:?} was not found in nexus, not adding it to the role {:?}",
                    candidate,
                    id
                );
            } else if !valid.contains(&candidate) {
                valid.push(candidate);
            }
        }
        Ok(valid)
    }

    async fn run(&self, script: &str, action: &'static str, role: &Role) -> Result<()> {
        let result = self.client.run_script_with(script, role).await?;
        if result.status == Status::Ok {
            Ok(())
        } else {
            Err(NexusError::OperationFailed {
                action,
                kind: Self::KIND,
                name: role.id.clone(),
            })
        }
    }
}

#[async_trait]
impl Exists for Roles<'_> {
    const KIND: &'static str = "Role";

    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }
}
