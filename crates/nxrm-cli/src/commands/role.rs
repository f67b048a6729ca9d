//! Role commands

use nxrm_client::{NexusClient, RoleAction, RoleSpec};

use crate::display;
use crate::error::{CliError, Result};

/// List roles, or show the one with `id`
pub async fn list(nexus: &NexusClient, id: Option<&str>) -> Result<()> {
    let Some(id) = id else {
        let ids: Vec<String> = nexus
            .roles()
            .list()
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();
        display::names("Roles", &ids);
        return Ok(());
    };

    let role = nexus
        .roles()
        .get(id)
        .await?
        .ok_or_else(|| CliError::NotFound {
            message: format!("Role {:?} was not found in nexus", id),
        })?;
    display::header(&role.id);
    display::field("Name", &role.name);
    display::field("Description", &role.description);
    display::field("Source", &role.source);
    display::field("Members", role.roles.join(", "));
    display::field("Privileges", role.privileges.join(", "));
    Ok(())
}

pub async fn create(nexus: &NexusClient, spec: RoleSpec) -> Result<()> {
    display::report(&nexus.roles().create(&spec).await?);
    Ok(())
}

pub async fn update(nexus: &NexusClient, spec: RoleSpec, action: Option<&str>) -> Result<()> {
    let action = action.map(str::parse::<RoleAction>).transpose()?;
    let spec = RoleSpec { action, ..spec };
    display::report(&nexus.roles().update(&spec).await?);
    Ok(())
}

pub async fn delete(nexus: &NexusClient, id: &str) -> Result<()> {
    display::report(&nexus.roles().delete(id).await?);
    Ok(())
}
