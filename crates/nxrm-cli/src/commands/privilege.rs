//! Privilege commands

use nxrm_client::{NexusClient, PrivilegeSpec};

use crate::display;
use crate::error::{CliError, Result};

/// List privileges, or show the one named
pub async fn list(nexus: &NexusClient, name: Option<&str>) -> Result<()> {
    let Some(name) = name else {
        let names: Vec<String> = nexus
            .privileges()
            .list()
            .await?
            .into_iter()
            .map(|p| p.name)
            .collect();
        display::names("Privileges", &names);
        return Ok(());
    };

    let privilege = nexus
        .privileges()
        .get(name)
        .await?
        .ok_or_else(|| CliError::NotFound {
            message: format!("Privilege {:?} was not found in nexus", name),
        })?;
    display::header(&privilege.name);
    display::field("Type", &privilege.privilege_type);
    display::field("Description", &privilege.description);
    display::field("Selector", &privilege.attributes.content_selector);
    display::field("Repository", &privilege.attributes.repository);
    display::field("Actions", privilege.attributes.actions.join(", "));
    Ok(())
}

pub async fn create(nexus: &NexusClient, spec: PrivilegeSpec) -> Result<()> {
    display::report(&nexus.privileges().create(&spec).await?);
    Ok(())
}

pub async fn update(nexus: &NexusClient, spec: PrivilegeSpec) -> Result<()> {
    display::report(&nexus.privileges().update(&spec).await?);
    Ok(())
}

pub async fn delete(nexus: &NexusClient, name: &str) -> Result<()> {
    display::report(&nexus.privileges().delete(name).await?);
    Ok(())
}
