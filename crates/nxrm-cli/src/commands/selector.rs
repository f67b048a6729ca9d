//! Content selector commands

use nxrm_client::NexusClient;

use crate::display;
use crate::error::{CliError, Result};

/// List content selectors, or show the one named
pub async fn list(nexus: &NexusClient, name: Option<&str>) -> Result<()> {
    let selectors = nexus.selectors().list().await?;
    match name {
        Some(name) => {
            let selector = selectors
                .into_iter()
                .find(|s| s.name == name)
                .ok_or_else(|| CliError::NotFound {
                    message: format!("Content selector {:?} was not found in nexus", name),
                })?;
            display::header(&selector.name);
            display::field("Description", &selector.description);
            display::field("Expression", &selector.attributes.expression);
        }
        None => {
            let names: Vec<String> = selectors.into_iter().map(|s| s.name).collect();
            display::names("Content selectors", &names);
        }
    }
    Ok(())
}

pub async fn create(
    nexus: &NexusClient,
    name: &str,
    description: &str,
    expression: &str,
) -> Result<()> {
    let report = nexus.selectors().create(name, description, expression).await?;
    display::report(&report);
    Ok(())
}

pub async fn update(
    nexus: &NexusClient,
    name: &str,
    description: &str,
    expression: &str,
) -> Result<()> {
    let report = nexus.selectors().update(name, description, expression).await?;
    display::report(&report);
    Ok(())
}

pub async fn delete(nexus: &NexusClient, name: &str) -> Result<()> {
    display::report(&nexus.selectors().delete(name).await?);
    Ok(())
}
