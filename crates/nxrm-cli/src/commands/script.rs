//! Script management commands

use nxrm_client::NexusClient;

use crate::display;
use crate::error::Result;

/// List installed scripts, or show the one named
pub async fn list(nexus: &NexusClient, name: Option<&str>) -> Result<()> {
    if let Some(name) = name {
        let script = nexus.scripts().get(name).await?;
        display::header(&script.name);
        display::field("Type", &script.script_type);
        println!();
        println!("{}", script.content);
        return Ok(());
    }

    let names = nexus.scripts().list().await?;
    display::names("Scripts", &names);
    Ok(())
}

pub async fn add(nexus: &NexusClient, name: &str) -> Result<()> {
    display::report(&nexus.scripts().add(name).await?);
    Ok(())
}

pub async fn update(nexus: &NexusClient, name: &str) -> Result<()> {
    display::report(&nexus.scripts().update(name).await?);
    Ok(())
}

pub async fn delete(nexus: &NexusClient, name: &str) -> Result<()> {
    display::report(&nexus.scripts().delete(name).await?);
    Ok(())
}

/// Install or refresh all scripts, stopping at the first failure
pub async fn init(nexus: &NexusClient) -> Result<()> {
    for report in nexus.scripts().init().await? {
        display::report(&report);
    }
    Ok(())
}
