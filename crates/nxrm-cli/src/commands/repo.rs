//! Repository management commands

use nxrm_client::{MembershipChange, NewRepository, NexusClient};

use crate::display;
use crate::error::Result;

/// List repositories, or show the one named
pub async fn list(nexus: &NexusClient, name: Option<&str>, format: Option<&str>) -> Result<()> {
    if let Some(name) = name {
        let repo = nexus.repositories().get(name).await?;
        display::header(&repo.name);
        display::field("Recipe", &repo.recipe);
        display::field("URL", &repo.url);
        if repo.is_group() {
            display::field("Members", repo.member_names().join(", "));
        }
        return Ok(());
    }

    let names = nexus.repositories().list(format).await?;
    let title = match format {
        Some(format) if !format.is_empty() => format!("{} repositories", format),
        _ => "Repositories".to_string(),
    };
    display::names(&title, &names);
    Ok(())
}

pub async fn create_hosted(nexus: &NexusClient, spec: NewRepository) -> Result<()> {
    let report = nexus.repositories().create_hosted(&spec).await?;
    display::report(&report);
    Ok(())
}

pub async fn create_proxy(nexus: &NexusClient, spec: NewRepository) -> Result<()> {
    let report = nexus.repositories().create_proxy(&spec).await?;
    display::report(&report);
    Ok(())
}

pub async fn create_group(nexus: &NexusClient, spec: NewRepository) -> Result<()> {
    let report = nexus.repositories().create_group(&spec).await?;
    display::report(&report);
    Ok(())
}

pub async fn add_members(nexus: &NexusClient, name: &str, members: &str) -> Result<()> {
    let change = nexus.repositories().add_members(name, members).await?;
    show_change(&change);
    Ok(())
}

pub async fn remove_members(nexus: &NexusClient, name: &str, members: &str) -> Result<()> {
    let change = nexus.repositories().remove_members(name, members).await?;
    show_change(&change);
    Ok(())
}

pub async fn delete(nexus: &NexusClient, name: &str) -> Result<()> {
    let report = nexus.repositories().delete(name).await?;
    display::report(&report);
    Ok(())
}

fn show_change(change: &MembershipChange) {
    display::report(&change.report);
    display::skipped(&change.skipped);
    if change.report.changed() {
        display::field("Members", change.members.join(", "));
    }
}
