//! Content selector management

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::NexusClient;
use crate::error::{NexusError, Result};
use crate::resource::{Exists, NameArg, NoArg, Outcome, Report, require};
use crate::status::Status;

/// Selector type understood by Nexus
pub const SELECTOR_TYPE: &str = "csel";
pub const DEFAULT_SELECTOR_DESCRIPTION: &str = "Custom content-selector created from the CLI";

/// Content selector as exchanged with the selector scripts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSelector {
    pub name: String,
    #[serde(rename = "type")]
    pub selector_type: String,
    pub description: String,
    pub attributes: SelectorAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorAttributes {
    pub expression: String,
}

impl ContentSelector {
    /// A `csel` selector, with the default description when `description` is empty
    pub fn new(name: &str, description: &str, expression: &str) -> Self {
        Self {
            name: name.to_string(),
            selector_type: SELECTOR_TYPE.to_string(),
            description: if description.is_empty() {
                DEFAULT_SELECTOR_DESCRIPTION.to_string()
            } else {
                description.to_string()
            },
            attributes: SelectorAttributes {
                expression: expression.to_string(),
            },
        }
    }
}

/// Content selector management
pub struct Selectors<'a> {
    client: &'a NexusClient,
}

impl NexusClient {
    pub fn selectors(&self) -> Selectors<'_> {
        Selectors { client: self }
    }
}

impl Selectors<'_> {
    /// All content selectors
    pub async fn list(&self) -> Result<Vec<ContentSelector>> {
        let result = self.client.run_script_with("get-content-selectors", &NoArg {}).await?;
        if result.status != Status::Ok {
            return Err(NexusError::server("getContentSelectors"));
        }
        Ok(result.content_selectors)
    }

    /// Find one selector by name
    pub async fn get(&self, name: &str) -> Result<Option<ContentSelector>> {
        Ok(self.list().await?.into_iter().find(|s| s.name == name))
    }

    pub async fn create(&self, name: &str, description: &str, expression: &str) -> Result<Report> {
        if name.is_empty() || expression.is_empty() {
            return Err(NexusError::validation(
                "name and expression are required parameters to create a content selector",
            ));
        }
        if self.exists(name).await? {
            tracing::debug!("Content selector {:?} already exists", name);
            return Ok(Report::new(Self::KIND, name, Outcome::AlreadyExists));
        }

        let selector = ContentSelector::new(name, description, expression);
        self.run("create-content-selector", "creating", name, &selector)
            .await?;
        Ok(Report::new(Self::KIND, name, Outcome::Created))
    }

    /// Overlay the non-empty `description` and `expression` on an existing selector
    pub async fn update(&self, name: &str, description: &str, expression: &str) -> Result<Report> {
        require(name, "name is a required parameter")?;
        let Some(mut selector) = self.get(name).await? else {
            tracing::debug!("Content selector {:?} was not found", name);
            return Ok(Report::new(Self::KIND, name, Outcome::NotFound));
        };

        if !description.is_empty() {
            selector.description = description.to_string();
        }
        if !expression.is_empty() {
            selector.attributes.expression = expression.to_string();
        }
        self.run("update-content-selector", "updating", name, &selector)
            .await?;
        Ok(Report::new(Self::KIND, name, Outcome::Updated))
    }

    pub async fn delete(&self, name: &str) -> Result<Report> {
        require(name, "name is a required parameter")?;
        if !self.exists(name).await? {
            tracing::debug!("Content selector {:?} was not found", name);
            return Ok(Report::new(Self::KIND, name, Outcome::NotFound));
        }

        self.run("delete-content-selector", "deleting", name, &NameArg { name })
            .await?;
        Ok(Report::new(Self::KIND, name, Outcome::Deleted))
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
impl Exists for Selectors<'_> {
    const KIND: &'static str = "Content selector";

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.get(name).await?.is_some())
    }
}
