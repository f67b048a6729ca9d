//! CLI commands

use nxrm_client::{ClientOptions, ConnectionConfig, NexusClient};
use std::path::PathBuf;

use crate::error::Result;

pub mod configure;
pub mod privilege;
pub mod repo;
pub mod role;
pub mod script;
pub mod selector;

/// Settings resolved from the global flags
pub struct Context {
    pub config_path: PathBuf,
    pub options: ClientOptions,
}

impl Context {
    /// Build a client from the saved connection details
    pub fn client(&self) -> Result<NexusClient> {
        let config = ConnectionConfig::load_from(&self.config_path)?;
        tracing::debug!(
            "Using {} from {}",
            config.nexus_url,
            self.config_path.display()
        );
        Ok(NexusClient::connect(&config, self.options.clone())?)
    }
}
