//! Connection configuration
//!
//! Stores the server URL and credentials in `./nexus3-repository-cli.json`,
//! the only state this client keeps between invocations.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{NexusError, Result};

/// Default configuration file name, relative to the working directory
pub const CONFIG_FILE_NAME: &str = "nexus3-repository-cli.json";

/// Default directory holding the groovy sources of the server scripts
pub const DEFAULT_SCRIPTS_DIR: &str = "./scripts/groovy";

/// Persisted connection details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL of the Nexus server (without `/service/rest`)
    #[serde(rename = "NexusURL")]
    pub nexus_url: String,

    #[serde(rename = "Username")]
    pub username: String,

    #[serde(rename = "Password")]
    pub password: String,
}

impl ConnectionConfig {
    /// Create a configuration, validating the server URL
    pub fn new(
        nexus_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let config = Self {
            nexus_url: nexus_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the server URL is an absolute http(s) URL
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.nexus_url).map_err(|e| NexusError::InvalidServerUrl {
            url: self.nexus_url.clone(),
            reason: e.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(NexusError::InvalidServerUrl {
                url: self.nexus_url.clone(),
                reason: format!("unsupported scheme {}", scheme),
            }),
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from a specific path
    ///
    /// A missing file is reported as [`NexusError::ConfigMissing`].
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(NexusError::ConfigMissing);
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| NexusError::InvalidConfig {
            message: format!("{}: {}", path.display(), e),
        })?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::default_path();
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(self)?;

        // The file holds a password
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut options = std::fs::OpenOptions::new();
            options.write(true).create(true).truncate(true).mode(0o600);
            std::io::Write::write_all(&mut options.open(path)?, content.as_bytes())?;
            Ok(())
        }

        #[cfg(not(unix))]
        {
            std::fs::write(path, content)?;
            Ok(())
        }
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        PathBuf::from(".").join(CONFIG_FILE_NAME)
    }
}

/// Process-wide switches, set once at startup
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Dump HTTP requests and responses
    pub verbose: bool,
    /// Report successful script runs and uploads
    pub debug: bool,
    /// Accept invalid TLS certificates
    pub skip_tls_verification: bool,
    /// Where `script add/update/init` read groovy sources from
    pub scripts_dir: PathBuf,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            debug: false,
            skip_tls_verification: false,
            scripts_dir: PathBuf::from(DEFAULT_SCRIPTS_DIR),
        }
    }
}

impl ClientOptions {
    /// Whether successful script runs and uploads are logged.
    /// Only `debug` turns this on; `verbose` is limited to traffic dumps.
    pub fn reports_success(&self) -> bool {
        self.debug
    }
}
