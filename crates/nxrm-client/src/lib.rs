//! Nexus Repository Manager 3 client
//!
//! This crate manages a Nexus 3 server through server-side groovy scripts
//! run over the REST API:
//!
//! - **Repositories**: hosted, proxy and group repositories, group membership
//! - **Scripts**: upload, update, delete and bulk install of the groovy sources
//! - **Content selectors, privileges, roles**: list, create, update, delete
//!
//! ## Key Features
//!
//! - **Idempotent operations**: creates skip existing resources, updates and
//!   deletes report missing ones instead of failing
//! - **Validation first**: bad input is rejected before any request is sent
//! - **Pluggable transport**: reqwest in production, [`mock::MockTransport`] in tests
//!
//! ## Example
//!
//! ```rust,no_run
//! use nxrm_client::{ClientOptions, ConnectionConfig, NewRepository, NexusClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConnectionConfig::load()?;
//! let nexus = NexusClient::connect(&config, ClientOptions::default())?;
//!
//! let report = nexus
//!     .repositories()
//!     .create_hosted(&NewRepository {
//!         name: "lib".to_string(),
//!         format: "maven".to_string(),
//!         releases: true,
//!         ..NewRepository::default()
//!     })
//!     .await?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod privilege;
pub mod repository;
pub mod resource;
pub mod role;
pub mod script;
pub mod selector;
pub mod status;
pub mod transport;

// Re-exports for convenience
pub use client::NexusClient;
pub use config::{ClientOptions, ConnectionConfig};
pub use error::{NexusError, Result, VERBOSE_HINT};
pub use privilege::{Privilege, PrivilegeSpec, Privileges};
pub use repository::{
    MembershipChange, NewRepository, RepoKind, Repositories, Repository, RepositorySummary,
    SkippedMember,
};
pub use resource::{Exists, Outcome, Report, split_list};
pub use role::{Role, RoleAction, RoleSpec, Roles};
pub use script::{NEXUS_SCRIPTS, Script, ScriptResult, Scripts};
pub use selector::{ContentSelector, Selectors};
pub use status::Status;
pub use transport::{Body, HttpTransport, Method, Response, Transport};
