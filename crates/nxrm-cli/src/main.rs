//! nxrm - manage Nexus Repository Manager 3 through server-side scripts

use clap::{Args, Parser, Subcommand};
use nxrm_client::ClientOptions;
use nxrm_client::config::{CONFIG_FILE_NAME, DEFAULT_SCRIPTS_DIR};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod error;
mod exit_codes;

use commands::Context;
use error::Result;

#[derive(Parser)]
#[command(name = "nxrm")]
#[command(version)]
#[command(
    about = "Manage Nexus 3 repositories, scripts, content selectors, privileges and roles",
    long_about = None
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Dump HTTP requests and responses
    #[arg(long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Accept invalid TLS certificates from the server
    #[arg(long = "skip-tls", global = true)]
    skip_tls: bool,

    /// Connection configuration file
    #[arg(long, global = true, env = "NXRM_CONFIG", default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Directory holding the groovy script sources
    #[arg(long, global = true, default_value = DEFAULT_SCRIPTS_DIR)]
    scripts_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Save the server URL and credentials
    Configure {
        /// Nexus base URL, e.g. http://localhost:8081
        #[arg(long)]
        url: Option<String>,

        /// Admin user name
        #[arg(long)]
        username: Option<String>,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Manage repositories
    Repo {
        #[command(subcommand)]
        command: RepoCommands,
    },

    /// Manage the groovy scripts installed on the server
    Script {
        #[command(subcommand)]
        command: ScriptCommands,
    },

    /// Manage content selectors
    Selector {
        #[command(subcommand)]
        command: SelectorCommands,
    },

    /// Manage content selector privileges
    Privilege {
        #[command(subcommand)]
        command: PrivilegeCommands,
    },

    /// Manage roles
    Role {
        #[command(subcommand)]
        command: RoleCommands,
    },
}

#[derive(Subcommand)]
enum RepoCommands {
    /// List repositories, or show one repository
    List {
        /// Show only this repository
        #[arg(long)]
        name: Option<String>,

        /// Only list repositories of this format
        #[arg(long)]
        format: Option<String>,
    },

    /// Create a repository
    Create {
        #[command(subcommand)]
        kind: CreateCommands,
    },

    /// Add members to a group repository
    AddMembers {
        /// Group repository name
        #[arg(long, default_value = "")]
        name: String,

        /// Comma separated member repositories
        #[arg(long, default_value = "")]
        members: String,
    },

    /// Remove members from a group repository
    RemoveMembers {
        /// Group repository name
        #[arg(long, default_value = "")]
        name: String,

        /// Comma separated member repositories
        #[arg(long, default_value = "")]
        members: String,
    },

    /// Delete a repository
    Delete {
        #[arg(long, default_value = "")]
        name: String,
    },
}

/// Options shared by every repository kind
#[derive(Args)]
struct RepoArgs {
    /// Repository name
    #[arg(long, default_value = "")]
    name: String,

    /// Repository format
    #[arg(long, default_value = "")]
    format: String,

    /// Blob store (defaults to "default")
    #[arg(long, default_value = "")]
    blob_store: String,

    /// Release policy instead of snapshot
    #[arg(long)]
    releases: bool,

    /// Docker HTTP connector port
    #[arg(long, default_value_t = 0)]
    docker_http_port: u16,

    /// Docker HTTPS connector port
    #[arg(long, default_value_t = 0)]
    docker_https_port: u16,
}

#[derive(Subcommand)]
enum CreateCommands {
    /// Create a hosted repository
    Hosted {
        #[command(flatten)]
        repo: RepoArgs,
    },

    /// Create a proxy repository
    Proxy {
        #[command(flatten)]
        repo: RepoArgs,

        /// Remote URL to proxy (http:// or https://)
        #[arg(long, default_value = "")]
        remote_url: String,

        /// User name for the remote
        #[arg(long, default_value = "")]
        proxy_user: String,

        /// Password for the remote
        #[arg(long, default_value = "")]
        proxy_pass: String,
    },

    /// Create a group repository
    Group {
        #[command(flatten)]
        repo: RepoArgs,

        /// Comma separated member repositories
        #[arg(long, default_value = "")]
        members: String,
    },
}

#[derive(Subcommand)]
enum ScriptCommands {
    /// List installed scripts, or show one script
    List {
        #[arg(long)]
        name: Option<String>,
    },

    /// Upload a script from the scripts directory
    Add {
        #[arg(long, default_value = "")]
        name: String,
    },

    /// Replace an installed script with its local source
    Update {
        #[arg(long, default_value = "")]
        name: String,
    },

    /// Delete an installed script
    Delete {
        #[arg(long, default_value = "")]
        name: String,
    },

    /// Install or refresh every script this client needs
    Init,
}

#[derive(Subcommand)]
enum SelectorCommands {
    /// List content selectors, or show one
    List {
        #[arg(long)]
        name: Option<String>,
    },

    /// Create a content selector
    Create {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// CSEL expression, e.g. format == "maven2"
        #[arg(long, default_value = "")]
        expression: String,
    },

    /// Update the description and/or expression of a content selector
    Update {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        expression: String,
    },

    /// Delete a content selector
    Delete {
        #[arg(long, default_value = "")]
        name: String,
    },
}

/// Options of privilege create and update
#[derive(Args)]
struct PrivilegeArgs {
    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    description: String,

    /// Content selector name
    #[arg(long, default_value = "")]
    selector: String,

    /// Repository name
    #[arg(long = "repo", default_value = "")]
    repository: String,

    /// Comma separated actions: read, write
    #[arg(long, default_value = "")]
    actions: String,
}

#[derive(Subcommand)]
enum PrivilegeCommands {
    /// List privileges, or show one
    List {
        #[arg(long)]
        name: Option<String>,
    },

    /// Create a content selector privilege
    Create(PrivilegeArgs),

    /// Update a content selector privilege
    Update(PrivilegeArgs),

    /// Delete a privilege
    Delete {
        #[arg(long, default_value = "")]
        name: String,
    },
}

/// Options of role create and update
#[derive(Args)]
struct RoleArgs {
    #[arg(long, default_value = "")]
    id: String,

    /// Display name (defaults to the id)
    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    description: String,

    /// Comma separated member role ids
    #[arg(long, default_value = "")]
    members: String,

    /// Comma separated privilege names
    #[arg(long, default_value = "")]
    privileges: String,
}

#[derive(Subcommand)]
enum RoleCommands {
    /// List roles, or show one
    List {
        #[arg(long)]
        id: Option<String>,
    },

    /// Create a role
    Create(RoleArgs),

    /// Update a role
    Update {
        #[command(flatten)]
        role: RoleArgs,

        /// How members and privileges are applied: add or remove
        #[arg(long)]
        action: Option<String>,
    },

    /// Delete a role
    Delete {
        #[arg(long, default_value = "")]
        id: String,
    },
}

/// Terminal filter: RUST_LOG > --verbose > --debug > default "info"
fn init_tracing(verbose: bool, debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose {
            "trace"
        } else if debug {
            "debug"
        } else {
            "info"
        };
        EnvFilter::new(format!(
            "warn,nxrm={level},nxrm_client={level}",
            level = level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.debug);

    let code = match run(cli).await {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = Context {
        config_path: cli.config,
        options: ClientOptions {
            verbose: cli.verbose,
            debug: cli.debug,
            skip_tls_verification: cli.skip_tls,
            scripts_dir: cli.scripts_dir,
        },
    };

    match cli.command {
        Commands::Configure {
            url,
            username,
            password,
        } => commands::configure::run(&ctx, url, username, password),

        Commands::Repo { command } => {
            let nexus = ctx.client()?;
            match command {
                RepoCommands::List { name, format } => {
                    commands::repo::list(&nexus, name.as_deref(), format.as_deref()).await
                }
                RepoCommands::Create { kind } => match kind {
                    CreateCommands::Hosted { repo } => {
                        commands::repo::create_hosted(&nexus, repo.into_new()).await
                    }
                    CreateCommands::Proxy {
                        repo,
                        remote_url,
                        proxy_user,
                        proxy_pass,
                    } => {
                        let spec = nxrm_client::NewRepository {
                            remote_url,
                            proxy_username: proxy_user,
                            proxy_password: proxy_pass,
                            ..repo.into_new()
                        };
                        commands::repo::create_proxy(&nexus, spec).await
                    }
                    CreateCommands::Group { repo, members } => {
                        let spec = nxrm_client::NewRepository {
                            members,
                            ..repo.into_new()
                        };
                        commands::repo::create_group(&nexus, spec).await
                    }
                },
                RepoCommands::AddMembers { name, members } => {
                    commands::repo::add_members(&nexus, &name, &members).await
                }
                RepoCommands::RemoveMembers { name, members } => {
                    commands::repo::remove_members(&nexus, &name, &members).await
                }
                RepoCommands::Delete { name } => commands::repo::delete(&nexus, &name).await,
            }
        }

        Commands::Script { command } => {
            let nexus = ctx.client()?;
            match command {
                ScriptCommands::List { name } => {
                    commands::script::list(&nexus, name.as_deref()).await
                }
                ScriptCommands::Add { name } => commands::script::add(&nexus, &name).await,
                ScriptCommands::Update { name } => commands::script::update(&nexus, &name).await,
                ScriptCommands::Delete { name } => commands::script::delete(&nexus, &name).await,
                ScriptCommands::Init => commands::script::init(&nexus).await,
            }
        }

        Commands::Selector { command } => {
            let nexus = ctx.client()?;
            match command {
                SelectorCommands::List { name } => {
                    commands::selector::list(&nexus, name.as_deref()).await
                }
                SelectorCommands::Create {
                    name,
                    description,
                    expression,
                } => commands::selector::create(&nexus, &name, &description, &expression).await,
                SelectorCommands::Update {
                    name,
                    description,
                    expression,
                } => commands::selector::update(&nexus, &name, &description, &expression).await,
                SelectorCommands::Delete { name } => {
                    commands::selector::delete(&nexus, &name).await
                }
            }
        }

        Commands::Privilege { command } => {
            let nexus = ctx.client()?;
            match command {
                PrivilegeCommands::List { name } => {
                    commands::privilege::list(&nexus, name.as_deref()).await
                }
                PrivilegeCommands::Create(args) => {
                    commands::privilege::create(&nexus, args.into_spec()).await
                }
                PrivilegeCommands::Update(args) => {
                    commands::privilege::update(&nexus, args.into_spec()).await
                }
                PrivilegeCommands::Delete { name } => {
                    commands::privilege::delete(&nexus, &name).await
                }
            }
        }

        Commands::Role { command } => {
            let nexus = ctx.client()?;
            match command {
                RoleCommands::List { id } => commands::role::list(&nexus, id.as_deref()).await,
                RoleCommands::Create(args) => commands::role::create(&nexus, args.into_spec()).await,
                RoleCommands::Update { role, action } => {
                    commands::role::update(&nexus, role.into_spec(), action.as_deref()).await
                }
                RoleCommands::Delete { id } => commands::role::delete(&nexus, &id).await,
            }
        }
    }
}

impl RepoArgs {
    fn into_new(self) -> nxrm_client::NewRepository {
        nxrm_client::NewRepository {
            name: self.name,
            format: self.format,
            blob_store_name: self.blob_store,
            releases: self.releases,
            docker_http_port: self.docker_http_port,
            docker_https_port: self.docker_https_port,
            ..Default::default()
        }
    }
}

impl PrivilegeArgs {
    fn into_spec(self) -> nxrm_client::PrivilegeSpec {
        nxrm_client::PrivilegeSpec {
            name: self.name,
            description: self.description,
            selector: self.selector,
            repository: self.repository,
            actions: self.actions,
        }
    }
}

impl RoleArgs {
    fn into_spec(self) -> nxrm_client::RoleSpec {
        nxrm_client::RoleSpec {
            id: self.id,
            name: self.name,
            description: self.description,
            members: self.members,
            privileges: self.privileges,
            action: None,
        }
    }
}
