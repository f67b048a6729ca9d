//! Save the connection details

use console::style;
use nxrm_client::ConnectionConfig;
use std::io::{self, BufRead, Write};

use crate::commands::Context;
use crate::error::{CliError, Result};

pub fn run(
    ctx: &Context,
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let url = match url {
        Some(url) => url,
        None => prompt("Nexus URL: ")?,
    };
    let username = match username {
        Some(username) => username,
        None => prompt("Username: ")?,
    };
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")?,
    };
    if username.is_empty() {
        return Err(CliError::input("username is a required parameter"));
    }

    let config = ConnectionConfig::new(url, username, password)?;
    config.save_to(&ctx.config_path)?;

    println!(
        "{} Connection details for {} saved to {}",
        style("✓").green().bold(),
        style(&config.nexus_url).cyan(),
        ctx.config_path.display()
    );
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
