//! Fusionaly Installer
//!
//! Admin account management for a self-hosted Fusionaly deployment.

mod installer;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::installer::admin::{AdminManager, DEFAULT_CTL_PATH};
use crate::installer::executor::SystemExecutor;
use crate::installer::{command_exists, generate_password, is_root};

const CTL_PATH_ENV: &str = "FUSIONALY_CTL_PATH";
const GENERATED_PASSWORD_LEN: usize = 24;

/// Fusionaly Installer - self-hosted web analytics
#[derive(Parser)]
#[command(name = "fusionaly-installer")]
#[command(version)]
#[command(about = "Fusionaly Installer - admin account management", long_about = None)]
struct Cli {
    /// Path to the control binary (defaults to $FUSIONALY_CTL_PATH or /app/fnctl)
    #[arg(long, global = true)]
    ctl_path: Option<String>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin user
    CreateAdmin {
        /// Admin email address
        #[arg(long)]
        email: String,

        /// Admin password (will be generated if not provided)
        #[arg(long)]
        password: Option<String>,
    },
    /// Change an admin user's password
    ChangeAdminPassword {
        /// Admin email address
        #[arg(long)]
        email: String,

        /// New password
        #[arg(long)]
        password: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let ctl_path = resolve_ctl_path(cli.ctl_path, std::env::var(CTL_PATH_ENV).ok());
    let manager = AdminManager::new(Arc::new(SystemExecutor)).with_ctl_path(ctl_path);

    if !command_exists(manager.ctl_path()) {
        warn!(
            ctl_path = manager.ctl_path(),
            "control binary not found, the command will likely fail"
        );
    }
    if !is_root() {
        warn!("not running as root, the control binary may lack permissions");
    }

    match cli.command {
        Commands::CreateAdmin { email, password } => {
            let (password, generated) = match password {
                Some(password) => (password, false),
                None => (generate_password(GENERATED_PASSWORD_LEN), true),
            };

            manager
                .create_admin_user(&email, &password)
                .context("failed to create admin user")?;

            println!("Admin user {} created", email);
            if generated {
                println!("Generated password: {}", password);
            }
        }
        Commands::ChangeAdminPassword { email, password } => {
            manager
                .change_admin_password(&email, &password)
                .context("failed to change admin password")?;

            println!("Password changed for {}", email);
        }
    }

    Ok(())
}

/// Initialize logging to stderr. `RUST_LOG` takes precedence over `--debug`.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Flag wins over environment, environment over the built-in default
fn resolve_ctl_path(flag: Option<String>, env: Option<String>) -> String {
    flag.or(env.filter(|v| !v.is_empty()))
        .unwrap_or_else(|| DEFAULT_CTL_PATH.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_admin_without_password() {
        let cli = Cli::try_parse_from([
            "fusionaly-installer",
            "create-admin",
            "--email",
            "admin@company.com",
        ])
        .unwrap();

        assert!(!cli.debug);
        match cli.command {
            Commands::CreateAdmin { email, password } => {
                assert_eq!(email, "admin@company.com");
                assert!(password.is_none());
            }
            _ => panic!("expected create-admin"),
        }
    }

    #[test]
    fn test_parse_change_password_requires_password() {
        let result = Cli::try_parse_from([
            "fusionaly-installer",
            "change-admin-password",
            "--email",
            "admin@company.com",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fusionaly-installer",
            "change-admin-password",
            "--email",
            "a@b.com",
            "--password",
            "pass4321",
            "--ctl-path",
            "/opt/fnctl",
            "--debug",
        ])
        .unwrap();

        assert!(cli.debug);
        assert_eq!(cli.ctl_path.as_deref(), Some("/opt/fnctl"));
    }

    #[test]
    fn test_resolve_ctl_path() {
        assert_eq!(resolve_ctl_path(None, None), "/app/fnctl");
        assert_eq!(
            resolve_ctl_path(None, Some("/env/fnctl".to_string())),
            "/env/fnctl"
        );
        assert_eq!(resolve_ctl_path(None, Some(String::new())), "/app/fnctl");
        assert_eq!(
            resolve_ctl_path(Some("/flag/fnctl".to_string()), Some("/env/fnctl".to_string())),
            "/flag/fnctl"
        );
    }
}
