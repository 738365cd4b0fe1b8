//! CLI module - Command-line interface for Tessera
//!
//! This module provides a structured CLI using clap for argument parsing.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tessera - email-keyed accounts with token login
#[derive(Parser)]
#[command(name = "tessera")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search paths
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server (default)
    Serve,

    /// Create an administrative account (active, staff and superuser)
    #[command(alias = "createsuperuser")]
    CreateSuperuser {
        /// Login email for the new account
        #[arg(long)]
        email: String,

        /// Display name
        #[arg(long, default_value = "")]
        name: String,

        /// Password; falls back to TESSERA_SUPERUSER_PASSWORD.
        /// Without either, the account gets an unusable password.
        #[arg(long)]
        password: Option<String>,
    },

    /// Create default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_superuser() {
        let cli = Cli::parse_from([
            "tessera",
            "create-superuser",
            "--email",
            "admin@example.com",
            "--name",
            "Admin",
        ]);

        match cli.command {
            Some(Commands::CreateSuperuser {
                email,
                name,
                password,
            }) => {
                assert_eq!(email, "admin@example.com");
                assert_eq!(name, "Admin");
                assert!(password.is_none());
            }
            _ => panic!("expected create-superuser"),
        }
    }

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::parse_from(["tessera", "--config", "custom.toml"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }
}
