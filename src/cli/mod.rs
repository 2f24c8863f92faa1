pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "portfolio")]
#[command(about = "Portfolio CLI - admin credential setup and project store inspection")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Compute the password_hash value for an admin password")]
    HashPassword {
        #[arg(help = "Admin password")]
        password: String,
        #[arg(long, env = "pepper", help = "Pepper (defaults to the pepper variable)")]
        pepper: String,
    },

    #[command(about = "Inspect stored projects")]
    Project {
        #[command(subcommand)]
        cmd: commands::project::ProjectCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::HashPassword { password, pepper } => {
            commands::password::handle(&pepper, &password, output_format)
        }
        Commands::Project { cmd } => commands::project::handle(cmd, output_format).await,
    }
}
