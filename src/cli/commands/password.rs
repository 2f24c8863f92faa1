use serde_json::json;

use crate::auth::hash_password;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

pub fn handle(pepper: &str, password: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }

    let hash = hash_password(pepper, password);
    match output_format {
        OutputFormat::Text => {
            println!("password_hash={}", hash);
            Ok(())
        }
        OutputFormat::Json => output_success(
            output_format,
            "Computed password hash",
            Some(json!({ "password_hash": hash })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn rejects_empty_password() {
        assert!(handle("pep", "", OutputFormat::Text).is_err());
    }

    #[test]
    fn prints_hash_in_both_formats() {
        handle("pep", "hunter2", OutputFormat::Text).unwrap();
        handle("pep", "hunter2", OutputFormat::Json).unwrap();
    }

    #[test]
    fn pepper_flag_is_parsed() {
        let cli = Cli::try_parse_from(["portfolio", "hash-password", "hunter2", "--pepper", "pep"])
            .unwrap();
        match cli.command {
            Commands::HashPassword { password, pepper } => {
                assert_eq!(password, "hunter2");
                assert_eq!(pepper, "pep");
            }
            _ => panic!("expected hash-password"),
        }
    }
}
