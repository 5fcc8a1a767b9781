//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for commsboard using clap's derive macros.

use clap::{Parser, Subcommand};

/// commsboard - Marketing-communications dashboard backend
#[derive(Parser)]
#[command(name = "commsboard")]
#[command(version)]
#[command(about = "Marketing-communications analytics dashboard backend", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Upsert metric records from a JSON seed file
    ///
    /// The file holds `social`, `website`, `newsletter` and `engagement` arrays.
    Seed {
        /// Seed file path
        file: String,
    },

    /// Print the dashboard overview to the terminal
    Summary {
        /// Business unit filter (e.g. ASM, EM)
        #[arg(long, short = 'b')]
        business_unit: Option<String>,

        /// Evaluate as of this date (YYYY-MM-DD), default today
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_server() {
        let cli = Cli::try_parse_from(["commsboard"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, "config.toml");
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["commsboard", "seed", "data.json", "-c", "prod.toml"])
            .unwrap();
        assert_eq!(cli.config, "prod.toml");
        match cli.command {
            Some(Commands::Seed { file }) => assert_eq!(file, "data.json"),
            _ => panic!("expected seed command"),
        }
    }

    #[test]
    fn test_summary_arguments() {
        let cli = Cli::try_parse_from([
            "commsboard",
            "summary",
            "-b",
            "ASM",
            "--as-of",
            "2024-03-31",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Summary {
                business_unit,
                as_of,
            }) => {
                assert_eq!(business_unit.as_deref(), Some("ASM"));
                assert_eq!(as_of.as_deref(), Some("2024-03-31"));
            }
            _ => panic!("expected summary command"),
        }
    }

    #[test]
    fn test_config_generate() {
        let cli =
            Cli::try_parse_from(["commsboard", "config", "generate", "out.toml", "--force"])
                .unwrap();
        match cli.command {
            Some(Commands::Config {
                action: ConfigCommands::Generate { output_path, force },
            }) => {
                assert_eq!(output_path.as_deref(), Some("out.toml"));
                assert!(force);
            }
            _ => panic!("expected config generate"),
        }
    }
}
