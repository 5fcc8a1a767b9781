//! CLI interface module
//!
//! This module provides command-line interface functionality for commsboard.

pub mod commands;

use crate::cli::{Commands, ConfigCommands};
use crate::storage::StorageFactory;
use commands::{config_generate, seed_metrics, show_summary};
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::DashboardError> for CliError {
    fn from(err: crate::errors::DashboardError) -> Self {
        use crate::errors::DashboardError;
        match err {
            DashboardError::Validation(_)
            | DashboardError::DateParse(_)
            | DashboardError::UnknownMetricKind(_)
            | DashboardError::UnknownMeasure(_)
            | DashboardError::InvalidDateRange(_) => {
                CliError::ParseError(err.message().to_string())
            }
            other => CliError::StorageError(other.to_string()),
        }
    }
}

/// Run a CLI command from clap-parsed input
///
/// `serve` 由 main 直接进入服务器模式，不经过这里。
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    // Generate doesn't need DB connection
    if let Commands::Config { action } = cmd {
        let ConfigCommands::Generate { output_path, force } = action;
        return config_generate(output_path, force).await;
    }

    let storage = StorageFactory::create()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))?;

    let result = match cmd {
        Commands::Seed { file } => seed_metrics(storage.clone(), file).await,
        Commands::Summary {
            business_unit,
            as_of,
        } => show_summary(storage.clone(), business_unit, as_of).await,
        Commands::Serve => Err(CliError::CommandError(
            "serve must be started from main".to_string(),
        )),
        Commands::Config { .. } => unreachable!("handled above"),
    };

    if let Ok(storage) = std::sync::Arc::try_unwrap(storage)
        && let Err(e) = storage.close().await
    {
        tracing::warn!("Failed to close database pool: {}", e);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DashboardError;

    #[test]
    fn test_validation_errors_become_parse_errors() {
        let err: CliError = DashboardError::validation("bad date range").into();
        assert!(matches!(err, CliError::ParseError(_)));
        assert_eq!(err.format_simple(), "Parse error: bad date range");
    }

    #[test]
    fn test_database_errors_become_storage_errors() {
        let err: CliError = DashboardError::database_connection("refused").into();
        assert!(matches!(err, CliError::StorageError(_)));
        assert!(err.to_string().contains("refused"));
    }
}
