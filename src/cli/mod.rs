//! CLI command definitions and handlers

mod list;

use crate::catalog::Table;
use crate::config::ConnectionConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse a positive row limit
fn parse_limit(s: &str) -> Result<u64, String> {
    let n: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("limit must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// Stream the Cortex service catalog as JSON lines
#[derive(Parser, Debug)]
#[command(name = "cortex-catalog")]
#[command(
    version,
    about = "Stream Cortex catalog tables (entities, descriptors, teams, packages, scorecard scores) as JSON lines",
    after_help = "\
Examples:
  cortex-catalog entities --type service --group platform
  cortex-catalog --limit 10 teams
  cortex-catalog scores production-readiness
  cortex-catalog tables"
)]
pub struct Cli {
    /// Config file (default: <config dir>/cortex-catalog/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Cortex API key (overrides config file and CORTEX_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Cortex API root (overrides config file and CORTEX_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Stop after this many rows
    #[arg(long, global = true, value_parser = parse_limit)]
    pub limit: Option<u64>,

    /// Give up after this many seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Catalog entities (cortex_entity)
    Entities {
        /// Include archived entities
        #[arg(long)]
        archived: bool,

        /// Only entities of this type
        #[arg(long = "type")]
        entity_type: Option<String>,

        /// Entities in this group (repeatable)
        #[arg(long = "group")]
        groups: Vec<String>,

        /// Entities in any of these comma-separated groups (repeatable)
        #[arg(long = "groups-any", value_delimiter = ',')]
        groups_any: Vec<String>,
    },

    /// Entity descriptors (cortex_descriptor)
    Descriptors,

    /// Teams with their hierarchy (cortex_team)
    Teams,

    /// Packages of one entity (cortex_packages)
    Packages {
        /// Entity tag
        tag: String,
    },

    /// Rule results of one scorecard (cortex_scorecard_score)
    Scores {
        /// Scorecard tag
        scorecard_tag: String,
    },

    /// List available tables
    Tables,
}

/// Resolve the connection: file, then environment, then flags
pub fn connection_config(cli: &Cli) -> Result<ConnectionConfig> {
    let mut config = ConnectionConfig::load(cli.config.as_deref())?;
    if let Some(key) = &cli.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    Ok(config)
}

pub fn run(cli: Cli) -> Result<()> {
    if let Commands::Tables = cli.command {
        for table in Table::ALL {
            println!("{:<24} {}", table.name(), table.description());
        }
        return Ok(());
    }

    let config = connection_config(&cli)?;
    config.require_api_key()?;
    list::run(&cli, &config)
}
