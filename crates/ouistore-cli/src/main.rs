//! `ouistore` — OUI registry ingestion and lookup.
//!
//! # Usage
//!
//! ```text
//! ouistore ingest -f ./feeds                # ingest feeds into ~/.ouistore
//! ouistore ingest -f ./feeds -d ./data      # explicit store directory
//! ouistore ingest -c ouistore.toml          # settings from a config file
//! ouistore lookup AA:BB:CC:DD:EE:FF         # resolve addresses
//! ```

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ouistore_ingest::ingest_dir;
use ouistore_store::OuiStore;
use ouistore_types::HwAddr;
use tracing::info;

use config::CliConfig;

#[derive(Parser)]
#[command(
    name = "ouistore",
    version,
    about = "Partitioned OUI assignment store"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest feed files into the store.
    Ingest {
        /// Directory containing the feed files.
        #[arg(short, long)]
        feed_dir: Option<PathBuf>,

        /// Override the store directory.
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Resolve hardware addresses to their assignees.
    Lookup {
        /// One or more hardware addresses (any common separator style).
        #[arg(required = true)]
        addrs: Vec<String>,

        /// Override the store directory.
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())
        .with_context(|| format!("failed to load config {:?}", cli.config))?;

    init_logging(&config.log.level);

    match cli.command {
        Commands::Ingest { feed_dir, data_dir } => run_ingest(&config, feed_dir, data_dir),
        Commands::Lookup { addrs, data_dir } => run_lookup(&config, &addrs, data_dir),
    }
}

fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_ingest(
    config: &CliConfig,
    feed_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let Some(feed_dir) = feed_dir.or_else(|| config.ingest.feed_dir.clone()) else {
        bail!("no feed directory: pass --feed-dir or set [ingest] feed_dir");
    };
    let data_dir = data_dir.unwrap_or_else(|| config.store.data_dir.clone());

    let store = OuiStore::open(&data_dir)
        .with_context(|| format!("failed to open store at {}", data_dir.display()))?;

    let report = ingest_dir(&store, &feed_dir)
        .with_context(|| format!("ingestion failed for {}", feed_dir.display()))?;

    info!(%report, store = %data_dir.display(), "ingestion complete");
    println!("{report}");
    Ok(())
}

fn run_lookup(config: &CliConfig, addrs: &[String], data_dir: Option<PathBuf>) -> Result<()> {
    let data_dir = data_dir.unwrap_or_else(|| config.store.data_dir.clone());
    let store = OuiStore::open(&data_dir)
        .with_context(|| format!("failed to open store at {}", data_dir.display()))?;

    for raw in addrs {
        let addr: HwAddr = raw
            .parse()
            .with_context(|| format!("invalid hardware address {raw:?}"))?;
        match store.lookup(&addr)? {
            Some(assignee) => println!("{addr}\t{assignee}"),
            None => println!("{addr}\t(unassigned)"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_ingest() {
        let cli = Cli::parse_from(["ouistore", "ingest", "-f", "./feeds", "-d", "./data"]);
        match cli.command {
            Commands::Ingest { feed_dir, data_dir } => {
                assert_eq!(feed_dir, Some(PathBuf::from("./feeds")));
                assert_eq!(data_dir, Some(PathBuf::from("./data")));
            }
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn test_cli_parses_lookup_with_config() {
        let cli = Cli::parse_from([
            "ouistore",
            "lookup",
            "--config",
            "ouistore.toml",
            "AA:BB:CC:DD:EE:FF",
            "001122334455",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("ouistore.toml")));
        match cli.command {
            Commands::Lookup { addrs, .. } => assert_eq!(addrs.len(), 2),
            _ => panic!("expected lookup"),
        }
    }

    #[test]
    fn test_cli_lookup_requires_address() {
        assert!(Cli::try_parse_from(["ouistore", "lookup"]).is_err());
    }
}
