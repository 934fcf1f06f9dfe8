use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use connector_mentions::connector::run_chat;
use connector_mentions::{Commands, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "connector-mentions")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Connector backend base URL [env: CONNECTORS_BACKEND_URL]
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Use in-memory sample connectors instead of the backend
    #[arg(long, global = true)]
    mock_connectors: bool,

    /// Debounce delay for typeahead searches [env: CONNECTORS_DEBOUNCE_MS]
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    /// Per-search timeout, 0 disables it [env: CONNECTORS_SEARCH_TIMEOUT_MS]
    #[arg(long, global = true)]
    search_timeout_ms: Option<u64>,

    /// Maximum results per search
    #[arg(long, global = true)]
    limit: Option<usize>,

    /// Write logs to this file (the chat UI logs nowhere otherwise)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn container_config(&self) -> ContainerConfig {
        let mut config = ContainerConfig::from_env();
        if let Some(url) = &self.backend_url {
            config.backend_url = url.clone();
        }
        config.mock_connectors = self.mock_connectors;
        if let Some(ms) = self.debounce_ms {
            config.debounce = Duration::from_millis(ms);
        }
        if let Some(ms) = self.search_timeout_ms {
            config.search_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(limit) = self.limit {
            config.limit = limit.max(1);
        }
        config
    }
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match (&cli.log_file, &cli.command) {
        (Some(path), _) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        // The terminal belongs to the UI.
        (None, Commands::Chat) => {}
        (None, _) => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let container = Container::new(cli.container_config())?;

    if let Commands::Chat = cli.command {
        info!("Starting chat with {} connector(s)", container.registry().len());
        return run_chat(&container).await;
    }

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn search_takes_connector_and_query() {
        let cli = Cli::try_parse_from([
            "connector-mentions",
            "--mock-connectors",
            "search",
            "jira",
            "TEST",
            "--num",
            "3",
        ])
        .unwrap();

        assert!(cli.mock_connectors);
        assert!(matches!(
            cli.command,
            Commands::Search { num: Some(3), ref query, .. } if query == "TEST"
        ));
    }

    #[test]
    fn unknown_connector_is_rejected() {
        let res = Cli::try_parse_from(["connector-mentions", "search", "github", "x"]);
        assert!(res.is_err(), "github is not a known connector");
    }

    #[test]
    fn zero_timeout_disables_it() {
        let cli = Cli::try_parse_from([
            "connector-mentions",
            "--search-timeout-ms",
            "0",
            "--limit",
            "4",
            "connectors",
        ])
        .unwrap();

        let config = cli.container_config();
        assert_eq!(config.search_timeout, None);
        assert_eq!(config.limit, 4);
    }
}
