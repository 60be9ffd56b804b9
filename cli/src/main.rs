//! Command-line front end for the BattleMetrics player API.
//!
//! ```bash
//! battlemetrics players --search alice --include server,identifier
//! battlemetrics player 123 --include playerFlag,flagPlayer
//! battlemetrics match --kind steamID 76561197960287930
//! battlemetrics related 123 --include player
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use battlemetrics_core::{
    BattleMetrics, ClientConfig, IdentifierKind, IdentifierQuery, PlayerInclude, PlayerSearch,
    RelationInclude, DEFAULT_BASE_URL,
};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "battlemetrics")]
#[command(version, about = "Query players on the BattleMetrics API", long_about = None)]
struct Cli {
    /// API token sent as a bearer credential
    #[arg(long, global = true, env = "BATTLEMETRICS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[arg(long, global = true, env = "BATTLEMETRICS_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search players
    Players {
        /// Name or identifier to search for
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_delimiter = ',')]
        include: Vec<PlayerInclude>,
        #[arg(long)]
        page_size: Option<u32>,
        /// Number of pages to fetch by following `links.next`
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Fetch one player by id
    Player {
        id: String,
        #[arg(long, value_delimiter = ',')]
        include: Vec<PlayerInclude>,
    },
    /// Resolve an identifier to the players that used it
    Match {
        #[arg(long)]
        kind: IdentifierKind,
        value: String,
    },
    /// List identifiers related to a player
    Related {
        id: String,
        #[arg(long, value_delimiter = ',')]
        include: Vec<RelationInclude>,
    },
}

impl Cli {
    fn config(&self) -> Result<ClientConfig> {
        let token = self
            .token
            .clone()
            .context("no API token: pass --token or set BATTLEMETRICS_TOKEN")?;
        let mut config = ClientConfig::new(token).with_base_url(self.base_url.clone());
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let api = BattleMetrics::from_config(&cli.config()?)?;

    match cli.command {
        Command::Players {
            search,
            include,
            page_size,
            pages,
        } => {
            let mut params = PlayerSearch::new().include(include);
            if let Some(text) = search {
                params = params.search(text);
            }
            if let Some(size) = page_size {
                params = params.page_size(size);
            }
            let mut page = api.list_players(&params).await?;
            print_json(&page)?;
            for _ in 1..pages {
                let Some(next) = page.links.next.take() else {
                    break;
                };
                tracing::info!(%next, "fetching next page");
                page = api.follow_link(&next).await?;
                print_json(&page)?;
            }
        }
        Command::Player { id, include } => {
            print_json(&api.get_player_by_id(&id, &include).await?)?;
        }
        Command::Match { kind, value } => {
            let response = api.quick_match(&IdentifierQuery::new(kind, value)).await?;
            print_json(&response)?;
        }
        Command::Related { id, include } => {
            print_json(&api.get_related_identifiers(&id, &include).await?)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli).await
}
