use anyhow::{Context, Result};
use clap::Args;

use klife_api_client::{CatalogClient, CatalogLoader, CatalogState};
use klife_core::FilterState;
use klife_runtime_config::AppConfig;

use crate::output;

#[derive(Debug, Clone, Args)]
pub struct EventsArgs {
    /// Case-insensitive text matched against title, venue, category and theme
    #[arg(short, long)]
    pub query: Option<String>,

    /// Only show events suitable for visitors who don't speak Korean
    #[arg(long)]
    pub foreign_only: bool,

    /// Print the matching records as JSON
    #[arg(long)]
    pub json: bool,

    /// Override the events endpoint
    #[arg(long)]
    pub url: Option<String>,
}

pub async fn run(args: EventsArgs) -> Result<()> {
    let config = AppConfig::load()?;
    let url = args.url.unwrap_or_else(|| config.upstream.events_url.clone());
    let client = CatalogClient::new(&url, config.upstream.timeout())
        .context("failed to build HTTP client")?;
    let loader = CatalogLoader::new(client);

    let state = loader.ensure_loaded().await;
    let records = match &state {
        CatalogState::Loaded(records) => records,
        CatalogState::Failed(e) => {
            anyhow::bail!("failed to load events from {url}: {e}");
        }
        CatalogState::Idle | CatalogState::Loading => {
            anyhow::bail!("event catalog did not finish loading");
        }
    };

    let filter = FilterState::new(args.query.unwrap_or_default(), args.foreign_only);
    let visible = filter.apply(records);
    tracing::debug!(total = records.len(), visible = visible.len(), "filtered catalog");

    let mut stdout = std::io::stdout().lock();
    if args.json {
        output::write_json(&mut stdout, &visible)
    } else {
        output::write_listing(&mut stdout, &visible)
    }
}
