use anyhow::Result;
use clap::{Parser, Subcommand};
use coinharbor_core::{AppConfig, ConfigLoader, StorageBackend};
use coinharbor_data::{
    seed_store, BitcoinPriceFeed, MemoryStore, PgStore, SettlementWorker, Store,
};
use coinharbor_web_api::{ApiContext, ApiServer, TokenService};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coinharbor")]
#[command(about = "CoinHarbor cryptocurrency wallet backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server with the settlement worker
    Server {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
        /// Override the listen address (host:port)
        #[arg(short, long)]
        addr: Option<String>,
    },
    /// Seed the asset catalog and demo data
    Seed {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server { config, addr } => {
            let config = ConfigLoader::load_from(&config)?;
            let store = build_store(&config).await?;

            if config.storage.backend == StorageBackend::Memory {
                // A memory store starts empty on every boot; seed it so the
                // catalog endpoints work out of the box.
                seed_store(store.as_ref()).await?;
            }

            let worker = SettlementWorker::new(
                store.clone(),
                config.settlement.delay_secs,
                config.settlement.poll_interval_secs,
            );
            tokio::spawn(worker.run());

            let ctx = ApiContext {
                store,
                price_feed: Arc::new(BitcoinPriceFeed::new(
                    config.price_feed.api_url.clone(),
                    config.price_feed.cache_ttl_secs,
                )),
                tokens: TokenService::new(&config.admin.jwt_secret, config.admin.token_ttl_hours),
                admins: Arc::new(config.admin.credentials.clone()),
                approval_codes: Arc::new(config.admin.approval_codes.clone()),
            };

            let addr =
                addr.unwrap_or_else(|| format!("{}:{}", config.server.host, config.server.port));
            ApiServer::new(ctx).serve(&addr).await
        }
        Commands::Seed { config } => {
            let config = ConfigLoader::load_from(&config)?;
            let store = build_store(&config).await?;
            seed_store(store.as_ref()).await?;
            tracing::info!("seeding complete");
            Ok(())
        }
    }
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn Store>> {
    let store: Arc<dyn Store> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::Postgres => Arc::new(
            PgStore::connect(&config.database.url, config.database.max_connections).await?,
        ),
    };
    Ok(store)
}
