use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use catalogtree::{
    catalog::CatalogService,
    config,
    recursive_query::RecursiveQueryEngine,
    schema_catalog::SchemaCatalog,
    server,
    store::CatalogStore,
};

/// catalogtree - hierarchy queries over a product catalog
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// HTTP server host address
    #[arg(long, default_value = "0.0.0.0")]
    http_host: String,

    /// HTTP server port
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// SQLite database file (":memory:" for a throwaway database)
    #[arg(long, default_value = "catalogtree.db")]
    database_path: String,

    /// YAML entity catalog (defaults to the built-in product catalog)
    #[arg(long)]
    schema_path: Option<String>,

    /// Disable the compiled query cache
    #[arg(long)]
    disable_query_cache: bool,

    /// Maximum number of cached compiled queries
    #[arg(long, default_value_t = 1000)]
    query_cache_max_entries: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,

    /// Load the demo catalog into an empty database
    #[arg(long)]
    seed_demo: bool,

    /// Read the server configuration from a YAML file instead of the flags above
    #[arg(long, conflicts_with = "from_env")]
    config: Option<String>,

    /// Read the server configuration from CATALOGTREE_* environment variables
    #[arg(long)]
    from_env: bool,
}

impl From<Cli> for config::CliConfig {
    fn from(cli: Cli) -> Self {
        config::CliConfig {
            http_host: cli.http_host,
            http_port: cli.http_port,
            database_path: cli.database_path,
            schema_path: cli.schema_path,
            disable_query_cache: cli.disable_query_cache,
            query_cache_max_entries: cli.query_cache_max_entries,
            request_timeout_secs: cli.request_timeout_secs,
            seed_demo: cli.seed_demo,
        }
    }
}

fn load_config(cli: Cli) -> anyhow::Result<config::ServerConfig> {
    let config = if let Some(path) = cli.config.clone() {
        config::ServerConfig::from_yaml_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?
    } else if cli.from_env {
        config::ServerConfig::from_env().context("Invalid environment configuration")?
    } else {
        config::ServerConfig::from_cli(cli.into()).context("Invalid command line configuration")?
    };
    Ok(config)
}

fn build_service(config: &config::ServerConfig) -> anyhow::Result<CatalogService> {
    let catalog = match config.schema_path.as_deref() {
        Some(path) => SchemaCatalog::from_yaml_file(path)
            .with_context(|| format!("Failed to load entity catalog from {}", path))?,
        None => SchemaCatalog::product_catalog().context("Invalid built-in product catalog")?,
    };
    log::info!(
        "Loaded entity catalog with {} entities",
        catalog.entity_names().count()
    );

    let store = if config.database_path == ":memory:" {
        CatalogStore::open_in_memory()?
    } else {
        CatalogStore::open(&config.database_path)?
    };
    store.initialize_schema()?;
    if config.seed_demo {
        if store.is_empty()? {
            store.seed_demo_catalog()?;
        } else {
            log::warn!("Database is not empty, skipping demo catalog");
        }
    }

    let engine = RecursiveQueryEngine::new(Arc::new(catalog), config.cache_config());
    Ok(CatalogService::new(Arc::new(engine), Arc::new(store)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("catalogtree v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli)?;
    let service = build_service(&config)?;

    server::run_with_config(config, service).await?;
    Ok(())
}
