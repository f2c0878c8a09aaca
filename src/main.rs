use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::info;

use pushdrop_lookup::lookup::types::LookupQuery;
use pushdrop_lookup::lookup::TokenLookupService;
use pushdrop_lookup::storage::kv_store::StorageHandler;
use pushdrop_lookup::storage::tokens::RocksTokenStore;
use pushdrop_lookup::{Error, lookup, serve, shutdown, storage};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let args = Cli::parse();

    let config = Config::new(&args.config).map_err(|e| Error::Config(e.to_string()))?;

    let db = StorageHandler::open(
        config.storage.path.clone(),
        config.storage.block_cache_bytes(),
    )?;

    let store = RocksTokenStore::new(db, config.storage.record_cache_bytes());
    let service = TokenLookupService::new(store, config.lookup.clone());

    match args.command {
        Command::Serve(_) => {
            info!("serving lookups for topics: {:?}", config.lookup.topics);

            let address = config
                .server
                .and_then(|server| server.address)
                .unwrap_or_else(|| serve::DEFAULT_SERVE_ADDRESS.to_string());

            match shutdown::run_until_shutdown(serve::run(service, &address)).await {
                Some(result) => result,
                None => {
                    info!("shutting down");
                    Ok(())
                }
            }
        }
        Command::Query(query_args) => {
            let query = parse_query(&query_args.string)?;

            let records = service.lookup(Some(query)).await?;

            if records.is_empty() {
                println!("no live token records matched");
            }

            for record in records {
                println!(
                    "{}#{} -> {} tokens owned by {}",
                    record.outpoint.txid(),
                    record.outpoint.vout,
                    record.amount,
                    hex::encode(&record.owner_key)
                );
            }

            Ok(())
        }
    }
}

/// CLI queries: `all` for every live record, or `<txid>:<vout>` for one output.
fn parse_query(input: &str) -> Result<LookupQuery, Error> {
    if input == "all" {
        return Ok(LookupQuery::all());
    }

    if let Some((txid, vout)) = input.split_once(':') {
        let txid = txid
            .parse()
            .map_err(|e| Error::custom(format!("invalid txid: {e}")))?;
        let vout = vout
            .parse()
            .map_err(|e| Error::custom(format!("invalid vout: {e}")))?;

        return Ok(LookupQuery::by_outpoint(txid, vout));
    }

    Err(Error::custom(format!(
        "unrecognized query '{input}': expected 'all' or '<txid>:<vout>'"
    )))
}

#[derive(Debug, Subcommand)]
enum Command {
    Serve(Args),
    Query(QueryArgs),
}

#[derive(Debug, clap::Args)]
pub struct Args {}

#[derive(Debug, clap::Args)]
pub struct QueryArgs {
    string: String,
}

#[derive(Debug, Parser)]
#[clap(name = "pushdrop-lookup")]
#[clap(bin_name = "pushdrop-lookup")]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    config: Option<std::path::PathBuf>,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub storage: storage::Config,
    pub lookup: lookup::Config,
    pub server: Option<serve::ServerConfig>,
}

impl Config {
    pub fn new(config_path: &Option<std::path::PathBuf>) -> Result<Self, config::ConfigError> {
        let mut s = config::Config::builder();

        s = s.add_source(config::File::with_name("lookup.toml").required(false));

        if let Some(explicit) = config_path.as_ref().and_then(|x| x.to_str()) {
            s = s.add_source(config::File::with_name(explicit).required(true));
        }

        s = s.add_source(config::Environment::with_prefix("LOOKUP").separator("_"));

        s.build()?.try_deserialize()
    }
}
