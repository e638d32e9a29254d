//! kv-instrument - demonstration CLI
//!
//! Stores values through the instrumented typed cache and replays the
//! history, or fetches a URL through the TTL fetch cache.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kv_instrument::cache::STORE_OPERATION;
use kv_instrument::{
    Config, FetchCache, HttpFetcher, MemoryStore, RedisStore, Replayer, SharedStore, StoredValue,
    TypedCache,
};

#[derive(Parser, Debug)]
#[command(name = "kv-instrument", version, about = "Instrumented key-value cache demo", long_about = None)]
struct Cli {
    /// Store connection URL (overrides REDIS_URL)
    #[arg(long)]
    redis_url: Option<String>,

    /// Use an in-process store instead of Redis
    #[arg(long)]
    memory: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store each value through the typed cache, then replay the calls
    Store {
        /// Values to store; integers and floats are stored as numbers
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Fetch a URL through the fetch cache
    Fetch {
        url: String,
        /// Number of consecutive fetches
        #[arg(long, default_value_t = 2)]
        times: u32,
        /// Cache TTL in seconds (overrides PAGE_TTL)
        #[arg(long)]
        ttl: Option<u64>,
    },
}

/// Interprets a command-line argument as the most specific value kind.
fn parse_value(raw: &str) -> StoredValue {
    if let Ok(n) = raw.parse::<i64>() {
        StoredValue::Integer(n)
    } else if let Ok(x) = raw.parse::<f64>() {
        StoredValue::Float(x)
    } else {
        StoredValue::Text(raw.to_string())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kv_instrument=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(url) = cli.redis_url {
        config.redis_url = url;
    }
    info!(
        "Configuration loaded: redis_url={}, page_ttl={}s, fetch_timeout={}s",
        config.redis_url, config.page_ttl, config.fetch_timeout
    );

    let store: SharedStore = if cli.memory {
        info!("Using in-process memory store");
        Arc::new(MemoryStore::new())
    } else {
        let redis = RedisStore::connect(&config.redis_url)
            .await
            .with_context(|| format!("connecting to {}", config.redis_url))?;
        Arc::new(redis)
    };

    match cli.command {
        Command::Store { values } => {
            let cache = TypedCache::new(store.clone()).await?;
            for raw in &values {
                let key = cache.store(parse_value(raw)).await?;
                info!("Stored {:?} under {}", raw, key);
            }
            Replayer::new(store).print(STORE_OPERATION).await?;
        }
        Command::Fetch { url, times, ttl } => {
            let fetcher = HttpFetcher::new(Duration::from_secs(config.fetch_timeout))?;
            let cache = FetchCache::new(store, fetcher).with_ttl(ttl.unwrap_or(config.page_ttl));
            for _ in 0..times {
                let page = cache.fetch(&url).await?;
                info!("Fetched {} ({} bytes)", url, page.len());
            }
            let stats = cache.stats().await;
            println!(
                "{} accessed {} times ({} hits, {} misses, hit rate {:.2})",
                url,
                cache.access_count(&url).await?,
                stats.hits,
                stats.misses,
                stats.hit_rate()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_kinds() {
        assert_eq!(parse_value("42"), StoredValue::Integer(42));
        assert_eq!(parse_value("2.5"), StoredValue::Float(2.5));
        assert_eq!(parse_value("foo"), StoredValue::Text("foo".to_string()));
    }

    #[test]
    fn test_cli_parses_store() {
        let cli = Cli::parse_from(["kv-instrument", "--memory", "store", "a", "1"]);
        assert!(cli.memory);
        assert!(matches!(cli.command, Command::Store { values } if values == ["a", "1"]));
    }
}
