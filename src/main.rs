use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use xrpl_pools::app::{self, AppCfg, Overrides};
use xrpl_pools::config::Config;

#[derive(Parser, Debug)]
#[command(version, about = "Discovers XRPL AMM pools and their order books and serves the merged liquidity")]
struct Args {
    /// Path to config file (optional)
    #[arg(long)]
    config: Option<String>,

    /// rippled JSON-RPC endpoint URL
    #[arg(long)]
    rpc_url: Option<String>,

    /// Account used as taker context for order book queries
    #[arg(long)]
    taker: Option<String>,

    /// Seconds between discovery cycles
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Address the liquidity API listens on
    #[arg(long)]
    bind: Option<String>,

    /// Run one discovery cycle, print the result and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    // Load base configuration from file if provided
    let base_config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => Config::default(),
    };

    let overrides = Overrides {
        rpc_url: args.rpc_url,
        taker_account: args.taker,
        refresh_interval_secs: args.interval_secs,
        bind: args.bind,
    };
    let app_cfg = AppCfg::from_config(base_config, overrides)?;

    if args.once {
        app::run_once(app_cfg).await
    } else {
        app::run(app_cfg).await
    }
}
