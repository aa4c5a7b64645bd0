// src/app.rs
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::application::{api, ApiState, DiscoveryService, RefreshScheduler};
use crate::config::Config;
use crate::domain::pool::PairStore;
use crate::infrastructure::ledger::{JsonRpcGateway, LedgerGateway};
use crate::report;
use crate::shared::errors::AppError;

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub rpc_url: String,
    pub request_timeout: Duration,
    pub taker_account: String,
    pub refresh_interval: Duration,
    pub page_limit: u32,
    pub bind: SocketAddr,
}

/// CLI values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub rpc_url: Option<String>,
    pub taker_account: Option<String>,
    pub refresh_interval_secs: Option<u64>,
    pub bind: Option<String>,
}

impl AppCfg {
    /// Merge CLI overrides onto the file config (CLI > file > defaults).
    pub fn from_config(cfg: Config, overrides: Overrides) -> Result<Self, AppError> {
        let taker_account = overrides
            .taker_account
            .or(cfg.discovery.taker_account)
            .ok_or_else(|| {
                AppError::ConfigError("taker account is required (--taker or discovery.taker_account)".to_string())
            })?;

        let bind_str = overrides.bind.unwrap_or(cfg.server.bind);
        let bind = bind_str
            .parse::<SocketAddr>()
            .map_err(|e| AppError::ConfigError(format!("invalid bind address {}: {}", bind_str, e)))?;

        let refresh_interval_secs = overrides
            .refresh_interval_secs
            .unwrap_or(cfg.discovery.refresh_interval_secs);
        if refresh_interval_secs == 0 {
            return Err(AppError::ConfigError("refresh interval must be positive".to_string()));
        }

        Ok(Self {
            rpc_url: overrides.rpc_url.unwrap_or(cfg.rpc.url),
            request_timeout: Duration::from_secs(cfg.rpc.timeout_secs),
            taker_account,
            refresh_interval: Duration::from_secs(refresh_interval_secs),
            page_limit: cfg.discovery.page_limit,
            bind,
        })
    }

    fn discovery_service(&self, store: Arc<PairStore>) -> DiscoveryService {
        let gateway: Arc<dyn LedgerGateway> =
            Arc::new(JsonRpcGateway::new(self.rpc_url.clone(), self.request_timeout));
        DiscoveryService::new(gateway, store, self.taker_account.clone(), self.page_limit)
    }
}

/// Run the scheduler and the read API until Ctrl-C.
pub async fn run(app_cfg: AppCfg) -> Result<()> {
    info!("Starting XRPL liquidity discovery");
    info!("Configuration: {:?}", app_cfg);

    let store = Arc::new(PairStore::new());
    let service = Arc::new(app_cfg.discovery_service(Arc::clone(&store)));
    let scheduler = Arc::new(RefreshScheduler::new(service, app_cfg.refresh_interval).spawn());

    let state = ApiState {
        store,
        scheduler: Arc::clone(&scheduler),
    };
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("🛑 Shutting down");
    };

    let served = api::serve(app_cfg.bind, state, shutdown).await;
    scheduler.shutdown();
    served.context("liquidity API")?;
    Ok(())
}

/// Run a single cycle and print the published map.
pub async fn run_once(app_cfg: AppCfg) -> Result<()> {
    let store = Arc::new(PairStore::new());
    let service = app_cfg.discovery_service(Arc::clone(&store));

    let cycle = service.run_cycle().await.context("discovery cycle")?;
    info!("Discovered {} pairs", cycle.pairs);

    let snapshot = store.snapshot().await;
    println!("{}", report::to_json(&snapshot)?);
    Ok(())
}
