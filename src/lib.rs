pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::cache::RateCache;
use crate::core::config::AppConfig;
use crate::core::dashboard::Dashboard;
use crate::core::settings::SettingsRepository;
use crate::providers::caching::RateFetcher;
use crate::providers::exchange_rate_api::ExchangeRateApiProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub use cli::ViewOptions;

/// User intents understood by the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Show { refresh: bool },
    Base(String),
    Toggle(String),
    Move { code: String, target: String },
    /// Optional case-insensitive filter on code or name.
    Currencies(Option<String>),
}

pub async fn run_command(
    command: AppCommand,
    view: ViewOptions,
    config_path: Option<&str>,
) -> Result<()> {
    info!("Currency dashboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = store::open_store(&config.default_data_path()?.join("store"));
    let source = Arc::new(ExchangeRateApiProvider::new(
        &config.providers.exchange_rate_api.base_url,
    ));
    let fetcher = RateFetcher::new(source, RateCache::new(Arc::clone(&store)))
        .with_fallback_to_other_base(config.cache.fallback_to_other_base);

    let mut dashboard = Dashboard::new(SettingsRepository::new(store), fetcher).await;
    cli::run(&mut dashboard, command, view).await
}
