//! Dashboard state: loads rates, tracks staleness and edits favorites

use crate::core::currency::{CurrencyRate, RateMap, currency_name};
use crate::core::error::Result;
use crate::core::settings::{DashboardSettings, SettingsRepository};
use crate::providers::caching::{RateFetcher, RateOrigin};
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use std::str::FromStr;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded(Freshness),
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Grid,
    List,
}

impl FromStr for DisplayMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grid" => Ok(DisplayMode::Grid),
            "list" => Ok(DisplayMode::List),
            _ => Err(anyhow!("Invalid display mode: {}", s)),
        }
    }
}

/// Direction used when printing a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparison {
    /// 1 base = rate quote
    #[default]
    BaseToQuote,
    /// 1 quote = 1/rate base
    QuoteToBase,
}

impl FromStr for Comparison {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "base" => Ok(Comparison::BaseToQuote),
            "quote" => Ok(Comparison::QuoteToBase),
            _ => Err(anyhow!("Invalid comparison direction: {}", s)),
        }
    }
}

/// Moves the element at `from` so it ends up at index `to`.
///
/// Out of range indices leave the sequence untouched.
pub fn move_element<T: Clone>(sequence: &[T], from: usize, to: usize) -> Vec<T> {
    let mut moved = sequence.to_vec();
    if from >= moved.len() || to >= moved.len() || from == to {
        return moved;
    }
    let item = moved.remove(from);
    moved.insert(to, item);
    moved
}

/// Joins favorites with the rate map, keeping favorite order and dropping
/// codes that have no rate.
pub fn derive_currencies(favorites: &[String], rates: &RateMap) -> Vec<CurrencyRate> {
    favorites
        .iter()
        .filter_map(|code| {
            rates.get(code).map(|rate| CurrencyRate {
                code: code.clone(),
                name: currency_name(code).to_string(),
                rate: *rate,
            })
        })
        .collect()
}

pub struct Dashboard {
    settings_repo: SettingsRepository,
    fetcher: RateFetcher,
    settings: DashboardSettings,
    rates: RateMap,
    currencies: Vec<CurrencyRate>,
    state: LoadState,
    last_updated: Option<DateTime<Utc>>,
    display_mode: DisplayMode,
    comparison: Comparison,
}

impl Dashboard {
    /// Builds the dashboard from persisted settings. No rates are loaded yet.
    pub async fn new(settings_repo: SettingsRepository, fetcher: RateFetcher) -> Self {
        let settings = settings_repo.load().await;
        debug!(?settings, "Loaded dashboard settings");
        Self {
            settings_repo,
            fetcher,
            settings,
            rates: RateMap::new(),
            currencies: Vec::new(),
            state: LoadState::Idle,
            last_updated: None,
            display_mode: DisplayMode::default(),
            comparison: Comparison::default(),
        }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn base_currency(&self) -> &str {
        &self.settings.base_currency
    }

    pub fn currencies(&self) -> &[CurrencyRate] {
        &self.currencies
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn is_stale(&self) -> bool {
        self.state == LoadState::Loaded(Freshness::Stale)
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// Initial load; served from the cache when it matches the base.
    pub async fn mount(&mut self) -> Result<Freshness> {
        self.load_rates(false).await
    }

    /// Always goes to the network.
    pub async fn refresh(&mut self) -> Result<Freshness> {
        self.load_rates(true).await
    }

    pub async fn load_rates(&mut self, force_refresh: bool) -> Result<Freshness> {
        self.state = LoadState::Loading;
        let base = self.settings.base_currency.clone();

        if !force_refresh {
            if let Some(snapshot) = self.fetcher.cache().load().await {
                if snapshot.base_currency == base {
                    debug!(%base, "Using cached rates without fetching");
                    self.apply_rates(snapshot.rates, snapshot.timestamp, Freshness::Stale);
                    return Ok(Freshness::Stale);
                }
            }
        }

        match self.fetcher.fetch_rates(&base).await {
            Ok(fetched) => {
                let freshness = match fetched.origin {
                    RateOrigin::Network => Freshness::Fresh,
                    RateOrigin::Cache => Freshness::Stale,
                };
                info!(%base, ?freshness, "Exchange rates loaded");
                self.apply_rates(fetched.rates, fetched.timestamp, freshness);
                Ok(freshness)
            }
            Err(e) => {
                warn!(error = %e, %base, "Failed to load exchange rates");
                self.rates.clear();
                self.recompute();
                self.state = LoadState::Error;
                Err(e)
            }
        }
    }

    fn apply_rates(&mut self, rates: RateMap, timestamp: DateTime<Utc>, freshness: Freshness) {
        self.rates = rates;
        self.last_updated = Some(timestamp);
        self.state = LoadState::Loaded(freshness);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.currencies = derive_currencies(&self.settings.favorites, &self.rates);
    }

    /// Persists the new base, then loads rates for it.
    pub async fn change_base(&mut self, code: &str) -> Result<Freshness> {
        self.settings.base_currency = code.to_string();
        self.settings_repo.save(&self.settings).await;
        self.load_rates(false).await
    }

    /// Adds `code` at the end of the favorites, or removes it. Returns
    /// whether it is now a favorite.
    pub async fn toggle_favorite(&mut self, code: &str) -> bool {
        let added = match self.settings.favorites.iter().position(|c| c == code) {
            Some(index) => {
                self.settings.favorites.remove(index);
                false
            }
            None => {
                self.settings.favorites.push(code.to_string());
                true
            }
        };
        self.settings_repo.save(&self.settings).await;
        self.recompute();
        added
    }

    /// Moves `moved` to the position currently held by `target`. Returns
    /// whether the order changed.
    pub async fn reorder(&mut self, moved: &str, target: &str) -> bool {
        if moved == target {
            return false;
        }
        let favorites = &self.settings.favorites;
        let (Some(from), Some(to)) = (
            favorites.iter().position(|c| c == moved),
            favorites.iter().position(|c| c == target),
        ) else {
            debug!(moved, target, "Reorder ignored, code is not a favorite");
            return false;
        };

        self.settings.favorites = move_element(favorites, from, to);
        self.settings_repo.save(&self.settings).await;
        self.recompute();
        true
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
    }

    pub fn toggle_display_mode(&mut self) -> DisplayMode {
        self.display_mode = match self.display_mode {
            DisplayMode::Grid => DisplayMode::List,
            DisplayMode::List => DisplayMode::Grid,
        };
        self.display_mode
    }

    pub fn set_comparison(&mut self, comparison: Comparison) {
        self.comparison = comparison;
    }

    pub fn toggle_comparison(&mut self) -> Comparison {
        self.comparison = match self.comparison {
            Comparison::BaseToQuote => Comparison::QuoteToBase,
            Comparison::QuoteToBase => Comparison::BaseToQuote,
        };
        self.comparison
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::{CachedRatesSnapshot, RateCache};
    use crate::core::error::DashboardError;
    use crate::core::store::KeyValueStore;
    use crate::providers::caching::tests::{MockRateSource, rates};
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;

    struct Fixture {
        store: Arc<MemoryStore>,
        source: Arc<MockRateSource>,
    }

    impl Fixture {
        fn new(source: MockRateSource) -> Self {
            Self {
                store: Arc::new(MemoryStore::new()),
                source: Arc::new(source),
            }
        }

        async fn dashboard(&self) -> Dashboard {
            let fetcher = RateFetcher::new(self.source.clone(), RateCache::new(self.store.clone()));
            Dashboard::new(SettingsRepository::new(self.store.clone()), fetcher).await
        }

        async fn persisted(&self) -> DashboardSettings {
            SettingsRepository::new(self.store.clone()).load().await
        }

        async fn seed_cache(&self, base: &str, pairs: &[(&str, f64)]) -> DateTime<Utc> {
            let timestamp = Utc::now() - chrono::Duration::hours(1);
            RateCache::new(self.store.clone())
                .save_snapshot(&CachedRatesSnapshot {
                    rates: rates(pairs),
                    base_currency: base.to_string(),
                    timestamp,
                })
                .await;
            timestamp
        }
    }

    fn codes(currencies: &[CurrencyRate]) -> Vec<&str> {
        currencies.iter().map(|c| c.code.as_str()).collect()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_move_element() {
        let items = ["a", "b", "c", "d"];
        assert_eq!(move_element(&items, 0, 2), vec!["b", "c", "a", "d"]);
        assert_eq!(move_element(&items, 3, 1), vec!["a", "d", "b", "c"]);
        assert_eq!(move_element(&items, 1, 1), items.to_vec());
        assert_eq!(move_element(&items, 5, 0), items.to_vec());
    }

    #[test]
    fn test_derive_currencies_filters_and_keeps_order() {
        let favorites = strings(&["JPY", "XXX", "EUR", "ZZZ"]);
        let rates = rates(&[("EUR", 0.9), ("JPY", 150.0), ("GBP", 0.8), ("ZZZ", 2.0)]);

        let currencies = derive_currencies(&favorites, &rates);
        assert_eq!(codes(&currencies), vec!["JPY", "EUR", "ZZZ"]);
        assert_eq!(currencies[0].name, "Japanese Yen");
        assert_eq!(currencies[1].rate, 0.9);
        // Unknown codes are named after themselves
        assert_eq!(currencies[2].name, "ZZZ");
    }

    #[tokio::test]
    async fn test_mount_fetches_fresh_rates() {
        let fixture = Fixture::new(MockRateSource::ok(&[("EUR", 0.9), ("GBP", 0.8)]));
        let mut dashboard = fixture.dashboard().await;
        assert_eq!(dashboard.state(), LoadState::Idle);

        assert_eq!(dashboard.mount().await, Ok(Freshness::Fresh));
        assert_eq!(dashboard.state(), LoadState::Loaded(Freshness::Fresh));
        assert!(!dashboard.is_stale());
        assert!(dashboard.last_updated().is_some());
        assert_eq!(codes(dashboard.currencies()), vec!["EUR", "GBP"]);
        assert_eq!(fixture.source.calls(), 1);
    }

    #[tokio::test]
    async fn test_mount_uses_matching_cache_without_fetching() {
        let fixture = Fixture::new(MockRateSource::ok(&[("EUR", 0.9)]));
        let cached_at = fixture.seed_cache("USD", &[("EUR", 0.85), ("CHF", 0.95)]).await;
        let mut dashboard = fixture.dashboard().await;

        assert_eq!(dashboard.mount().await, Ok(Freshness::Stale));
        assert!(dashboard.is_stale());
        assert_eq!(fixture.source.calls(), 0);
        assert_eq!(codes(dashboard.currencies()), vec!["EUR", "CHF"]);
        assert_eq!(
            dashboard.last_updated().map(|t| t.timestamp_millis()),
            Some(cached_at.timestamp_millis())
        );
    }

    #[tokio::test]
    async fn test_mount_ignores_cache_for_other_base() {
        let fixture = Fixture::new(MockRateSource::ok(&[("EUR", 0.9)]));
        fixture.seed_cache("GBP", &[("EUR", 1.15)]).await;
        let mut dashboard = fixture.dashboard().await;

        assert_eq!(dashboard.mount().await, Ok(Freshness::Fresh));
        assert_eq!(fixture.source.calls(), 1);
        assert_eq!(dashboard.currencies()[0].rate, 0.9);
    }

    #[tokio::test]
    async fn test_refresh_bypasses_cache() {
        let fixture = Fixture::new(MockRateSource::ok(&[("EUR", 0.9)]));
        fixture.seed_cache("USD", &[("EUR", 0.85)]).await;
        let mut dashboard = fixture.dashboard().await;

        dashboard.mount().await.unwrap();
        assert_eq!(dashboard.refresh().await, Ok(Freshness::Fresh));
        assert_eq!(fixture.source.calls(), 1);
        assert_eq!(dashboard.currencies()[0].rate, 0.9);
        assert_eq!(dashboard.state(), LoadState::Loaded(Freshness::Fresh));
    }

    #[tokio::test]
    async fn test_failed_refresh_falls_back_to_stale_cache() {
        let fixture = Fixture::new(MockRateSource::failing());
        let cached_at = fixture.seed_cache("USD", &[("EUR", 0.85)]).await;
        let mut dashboard = fixture.dashboard().await;

        assert_eq!(dashboard.refresh().await, Ok(Freshness::Stale));
        assert!(dashboard.is_stale());
        assert_eq!(codes(dashboard.currencies()), vec!["EUR"]);
        assert_eq!(
            dashboard.last_updated().map(|t| t.timestamp_millis()),
            Some(cached_at.timestamp_millis())
        );
    }

    #[tokio::test]
    async fn test_failure_without_cache_empties_list() {
        let fixture = Fixture::new(MockRateSource::ok(&[("EUR", 0.9)]));
        let mut dashboard = fixture.dashboard().await;
        dashboard.mount().await.unwrap();
        let last_updated = dashboard.last_updated();

        // Fresh store for the cache, so the fallback has nothing to serve
        let empty = Arc::new(MemoryStore::new());
        dashboard.fetcher = RateFetcher::new(
            Arc::new(MockRateSource::failing()),
            RateCache::new(empty),
        );

        assert_eq!(
            dashboard.refresh().await,
            Err(DashboardError::NoDataAvailable)
        );
        assert_eq!(dashboard.state(), LoadState::Error);
        assert!(dashboard.currencies().is_empty());
        assert_eq!(dashboard.last_updated(), last_updated);
    }

    #[tokio::test]
    async fn test_toggle_favorite() {
        let fixture = Fixture::new(MockRateSource::ok(&[("EUR", 0.9), ("INR", 83.0), ("GBP", 0.8)]));
        let mut dashboard = fixture.dashboard().await;
        dashboard.mount().await.unwrap();
        let original = dashboard.settings().favorites.clone();

        assert!(dashboard.toggle_favorite("INR").await);
        assert_eq!(dashboard.settings().favorites.last().map(String::as_str), Some("INR"));
        assert_eq!(codes(dashboard.currencies()), vec!["EUR", "GBP", "INR"]);
        assert_eq!(fixture.persisted().await.favorites, dashboard.settings().favorites);

        assert!(!dashboard.toggle_favorite("INR").await);
        assert_eq!(dashboard.settings().favorites, original);
        assert_eq!(fixture.persisted().await.favorites, original);

        // No refetch on toggle
        assert_eq!(fixture.source.calls(), 1);
    }

    #[tokio::test]
    async fn test_reorder_moves_to_target_position() {
        let fixture = Fixture::new(MockRateSource::ok(&[("EUR", 0.9), ("JPY", 150.0)]));
        let mut dashboard = fixture.dashboard().await;
        dashboard.mount().await.unwrap();

        // EUR, GBP, JPY, CAD, AUD, CHF
        assert!(dashboard.reorder("EUR", "JPY").await);
        assert_eq!(
            dashboard.settings().favorites,
            strings(&["GBP", "JPY", "EUR", "CAD", "AUD", "CHF"])
        );
        assert_eq!(codes(dashboard.currencies()), vec!["JPY", "EUR"]);

        assert!(dashboard.reorder("CHF", "GBP").await);
        assert_eq!(
            dashboard.settings().favorites,
            strings(&["CHF", "GBP", "JPY", "EUR", "CAD", "AUD"])
        );
        assert_eq!(fixture.persisted().await.favorites, dashboard.settings().favorites);
    }

    #[tokio::test]
    async fn test_reorder_same_code_is_noop() {
        let fixture = Fixture::new(MockRateSource::ok(&[("EUR", 0.9)]));
        let mut dashboard = fixture.dashboard().await;

        assert!(!dashboard.reorder("EUR", "EUR").await);
        assert_eq!(dashboard.settings(), &DashboardSettings::default());
        // Nothing was written
        assert!(fixture.store.get(crate::core::settings::SETTINGS_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reorder_unknown_code_is_noop() {
        let fixture = Fixture::new(MockRateSource::ok(&[("EUR", 0.9)]));
        let mut dashboard = fixture.dashboard().await;

        assert!(!dashboard.reorder("INR", "EUR").await);
        assert_eq!(dashboard.settings(), &DashboardSettings::default());
    }

    #[tokio::test]
    async fn test_change_base_persists_and_reloads() {
        let fixture = Fixture::new(MockRateSource::ok(&[("USD", 1.1), ("GBP", 0.86)]));
        let mut dashboard = fixture.dashboard().await;
        dashboard.mount().await.unwrap();

        assert_eq!(dashboard.change_base("EUR").await, Ok(Freshness::Fresh));
        assert_eq!(dashboard.base_currency(), "EUR");
        assert_eq!(fixture.persisted().await.base_currency, "EUR");
        assert_eq!(fixture.source.calls(), 2);

        let snapshot = RateCache::new(fixture.store.clone()).load().await.unwrap();
        assert_eq!(snapshot.base_currency, "EUR");
    }

    #[tokio::test]
    async fn test_change_base_offline_serves_cache_for_other_base() {
        let fixture = Fixture::new(MockRateSource::failing());
        let cached_at = fixture.seed_cache("USD", &[("EUR", 0.85), ("GBP", 0.75)]).await;
        let mut dashboard = fixture.dashboard().await;

        assert_eq!(dashboard.change_base("EUR").await, Ok(Freshness::Stale));
        assert_eq!(dashboard.state(), LoadState::Loaded(Freshness::Stale));
        assert_eq!(fixture.source.calls(), 1);
        assert_eq!(dashboard.base_currency(), "EUR");
        assert_eq!(fixture.persisted().await.base_currency, "EUR");
        // The USD snapshot is shown as-is
        assert_eq!(codes(dashboard.currencies()), vec!["EUR", "GBP"]);
        assert_eq!(dashboard.currencies()[0].rate, 0.85);
        assert_eq!(
            dashboard.last_updated().map(|t| t.timestamp_millis()),
            Some(cached_at.timestamp_millis())
        );

        let snapshot = RateCache::new(fixture.store.clone()).load().await.unwrap();
        assert_eq!(snapshot.base_currency, "USD");
    }

    #[tokio::test]
    async fn test_view_toggles() {
        let fixture = Fixture::new(MockRateSource::ok(&[]));
        let mut dashboard = fixture.dashboard().await;

        assert_eq!(dashboard.display_mode(), DisplayMode::Grid);
        assert_eq!(dashboard.toggle_display_mode(), DisplayMode::List);
        assert_eq!(dashboard.toggle_display_mode(), DisplayMode::Grid);

        assert_eq!(dashboard.comparison(), Comparison::BaseToQuote);
        assert_eq!(dashboard.toggle_comparison(), Comparison::QuoteToBase);
        dashboard.set_comparison(Comparison::BaseToQuote);
        assert_eq!(dashboard.comparison(), Comparison::BaseToQuote);

        dashboard.set_display_mode("list".parse().unwrap());
        assert_eq!(dashboard.display_mode(), DisplayMode::List);
        assert!("table".parse::<DisplayMode>().is_err());
        assert_eq!("QUOTE".parse::<Comparison>().unwrap(), Comparison::QuoteToBase);
    }
}
