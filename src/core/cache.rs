use crate::core::currency::RateMap;
use crate::core::error::DashboardError;
use crate::core::store::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub const RATES_KEY: &str = "currencyRates";

/// The most recent successful fetch. Only one is ever kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedRatesSnapshot {
    pub rates: RateMap,
    /// The currency every value in `rates` is relative to.
    pub base_currency: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Single-slot rate cache on top of a [`KeyValueStore`].
#[derive(Clone)]
pub struct RateCache {
    store: Arc<dyn KeyValueStore>,
}

impl RateCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Overwrites the slot with `rates`, stamped with the current time.
    pub async fn save(&self, rates: RateMap, base: &str) {
        self.save_snapshot(&CachedRatesSnapshot {
            rates,
            base_currency: base.to_string(),
            timestamp: Utc::now(),
        })
        .await
    }

    pub async fn save_snapshot(&self, snapshot: &CachedRatesSnapshot) {
        let result = match serde_json::to_string(snapshot) {
            Ok(raw) => self.store.set(RATES_KEY, raw).await,
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(()) => debug!(base = %snapshot.base_currency, "Cache PUT"),
            Err(e) => {
                let err = DashboardError::PersistenceWrite {
                    key: RATES_KEY.to_string(),
                    reason: e.to_string(),
                };
                warn!(error = %err, "Rates were not cached");
            }
        }
    }

    /// Returns the cached snapshot; unreadable data counts as a miss.
    pub async fn load(&self) -> Option<CachedRatesSnapshot> {
        let raw = match self.store.get(RATES_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache MISS");
                return None;
            }
            Err(e) => {
                let err = DashboardError::PersistenceRead {
                    key: RATES_KEY.to_string(),
                    reason: e.to_string(),
                };
                warn!(error = %err, "Ignoring rate cache");
                return None;
            }
        };

        match serde_json::from_str::<CachedRatesSnapshot>(&raw) {
            Ok(snapshot) => {
                debug!(base = %snapshot.base_currency, "Cache HIT");
                Some(snapshot)
            }
            Err(e) => {
                let err = DashboardError::PersistenceRead {
                    key: RATES_KEY.to_string(),
                    reason: e.to_string(),
                };
                warn!(error = %err, "Ignoring malformed rate cache");
                None
            }
        }
    }
}
