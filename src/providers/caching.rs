use crate::core::cache::RateCache;
use crate::core::currency::{RateMap, RateSource};
use crate::core::error::{DashboardError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// Where a set of rates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOrigin {
    Network,
    Cache,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedRates {
    pub rates: RateMap,
    pub base_currency: String,
    pub timestamp: DateTime<Utc>,
    pub origin: RateOrigin,
}

/// Fetches rates from a [`RateSource`], keeping the last success in a
/// [`RateCache`] and serving it when the source fails.
pub struct RateFetcher {
    source: Arc<dyn RateSource>,
    cache: RateCache,
    fallback_to_other_base: bool,
}

impl RateFetcher {
    pub fn new(source: Arc<dyn RateSource>, cache: RateCache) -> Self {
        Self {
            source,
            cache,
            fallback_to_other_base: true,
        }
    }

    /// Whether a snapshot taken for a different base may be served on failure.
    pub fn with_fallback_to_other_base(mut self, allow: bool) -> Self {
        self.fallback_to_other_base = allow;
        self
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Makes exactly one request for `base`.
    pub async fn fetch_rates(&self, base: &str) -> Result<FetchedRates> {
        let err = match self.source.latest_rates(base).await {
            Ok(latest) => {
                let timestamp = Utc::now();
                self.cache.save(latest.rates.clone(), &latest.base_code).await;
                return Ok(FetchedRates {
                    rates: latest.rates,
                    base_currency: latest.base_code,
                    timestamp,
                    origin: RateOrigin::Network,
                });
            }
            Err(e) => e,
        };
        warn!(error = %err, base, "Error fetching exchange rates");

        let Some(snapshot) = self.cache.load().await else {
            return Err(DashboardError::NoDataAvailable);
        };

        if snapshot.base_currency != base {
            if !self.fallback_to_other_base {
                debug!(
                    cached = %snapshot.base_currency,
                    "Cached rates are for another base currency"
                );
                return Err(DashboardError::NoDataAvailable);
            }
            warn!(
                requested = base,
                cached = %snapshot.base_currency,
                "Serving cached rates computed against a different base currency"
            );
        }

        debug!(timestamp = %snapshot.timestamp, "Using cached exchange rates");
        Ok(FetchedRates {
            rates: snapshot.rates,
            base_currency: snapshot.base_currency,
            timestamp: snapshot.timestamp,
            origin: RateOrigin::Cache,
        })
    }
}
