use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::currency::{LatestRates, RateMap, RateSource};
use crate::core::error::{DashboardError, Result};

const SUCCESS: &str = "success";

/// Client for the ExchangeRate-API `latest` endpoint.
///
/// `base_url` carries the API key path segment, e.g.
/// `https://v6.exchangerate-api.com/v6/<key>`.
pub struct ExchangeRateApiProvider {
    base_url: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: String,
    base_code: Option<String>,
    conversion_rates: Option<RateMap>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

#[async_trait]
impl RateSource for ExchangeRateApiProvider {
    #[instrument(name = "LatestRatesFetch", skip(self), fields(base = %base))]
    async fn latest_rates(&self, base: &str) -> Result<LatestRates> {
        let url = format!("{}/latest/{}", self.base_url, base);
        debug!("Requesting rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("xchange/0.1")
            .build()
            .map_err(|e| DashboardError::Network(e.to_string()))?;

        let response = client.get(&url).send().await.map_err(|e| {
            DashboardError::Network(format!("Request error: {e} for base currency: {base}"))
        })?;

        if !response.status().is_success() {
            return Err(DashboardError::Network(format!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DashboardError::Network(e.to_string()))?;

        let data: LatestResponse = serde_json::from_str(&text).map_err(|e| {
            DashboardError::ApplicationFailure(format!(
                "Failed to parse JSON response for {base}: {e}"
            ))
        })?;

        if data.result != SUCCESS {
            return Err(DashboardError::ApplicationFailure(format!(
                "result `{}` ({}) for base currency: {}",
                data.result,
                data.error_type.as_deref().unwrap_or("no error type"),
                base
            )));
        }

        // A success without rates must not reach the cache
        let (Some(base_code), Some(rates)) = (data.base_code, data.conversion_rates) else {
            return Err(DashboardError::ApplicationFailure(format!(
                "Missing base_code or conversion_rates for base currency: {base}"
            )));
        };
        if rates.is_empty() {
            return Err(DashboardError::ApplicationFailure(format!(
                "Empty conversion_rates for base currency: {base}"
            )));
        }

        debug!(count = rates.len(), "Received rates");
        Ok(LatestRates { base_code, rates })
    }
}
