//! Persisted user preferences: base currency and ordered favorites

use crate::core::error::DashboardError;
use crate::core::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub const SETTINGS_KEY: &str = "currencyDashboardSettings";

const DEFAULT_BASE_CURRENCY: &str = "USD";
const DEFAULT_FAVORITES: [&str; 6] = ["EUR", "GBP", "JPY", "CAD", "AUD", "CHF"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSettings {
    /// Display order of tracked currencies.
    pub favorites: Vec<String>,
    pub base_currency: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            favorites: DEFAULT_FAVORITES.iter().map(|c| c.to_string()).collect(),
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
        }
    }
}

impl DashboardSettings {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

pub struct SettingsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the persisted settings, or the defaults when nothing usable is stored.
    pub async fn load(&self) -> DashboardSettings {
        let raw = match self.store.get(SETTINGS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored settings, using defaults");
                return DashboardSettings::default();
            }
            Err(e) => {
                let err = DashboardError::PersistenceRead {
                    key: SETTINGS_KEY.to_string(),
                    reason: e.to_string(),
                };
                warn!(error = %err, "Using default settings");
                return DashboardSettings::default();
            }
        };

        match DashboardSettings::parse(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                let err = DashboardError::PersistenceRead {
                    key: SETTINGS_KEY.to_string(),
                    reason: e.to_string(),
                };
                warn!(error = %err, "Stored settings are malformed, using defaults");
                DashboardSettings::default()
            }
        }
    }

    pub async fn save(&self, settings: &DashboardSettings) {
        let result = match serde_json::to_string(settings) {
            Ok(raw) => self.store.set(SETTINGS_KEY, raw).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            let err = DashboardError::PersistenceWrite {
                key: SETTINGS_KEY.to_string(),
                reason: e.to_string(),
            };
            warn!(error = %err, "Settings were not saved");
        }
    }
}
