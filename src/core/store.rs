//! Key-value persistence abstraction shared by the settings and rate repositories

use anyhow::Result;
use async_trait::async_trait;

/// An opaque string store, the equivalent of browser local storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
}
