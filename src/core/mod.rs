//! Core dashboard logic and abstractions

pub mod cache;
pub mod config;
pub mod currency;
pub mod dashboard;
pub mod error;
pub mod log;
pub mod settings;
pub mod store;

// Re-export main types for cleaner imports
pub use currency::{CurrencyRate, RateSource};
pub use dashboard::{Comparison, Dashboard, DisplayMode, Freshness, LoadState};
pub use error::DashboardError;
pub use store::KeyValueStore;
