pub mod caching;
pub mod exchange_rate_api;
