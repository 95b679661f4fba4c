pub mod fetch;

// Re-export the adapter entry point (e.g. `use crate::market_data::fetch_market_data`).
pub use fetch::fetch_market_data;
