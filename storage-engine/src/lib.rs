pub mod moka_cache;

pub use moka_cache::{CacheExpiry, MokaWeatherCache};
