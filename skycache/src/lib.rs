// Public API
pub mod clock;
pub mod domain;
pub mod lookup;
pub mod ports;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-util"))]
pub use clock::ManualClock;
pub use domain::{CacheEntry, LocationKey, WeatherPayload};
pub use lookup::{Lookup, LookupSource, WeatherLookupService};
pub use ports::{WeatherCache, WeatherProvider};
