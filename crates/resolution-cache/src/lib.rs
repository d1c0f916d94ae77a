//! Bounded, time-windowed memoization for backend lookups.
//!
//! [`MemoizedCache`] remembers the result of an idempotent lookup per
//! argument key. Entries older than the configured TTL are recomputed on
//! their next access, with the caller waiting for the fresh value. When the
//! table grows beyond `max_items` it is cleared as a whole before the next
//! lookup; there is no per-entry eviction.
//!
//! # Example
//!
//! ```rust
//! use resolution_cache::{MemoizeConfig, MemoizedCache};
//! use std::time::Duration;
//!
//! let config = MemoizeConfig::builder()
//!     .max_items(100)
//!     .ttl(Duration::from_secs(30))
//!     .build();
//! let cache: MemoizedCache<String, usize> = MemoizedCache::new(&config);
//!
//! let len = cache.call("hub1".to_string(), |key| key.len());
//! assert_eq!(len, 4);
//! assert_eq!(cache.stats().misses, 1);
//! ```

pub mod clock;
pub mod config;
pub mod memoize;
pub mod stats;

pub use clock::{Clock, SystemClock};
pub use config::MemoizeConfig;
pub use memoize::MemoizedCache;
pub use stats::CacheStats;
