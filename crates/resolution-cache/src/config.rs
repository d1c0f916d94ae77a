use std::time::Duration;
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_ITEMS: usize = 1_000;
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Bounds of a [`MemoizedCache`][crate::MemoizedCache].
#[derive(Debug, Clone, TypedBuilder)]
pub struct MemoizeConfig {
    /// Number of entries the table may exceed before it is cleared.
    #[builder(default = DEFAULT_MAX_ITEMS)]
    pub max_items: usize,
    /// Age after which an entry is recomputed on access.
    #[builder(default = DEFAULT_TTL)]
    pub ttl: Duration,
}

impl Default for MemoizeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
