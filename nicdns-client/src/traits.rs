use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::{TokenCacheKey, TokenState};

/// Persistence for access tokens, shared between client instances.
///
/// Implementations:
/// - [`FileTokenStore`](crate::FileTokenStore): one JSON file per service/zone
/// - [`MemoryTokenStore`](crate::MemoryTokenStore): process-local map
///
/// The token lifecycle manager treats a failed `load` as a cache miss and a
/// failed `save` as a warning, so implementations may report errors freely.
/// No locking is expected: concurrent writers race and the last one wins.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the cached token for `key`.
    ///
    /// # Returns
    /// * `Ok(Some(state))` - a token is cached
    /// * `Ok(None)` - nothing is cached for this key
    async fn load(&self, key: &TokenCacheKey) -> Result<Option<TokenState>>;

    /// Replace the cached token for `key`.
    async fn save(&self, key: &TokenCacheKey, state: &TokenState) -> Result<()>;
}

/// Source of the current time for token expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
