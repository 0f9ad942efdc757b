//! Zone manager bound to one service and zone.

mod auth;
mod http;
mod operations;
mod types;

use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http_client::HttpDispatcher;
use crate::token_store::FileTokenStore;
use crate::traits::{Clock, SystemClock, TokenStore};
use crate::types::{Credentials, TokenCacheKey, TokenState};

use auth::TokenManager;

pub use operations::{Operation, PathTemplate, ResponseShape, catalog};
pub use types::AddRecordsRequest;

/// Client for one service/zone pair of the zone-management API.
///
/// Every operation first makes sure a valid access token is available,
/// logging in when the cached one is missing or expired, and then performs
/// exactly one API call. Nothing is retried.
pub struct DnsManager {
    pub(crate) dispatcher: HttpDispatcher,
    pub(crate) tokens: TokenManager,
    pub(crate) service: String,
    pub(crate) zone: String,
    pub(crate) config: ClientConfig,
}

/// [`DnsManager`] builder
pub struct DnsManagerBuilder {
    credentials: Credentials,
    service: String,
    zone: String,
    config: ClientConfig,
    store: Option<Arc<dyn TokenStore>>,
    clock: Option<Arc<dyn Clock>>,
}

impl DnsManagerBuilder {
    fn new(credentials: Credentials, service: String, zone: String) -> Self {
        Self {
            credentials,
            service,
            zone,
            config: ClientConfig::default(),
            store: None,
            clock: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn api_root(mut self, api_root: impl Into<String>) -> Self {
        self.config.api_root = api_root.into();
        self
    }

    pub fn auth_path(mut self, auth_path: impl Into<String>) -> Self {
        self.config.auth_path = auth_path.into();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    pub fn grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.config.grant_type = grant_type.into();
        self
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.config.scope = scope.into();
        self
    }

    /// Token cache; defaults to a [`FileTokenStore`] in the working directory.
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<DnsManager> {
        let dispatcher = HttpDispatcher::new(&self.config)?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(FileTokenStore::default()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let tokens = TokenManager::new(
            self.credentials,
            TokenCacheKey::new(self.service.as_str(), self.zone.as_str()),
            self.config.auth_path.clone(),
            store,
            clock,
            self.config.grant_type.clone(),
            self.config.scope.clone(),
        );
        Ok(DnsManager {
            dispatcher,
            tokens,
            service: self.service,
            zone: self.zone,
            config: self.config,
        })
    }
}

impl DnsManager {
    /// A manager with the default configuration.
    pub fn new(
        credentials: Credentials,
        service: impl Into<String>,
        zone: impl Into<String>,
    ) -> Result<Self> {
        Self::builder(credentials, service, zone).build()
    }

    pub fn builder(
        credentials: Credentials,
        service: impl Into<String>,
        zone: impl Into<String>,
    ) -> DnsManagerBuilder {
        DnsManagerBuilder::new(credentials, service.into(), zone.into())
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        self.tokens.credentials()
    }

    /// Key of the token shared with other clients of this service/zone.
    pub fn cache_key(&self) -> &TokenCacheKey {
        self.tokens.cache_key()
    }

    /// Snapshot of the in-memory token.
    pub async fn token_state(&self) -> TokenState {
        self.tokens.token_state().await
    }

    /// Make sure a valid token is held, logging in if needed.
    pub async fn ensure_valid_token(&self) -> Result<()> {
        self.tokens
            .ensure_valid_token(&self.dispatcher)
            .await
            .map(|_| ())
    }

    /// Obtain a new token unconditionally.
    ///
    /// Empty `grant_type`/`scope` fall back to `password` and `.*`. The values
    /// used are kept for the automatic logins that follow.
    pub async fn login(&self, grant_type: &str, scope: &str) -> Result<TokenState> {
        self.tokens.login(&self.dispatcher, grant_type, scope).await
    }
}

impl std::fmt::Debug for DnsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsManager")
            .field("service", &self.service)
            .field("zone", &self.zone)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
