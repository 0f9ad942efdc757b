//! Token lifecycle: cache lookup, expiry check and password-grant login.

use std::sync::Arc;

use reqwest::Method;
use tokio::sync::Mutex;

use crate::config::login_params;
use crate::decode::{BodyFormat, Structured};
use crate::error::{ClientError, Result};
use crate::http_client::{ApiRequest, HttpDispatcher, RequestContentType};
use crate::traits::{Clock, TokenStore};
use crate::types::{Credentials, TokenCacheKey, TokenState};
use crate::utils::log_sanitizer::mask_secret;

use super::types::AuthResponse;

/// In-memory token plus the login parameters automatic refreshes reuse.
struct Session {
    token: TokenState,
    grant_type: String,
    scope: String,
}

impl Session {
    /// Take over a cached token together with the login parameters it was
    /// issued for.
    fn adopt(&mut self, cached: TokenState) {
        if !cached.grant_type.is_empty() {
            self.grant_type.clone_from(&cached.grant_type);
        }
        if !cached.scope.is_empty() {
            self.scope.clone_from(&cached.scope);
        }
        self.token = cached;
    }
}

pub(crate) struct TokenManager {
    credentials: Credentials,
    key: TokenCacheKey,
    auth_path: String,
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
    session: Mutex<Session>,
}

impl TokenManager {
    pub fn new(
        credentials: Credentials,
        key: TokenCacheKey,
        auth_path: String,
        store: Arc<dyn TokenStore>,
        clock: Arc<dyn Clock>,
        grant_type: String,
        scope: String,
    ) -> Self {
        Self {
            credentials,
            key,
            auth_path,
            store,
            clock,
            session: Mutex::new(Session {
                token: TokenState::default(),
                grant_type,
                scope,
            }),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn cache_key(&self) -> &TokenCacheKey {
        &self.key
    }

    pub async fn token_state(&self) -> TokenState {
        self.session.lock().await.token.clone()
    }

    /// Return an access token usable for the next call.
    ///
    /// The shared cache is consulted first and replaces the in-memory token
    /// when it holds one. A login happens only if the resulting token is
    /// empty or expired.
    pub async fn ensure_valid_token(&self, dispatcher: &HttpDispatcher) -> Result<String> {
        let mut session = self.session.lock().await;

        match self.store.load(&self.key).await {
            Ok(Some(cached)) => session.adopt(cached),
            Ok(None) => {}
            Err(e) => log::warn!("[nicdns] Ignoring token cache for {}: {e}", self.key),
        }

        if !session.token.is_valid_at(self.clock.now()) {
            log::debug!("[nicdns] Token for {} is missing or expired, logging in", self.key);
            let grant_type = session.grant_type.clone();
            let scope = session.scope.clone();
            self.login_locked(&mut session, dispatcher, &grant_type, &scope)
                .await?;
        }

        Ok(session.token.access_token.clone())
    }

    /// Log in with the given grant type and scope, empty values meaning the
    /// defaults. The parameters are remembered for later automatic logins.
    pub async fn login(
        &self,
        dispatcher: &HttpDispatcher,
        grant_type: &str,
        scope: &str,
    ) -> Result<TokenState> {
        let mut session = self.session.lock().await;
        self.login_locked(&mut session, dispatcher, grant_type, scope)
            .await?;
        Ok(session.token.clone())
    }

    async fn login_locked(
        &self,
        session: &mut Session,
        dispatcher: &HttpDispatcher,
        grant_type: &str,
        scope: &str,
    ) -> Result<()> {
        let (grant_type, scope) = login_params(grant_type, scope);
        session.grant_type = grant_type.to_string();
        session.scope = scope.to_string();

        let mut token = TokenState::issued_at(self.clock.now());
        session.token = token.clone();

        let form = self.login_form(grant_type, scope);
        let request = ApiRequest::new(Method::POST, self.auth_path.as_str(), RequestContentType::Form)
            .with_body(form);

        log::debug!(
            "[nicdns] Logging in as {} (client {})",
            self.credentials.contract_login,
            self.credentials.app_login
        );
        let response = dispatcher
            .execute(request, None)
            .await?
            .into_api_response::<Structured<AuthResponse>>()?;
        let auth = response.body.into_inner();
        if auth.access_token.is_empty() {
            return Err(ClientError::parse(
                BodyFormat::Json,
                "token response without access_token",
            ));
        }

        token.access_token = auth.access_token;
        token.expires_in = auth.expires_in;
        token.refresh_token = auth.refresh_token;
        token.grant_type = grant_type.to_string();
        token.scope = scope.to_string();
        log::debug!(
            "[nicdns] Received token {} (expires in {}s)",
            mask_secret(&token.access_token),
            token.expires_in
        );

        if let Err(e) = self.store.save(&self.key, &token).await {
            log::warn!("[nicdns] Failed to cache token for {}: {e}", self.key);
        }
        session.token = token;
        Ok(())
    }

    fn login_form(&self, grant_type: &str, scope: &str) -> String {
        [
            ("grant_type", grant_type),
            ("password", self.credentials.contract_pwd.as_str()),
            ("username", self.credentials.contract_login.as_str()),
            ("client_id", self.credentials.app_login.as_str()),
            ("client_secret", self.credentials.app_pwd.as_str()),
            ("scope", scope),
        ]
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
    }
}
