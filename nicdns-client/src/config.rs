//! Client configuration.

use std::time::Duration;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.nic.ru";
/// Prefix of every zone-management path.
pub const DEFAULT_API_ROOT: &str = "/dns-master";
/// OAuth token endpoint path.
pub const DEFAULT_AUTH_PATH: &str = "/oauth/token";
/// Grant type used when none is configured.
pub const DEFAULT_GRANT_TYPE: &str = "password";
/// Scope requested when none is configured.
pub const DEFAULT_SCOPE: &str = ".*";

/// Endpoints, timeouts and login defaults of a [`DnsManager`](crate::DnsManager).
///
/// Timeouts default to `None`, leaving the transport's own behavior in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_root: String,
    pub auth_path: String,
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
    /// Grant type for automatic logins; empty means [`DEFAULT_GRANT_TYPE`].
    pub grant_type: String,
    /// Scope for automatic logins; empty means [`DEFAULT_SCOPE`].
    pub scope: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_root: DEFAULT_API_ROOT.to_string(),
            auth_path: DEFAULT_AUTH_PATH.to_string(),
            connect_timeout: None,
            request_timeout: None,
            user_agent: concat!("nicdns-client/", env!("CARGO_PKG_VERSION")).to_string(),
            grant_type: String::new(),
            scope: String::new(),
        }
    }
}

/// Substitute the login defaults for empty values.
pub(crate) fn login_params<'a>(grant_type: &'a str, scope: &'a str) -> (&'a str, &'a str) {
    let grant_type = if grant_type.is_empty() {
        DEFAULT_GRANT_TYPE
    } else {
        grant_type
    };
    let scope = if scope.is_empty() { DEFAULT_SCOPE } else { scope };
    (grant_type, scope)
}
