//! Shared test helpers: manual clock, mock API server, assertion macros.

#![allow(dead_code)]

use std::env;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use nicdns_client::{Clock, Credentials, DnsManager, TokenStore};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SERVICE: &str = "SVC";
pub const ZONE: &str = "example.ru";
pub const AUTH_PATH: &str = "/oauth/token";
pub const ZONE_PATH: &str = "/dns-master/services/SVC/zones/example.ru";

/// Skip the test when an environment variable is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping test: {} is not set", $var);
                return;
            }
        )+
    };
}

/// Assert that an `Option` is `Some` and unwrap it, failing the test otherwise.
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Assert that a `Result` is `Ok` and unwrap it, failing the test otherwise.
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

// ============ Clock ============

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn set(&self, now: DateTime<Utc>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, secs: i64) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += TimeDelta::seconds(secs);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map_or_else(|_| Utc::now(), |guard| *guard)
    }
}

/// Fixed start time of clock-driven tests.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

// ============ Mock server ============

pub fn test_credentials() -> Credentials {
    Credentials::new("app-login", "app-secret", "123/NIC-D", "contract-secret")
}

/// Manager pointed at the mock server.
pub fn manager_for(
    server: &MockServer,
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
) -> DnsManager {
    DnsManager::builder(test_credentials(), SERVICE, ZONE)
        .base_url(server.uri())
        .token_store(store)
        .clock(clock)
        .build()
        .unwrap_or_else(|e| panic!("failed to build manager: {e}"))
}

/// Token endpoint answering with `token`, valid for `expires_in` seconds.
pub async fn mount_login(server: &MockServer, token: &str, expires_in: u64) {
    let body = format!(
        r#"{{"access_token":"{token}","expires_in":{expires_in},"refresh_token":"R"}}"#
    );
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(server)
        .await;
}

/// `GET {zone}/default-ttl` answering `ttl`.
pub async fn mount_default_ttl(server: &MockServer, ttl: u32) {
    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8" ?><response><status>success</status><data><default-ttl>{ttl}</default-ttl></data></response>"#
    );
    Mock::given(method("GET"))
        .and(path(format!("{ZONE_PATH}/default-ttl")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/xml; charset=UTF-8"))
        .mount(server)
        .await;
}

/// Number of requests the server received for `request_path`.
pub async fn hits(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == request_path)
        .count()
}

pub async fn login_count(server: &MockServer) -> usize {
    hits(server, AUTH_PATH).await
}

/// Body of the last request received for `request_path`, as text.
pub async fn last_body(server: &MockServer, request_path: &str) -> Option<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .rev()
        .find(|r| r.url.path() == request_path)
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
}

// ============ Live API ============

/// Manager for the live API, configured from `NICDNS_*` environment variables.
pub fn live_manager() -> Option<DnsManager> {
    let credentials = Credentials::new(
        env::var("NICDNS_APP_LOGIN").ok()?,
        env::var("NICDNS_APP_PWD").ok()?,
        env::var("NICDNS_CONTRACT_LOGIN").ok()?,
        env::var("NICDNS_CONTRACT_PWD").ok()?,
    );
    let service = env::var("NICDNS_SERVICE").ok()?;
    let zone = env::var("NICDNS_ZONE").ok()?;
    DnsManager::new(credentials, service, zone).ok()
}

/// Unique owner name for records created by live tests.
pub fn generate_test_record_name() -> String {
    let nanos = Utc::now().timestamp_subsec_nanos();
    format!("_test-{nanos:08x}")
}
