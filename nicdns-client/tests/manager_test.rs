//! Manager tests against a mock API server.
//!
//! Run with:
//! ```bash
//! cargo test -p nicdns-client --test manager_test
//! ```

mod common;

use std::sync::Arc;

use chrono::TimeDelta;
use common::{
    AUTH_PATH, ManualClock, ZONE_PATH, hits, last_body, login_count, manager_for, mount_default_ttl,
    mount_login, t0,
};
use nicdns_client::{
    AddRecordsRequest, BodyFormat, ClientError, FileTokenStore, MemoryTokenStore, RecordData, SoaData,
    TokenCacheKey, TokenState, TokenStore, ZoneRecord,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const XML: &str = "text/xml; charset=UTF-8";

async fn mount(server: &MockServer, verb: &str, request_path: &str, response: ResponseTemplate) {
    Mock::given(method(verb))
        .and(path(request_path))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn seeded_store(token: &str, expires_in: u64) -> Arc<MemoryTokenStore> {
    let store = Arc::new(MemoryTokenStore::new());
    let state = TokenState {
        access_token: token.to_string(),
        expires_in,
        refresh_token: "R".to_string(),
        ..TokenState::issued_at(t0())
    };
    let key = TokenCacheKey::new(common::SERVICE, common::ZONE);
    let saved = store.save(&key, &state).await;
    assert!(saved.is_ok(), "seeding failed: {saved:?}");
    store
}

// ============ Token lifecycle ============

#[tokio::test]
async fn test_token_reused_until_expiry() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    mount_default_ttl(&server, 3600).await;
    let clock = ManualClock::new(t0());
    let manager = manager_for(&server, Arc::new(MemoryTokenStore::new()), clock.clone());

    let ttl = require_ok!(manager.get_default_ttl().await);
    assert_eq!(ttl, 3600);
    assert_eq!(login_count(&server).await, 1);

    clock.set(t0() + TimeDelta::seconds(1800));
    require_ok!(manager.get_default_ttl().await);
    assert_eq!(login_count(&server).await, 1, "token should be reused");

    clock.set(t0() + TimeDelta::seconds(3601));
    require_ok!(manager.get_default_ttl().await);
    assert_eq!(login_count(&server).await, 2, "expired token should be refreshed once");
    assert_eq!(hits(&server, &format!("{ZONE_PATH}/default-ttl")).await, 3);
}

#[tokio::test]
async fn test_login_iff_expired() {
    let server = MockServer::start().await;
    mount_login(&server, "NEW", 3600).await;

    for offset in [0_i64, 1, 1799, 3599, 3600, 3601, 86_400] {
        let before = login_count(&server).await;
        let clock = ManualClock::new(t0() + TimeDelta::seconds(offset));
        let manager = manager_for(&server, seeded_store("OLD", 3600).await, clock);

        require_ok!(manager.ensure_valid_token().await);

        let expected = usize::from(offset >= 3600);
        assert_eq!(
            login_count(&server).await - before,
            expected,
            "offset {offset}s"
        );
        let token = manager.token_state().await.access_token;
        assert_eq!(token, if expected == 1 { "NEW" } else { "OLD" });
    }
}

#[tokio::test]
async fn test_zero_lifetime_never_refreshes() {
    let server = MockServer::start().await;
    mount_login(&server, "NEW", 3600).await;
    let clock = ManualClock::new(t0() + TimeDelta::days(3650));
    let manager = manager_for(&server, seeded_store("FOREVER", 0).await, clock);

    require_ok!(manager.ensure_valid_token().await);
    assert_eq!(login_count(&server).await, 0);
}

#[tokio::test]
async fn test_login_defaults_are_sent_and_persisted() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    let store = Arc::new(MemoryTokenStore::new());
    let manager = manager_for(&server, store.clone(), ManualClock::new(t0()));

    let state = require_ok!(manager.login("", "").await);
    assert_eq!(state.grant_type, "password");
    assert_eq!(state.scope, ".*");
    assert_eq!(state.token_time, t0());

    let body = require_some!(last_body(&server, AUTH_PATH).await);
    assert!(body.contains("grant_type=password"), "body: {body}");
    assert!(body.contains("scope=.%2A"), "body: {body}");
    assert!(body.contains("username=123%2FNIC-D"), "body: {body}");
    assert!(body.contains("client_id=app-login"), "body: {body}");

    let key = TokenCacheKey::new(common::SERVICE, common::ZONE);
    let cached = require_some!(require_ok!(store.load(&key).await));
    assert_eq!(cached, state);
    assert_eq!(cached.access_token, "T");
    assert_eq!(cached.expires_in, 3600);
}

#[tokio::test]
async fn test_login_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"access_token":"T","expires_in":3600,"refresh_token":"R"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;
    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::new()),
        ManualClock::new(t0()),
    );

    require_ok!(manager.login("", "").await);

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert!(
        !requests[0].headers.contains_key("authorization"),
        "token request must not carry a bearer token"
    );
}

#[tokio::test]
async fn test_explicit_scope_is_reused_on_refresh() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 60).await;
    mount_default_ttl(&server, 600).await;
    let clock = ManualClock::new(t0());
    let manager = manager_for(&server, Arc::new(MemoryTokenStore::new()), clock.clone());

    require_ok!(manager.login("password", "GET:/dns-master/.+").await);
    clock.advance(61);
    require_ok!(manager.get_default_ttl().await);

    assert_eq!(login_count(&server).await, 2);
    let body = require_some!(last_body(&server, AUTH_PATH).await);
    assert!(
        body.contains("scope=GET%3A%2Fdns-master%2F.%2B"),
        "body: {body}"
    );
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = MockServer::start().await;
    mount_login(&server, "secret-token", 3600).await;
    Mock::given(method("POST"))
        .and(path(format!("{ZONE_PATH}/commit")))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::new()),
        ManualClock::new(t0()),
    );

    require_ok!(manager.commit().await);
}

#[tokio::test]
async fn test_failed_login_aborts_operation() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        AUTH_PATH,
        ResponseTemplate::new(401).set_body_raw(
            r#"{"error":"invalid_grant","error_description":"bad credentials"}"#,
            "application/json",
        ),
    )
    .await;
    mount_default_ttl(&server, 600).await;
    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::new()),
        ManualClock::new(t0()),
    );

    let res = manager.get_default_ttl().await;
    assert!(
        matches!(&res, Err(ClientError::Api(api)) if api.status == 401),
        "unexpected: {res:?}"
    );
    if let Err(e) = &res {
        assert_eq!(
            e.to_string(),
            "HTTP status: 401, errors: invalid_grant: bad credentials"
        );
    }
    assert_eq!(hits(&server, &format!("{ZONE_PATH}/default-ttl")).await, 0);
}

#[tokio::test]
async fn test_token_response_without_access_token_fails() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        AUTH_PATH,
        ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
    )
    .await;
    mount(&server, "POST", &format!("{ZONE_PATH}/commit"), ResponseTemplate::new(200)).await;
    let store = seeded_store("OLD", 60).await;
    let clock = ManualClock::new(t0());
    clock.advance(61);
    let manager = manager_for(&server, store.clone(), clock);

    let res = manager.ensure_valid_token().await;
    assert!(
        matches!(&res, Err(ClientError::ParseError { format: BodyFormat::Json, .. })),
        "unexpected: {res:?}"
    );
    let res = manager.commit().await;
    assert!(
        matches!(&res, Err(ClientError::ParseError { .. })),
        "unexpected: {res:?}"
    );

    assert_eq!(login_count(&server).await, 2);
    assert_eq!(hits(&server, &format!("{ZONE_PATH}/commit")).await, 0);
    let key = TokenCacheKey::new(common::SERVICE, common::ZONE);
    let cached = require_some!(require_ok!(store.load(&key).await));
    assert_eq!(cached.access_token, "OLD");
}

#[tokio::test]
async fn test_cached_scope_is_used_for_refresh() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    mount_default_ttl(&server, 600).await;
    let store = Arc::new(MemoryTokenStore::new());
    let key = TokenCacheKey::new(common::SERVICE, common::ZONE);
    let state = TokenState {
        access_token: "OLD".to_string(),
        expires_in: 60,
        grant_type: "password".to_string(),
        scope: "GET:/dns-master/.+".to_string(),
        ..TokenState::issued_at(t0())
    };
    require_ok!(store.save(&key, &state).await);
    let clock = ManualClock::new(t0());
    clock.advance(61);
    let manager = manager_for(&server, store.clone(), clock);

    require_ok!(manager.get_default_ttl().await);

    assert_eq!(login_count(&server).await, 1);
    let body = require_some!(last_body(&server, AUTH_PATH).await);
    assert!(
        body.contains("scope=GET%3A%2Fdns-master%2F.%2B"),
        "body: {body}"
    );
    let cached = require_some!(require_ok!(store.load(&key).await));
    assert_eq!(cached.scope, "GET:/dns-master/.+");
}

// ============ Token cache sharing ============

#[tokio::test]
async fn test_file_store_is_shared_between_managers() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    mount_default_ttl(&server, 600).await;
    let clock = ManualClock::new(t0());

    let first = manager_for(&server, Arc::new(FileTokenStore::new(dir.path())), clock.clone());
    let second = manager_for(&server, Arc::new(FileTokenStore::new(dir.path())), clock.clone());

    require_ok!(first.get_default_ttl().await);
    require_ok!(second.get_default_ttl().await);

    assert_eq!(login_count(&server).await, 1);
    assert!(dir.path().join("~SVC-example.ru.json").exists());
    assert_eq!(second.token_state().await.access_token, "T");
}

#[tokio::test]
async fn test_corrupt_cache_is_treated_as_miss() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("~SVC-example.ru.json");
    std::fs::write(&cache, "{ definitely not json").unwrap();
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    mount_default_ttl(&server, 600).await;
    let manager = manager_for(
        &server,
        Arc::new(FileTokenStore::new(dir.path())),
        ManualClock::new(t0()),
    );

    require_ok!(manager.get_default_ttl().await);
    assert_eq!(login_count(&server).await, 1);
    let rewritten = std::fs::read_to_string(&cache).unwrap_or_default();
    assert!(rewritten.contains("\"access_token\": \"T\""), "cache: {rewritten}");
}

#[tokio::test]
async fn test_cache_save_failure_does_not_fail_login() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    mount_default_ttl(&server, 600).await;
    let manager = manager_for(
        &server,
        Arc::new(FileTokenStore::new(dir.path().join("missing").join("dir"))),
        ManualClock::new(t0()),
    );

    let ttl = require_ok!(manager.get_default_ttl().await);
    assert_eq!(ttl, 600);
    assert_eq!(manager.token_state().await.access_token, "T");
}

// ============ Response classification ============

#[tokio::test]
async fn test_xml_error_lists_codes() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    mount(
        &server,
        "POST",
        &format!("{ZONE_PATH}/commit"),
        ResponseTemplate::new(400).set_body_raw(
            r#"<response><status>fail</status><errors><error><error code="55">no domain</error></error></errors></response>"#,
            XML,
        ),
    )
    .await;
    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::new()),
        ManualClock::new(t0()),
    );

    let res = manager.commit().await;
    assert!(res.is_err(), "expected an error");
    let Err(err) = res else {
        return;
    };
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("(55)"), "rendered: {err}");
    assert!(err.to_string().contains("no domain"), "rendered: {err}");
}

#[tokio::test]
async fn test_unsupported_success_content_type() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    mount(
        &server,
        "GET",
        ZONE_PATH,
        ResponseTemplate::new(200).set_body_raw("$ORIGIN example.ru.", "application/octet-stream"),
    )
    .await;
    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::new()),
        ManualClock::new(t0()),
    );

    let res = manager.get_zone_file().await;
    assert!(
        matches!(
            &res,
            Err(ClientError::UnsupportedContentType { status: 200, content_type })
                if content_type == "application/octet-stream"
        ),
        "unexpected: {res:?}"
    );
}

#[tokio::test]
async fn test_unsupported_error_content_type() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    mount(
        &server,
        "GET",
        &format!("{ZONE_PATH}/revisions"),
        ResponseTemplate::new(502).set_body_raw("<html>Bad Gateway</html>", "text/html"),
    )
    .await;
    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::new()),
        ManualClock::new(t0()),
    );

    let res = manager.list_revisions().await;
    assert!(
        matches!(
            &res,
            Err(ClientError::UnsupportedErrorContentType { status: 502, body, .. })
                if body.contains("Bad Gateway")
        ),
        "unexpected: {res:?}"
    );
}

#[tokio::test]
async fn test_transport_failure_is_network_error() {
    let manager = require_ok!(
        nicdns_client::DnsManager::builder(common::test_credentials(), "SVC", "example.ru")
            .base_url("http://127.0.0.1:9")
            .token_store(Arc::new(MemoryTokenStore::new()))
            .build()
    );

    let res = manager.commit().await;
    assert!(
        matches!(
            &res,
            Err(ClientError::NetworkError { .. } | ClientError::Timeout { .. })
        ),
        "unexpected: {res:?}"
    );
}

// ============ Operation catalog ============

#[tokio::test]
async fn test_set_default_ttl_request() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    let ttl_path = format!("{ZONE_PATH}/default-ttl");
    mount(&server, "POST", &ttl_path, ResponseTemplate::new(200)).await;
    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::new()),
        ManualClock::new(t0()),
    );

    require_ok!(manager.set_default_ttl(1800).await);

    let requests = server.received_requests().await.unwrap_or_default();
    let request = require_some!(requests.iter().find(|r| r.url.path() == ttl_path));
    assert_eq!(
        request.headers.get("content-type").and_then(|v| v.to_str().ok()),
        Some("text/xml; charset=UTF-8")
    );
    assert_eq!(
        String::from_utf8_lossy(&request.body),
        "<request><default-ttl>1800</default-ttl></request>"
    );
}

#[tokio::test]
async fn test_add_records_request() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    let records_path = format!("{ZONE_PATH}/records");
    mount(&server, "PUT", &records_path, ResponseTemplate::new(200)).await;
    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::new()),
        ManualClock::new(t0()),
    );

    let request = AddRecordsRequest::default().with_record(
        ZoneRecord::new(
            "www",
            RecordData::A {
                address: "192.0.2.10".to_string(),
            },
        )
        .with_ttl(300),
    );
    require_ok!(manager.add_records(&request).await);

    let requests = server.received_requests().await.unwrap_or_default();
    let sent = require_some!(requests.iter().find(|r| r.url.path() == records_path));
    assert_eq!(sent.method.as_str(), "PUT");
    assert_eq!(
        sent.headers.get("content-type").and_then(|v| v.to_str().ok()),
        Some("text/plain; charset=UTF-8")
    );
    assert_eq!(
        String::from_utf8_lossy(&sent.body),
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" ?>"#,
            "<request><rr-list><rr><name>www</name><type>A</type><ttl>300</ttl>",
            "<a>192.0.2.10</a></rr></rr-list></request>"
        )
    );
}

#[tokio::test]
async fn test_zone_file_round_trip() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    let zone_file = "$ORIGIN example.ru.\n@ 3600 IN A 192.0.2.1\n";
    mount(
        &server,
        "GET",
        ZONE_PATH,
        ResponseTemplate::new(200).set_body_raw(zone_file, "text/plain; charset=UTF-8"),
    )
    .await;
    mount(&server, "POST", ZONE_PATH, ResponseTemplate::new(200)).await;
    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::new()),
        ManualClock::new(t0()),
    );

    let fetched = require_ok!(manager.get_zone_file().await);
    assert_eq!(fetched, zone_file.as_bytes());

    require_ok!(manager.put_zone_file(fetched).await);
    assert_eq!(last_body(&server, ZONE_PATH).await.as_deref(), Some(zone_file));
}

#[tokio::test]
async fn test_commit_rollback_and_delete_paths() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    for (verb, suffix) in [
        ("POST", "/commit"),
        ("POST", "/rollback"),
        ("DELETE", "/records/210075"),
        ("POST", "/revisions/7"),
    ] {
        Mock::given(method(verb))
            .and(path(format!("{ZONE_PATH}{suffix}")))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
    }
    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::new()),
        ManualClock::new(t0()),
    );

    require_ok!(manager.commit().await);
    require_ok!(manager.rollback().await);
    require_ok!(manager.delete_record("210075").await);
    require_ok!(manager.set_revision(7).await);

    let requests = server.received_requests().await.unwrap_or_default();
    let set_revision = require_some!(
        requests
            .iter()
            .find(|r| r.url.path() == format!("{ZONE_PATH}/revisions/7"))
    );
    assert!(set_revision.body.is_empty());
    assert_eq!(
        set_revision
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("text/xml; charset=UTF-8")
    );
}

#[tokio::test]
async fn test_delete_record_without_id_sends_nothing() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    mount(&server, "DELETE", &format!("{ZONE_PATH}/records/"), ResponseTemplate::new(200)).await;
    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::new()),
        ManualClock::new(t0()),
    );

    let res = manager.delete_record("").await;
    assert!(
        matches!(&res, Err(ClientError::InvalidRequest { .. })),
        "unexpected: {res:?}"
    );
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty(), "sent: {requests:?}");
}

#[tokio::test]
async fn test_list_zones() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    mount(
        &server,
        "GET",
        "/dns-master/services/SVC/zones",
        ResponseTemplate::new(200).set_body_raw(
            r#"<?xml version="1.0" encoding="UTF-8" ?>
<response><status>success</status><data>
<zone admin="123/NIC-REG" enable="true" has-changes="false" has-primary="true" id="228095" idn-name="example.ru" name="example.ru" payer="123/NIC-REG" service="SVC"/>
<zone admin="123/NIC-REG" enable="false" has-changes="true" has-primary="false" id="228096" idn-name="пример.рф" name="xn--e1afmkfd.xn--p1ai" payer="123/NIC-REG" service="SVC"/>
</data></response>"#,
            XML,
        ),
    )
    .await;
    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::new()),
        ManualClock::new(t0()),
    );

    let zones = require_ok!(manager.list_zones().await);
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0].name, "example.ru");
    assert!(zones[0].enable);
    assert!(zones[0].has_primary);
    assert!(!zones[0].has_changes);
    assert_eq!(zones[1].idn_name, "пример.рф");
    assert!(zones[1].has_changes);
}

#[tokio::test]
async fn test_list_revisions_preserves_order() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    mount(
        &server,
        "GET",
        &format!("{ZONE_PATH}/revisions"),
        ResponseTemplate::new(200).set_body_raw(
            r#"<?xml version="1.0" encoding="UTF-8" ?> <response>
<status>success</status>
<data><revision date="2013-04-01 18:36:57" ip="192.168.125.12" number="3" />
<revision date="2013-04-01 18:36:57" ip="192.168.125.12" number="2" />
<revision date="2013-04-01 18:36:56" ip="no data" number="1" />
</data>
</response>"#,
            XML,
        ),
    )
    .await;
    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::new()),
        ManualClock::new(t0()),
    );

    let revisions = require_ok!(manager.list_revisions().await);
    let numbers: Vec<u64> = revisions.iter().map(|r| r.number).collect();
    assert_eq!(numbers, vec![3, 2, 1]);
    assert_eq!(revisions[0].date, "2013-04-01 18:36:57");
    assert_eq!(revisions[0].ip, "192.168.125.12");
    assert_eq!(revisions[2].date, "2013-04-01 18:36:56");
    assert_eq!(revisions[2].ip, "no data");
}

#[tokio::test]
async fn test_get_revision_text() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    mount(
        &server,
        "GET",
        &format!("{ZONE_PATH}/revisions/2"),
        ResponseTemplate::new(200)
            .set_body_raw("$ORIGIN example.ru.\n", "text/plain; charset=UTF-8"),
    )
    .await;
    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::new()),
        ManualClock::new(t0()),
    );

    let text = require_ok!(manager.get_revision(2).await);
    assert_eq!(text, "$ORIGIN example.ru.\n");
}

#[tokio::test]
async fn test_list_records() {
    let server = MockServer::start().await;
    mount_login(&server, "T", 3600).await;
    mount(
        &server,
        "GET",
        &format!("{ZONE_PATH}/records"),
        ResponseTemplate::new(200).set_body_raw(
            r#"<?xml version="1.0" encoding="UTF-8" ?>
<response><status>success</status><data>
<zone admin="123/NIC-REG" has-changes="true" id="228095" idn-name="example.ru" name="example.ru" service="SVC">
<rr id="1"><name>@</name><idn-name>@</idn-name><type>SOA</type><soa><mname><name>ns3-l2.nic.ru.</name></mname><rname><name>dns.nic.ru.</name></rname><serial>2011112002</serial><refresh>1440</refresh><retry>3600</retry><expire>2592000</expire><minimum>600</minimum></soa></rr>
<rr id="2"><name>@</name><idn-name>@</idn-name><type>NS</type><ns><name>ns3-l2.nic.ru.</name></ns></rr>
<rr id="3"><name>mail</name><type>MX</type><ttl>600</ttl><mx><preference>10</preference><exchange><name>mx.example.ru.</name></exchange></mx></rr>
<rr id="4"><name>_sip._tcp</name><type>SRV</type><srv><priority>0</priority><weight>5</weight><port>5060</port><target><name>sip.example.ru.</name></target></srv></rr>
<rr id="5"><name>@</name><type>TXT</type><txt><string>v=spf1 -all</string></txt></rr>
</zone></data></response>"#,
            XML,
        ),
    )
    .await;
    let manager = manager_for(
        &server,
        Arc::new(MemoryTokenStore::new()),
        ManualClock::new(t0()),
    );

    let records = require_ok!(manager.list_records().await);
    assert_eq!(records.len(), 5);
    assert_eq!(
        records[0].data,
        RecordData::SOA(SoaData {
            mname: "ns3-l2.nic.ru.".to_string(),
            rname: "dns.nic.ru.".to_string(),
            serial: 2_011_112_002,
            refresh: 1440,
            retry: 3600,
            expire: 2_592_000,
            minimum: 600,
        })
    );
    assert_eq!(records[1].id.as_deref(), Some("2"));
    assert_eq!(
        records[2].data,
        RecordData::MX {
            preference: 10,
            exchange: "mx.example.ru.".to_string()
        }
    );
    assert_eq!(records[2].ttl.as_deref(), Some("600"));
    assert_eq!(
        records[3].data,
        RecordData::SRV {
            priority: 0,
            weight: 5,
            port: 5060,
            target: "sip.example.ru.".to_string()
        }
    );
    assert_eq!(records[4].data.display_value(), "v=spf1 -all");
}
