use serde_json::{json, Value};
use shopify_sync::config::{PosthogConfig, ShopifyConfig, SyncConfig};
use shopify_sync::output::{load_statistics, CaptureEvent, EventSink, PosthogSink, RecordingSink};
use shopify_sync::state::ResumeCursor;
use shopify_sync::storage::{MemoryCache, SqliteStore};
use shopify_sync::sync::{
    build_http_client, ReqwestTransport, CUSTOMER_CREATED, ORDER_CREATED, ORDER_UPDATED,
};
use shopify_sync::{Collaborators, ConfigError, RunOutcome, ShopifySync, SyncError};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const ORDERS_PATH: &str = "/admin/api/2022-01/orders.json";

/// Matches the first page of a run, which carries no `page_info`
struct FirstPage;

impl Match for FirstPage {
    fn matches(&self, request: &Request) -> bool {
        request.url.path() == ORDERS_PATH
            && !request.url.query_pairs().any(|(key, _)| key == "page_info")
            && request
                .url
                .query_pairs()
                .any(|(key, value)| key == "limit" && value == "250")
    }
}

fn shopify_config(server: &MockServer) -> ShopifyConfig {
    let mut config = ShopifyConfig::new("posthog-store", "shpat_test");
    config.base_url = Some(server.uri());
    config
}

fn sync_config() -> SyncConfig {
    SyncConfig {
        snooze_ttl_secs: 1,
        snooze_poll_ms: 50,
        ..SyncConfig::default()
    }
}

fn second_page_url(server: &MockServer) -> String {
    format!("{}{}?limit=250&page_info=cGFnZS0y", server.uri(), ORDERS_PATH)
}

fn orders_body(ids: &[u64]) -> Value {
    let orders: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "order_number": 1000 + id,
                "currency": "USD",
                "current_total_price": "19.99",
                "financial_status": "paid",
                "created_at": "2022-01-14T10:00:00-05:00",
                "customer": {"email": format!("buyer{}@example.com", id), "first_name": "Buyer"}
            })
        })
        .collect();
    json!({ "orders": orders })
}

async fn mount_probe(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .and(query_param("limit", "1"))
        .and(header("X-Shopify-Access-Token", "shpat_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"orders": []})))
        .mount(server)
        .await;
}

struct TestEnv {
    _dir: TempDir,
    store: Arc<SqliteStore>,
    sink: Arc<RecordingSink>,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = SqliteStore::new(&dir.path().join("sync.db")).expect("Failed to open DB");
        Self {
            _dir: dir,
            store: Arc::new(store),
            sink: Arc::new(RecordingSink::new()),
        }
    }

    fn collaborators(&self, timeout: Duration) -> Collaborators {
        let client = build_http_client(timeout).expect("Failed to build client");
        Collaborators {
            storage: self.store.clone(),
            cache: Arc::new(MemoryCache::new()),
            sink: self.sink.clone(),
            transport: Arc::new(ReqwestTransport::new(client)),
        }
    }

    async fn setup(&self, server: &MockServer, timeout: Duration) -> ShopifySync {
        ShopifySync::setup(
            &shopify_config(server),
            &sync_config(),
            self.collaborators(timeout),
        )
        .await
        .expect("Setup failed")
    }

    async fn cursor(&self) -> Option<String> {
        ResumeCursor::load(self.store.as_ref())
            .await
            .expect("Failed to read cursor")
    }
}

#[tokio::test]
async fn test_setup_probes_with_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .and(query_param("limit", "1"))
        .and(header("X-Shopify-Access-Token", "shpat_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"orders": []})))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new();
    let sync = env.setup(&server, Duration::from_secs(5)).await;

    assert_eq!(
        sync.endpoint().probe_url(),
        format!("{}{}?limit=1", server.uri(), ORDERS_PATH)
    );
    assert!(env.sink.events().is_empty());
}

#[tokio::test]
async fn test_setup_rejects_refused_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": "[API] Invalid API key or access token (unrecognized login or wrong password)"
        })))
        .mount(&server)
        .await;

    let env = TestEnv::new();
    let result = ShopifySync::setup(
        &shopify_config(&server),
        &sync_config(),
        env.collaborators(Duration::from_secs(5)),
    )
    .await;

    match result {
        Err(SyncError::Config(ConfigError::AuthProbe { status })) => assert_eq!(status, 401),
        Err(other) => panic!("Expected auth probe error, got {}", other),
        Ok(_) => panic!("Setup should fail with a refused token"),
    }
}

#[tokio::test]
async fn test_two_page_sync_end_to_end() {
    let server = MockServer::start().await;
    mount_probe(&server).await;

    let next = second_page_url(&server);
    Mock::given(method("GET"))
        .and(FirstPage)
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(orders_body(&[1, 2]))
                .insert_header("link", format!("<{}>; rel=\"next\"", next).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ORDERS_PATH))
        .and(query_param("page_info", "cGFnZS0y"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_body(&[3])))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new();
    let sync = env.setup(&server, Duration::from_secs(5)).await;
    let report = sync.run_periodic().await.expect("Sync failed");

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.orders_seen, 3);
    assert_eq!(report.emitted.orders_created, 3);
    assert_eq!(report.emitted.customers_created, 3);

    let requests = server.received_requests().await.expect("Recording disabled");
    let page_urls: Vec<String> = requests
        .iter()
        .filter(|r| r.url.query_pairs().any(|(k, v)| k == "limit" && v == "250"))
        .map(|r| r.url.to_string())
        .collect();
    assert_eq!(page_urls.len(), 2);
    assert_eq!(page_urls[1], next);

    let names = env.sink.event_names();
    assert_eq!(names[0], ORDER_CREATED);
    assert_eq!(names[1], CUSTOMER_CREATED);
    let first = &env.sink.events()[0];
    assert_eq!(first.distinct_id, "buyer1@example.com");
    assert_eq!(first.properties["order_number"], json!(1001));

    assert_eq!(env.cursor().await, None);
    let stats = load_statistics(env.store.as_ref()).await.expect("Stats failed");
    assert_eq!(stats.orders_seen, 3);
    assert_eq!(stats.customers_seen, 3);
}

#[tokio::test]
async fn test_second_invocation_reports_updates() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    Mock::given(method("GET"))
        .and(FirstPage)
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_body(&[7])))
        .expect(2)
        .mount(&server)
        .await;

    let env = TestEnv::new();
    let sync = env.setup(&server, Duration::from_secs(5)).await;
    sync.run_periodic().await.expect("First run failed");
    let report = sync.run_periodic().await.expect("Second run failed");

    assert!(!report.resumed);
    assert_eq!(report.emitted.orders_updated, 1);
    assert_eq!(report.emitted.customers_updated, 1);
    let created = env
        .sink
        .event_names()
        .iter()
        .filter(|name| name.as_str() == ORDER_CREATED)
        .count();
    assert_eq!(created, 1);
    assert!(env.sink.event_names().contains(&ORDER_UPDATED.to_string()));
}

#[tokio::test]
async fn test_resume_after_timeout_on_second_page() {
    let server = MockServer::start().await;
    mount_probe(&server).await;

    let next = second_page_url(&server);
    Mock::given(method("GET"))
        .and(FirstPage)
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(orders_body(&[1]))
                .insert_header("link", format!("<{}>; rel=\"next\"", next).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("page_info", "cGFnZS0y"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(orders_body(&[2]))
                .set_delay(Duration::from_secs(2)),
        )
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("page_info", "cGFnZS0y"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_body(&[2])))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new();
    let sync = env.setup(&server, Duration::from_millis(300)).await;

    let err = sync.run_periodic().await.expect_err("Second page should time out");
    assert!(matches!(err, SyncError::Fetch { .. }));
    assert_eq!(env.cursor().await.as_deref(), Some(next.as_str()));
    assert_eq!(env.sink.events().len(), 2);

    let report = sync.run_periodic().await.expect("Resumed run failed");
    assert!(report.resumed);
    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(env.cursor().await, None);
    assert_eq!(env.sink.events().len(), 4);
}

#[tokio::test]
async fn test_rate_limited_page_is_refetched() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    Mock::given(method("GET"))
        .and(FirstPage)
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "2.0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(FirstPage)
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_body(&[5])))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new();
    let sync = env.setup(&server, Duration::from_secs(5)).await;
    let report = sync.run_periodic().await.expect("Sync failed");

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(env.sink.events().len(), 2);
}

#[tokio::test]
async fn test_server_error_keeps_cursor() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    Mock::given(method("GET"))
        .and(FirstPage)
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let env = TestEnv::new();
    let sync = env.setup(&server, Duration::from_secs(5)).await;
    let err = sync.run_periodic().await.expect_err("500 should be fatal");

    assert!(matches!(err, SyncError::UnexpectedStatus { status: 500, .. }));
    assert_eq!(
        env.cursor().await,
        Some(format!("{}{}?limit=250", server.uri(), ORDERS_PATH))
    );

    sync.reset_cursor().await.expect("Reset failed");
    assert_eq!(env.cursor().await, None);
}

#[tokio::test]
async fn test_posthog_sink_posts_capture_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/capture/"))
        .and(body_partial_json(json!({
            "api_key": "phc_test",
            "event": "Created Shopify Order",
            "distinct_id": "buyer@example.com",
            "properties": {"currency": "USD", "distinct_id": "buyer@example.com"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let config = PosthogConfig {
        host: server.uri(),
        api_key: "phc_test".to_string(),
    };
    let sink = PosthogSink::new(reqwest::Client::new(), &config);

    let mut properties = serde_json::Map::new();
    properties.insert("currency".to_string(), json!("USD"));
    sink.capture(CaptureEvent::new(
        ORDER_CREATED,
        "buyer@example.com",
        properties,
    ))
    .await
    .expect("Capture failed");
}

#[tokio::test]
async fn test_posthog_rejection_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/capture/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = PosthogConfig {
        host: server.uri(),
        api_key: "phc_test".to_string(),
    };
    let sink = PosthogSink::new(reqwest::Client::new(), &config);

    let result = sink
        .capture(CaptureEvent::new(
            ORDER_CREATED,
            "buyer@example.com",
            serde_json::Map::new(),
        ))
        .await;
    assert!(result.is_err());
}
