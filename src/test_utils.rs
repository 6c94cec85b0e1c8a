use crate::error::app_error::ClientError;
use crate::gateway::ApiGateway;
use crate::gateway::transport::{HttpResponse, Transport};
use crate::models::batch::Batch;
use crate::models::warehouse::Warehouse;
use crate::storage::Clock;
use crate::storage::memory::MemoryStore;
use crate::storage::session::SessionStore;
use crate::storage::warehouse_context::WarehouseContextStore;
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_BASE_URL: &str = "http://backend.test";
pub const TEST_TOKEN: &str = "test-token";
pub const TEST_MAIL: &str = "ops@coldchain.io";
pub const TEST_NOW_MS: i64 = 1_700_000_000_000;

pub struct FixedClock {
    now: AtomicI64,
}

impl FixedClock {
    pub fn new(now_epoch_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(now_epoch_ms),
        }
    }

    pub fn set(&self, now_epoch_ms: i64) {
        self.now.store(now_epoch_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: i64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_epoch_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

pub enum MockReply {
    Json(u16, Value),
    Text(u16, String),
    NetworkDown,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }

    pub fn path(&self) -> &str {
        self.url.strip_prefix(TEST_BASE_URL).unwrap_or(&self.url)
    }
}

type Handler = dyn Fn(&str, &Value) -> MockReply + Send + Sync;

/// Answers each request from a handler keyed on the path relative to
/// [`TEST_BASE_URL`], and records what was sent.
pub struct MockTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new(handler: impl Fn(&str, &Value) -> MockReply + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().iter().map(|r| r.path().to_string()).collect()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, url: &str, headers: &[(&str, String)], body: &Value) -> Result<HttpResponse, ClientError> {
        let recorded = RecordedRequest {
            url: url.to_string(),
            headers: headers.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            body: body.clone(),
        };
        let path = recorded.path().to_string();
        self.requests.lock().unwrap().push(recorded);

        match (self.handler)(&path, body) {
            MockReply::Json(status, value) => Ok(HttpResponse {
                status,
                body: value.to_string(),
            }),
            MockReply::Text(status, body) => Ok(HttpResponse { status, body }),
            MockReply::NetworkDown => Err(ClientError::NetworkUnavailable("connection refused".to_string())),
        }
    }
}

/// Everything a page or service test needs, wired to one in-memory store.
pub struct TestEnv {
    pub gateway: ApiGateway,
    pub sessions: SessionStore,
    pub context: WarehouseContextStore,
    pub transport: Arc<MockTransport>,
    pub clock: Arc<FixedClock>,
    pub store: Arc<MemoryStore>,
}

pub fn test_env(handler: impl Fn(&str, &Value) -> MockReply + Send + Sync + 'static) -> TestEnv {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(TEST_NOW_MS));
    let transport = Arc::new(MockTransport::new(handler));
    let sessions = SessionStore::new(store.clone(), clock.clone());
    let context = WarehouseContextStore::new(store.clone());
    let gateway = ApiGateway::new(transport.clone(), sessions.clone(), TEST_BASE_URL);

    TestEnv {
        gateway,
        sessions,
        context,
        transport,
        clock,
        store,
    }
}

/// [`test_env`] with a one-hour session for [`TEST_MAIL`].
pub fn logged_in_env(handler: impl Fn(&str, &Value) -> MockReply + Send + Sync + 'static) -> TestEnv {
    let env = test_env(handler);
    env.sessions
        .set_session(TEST_TOKEN, Duration::from_secs(60 * 60), TEST_MAIL)
        .unwrap();
    env
}

pub fn sample_warehouse(id: &str, capacity: f64) -> Warehouse {
    Warehouse {
        id: Some(id.to_string()),
        name: format!("Warehouse {}", id),
        location: "Oslo".to_string(),
        storage_capacity: capacity,
        ..Warehouse::default()
    }
}

pub fn sample_batch(id: &str, quantity: f64) -> Batch {
    Batch {
        id: Some(id.to_string()),
        quantity,
        sensor_id: Some(format!("sensor-{}", id)),
        ..Batch::default()
    }
}
