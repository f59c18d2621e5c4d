//! Integration test helpers
//!
//! Spawns the full application against mock authorization and Salesforce
//! servers, each a real HTTP server on an ephemeral port.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use atrium_core::AtriumConfig;
use atrium_web::{create_app, AppState, WebConfig};

// Initialize tracing once for the whole test binary
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .init();
    }
});

/// Bypass token accepted by the development-mode elevation gate in tests
pub const TEST_BYPASS_TOKEN: &str = "test-bypass";

/// Scriptable stand-in for the remote authorization service
pub struct MockAuthz {
    pub address: String,
    state: Arc<MockAuthzState>,
}

struct MockAuthzState {
    allow: AtomicBool,
    fail: AtomicBool,
    permissions: Mutex<Value>,
    access_calls: Mutex<Vec<Value>>,
    permission_calls: Mutex<Vec<Value>>,
}

impl MockAuthz {
    pub async fn spawn() -> Self {
        let state = Arc::new(MockAuthzState {
            allow: AtomicBool::new(true),
            fail: AtomicBool::new(false),
            permissions: Mutex::new(json!([])),
            access_calls: Mutex::new(Vec::new()),
            permission_calls: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/canAccess", post(mock_can_access))
            .route("/getPermissions", post(mock_get_permissions))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { address, state }
    }

    /// Script the boolean reply of `canAccess`
    pub fn set_allow(&self, allow: bool) {
        self.state.allow.store(allow, Ordering::SeqCst);
    }

    /// Make both commands reply 500
    pub fn set_fail(&self, fail: bool) {
        self.state.fail.store(fail, Ordering::SeqCst);
    }

    /// Script the JSON reply of `getPermissions`
    pub fn set_permissions(&self, reply: Value) {
        *self.state.permissions.lock().unwrap() = reply;
    }

    /// Recorded `canAccess` request bodies
    pub fn access_calls(&self) -> Vec<Value> {
        self.state.access_calls.lock().unwrap().clone()
    }

    /// Recorded `getPermissions` request bodies
    pub fn permission_calls(&self) -> Vec<Value> {
        self.state.permission_calls.lock().unwrap().clone()
    }
}

async fn mock_can_access(
    State(state): State<Arc<MockAuthzState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.access_calls.lock().unwrap().push(body);

    if state.fail.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!("down"))).into_response();
    }

    Json(json!(state.allow.load(Ordering::SeqCst))).into_response()
}

async fn mock_get_permissions(
    State(state): State<Arc<MockAuthzState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.permission_calls.lock().unwrap().push(body);

    if state.fail.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!("down"))).into_response();
    }

    let reply = state.permissions.lock().unwrap().clone();
    Json(reply).into_response()
}

/// Minimal Salesforce REST stand-in: OAuth token endpoint, SOQL query
/// dispatch by object name, and sobject create/patch recording.
pub struct MockSalesforce {
    pub address: String,
    state: Arc<MockSfState>,
}

struct MockSfState {
    base_url: String,
    affiliates: Vec<Value>,
    workshops: Vec<Value>,
    facilitators: Vec<Value>,
    contacts: Vec<Value>,
    next_id: AtomicUsize,
    queries: Mutex<Vec<String>>,
    created: Mutex<Vec<(String, Value)>>,
    patched: Mutex<Vec<(String, String, Value)>>,
}

impl MockSalesforce {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());

        let state = Arc::new(MockSfState {
            base_url: address.clone(),
            affiliates: vec![
                json!({"Id": "aff-1", "Name": "Acme Community Center",
                       "City__c": "Berlin", "Country__c": "Germany", "Status__c": "Active"}),
                json!({"Id": "aff-2", "Name": "Harbor Collective",
                       "City__c": "Lisbon", "Country__c": "Portugal", "Status__c": "Active"}),
            ],
            workshops: vec![
                json!({"Id": "ws-1", "Name": "Intro to Facilitation",
                       "Organizing_Affiliate__c": "aff-1", "Start_Date__c": "2026-09-01",
                       "End_Date__c": "2026-09-03", "Status__c": "Planned"}),
                json!({"Id": "ws-2", "Name": "Advanced Facilitation",
                       "Organizing_Affiliate__c": "aff-2", "Start_Date__c": "2026-10-01",
                       "End_Date__c": null, "Status__c": "Planned"}),
            ],
            facilitators: vec![json!({"Id": "fac-1", "Name": "Jane Doe",
                                      "Email__c": "jane@example.org"})],
            contacts: vec![json!({"Id": "user-1", "Name": "Jane Doe",
                                  "Email": "jane@example.org", "AccountId": "aff-1"})],
            next_id: AtomicUsize::new(1),
            queries: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            patched: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/services/oauth2/token", post(mock_token))
            .route("/services/data/v59.0/query", get(mock_query))
            .route("/services/data/v59.0/sobjects/{sobject}", post(mock_create))
            .route(
                "/services/data/v59.0/sobjects/{sobject}/{id}",
                patch(mock_patch),
            )
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { address, state }
    }

    /// SOQL strings the application sent
    pub fn queries(&self) -> Vec<String> {
        self.state.queries.lock().unwrap().clone()
    }

    /// Recorded sobject creates as (object, payload)
    pub fn created(&self) -> Vec<(String, Value)> {
        self.state.created.lock().unwrap().clone()
    }

    /// Recorded sobject patches as (object, id, payload)
    pub fn patched(&self) -> Vec<(String, String, Value)> {
        self.state.patched.lock().unwrap().clone()
    }
}

async fn mock_token(State(state): State<Arc<MockSfState>>) -> Json<Value> {
    Json(json!({
        "access_token": "mock-access-token",
        "instance_url": state.base_url,
        "token_type": "Bearer",
    }))
}

/// Pull the quoted literal out of a `WHERE Field = '...'` clause
fn where_literal(soql: &str, field: &str) -> Option<String> {
    let marker = format!("{} = '", field);
    let start = soql.find(&marker)? + marker.len();
    let end = soql[start..].find('\'')? + start;
    Some(soql[start..end].to_string())
}

fn filter_records(records: &[Value], soql: &str, field: &str, json_key: &str) -> Vec<Value> {
    match where_literal(soql, field) {
        Some(wanted) => records
            .iter()
            .filter(|record| record[json_key] == json!(wanted))
            .cloned()
            .collect(),
        None => records.to_vec(),
    }
}

async fn mock_query(
    State(state): State<Arc<MockSfState>>,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> impl IntoResponse {
    let soql = params.get("q").cloned().unwrap_or_default();
    state.queries.lock().unwrap().push(soql.clone());

    let records = if soql.contains("FROM Affiliate__c") {
        filter_records(&state.affiliates, &soql, "Id", "Id")
    } else if soql.contains("FROM Workshop__c") {
        if soql.contains("WHERE Id =") {
            filter_records(&state.workshops, &soql, "Id", "Id")
        } else {
            filter_records(
                &state.workshops,
                &soql,
                "Organizing_Affiliate__c",
                "Organizing_Affiliate__c",
            )
        }
    } else if soql.contains("FROM Facilitator__c") {
        state.facilitators.clone()
    } else if soql.contains("FROM Contact") {
        if soql.contains("WHERE Email =") {
            filter_records(&state.contacts, &soql, "Email", "Email")
        } else {
            filter_records(&state.contacts, &soql, "Id", "Id")
        }
    } else {
        Vec::new()
    };

    Json(json!({
        "totalSize": records.len(),
        "done": true,
        "records": records,
    }))
}

async fn mock_create(
    State(state): State<Arc<MockSfState>>,
    Path(sobject): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let id = format!(
        "mock-{}-{}",
        sobject.to_lowercase(),
        state.next_id.fetch_add(1, Ordering::SeqCst)
    );
    state.created.lock().unwrap().push((sobject, body));

    Json(json!({"id": id, "success": true, "errors": []}))
}

async fn mock_patch(
    State(state): State<Arc<MockSfState>>,
    Path((sobject, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> StatusCode {
    state.patched.lock().unwrap().push((sobject, id, body));
    StatusCode::NO_CONTENT
}

/// A running application instance plus its mock upstreams
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authz: MockAuthz,
    pub salesforce: MockSalesforce,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// GET with arbitrary headers
    pub async fn get(&self, path: &str, headers: &[(&str, &str)]) -> reqwest::Response {
        let mut request = self.api_client.get(self.url(path));
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        request.send().await.expect("Failed to execute request.")
    }

    /// POST a JSON body with arbitrary headers
    pub async fn post_json(
        &self,
        path: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> reqwest::Response {
        let mut request = self.api_client.post(self.url(path)).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        request.send().await.expect("Failed to execute request.")
    }

    /// PATCH a JSON body with arbitrary headers
    pub async fn patch_json(
        &self,
        path: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> reqwest::Response {
        let mut request = self.api_client.patch(self.url(path)).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        request.send().await.expect("Failed to execute request.")
    }

    /// Establish the session's affiliate scope through the elevation bypass
    pub async fn elevate(&self, affiliate: &str) -> reqwest::Response {
        self.post_json(
            "/api/affiliates",
            &json!({"name": "Scope Setter"}),
            &[
                ("x-bypass-token", TEST_BYPASS_TOKEN),
                ("x-affiliate", affiliate),
                ("x-jwt", "elevation-token"),
            ],
        )
        .await
    }
}

/// Spawn the application in development mode with default test settings
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn the application with a configuration mutator applied first
pub async fn spawn_app_with<F>(mutate: F) -> TestApp
where
    F: FnOnce(&mut WebConfig),
{
    LazyLock::force(&TRACING);

    let authz = MockAuthz::spawn().await;
    let salesforce = MockSalesforce::spawn().await;

    let mut core = AtriumConfig::default();
    core.auth.base_url = authz.address.clone();
    core.auth.mode = "development".parse().unwrap();
    core.auth.bypass_token = Some(TEST_BYPASS_TOKEN.to_string());
    core.crm.login_url = salesforce.address.clone();
    core.crm.client_id = "test-client".to_string();
    core.crm.client_secret = "test-secret".to_string();
    core.crm.username = "test@example.org".to_string();
    core.crm.password = "password".to_string();

    let mut config = WebConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        core,
    };
    mutate(&mut config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());

    let state = AppState::new(config).expect("Failed to build application state");
    let app = create_app(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let api_client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap();

    TestApp {
        address,
        api_client,
        authz,
        salesforce,
    }
}
