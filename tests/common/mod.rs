//! In-process stub of the Fred OData and REST endpoints.
//!
//! Serves canned records on `127.0.0.1:0`, checks Basic credentials and
//! records every request so tests can assert on what the client sent.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use fred_client::config::{Config, ODataVersion, RuntimeConfig};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const USERNAME: &str = "demo";
pub const PASSWORD: &str = "secret";
/// base64("demo:secret")
pub const EXPECTED_AUTH: &str = "Basic ZGVtbzpzZWNyZXQ=";

pub const KNOWN_CUSTOMER: i64 = 5637146827;
pub const CREATED_ORDER_ID: &str = "PO-000777";
pub const BLOCKED_VENDOR: &str = "BLOCKED01";
pub const STORES_BODY: &str = r#"[{"StoreId":"S001","Name":"Sydney"},{"StoreId":"S002","Name":"Perth"}]"#;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct Fixtures {
    pub entity_sets: HashMap<String, Vec<Value>>,
    /// Server-driven paging: at most this many records per response
    pub page_size: Option<usize>,
    /// Delay before answering the user stores call
    pub stores_delay: Option<Duration>,
    /// Every page points at the second page again
    pub stuck_next_link: bool,
}

impl Default for Fixtures {
    fn default() -> Self {
        let customers = (0..42)
            .map(|i| {
                json!({
                    "RecId": 5637146800i64 + i,
                    "AccountNum": format!("C{:06}", i),
                    "Party": 5637144576i64 + i,
                    "CustGroup": "10",
                })
            })
            .collect();

        let tax_on_items = (0..5)
            .map(|i| {
                json!({
                    "RecId": 5637145000i64 + i,
                    "TaxItemGroup": format!("GRP{}", i),
                    "TaxCode": format!("GST{}", i),
                    "dataAreaId": "fred",
                })
            })
            .collect();

        let purch_tables: Vec<Value> = vec![
            json!({"RecId": 1, "PurchId": "PO-000001", "OrderAccount": "SIG00001", "PurchStatus": "Backorder"}),
            json!({"RecId": 2, "PurchId": "PO-000002", "OrderAccount": "SIG00001", "PurchStatus": "Received"}),
            json!({"RecId": 3, "PurchId": "PO-000003", "OrderAccount": "ACM00002", "PurchStatus": "Invoiced"}),
            json!({"RecId": 4, "PurchId": "PO-000003", "OrderAccount": "ACM00002", "PurchStatus": "Cancelled"}),
        ];

        let vendors = vec![
            json!({
                "RecId": 22565421001i64, "AccountNum": "SIG00001", "Party": 5637150001i64,
                "PurchItems": [purch_tables[0].clone(), purch_tables[1].clone()],
            }),
            json!({
                "RecId": 22565421002i64, "AccountNum": "ACM00002", "Party": 5637150002i64,
                "PurchItems": [purch_tables[2].clone()],
            }),
        ];

        let mut entity_sets = HashMap::new();
        entity_sets.insert("CustTables".to_string(), customers);
        entity_sets.insert("TaxOnItems".to_string(), tax_on_items);
        entity_sets.insert("PurchTables".to_string(), purch_tables);
        entity_sets.insert("VendTables".to_string(), vendors);

        Self {
            entity_sets,
            page_size: None,
            stores_delay: None,
            stuck_next_link: false,
        }
    }
}

#[derive(Clone)]
struct StubState {
    base: String,
    fixtures: Arc<Fixtures>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubState {
    fn record(&self, method: Method, path: String, query: HashMap<String, String>, headers: &HeaderMap, body: String) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let request = RecordedRequest {
            method,
            path,
            query,
            authorization: header("authorization"),
            accept: header("accept"),
            content_type: header("content-type"),
            body,
        };
        self.requests.lock().unwrap().push(request);
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == EXPECTED_AUTH)
            .unwrap_or(false)
    }
}

pub struct StubServer {
    pub base: String,
    state: StubState,
}

impl StubServer {
    pub async fn start() -> Self {
        Self::start_with(Fixtures::default()).await
    }

    pub async fn start_with(fixtures: Fixtures) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let state = StubState {
            base: base.clone(),
            fixtures: Arc::new(fixtures),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/odata/{entity}", get(entity_set))
            .route("/api/PO/CreatePurchOrder", post(create_purch_order))
            .route("/api/Users/GetAllUserStores", get(user_stores))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base, state }
    }

    pub fn config(&self) -> RuntimeConfig {
        self.config_for(ODataVersion::V4, USERNAME, PASSWORD)
    }

    pub fn config_for(&self, version: ODataVersion, username: &str, password: &str) -> RuntimeConfig {
        Config {
            http_timeout_minutes: Some(1),
            api_base_url: Some(format!("{}/api", self.base)),
            odata_base_url: Some(format!("{}/odata", self.base)),
            username: Some(username.to_string()),
            password: Some(password.to_string()),
            odata_version: Some(version),
        }
        .to_runtime()
        .unwrap()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn entity_set(
    State(state): State<StubState>,
    Path(entity): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.record(Method::GET, format!("/odata/{}", entity), query.clone(), &headers, String::new());

    if !StubState::authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    let Some(records) = state.fixtures.entity_sets.get(&entity) else {
        return (StatusCode::NOT_FOUND, format!("Resource not found for the segment '{}'", entity))
            .into_response();
    };

    let mut matching: Vec<Value> = records
        .iter()
        .filter(|record| match query.get("$filter") {
            Some(filter) => matches_filter(record, filter),
            None => true,
        })
        .cloned()
        .collect();

    if query.get("$expand").map(String::as_str) != Some("PurchItems") {
        for record in &mut matching {
            if let Some(fields) = record.as_object_mut() {
                fields.remove("PurchItems");
            }
        }
    }

    let total = matching.len();
    let skip: usize = query.get("$skip").and_then(|s| s.parse().ok()).unwrap_or(0);
    let top: Option<usize> = query.get("$top").and_then(|s| s.parse().ok());

    let remaining: Vec<Value> = matching.into_iter().skip(skip).collect();
    let mut take = top.unwrap_or(remaining.len()).min(remaining.len());
    let mut next_link = None;
    if let Some(page_size) = state.fixtures.page_size {
        if take > page_size {
            take = page_size;
            let next_skip = if state.fixtures.stuck_next_link { page_size } else { skip + page_size };
            next_link = Some(format!("{}/odata/{}?$skip={}", state.base, entity, next_skip));
        }
    }
    let page: Vec<Value> = remaining.into_iter().take(take).collect();

    let mut body = serde_json::Map::new();
    if query.get("$inlinecount").map(String::as_str) == Some("allpages") {
        body.insert("odata.metadata".into(), json!(format!("{}/odata/$metadata#{}", state.base, entity)));
        body.insert("odata.count".into(), json!(total.to_string()));
        if let Some(link) = next_link {
            body.insert("odata.nextLink".into(), json!(link));
        }
    } else {
        body.insert("@odata.context".into(), json!(format!("{}/odata/$metadata#{}", state.base, entity)));
        if query.get("$count").map(String::as_str) == Some("true") {
            body.insert("@odata.count".into(), json!(total));
        }
        if let Some(link) = next_link {
            body.insert("@odata.nextLink".into(), json!(link));
        }
    }
    body.insert("value".into(), Value::Array(page));

    Json(Value::Object(body)).into_response()
}

/// Supports `Field eq literal` clauses joined with `and`
fn matches_filter(record: &Value, filter: &str) -> bool {
    filter.split(" and ").all(|clause| {
        let clause = clause.trim().trim_start_matches('(').trim_end_matches(')');
        let Some((field, literal)) = clause.split_once(" eq ") else {
            return false;
        };
        let actual = &record[field.trim()];
        let literal = literal.trim();

        if literal.len() >= 2 && literal.starts_with('\'') && literal.ends_with('\'') {
            let expected = literal[1..literal.len() - 1].replace("''", "'");
            actual.as_str() == Some(expected.as_str())
        } else if literal == "null" {
            actual.is_null()
        } else if let Ok(n) = literal.parse::<i64>() {
            actual.as_i64() == Some(n)
        } else {
            false
        }
    })
}

async fn create_purch_order(State(state): State<StubState>, headers: HeaderMap, body: String) -> Response {
    state.record(
        Method::POST,
        "/api/PO/CreatePurchOrder".to_string(),
        HashMap::new(),
        &headers,
        body.clone(),
    );

    if !StubState::authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Authorization has been denied for this request.").into_response();
    }

    let details: Value = match serde_json::from_str(&body) {
        Ok(details) => details,
        Err(e) => return (StatusCode::BAD_REQUEST, format!("Malformed order: {}", e)).into_response(),
    };

    if details["Header"]["VendAccount"] == BLOCKED_VENDOR {
        return (StatusCode::BAD_REQUEST, format!("Vendor {} is on hold", BLOCKED_VENDOR)).into_response();
    }

    (StatusCode::OK, CREATED_ORDER_ID).into_response()
}

async fn user_stores(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state.record(
        Method::GET,
        "/api/Users/GetAllUserStores".to_string(),
        HashMap::new(),
        &headers,
        String::new(),
    );

    if let Some(delay) = state.fixtures.stores_delay {
        tokio::time::sleep(delay).await;
    }

    if !StubState::authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Authorization has been denied for this request.").into_response();
    }

    (StatusCode::OK, STORES_BODY).into_response()
}
