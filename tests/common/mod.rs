#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use ynab_node::client::YnabClient;
use ynab_node::credentials::{StaticCredentialStore, YnabApiCredentials};

pub const TEST_TOKEN: &str = "test-personal-access-token";

/// A request as seen by the mock YNAB API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct MockState {
    responses: HashMap<(String, String), (StatusCode, Value)>,
    requests: Vec<RecordedRequest>,
}

/// In-process stand-in for api.youneedabudget.com, served on 127.0.0.1.
#[derive(Clone)]
pub struct MockYnab {
    pub base_url: String,
    state: Arc<Mutex<MockState>>,
}

impl MockYnab {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockState::default()));
        let app = Router::new()
            .fallback(record_and_respond)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock YNAB listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read mock YNAB address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock YNAB server failed");
        });

        MockYnab {
            base_url: format!("http://{}/v1/", addr),
            state,
        }
    }

    /// Registers the response for `method` on `/v1/<endpoint>`.
    pub fn respond(&self, method: Method, endpoint: &str, status: StatusCode, body: Value) {
        self.state.lock().unwrap().responses.insert(
            (method.to_string(), format!("/v1/{}", endpoint)),
            (status, body),
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn client(&self) -> YnabClient {
        YnabClient::new(&self.base_url)
    }
}

async fn record_and_respond(
    State(state): State<Arc<Mutex<MockState>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let body = if body.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&body).expect("Mock YNAB received non-JSON body"))
    };
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut state = state.lock().unwrap();
    state.requests.push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization,
        body,
    });

    match state
        .responses
        .get(&(method.to_string(), uri.path().to_string()))
    {
        Some((status, body)) => (*status, Json(body.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": {
                    "id": "404.2",
                    "name": "resource_not_found",
                    "detail": "Resource not found"
                }
            })),
        ),
    }
}

pub fn test_credentials() -> StaticCredentialStore {
    StaticCredentialStore::new(YnabApiCredentials {
        personal_access_token: TEST_TOKEN.to_string(),
    })
}

pub fn sample_budget(name: &str) -> Value {
    json!({
        "id": Uuid::new_v4().to_string(),
        "name": name,
        "last_modified_on": "2021-03-01T10:00:00+00:00",
        "first_month": "2020-01-01",
        "last_month": "2021-03-01"
    })
}

pub fn sample_account(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "checking",
        "on_budget": true,
        "closed": false,
        "note": null,
        "balance": 250000,
        "cleared_balance": 240000,
        "uncleared_balance": 10000,
        "transfer_payee_id": Uuid::new_v4().to_string(),
        "direct_import_linked": false,
        "direct_import_in_error": false,
        "deleted": false
    })
}

pub fn sample_transaction(account_id: &str, amount: i64, memo: &str) -> Value {
    json!({
        "id": Uuid::new_v4().to_string(),
        "account_id": account_id,
        "account_name": "Checking",
        "date": "2021-03-01",
        "amount": amount,
        "payee_id": null,
        "payee_name": "Corner Shop",
        "category_id": "cat-groceries",
        "memo": memo,
        "cleared": "uncleared",
        "approved": true,
        "flag_color": null,
        "import_id": null,
        "deleted": false,
        "subtransactions": []
    })
}

pub fn split_transaction(account_id: &str) -> Value {
    let mut transaction = sample_transaction(account_id, -30000, "split");
    let parent_id = transaction["id"].clone();
    transaction["category_id"] = Value::Null;
    transaction["subtransactions"] = json!([
        {
            "id": Uuid::new_v4().to_string(),
            "transaction_id": parent_id,
            "amount": -20000,
            "payee_id": null,
            "payee_name": null,
            "category_id": "cat-groceries",
            "memo": "food",
            "deleted": false
        },
        {
            "id": Uuid::new_v4().to_string(),
            "transaction_id": parent_id,
            "amount": -10000,
            "payee_id": null,
            "payee_name": null,
            "category_id": "cat-household",
            "memo": "soap",
            "deleted": false
        }
    ]);
    transaction
}
