use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::*;
use crate::credentials::{CredentialStore, resolve_token};
use crate::errors::{NodeError, NodeResult};
use crate::models::{Account, Budget, NewTransaction, NodePropertyOption, SaveTransactionPayload};

/// Thin YNAB v1 client. Holds no token: every call resolves one from the
/// credential store it is given.
#[derive(Debug, Clone)]
pub struct YnabClient {
    http: Client,
    base_url: String,
}

impl Default for YnabClient {
    fn default() -> Self {
        Self::new(YNAB_API_BASE_URL)
    }
}

impl YnabClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_http_client(Client::new(), base_url)
    }

    pub fn with_http_client(http: Client, base_url: &str) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one request to `<base>/<endpoint>` with the bearer token from
    /// `credentials`. Bodies that are absent or `{}` are not sent.
    pub async fn api_request(
        &self,
        credentials: &dyn CredentialStore,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        query: &[(&str, &str)],
    ) -> NodeResult<Value> {
        let context = format!("{} {}", method, endpoint);
        let url = Url::parse(&format!("{}{}", self.base_url, endpoint))
            .map_err(|e| api_error(&context, None, e.to_string()))?;
        self.send(credentials, method, url, context, body, query)
            .await
    }

    /// Same as `api_request`, with the path given as segments that are each
    /// percent-encoded, so an id can never change the endpoint.
    pub async fn api_request_segments(
        &self,
        credentials: &dyn CredentialStore,
        method: Method,
        segments: &[&str],
        body: Option<&Value>,
        query: &[(&str, &str)],
    ) -> NodeResult<Value> {
        let context = format!("{} {}", method, segments.join("/"));
        let mut url =
            Url::parse(&self.base_url).map_err(|e| api_error(&context, None, e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| api_error(&context, None, "base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        self.send(credentials, method, url, context, body, query)
            .await
    }

    async fn send(
        &self,
        credentials: &dyn CredentialStore,
        method: Method,
        url: Url,
        context: String,
        body: Option<&Value>,
        query: &[(&str, &str)],
    ) -> NodeResult<Value> {
        let token = resolve_token(credentials).await?;

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header("Accept", "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body.filter(|b| !is_empty_body(b)) {
            request = request.json(body);
        }

        debug!("YNAB request: {}", context);

        let response = request
            .send()
            .await
            .map_err(|e| api_error(&context, None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    debug!("Could not read YNAB error body for {}: {}", context, e);
                    String::new()
                }
            };
            let message = ynab_error_detail(&text).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });
            return Err(api_error(&context, Some(status.as_u16()), message));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| api_error(&context, Some(status.as_u16()), e.to_string()))
    }

    pub async fn list_budgets(
        &self,
        credentials: &dyn CredentialStore,
    ) -> NodeResult<Vec<NodePropertyOption>> {
        let response = self
            .api_request(credentials, Method::GET, "budgets", None, &[])
            .await?;
        let budgets: Vec<Budget> = extract_data(response, "budgets")?;
        Ok(budgets.into_iter().map(NodePropertyOption::from).collect())
    }

    pub async fn list_accounts(
        &self,
        credentials: &dyn CredentialStore,
        budget_id: &str,
    ) -> NodeResult<Vec<NodePropertyOption>> {
        let budget_id = budget_id.trim();
        if budget_id.is_empty() {
            return Err(NodeError::select_budget_first());
        }

        let response = self
            .api_request_segments(
                credentials,
                Method::GET,
                &["budgets", budget_id, "accounts"],
                None,
                &[],
            )
            .await?;
        let accounts: Vec<Account> = extract_data(response, "accounts")?;
        Ok(accounts.into_iter().map(NodePropertyOption::from).collect())
    }

    /// Returns the created transaction exactly as YNAB sent it. Use
    /// `serde_json::from_value::<Transaction>` for a typed view.
    pub async fn create_transaction(
        &self,
        credentials: &dyn CredentialStore,
        budget_id: &str,
        transaction: &NewTransaction,
    ) -> NodeResult<Value> {
        let body = serde_json::to_value(SaveTransactionPayload { transaction })?;
        let response = self
            .api_request_segments(
                credentials,
                Method::POST,
                &["budgets", budget_id.trim(), "transactions"],
                Some(&body),
                &[],
            )
            .await?;
        extract_data(response, "transaction")
    }

    /// Returns the transactions exactly as YNAB sent them, in order.
    pub async fn list_transactions(
        &self,
        credentials: &dyn CredentialStore,
        budget_id: &str,
    ) -> NodeResult<Vec<Value>> {
        let response = self
            .api_request_segments(
                credentials,
                Method::GET,
                &["budgets", budget_id.trim(), "transactions"],
                None,
                &[],
            )
            .await?;
        extract_data(response, "transactions")
    }
}

/// Pulls `data.<key>` out of a YNAB response envelope. A missing or `null`
/// key is `NoData`; a value of the wrong shape is `UnexpectedResponse`.
pub fn extract_data<T: DeserializeOwned>(mut response: Value, key: &str) -> NodeResult<T> {
    let value = response
        .get_mut("data")
        .and_then(|data| data.get_mut(key))
        .map(Value::take)
        .filter(|v| !v.is_null())
        .ok_or(NodeError::NoData)?;

    serde_json::from_value(value).map_err(|source| NodeError::UnexpectedResponse {
        key: key.to_string(),
        source,
    })
}

fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

// YNAB error bodies look like {"error": {"id": "401", "name": "unauthorized", "detail": "..."}}
fn ynab_error_detail(text: &str) -> Option<String> {
    let value: Value = serde_json::from_str(text).ok()?;
    let error = value.get("error")?;
    error
        .get("detail")
        .or_else(|| error.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn api_error(context: &str, status: Option<u16>, message: String) -> NodeError {
    warn!("YNAB request {} failed: {}", context, message);
    NodeError::Api {
        node: NODE_DISPLAY_NAME.to_string(),
        context: context.to_string(),
        status,
        message,
    }
}
