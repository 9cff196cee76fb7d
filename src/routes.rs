use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::credentials::{
    CredentialStore, CredentialTypeDescription, StaticCredentialStore, YnabApiCredentials,
    ynab_api_credential_type,
};
use crate::models::NodePropertyOption;
use crate::node::{LoadOptionsMethod, NodeDescription, NodeOutput, NodeParameters, YnabNode};
use crate::utils::node_error;

#[derive(Clone)]
pub struct AppState {
    pub node: YnabNode,
    pub credentials: Arc<dyn CredentialStore>,
}

/// Parameters and, optionally, the credentials the host injects for this call.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct NodeRequest {
    #[serde(default)]
    pub parameters: NodeParameters,
    pub credentials: Option<YnabApiCredentials>,
}

impl AppState {
    fn credential_store(&self, supplied: Option<YnabApiCredentials>) -> Arc<dyn CredentialStore> {
        match supplied {
            Some(credentials) => Arc::new(StaticCredentialStore::new(credentials)),
            None => self.credentials.clone(),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(description))
        .route("/credentials", get(credential_type))
        .route("/options/{method}", post(load_options))
        .route("/execute", post(execute))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn description(State(state): State<AppState>) -> Json<NodeDescription> {
    Json(state.node.description())
}

pub async fn credential_type() -> Json<CredentialTypeDescription> {
    Json(ynab_api_credential_type())
}

pub async fn load_options(
    State(state): State<AppState>,
    Path(method): Path<String>,
    Json(payload): Json<NodeRequest>,
) -> Result<(StatusCode, Json<Vec<NodePropertyOption>>), (StatusCode, String)> {
    let method: LoadOptionsMethod = method.parse().map_err(node_error)?;
    let store = state.credential_store(payload.credentials);

    let options = state
        .node
        .load_options(method, &payload.parameters, store.as_ref())
        .await
        .map_err(node_error)?;

    Ok((StatusCode::OK, Json(options)))
}

pub async fn execute(
    State(state): State<AppState>,
    Json(payload): Json<NodeRequest>,
) -> Result<(StatusCode, Json<NodeOutput>), (StatusCode, String)> {
    let store = state.credential_store(payload.credentials);

    let output = state
        .node
        .execute(&payload.parameters, store.as_ref())
        .await
        .map_err(node_error)?;

    Ok((StatusCode::OK, Json(output)))
}
