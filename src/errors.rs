use thiserror::Error;

use crate::constants::*;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("No credentials got returned!")]
    MissingCredentials,

    #[error("{0}")]
    MissingParameter(String),

    #[error("{node}: {context} failed{}: {message}", status_suffix(.status))]
    Api {
        node: String,
        context: String,
        status: Option<u16>,
        message: String,
    },

    #[error("No data got returned")]
    NoData,

    #[error("Unexpected response shape for '{key}': {source}")]
    UnexpectedResponse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("The operation '{operation}' is not supported for resource '{resource}'")]
    UnsupportedOperation { resource: String, operation: String },

    #[error("Unknown load options method: {0}")]
    UnknownLoadOptionsMethod(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|s| format!(" with status {}", s))
        .unwrap_or_default()
}

impl NodeError {
    pub fn missing_parameter(field: &str) -> Self {
        NodeError::MissingParameter(format!("{} is required", field))
    }

    pub fn select_budget_first() -> Self {
        NodeError::MissingParameter(ERR_SELECT_BUDGET.to_string())
    }
}

pub type NodeResult<T> = Result<T, NodeError>;
