use axum::http::StatusCode;

use crate::errors::NodeError;

/// Maps a node failure to the status and message returned to the host.
pub fn node_error(error: NodeError) -> (StatusCode, String) {
    let status = match &error {
        NodeError::MissingCredentials => StatusCode::UNAUTHORIZED,
        NodeError::MissingParameter(_)
        | NodeError::UnsupportedOperation { .. }
        | NodeError::UnknownLoadOptionsMethod(_) => StatusCode::BAD_REQUEST,
        // YNAB's own client errors are passed through; anything else is upstream trouble
        NodeError::Api {
            status: Some(code), ..
        } if (400..500).contains(code) => {
            StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        NodeError::Api { .. } | NodeError::NoData | NodeError::UnexpectedResponse { .. } => {
            StatusCode::BAD_GATEWAY
        }
        NodeError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: Option<u16>) -> NodeError {
        NodeError::Api {
            node: "YNAB".to_string(),
            context: "GET budgets".to_string(),
            status,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn statuses() {
        assert_eq!(
            node_error(NodeError::MissingCredentials).0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            node_error(NodeError::select_budget_first()).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            node_error(NodeError::UnsupportedOperation {
                resource: "transactions".to_string(),
                operation: "delete".to_string(),
            })
            .0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(node_error(api(Some(404))).0, StatusCode::NOT_FOUND);
        assert_eq!(node_error(api(Some(500))).0, StatusCode::BAD_GATEWAY);
        assert_eq!(node_error(api(None)).0, StatusCode::BAD_GATEWAY);
        assert_eq!(node_error(NodeError::NoData).0, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn message_is_error_display() {
        let (_, message) = node_error(NodeError::NoData);
        assert_eq!(message, "No data got returned");
    }
}
