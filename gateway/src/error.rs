//! Gateway error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use protocol::ErrorBody;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Missing address or node parameter")]
    MissingParameter,

    #[error("Node not found")]
    NodeNotFound(String),

    #[error("{0:#}")]
    Upstream(anyhow::Error),

    #[error("Failed to render image: {0:#}")]
    Render(anyhow::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MissingParameter => StatusCode::BAD_REQUEST,
            GatewayError::NodeNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Upstream(_) | GatewayError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match &self {
            GatewayError::NodeNotFound(name) => warn!("Request for unknown node {:?}", name),
            GatewayError::Upstream(_) | GatewayError::Render(_) => warn!("{}", self),
            GatewayError::MissingParameter => {}
        }

        (self.status(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: GatewayError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_parameter_body() {
        let (status, body) = body_of(GatewayError::MissingParameter).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Missing address or node parameter");
    }

    #[tokio::test]
    async fn test_node_not_found_body() {
        let (status, body) = body_of(GatewayError::NodeNotFound("mars".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Node not found");
    }

    #[tokio::test]
    async fn test_upstream_message_keeps_context() {
        let err = anyhow::anyhow!("connection refused").context("Failed to reach node hk");
        let (status, body) = body_of(GatewayError::Upstream(err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Failed to reach node hk: connection refused");
    }
}
