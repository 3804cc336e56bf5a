//! Unified error types for the workers controller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Unified error type for the controller binaries.
#[derive(Error, Debug)]
pub enum ControllerError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Invalid configuration values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Cluster API error.
    #[error("cluster error: {0}")]
    Cluster(#[from] ClusterError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by the cluster API.
#[derive(Error, Debug)]
pub enum ClusterError {
    /// Could not build a client from the in-cluster or kubeconfig settings.
    #[error("failed to configure kubernetes client: {0}")]
    Connect(#[source] kube::Error),

    /// A request against the API server failed.
    #[error(transparent)]
    Kube(#[from] kube::Error),
}

/// Errors surfaced by the HTTP handlers.
///
/// The response body is the underlying error message as plain text.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request body could not be decoded.
    #[error("{0}")]
    BadRequest(String),

    /// The cluster call failed.
    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Cluster(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(%status, "request failed: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ControllerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use kube::error::ErrorResponse;

    #[test]
    fn bad_request_maps_to_400() {
        let err = ApiError::BadRequest("missing field `task_number`".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "missing field `task_number`");
    }

    #[test]
    fn cluster_error_maps_to_500_with_message() {
        let err: ApiError = ClusterError::from(kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "deployments.apps \"k8s-worker-1\" not found".to_string(),
            reason: "NotFound".to_string(),
            code: 404,
        }))
        .into();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn json_error_becomes_bad_request() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ApiError::from(json_err);
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
