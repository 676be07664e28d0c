use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cluster_core::ClusterError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("集群错误: {0}")]
    Cluster(#[from] ClusterError),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("请求参数错误: {0}")]
    BadRequest(String),
}

impl ApiError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Cluster(ClusterError::NodeNotFound { .. }) => {
                (StatusCode::NOT_FOUND, "NODE_NOT_FOUND")
            }
            ApiError::Cluster(ClusterError::NoAvailableNodes) => {
                (StatusCode::SERVICE_UNAVAILABLE, "NO_AVAILABLE_NODES")
            }
            ApiError::Cluster(ClusterError::InvalidMessage(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_MESSAGE")
            }
            ApiError::Cluster(ClusterError::Serialization(_)) | ApiError::Serialization(_) => {
                (StatusCode::BAD_REQUEST, "SERIALIZATION_ERROR")
            }
            ApiError::Cluster(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();
        let message = match &self {
            ApiError::Cluster(ClusterError::NoAvailableNodes) => "没有可用的节点".to_string(),
            ApiError::Cluster(e) if !e.is_client_error() => "系统内部错误".to_string(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!("请求处理失败: {}", self);
        }

        let body = Json(json!({
            "error": {
                "message": message,
                "type": error_type,
                "code": status.as_u16(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_error_conversion() {
        let api_error: ApiError = ClusterError::NodeNotFound {
            id: "w1".to_string(),
        }
        .into();

        match api_error {
            ApiError::Cluster(ClusterError::NodeNotFound { id }) => assert_eq!(id, "w1"),
            _ => panic!("Expected ClusterError::NodeNotFound"),
        }
    }

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (
                ApiError::Cluster(ClusterError::NodeNotFound { id: "x".into() }),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Cluster(ClusterError::NoAvailableNodes),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::Cluster(ClusterError::InvalidMessage("bad".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Cluster(ClusterError::Network("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_serialization_error_is_bad_request() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
