// Error responses for HTTP handlers
use crate::application::advisor_service::AdvisorError;
use crate::application::air_quality_repository::RepositoryError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("upstream air-quality service unavailable")]
    Upstream(#[source] RepositoryError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        tracing::error!("Upstream request failed: {}", e);
        ApiError::Upstream(e)
    }
}

impl From<AdvisorError> for ApiError {
    fn from(e: AdvisorError) -> Self {
        match e {
            AdvisorError::NoData { .. } => ApiError::NotFound(e.to_string()),
            AdvisorError::Repository(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found: ApiError = AdvisorError::NoData {
            city: "Atlantis".to_string(),
        }
        .into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "no usable air-quality data for Atlantis");

        let upstream: ApiError = AdvisorError::Repository(RepositoryError::Api {
            service: "waqi",
            message: "Invalid key".to_string(),
        })
        .into();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(upstream.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
