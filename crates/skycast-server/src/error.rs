use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use skycast_clients::ClientError;
use skycast_core::{ForecastError, QueryError};

/// Handler error rendered as `{"error": "..."}` with a matching status
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_)
            | Self::Query(_)
            | Self::Forecast(ForecastError::UnknownPolicy(_)) => StatusCode::BAD_REQUEST,
            Self::Client(ClientError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Client(ClientError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            Self::Client(ClientError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Client(_) => StatusCode::BAD_GATEWAY,
            Self::Forecast(ForecastError::MalformedSample { .. }) => StatusCode::BAD_GATEWAY,
            Self::Forecast(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
