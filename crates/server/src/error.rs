use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use portfel_core::{CoreError, SerializedError};
use serde::Serialize;

/// Handler result carrying a [`CoreError`] mapped to an HTTP response.
pub type ApiResult<T> = Result<T, ApiError>;

/// Wrapper turning core errors into HTTP responses.
///
/// Validation, not-found and auth failures surface their own message;
/// external-API and database failures surface a generic category message
/// while the detail goes to the log.
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        Self(error)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: SerializedError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;

        let status = match &error {
            CoreError::Unauthenticated => StatusCode::UNAUTHORIZED,
            CoreError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            CoreError::Validation { .. } => StatusCode::BAD_REQUEST,
            CoreError::Config { .. } | CoreError::Database { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CoreError::Api { .. } => StatusCode::BAD_GATEWAY,
        };

        let body = match &error {
            CoreError::Api {
                service, status, ..
            } => {
                tracing::error!(%error, "external API failure");
                SerializedError::Api {
                    service: service.clone(),
                    status: *status,
                    message: format!("{service} request failed"),
                }
            }
            CoreError::Database { operation, .. } => {
                tracing::error!(%error, "database failure");
                SerializedError::Database {
                    operation: operation.clone(),
                    message: "database operation failed".into(),
                }
            }
            CoreError::Config { .. } => {
                tracing::error!(%error, "configuration error");
                SerializedError::from(&error)
            }
            _ => SerializedError::from(&error),
        };

        (status, Json(ErrorBody { error: body })).into_response()
    }
}
