#[cfg(feature = "server")]
use crate::api::envelope::Envelope;
#[cfg(feature = "server")]
use crate::error::AppError;
#[cfg(feature = "server")]
use axum::http::StatusCode;
#[cfg(feature = "server")]
use axum::response::{IntoResponse, Response};

/// Converts AppError into an enveloped HTTP response.
///
/// Connection and database failures are logged here and reported to the
/// client without driver detail.
#[cfg(feature = "server")]
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::MissingParameter(msg) => {
                (StatusCode::BAD_REQUEST, Envelope::failure_message(msg.clone()))
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Envelope::failure_message(msg.clone()))
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Envelope::failure_error(
                    serde_json::to_value(errors).unwrap_or_else(|_| errors.to_string().into()),
                ),
            ),
            AppError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::failure_error("Error connecting to database".into()),
                )
            }
            AppError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::failure_error("Database operation failed".into()),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(all(test, feature = "server"))]
mod tests {
    use super::*;
    use crate::models::validation::{ValidationErrors, Violation};
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_parameter_is_400_with_message() {
        let response = AppError::MissingParameter("ID is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "ID is required");
    }

    #[tokio::test]
    async fn test_validation_is_400_with_error() {
        let errors = ValidationErrors::from(vec![Violation::Required { field: "title" }]);
        let response = AppError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["name"], "ValidationError");
        assert_eq!(body["error"]["errors"][0]["field"], "title");
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_not_found_is_404() {
        let response = AppError::NotFound("Content not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Content not found");
    }

    #[tokio::test]
    async fn test_connection_error_hides_detail() {
        let response =
            AppError::Connection("server selection timeout: 10.0.0.5".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Error connecting to database");
    }

    #[tokio::test]
    async fn test_database_error_is_500() {
        let response = AppError::Database("E11000 duplicate key".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
