use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::store::StoreError;

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// One violated field constraint.
#[derive(Debug, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Response type for payloads that fail validation
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub details: Vec<FieldViolation>,
}

/// Custom error type for API endpoints
///
/// Maps each failure class to its HTTP status and a JSON body.
#[derive(Debug)]
pub enum ApiError {
    /// Body decoded but broke one or more field constraints
    Validation(ValidationErrors),
    /// Body was not JSON, had the wrong content type, or had wrongly typed fields
    InvalidBody(JsonRejection),
    /// No document store handle exists
    StoreUnavailable,
    /// A store operation failed after a handle exists
    Store(StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidBody(rejection) => rejection.status(),
            ApiError::StoreUnavailable | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Flatten validator output into a stable, field-sorted list.
pub fn field_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldViolation {
                field: field.to_string(),
                code: error.code.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", error.code)),
            })
        })
        .collect();
    violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    violations
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            ApiError::Validation(errors) => {
                let details = field_violations(&errors);
                tracing::info!("Rejected payload: {} invalid field(s)", details.len());
                let body = Json(ValidationErrorResponse {
                    error: "Validation failed".to_string(),
                    details,
                });
                (status, body).into_response()
            }
            ApiError::InvalidBody(rejection) => {
                tracing::info!("Rejected request body: {}", rejection.body_text());
                let body = Json(ErrorResponse {
                    error: format!("Invalid request body: {}", rejection.body_text()),
                });
                (status, body).into_response()
            }
            ApiError::StoreUnavailable => {
                tracing::warn!("Write refused: document store not available");
                let body = Json(ErrorResponse {
                    error: "Database not available".to_string(),
                });
                (status, body).into_response()
            }
            ApiError::Store(err) => {
                // Backend detail stays in the log.
                tracing::error!("Store operation failed: {:#}", err);
                let body = Json(ErrorResponse {
                    error: "Database error".to_string(),
                });
                (status, body).into_response()
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        ApiError::Validation(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::InvalidBody(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use validator::ValidationError;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_field_violations_sorted_and_messaged() {
        let mut errors = ValidationErrors::new();
        errors.add("sex", ValidationError::new("required").with_message("field required".into()));
        errors.add("color", ValidationError::new("required"));

        let violations = field_violations(&errors);

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, "color");
        assert_eq!(violations[0].message, "invalid value (required)");
        assert_eq!(violations[1].field, "sex");
        assert_eq!(violations[1].message, "field required");
    }

    #[tokio::test]
    async fn test_validation_error_is_422_with_details() {
        let mut errors = ValidationErrors::new();
        errors.add("email", ValidationError::new("email"));

        let response = ApiError::Validation(errors).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["details"][0]["field"], "email");
        assert_eq!(json["details"][0]["code"], "email");
    }

    #[tokio::test]
    async fn test_store_unavailable_is_500() {
        let response = ApiError::StoreUnavailable.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Database not available");
    }

    #[tokio::test]
    async fn test_store_error_does_not_leak_detail() {
        let err = StoreError::Backend(anyhow::anyhow!("connection refused to 10.0.0.7:9010"));

        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Database error");
    }

    #[test]
    fn test_timeout_is_server_error() {
        let err = ApiError::from(StoreError::Timeout {
            operation: "insert",
            after: Duration::from_secs(5),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
