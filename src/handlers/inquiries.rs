use crate::error::{ApiError, ErrorResponse, ValidationErrorResponse};
use crate::extract::ValidatedJson;
use crate::models::InquiryResponse;
use crate::routes;
use crate::schema::InquiryInput;
use crate::state::AppState;
use crate::store::create_document;
use axum::{extract::State, http::StatusCode, Json};

/// POST /api/inquiries handler - Waitlist / contact form submission
#[utoipa::path(
    post,
    path = routes::INQUIRIES,
    request_body = InquiryInput,
    responses(
        (status = 200, description = "Inquiry stored", body = InquiryResponse),
        (status = 422, description = "Invalid inquiry", body = ValidationErrorResponse),
        (status = 500, description = "Database not available", body = ErrorResponse)
    ),
    tag = "inquiries"
)]
pub async fn create_inquiry_handler(
    State(state): State<AppState>,
    ValidatedJson(inquiry): ValidatedJson<InquiryInput>,
) -> Result<(StatusCode, Json<InquiryResponse>), ApiError> {
    let store = state.store.as_deref().ok_or(ApiError::StoreUnavailable)?;

    let id = create_document(store, &inquiry).await?;

    tracing::info!(
        "Stored inquiry with id: {} (contact method: {})",
        id,
        inquiry.contact_method.as_deref().unwrap_or("unspecified")
    );
    Ok((StatusCode::OK, Json(InquiryResponse { id, success: true })))
}

#[cfg(test)]
mod tests {
    use crate::app::testing::*;
    use crate::store::{Collection, DocumentStore, Filter};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_submit_inquiry_success() {
        let (app, store) = app_with_memory_store();

        let (status, json) = post_json(
            &app,
            "/api/inquiries",
            &json!({
                "name": "Ana",
                "email": "ana@example.com",
                "phone": "+1 305 555 0100",
                "preferred_color": "Silver",
                "location": "Miami, FL",
                "contact_method": "facetime",
                "message": "Is the silver boy still available?"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        let id = json["id"].as_str().unwrap();
        assert!(!id.is_empty());

        let documents = store.find(Collection::Inquiry, &Filter::new(), 0).await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, id);
        assert_eq!(documents[0].data["email"], "ana@example.com");
    }

    #[tokio::test]
    async fn test_submit_inquiry_minimal() {
        let (app, _store) = app_with_memory_store();

        let (status, json) = post_json(
            &app,
            "/api/inquiries",
            &json!({"name": "Ana", "email": "ana@example.com"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
    }

    #[tokio::test]
    async fn test_invalid_email_rejected_and_not_stored() {
        let (app, store) = app_with_memory_store();

        let (status, json) = post_json(
            &app,
            "/api/inquiries",
            &json!({"name": "Ana", "email": "not-an-email"}),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["details"][0]["field"], "email");
        assert_eq!(json["details"][0]["code"], "email");

        let documents = store.find(Collection::Inquiry, &Filter::new(), 0).await.unwrap();
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn test_missing_fields_reported_together() {
        let (app, _store) = app_with_memory_store();

        let (status, json) = post_json(&app, "/api/inquiries", &json!({})).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let fields: Vec<&str> = json["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["email", "name"]);
    }

    #[tokio::test]
    async fn test_submit_without_store_is_server_error() {
        let app = app_without_store();

        let (status, json) = post_json(
            &app,
            "/api/inquiries",
            &json!({"name": "Ana", "email": "ana@example.com"}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Database not available");
    }
}
