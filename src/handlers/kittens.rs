use crate::error::{ApiError, ErrorResponse, ValidationErrorResponse};
use crate::extract::ValidatedJson;
use crate::models::{CreatedResponse, KittenQuery, KittenResponse};
use crate::routes;
use crate::schema::{Kitten, KittenInput};
use crate::state::AppState;
use crate::store::{Collection, Filter, create_document, decode_documents, get_documents};
use axum::{extract::Query, extract::State, http::StatusCode, Json};

/// Translate list query parameters into a store filter.
///
/// `color`, `location` and `sex` match as case-insensitive substrings,
/// `status` matches exactly. Empty parameters are ignored.
pub fn kitten_filter(query: &KittenQuery) -> Filter {
    let given = |value: &Option<String>| value.as_deref().filter(|v| !v.is_empty()).map(str::to_string);

    let mut filter = Filter::new();
    if let Some(color) = given(&query.color) {
        filter = filter.contains("color", color);
    }
    if let Some(location) = given(&query.location) {
        filter = filter.contains("location", location);
    }
    if let Some(sex) = given(&query.sex) {
        filter = filter.contains("sex", sex);
    }
    if let Some(status) = given(&query.status) {
        filter = filter.exact("status", status);
    }
    filter
}

/// GET /api/kittens handler - List kittens
///
/// Without a store, or when the store query fails, the list is empty.
#[utoipa::path(
    get,
    path = routes::KITTENS,
    params(KittenQuery),
    responses(
        (status = 200, description = "Matching kittens", body = Vec<KittenResponse>)
    ),
    tag = "kittens"
)]
pub async fn list_kittens_handler(
    State(state): State<AppState>,
    Query(query): Query<KittenQuery>,
) -> Json<Vec<KittenResponse>> {
    let Some(store) = state.store.as_deref() else {
        tracing::debug!("No document store; returning empty kitten list");
        return Json(Vec::new());
    };

    let filter = kitten_filter(&query);

    match get_documents(store, Collection::Kitten, &filter, 0).await {
        Ok(documents) => {
            let kittens: Vec<KittenResponse> = decode_documents::<Kitten>(documents)
                .into_iter()
                .map(KittenResponse::from)
                .collect();
            tracing::info!("Listed {} kittens ({:?})", kittens.len(), query);
            Json(kittens)
        }
        Err(e) => {
            tracing::error!("Kitten query failed, returning empty list: {}", e);
            Json(Vec::new())
        }
    }
}

/// POST /api/kittens handler - Create a kitten
#[utoipa::path(
    post,
    path = routes::KITTENS,
    request_body = KittenInput,
    responses(
        (status = 200, description = "Kitten stored", body = CreatedResponse),
        (status = 422, description = "Invalid kitten", body = ValidationErrorResponse),
        (status = 500, description = "Database not available", body = ErrorResponse)
    ),
    tag = "kittens"
)]
pub async fn create_kitten_handler(
    State(state): State<AppState>,
    ValidatedJson(kitten): ValidatedJson<KittenInput>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let store = state.store.as_deref().ok_or(ApiError::StoreUnavailable)?;

    let id = create_document(store, &kitten).await?;

    tracing::info!("Stored kitten '{}' with id: {}", kitten.name, id);
    Ok((StatusCode::OK, Json(CreatedResponse { id })))
}
