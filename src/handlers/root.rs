use crate::models::MessageResponse;
use crate::routes;
use axum::Json;

pub const ROOT_MESSAGE: &str = "Gentle Giant Maine Coon API Running";

/// GET / handler - Liveness message
#[utoipa::path(
    get,
    path = routes::ROOT,
    responses(
        (status = 200, description = "Service is running", body = MessageResponse)
    ),
    tag = "health"
)]
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}
