use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::routes;
use crate::state::AppState;

/// Build the full application router.
///
/// CORS mirrors the caller's origin so any origin, method and header is
/// accepted with credentials.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(routes::ROOT, get(handlers::root_handler))
        .route(routes::DIAGNOSTICS, get(handlers::diagnostics_handler))
        .route(
            routes::KITTENS,
            get(handlers::list_kittens_handler).post(handlers::create_kitten_handler),
        )
        .route(routes::INQUIRIES, post(handlers::create_inquiry_handler))
        .route(routes::TESTIMONIALS, get(handlers::list_testimonials_handler))
        .merge(SwaggerUi::new(routes::DOCS).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
