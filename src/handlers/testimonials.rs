use crate::models::{TestimonialQuery, TestimonialResponse};
use crate::routes;
use crate::schema::Testimonial;
use crate::state::AppState;
use crate::store::{Collection, Filter, decode_documents, get_documents};
use axum::{extract::Query, extract::State, Json};

/// Curated testimonials served whenever the store cannot be read.
pub fn example_testimonials() -> Vec<Testimonial> {
    vec![
        Testimonial {
            author: "Sofia R.".to_string(),
            handle: Some("@sof_and_max".to_string()),
            content: "Our shaded silver boy is massive and so gentle. The FaceTime call sealed our trust—everything was exactly as promised.".to_string(),
            rating: 5,
            avatar_url: Some("https://images.unsplash.com/photo-1607746882042-944635dfe10e?w=200&h=200&fit=crop".to_string()),
            image_url: None,
        },
        Testimonial {
            author: "Michael T.".to_string(),
            handle: Some("@mt_angeleno".to_string()),
            content: "Hand delivery to LA was seamless. Genetics and health transparency are top-tier. Couldn’t be happier!".to_string(),
            rating: 5,
            avatar_url: Some("https://images.unsplash.com/photo-1544723795-3fb6469f5b39?w=200&h=200&fit=crop".to_string()),
            image_url: None,
        },
    ]
}

fn fallback(limit: usize) -> Json<Vec<TestimonialResponse>> {
    Json(
        example_testimonials()
            .into_iter()
            .take(limit)
            .map(|testimonial| TestimonialResponse { id: None, testimonial })
            .collect(),
    )
}

/// GET /api/testimonials handler - List testimonials
///
/// Reads up to `limit` testimonials from the store. When the store is absent
/// or the read fails, the curated examples are returned instead, cut to `limit`.
#[utoipa::path(
    get,
    path = routes::TESTIMONIALS,
    params(TestimonialQuery),
    responses(
        (status = 200, description = "Testimonials", body = Vec<TestimonialResponse>)
    ),
    tag = "testimonials"
)]
pub async fn list_testimonials_handler(
    State(state): State<AppState>,
    Query(query): Query<TestimonialQuery>,
) -> Json<Vec<TestimonialResponse>> {
    let Some(store) = state.store.as_deref() else {
        tracing::debug!("No document store; serving example testimonials");
        return fallback(query.limit);
    };

    match get_documents(store, Collection::Testimonial, &Filter::new(), query.limit).await {
        Ok(documents) => {
            let testimonials: Vec<TestimonialResponse> = decode_documents::<Testimonial>(documents)
                .into_iter()
                .map(TestimonialResponse::from)
                .collect();
            tracing::info!("Listed {} testimonials (limit: {})", testimonials.len(), query.limit);
            Json(testimonials)
        }
        Err(e) => {
            tracing::error!("Testimonial query failed, serving examples: {}", e);
            fallback(query.limit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::*;
    use crate::config::Config;
    use crate::store::{Document, DocumentStore, StoreError, create_document};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use serde_json::{json, Value as JsonValue};
    use std::sync::Arc;

    struct UnreadableStore;

    #[async_trait]
    impl DocumentStore for UnreadableStore {
        async fn insert(&self, _: Collection, _: JsonValue) -> Result<String, StoreError> {
            Err(StoreError::Backend(anyhow::anyhow!("read-only")))
        }

        async fn find(&self, _: Collection, _: &Filter, _: usize) -> Result<Vec<Document>, StoreError> {
            Err(StoreError::Backend(anyhow::anyhow!("replica lagging")))
        }

        fn name(&self) -> Option<&str> {
            None
        }

        async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }
    }

    fn testimonial(author: &str, rating: i64) -> Testimonial {
        Testimonial {
            author: author.to_string(),
            handle: None,
            content: format!("{} loves their kitten", author),
            rating,
            avatar_url: None,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_fallback_without_store_default_limit() {
        let app = app_without_store();

        let (status, json) = get_json(&app, "/api/testimonials").await;

        assert_eq!(status, StatusCode::OK);
        let list = json.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["author"], "Sofia R.");
        assert_eq!(list[1]["author"], "Michael T.");
        assert!(list[0]["id"].is_null());
    }

    #[tokio::test]
    async fn test_fallback_without_store_truncated() {
        let app = app_without_store();

        let (status, json) = get_json(&app, "/api/testimonials?limit=1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_when_store_read_fails() {
        let state = AppState::new(Some(Arc::new(UnreadableStore)), Config::for_tests(Some("memory://")));
        let app = crate::app::router(state);

        let (status, json) = get_json(&app, "/api/testimonials?limit=5").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_from_store_with_ids() {
        let (app, store) = app_with_memory_store();
        let id = create_document(store.as_ref(), &testimonial("Ana", 4)).await.unwrap();

        let (status, json) = get_json(&app, "/api/testimonials").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!([{
                "id": id,
                "author": "Ana",
                "handle": null,
                "content": "Ana loves their kitten",
                "rating": 4,
                "avatar_url": null,
                "image_url": null
            }])
        );
    }

    #[tokio::test]
    async fn test_list_from_store_respects_limit() {
        let (app, store) = app_with_memory_store();
        for author in ["a", "b", "c", "d"] {
            create_document(store.as_ref(), &testimonial(author, 5)).await.unwrap();
        }

        let (_, limited) = get_json(&app, "/api/testimonials?limit=3").await;
        assert_eq!(limited.as_array().unwrap().len(), 3);

        let (_, all) = get_json(&app, "/api/testimonials").await;
        assert_eq!(all.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_empty_store_returns_empty_list() {
        let (app, _store) = app_with_memory_store();

        let (status, json) = get_json(&app, "/api/testimonials").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([]));
    }

    #[test]
    fn test_example_text_is_verbatim() {
        let examples = example_testimonials();
        assert_eq!(
            examples[0].content,
            "Our shaded silver boy is massive and so gentle. The FaceTime call sealed our trust\u{2014}everything was exactly as promised."
        );
        assert_eq!(
            examples[1].content,
            "Hand delivery to LA was seamless. Genetics and health transparency are top-tier. Couldn\u{2019}t be happier!"
        );
    }

    #[test]
    fn test_examples_are_valid_testimonials() {
        let examples = example_testimonials();
        assert!(examples.len() >= 2);
        for example in examples {
            assert!((1..=5).contains(&example.rating));
            assert!(!example.author.is_empty());
            assert!(!example.content.is_empty());
        }
    }
}
