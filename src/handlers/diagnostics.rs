use crate::models::DiagnosticResponse;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, Json};

const MAX_COLLECTIONS: usize = 10;
const LIST_ERROR_CHARS: usize = 80;
const FAILURE_CHARS: usize = 120;

/// GET /test handler - Backend and document store diagnostics
///
/// Always answers 200. Every failure while probing the store is folded into
/// the `database` label instead of being returned as an error.
#[utoipa::path(
    get,
    path = routes::DIAGNOSTICS,
    responses(
        (status = 200, description = "Diagnostic report", body = DiagnosticResponse)
    ),
    tag = "health"
)]
pub async fn diagnostics_handler(State(state): State<AppState>) -> Json<DiagnosticResponse> {
    Json(diagnose(&state).await)
}

async fn diagnose(state: &AppState) -> DiagnosticResponse {
    let mut response = DiagnosticResponse {
        backend: "✅ Running".to_string(),
        database: "❌ Not Available".to_string(),
        database_url: Some(
            if state.config.database_url_set() { "✅ Set" } else { "❌ Not Set" }.to_string(),
        ),
        database_name: None,
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    let Some(store) = state.store.clone() else {
        response.database = "⚠️ Available but not initialized".to_string();
        return response;
    };

    response.database = "✅ Available".to_string();
    response.database_name = Some(
        state
            .config
            .database_name
            .as_deref()
            .or(store.name())
            .unwrap_or("✅ Connected")
            .to_string(),
    );
    response.connection_status = "Connected".to_string();

    // Run the probe on its own task so even a panicking backend is reported.
    let probe = tokio::spawn(async move { store.list_collections().await }).await;

    match probe {
        Ok(Ok(mut names)) => {
            names.truncate(MAX_COLLECTIONS);
            response.collections = names;
            response.database = "✅ Connected & Working".to_string();
        }
        Ok(Err(e)) => {
            tracing::warn!("Diagnostic collection listing failed: {}", e);
            response.database = format!(
                "⚠️ Connected but Error: {}",
                truncate_chars(&e.to_string(), LIST_ERROR_CHARS)
            );
        }
        Err(e) => {
            tracing::error!("Diagnostic probe aborted: {}", e);
            response.database = format!(
                "❌ Error: {}",
                truncate_chars(&e.to_string(), FAILURE_CHARS)
            );
        }
    }

    response
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::*;
    use crate::config::Config;
    use crate::store::{Collection, Document, DocumentStore, Filter, StoreError};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use serde_json::Value as JsonValue;
    use std::sync::Arc;

    const FIELDS: [&str; 6] = [
        "backend",
        "database",
        "database_url",
        "database_name",
        "connection_status",
        "collections",
    ];

    /// Store whose listing always fails with a long message.
    struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn insert(&self, _: Collection, _: JsonValue) -> Result<String, StoreError> {
            Err(StoreError::Backend(anyhow::anyhow!("insert refused")))
        }

        async fn find(&self, _: Collection, _: &Filter, _: usize) -> Result<Vec<Document>, StoreError> {
            Err(StoreError::Backend(anyhow::anyhow!("find refused")))
        }

        fn name(&self) -> Option<&str> {
            None
        }

        async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Backend(anyhow::anyhow!("{}", "x".repeat(500))))
        }
    }

    /// Store whose listing panics.
    struct PanickingStore;

    #[async_trait]
    impl DocumentStore for PanickingStore {
        async fn insert(&self, _: Collection, _: JsonValue) -> Result<String, StoreError> {
            unreachable!()
        }

        async fn find(&self, _: Collection, _: &Filter, _: usize) -> Result<Vec<Document>, StoreError> {
            unreachable!()
        }

        fn name(&self) -> Option<&str> {
            Some("unstable")
        }

        async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
            panic!("listing exploded")
        }
    }

    #[tokio::test]
    async fn test_diagnostics_without_store() {
        let app = app_without_store();

        let (status, json) = get_json(&app, "/test").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["backend"], "✅ Running");
        assert_eq!(json["database"], "⚠️ Available but not initialized");
        assert_eq!(json["database_url"], "❌ Not Set");
        assert!(json["database_name"].is_null());
        assert_eq!(json["connection_status"], "Not Connected");
        assert_eq!(json["collections"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_diagnostics_with_working_store() {
        let (app, store) = app_with_memory_store();
        store.insert(Collection::Kitten, serde_json::json!({"name": "Thor"})).await.unwrap();

        let (status, json) = get_json(&app, "/test").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["database"], "✅ Connected & Working");
        assert_eq!(json["database_url"], "✅ Set");
        assert_eq!(json["database_name"], "test-db");
        assert_eq!(json["connection_status"], "Connected");
        assert_eq!(json["collections"], serde_json::json!(["kitten"]));
    }

    #[tokio::test]
    async fn test_diagnostics_never_echoes_connection_string() {
        let store = Arc::new(crate::store::MemoryStore::new("db"));
        let state = AppState::new(
            Some(store),
            Config::for_tests(Some("memory://user:hunter2@db")),
        );

        let report = diagnose(&state).await;

        let rendered = serde_json::to_string(&report).unwrap();
        assert!(!rendered.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_diagnostics_truncates_listing_error() {
        let state = AppState::new(Some(Arc::new(BrokenStore)), Config::for_tests(Some("memory://")));

        let report = diagnose(&state).await;

        assert_eq!(report.connection_status, "Connected");
        assert_eq!(report.database_name.as_deref(), Some("✅ Connected"));
        assert!(report.database.starts_with("⚠️ Connected but Error: "));
        let detail = report.database.trim_start_matches("⚠️ Connected but Error: ");
        assert_eq!(detail.chars().count(), LIST_ERROR_CHARS);
        assert!(report.collections.is_empty());
    }

    #[tokio::test]
    async fn test_diagnostics_survives_panicking_store() {
        let state = AppState::new(Some(Arc::new(PanickingStore)), Config::for_tests(Some("memory://")));

        let report = diagnose(&state).await;

        assert!(report.database.starts_with("❌ Error: "));
        assert!(report.database.chars().count() <= "❌ Error: ".chars().count() + FAILURE_CHARS);
    }

    #[tokio::test]
    async fn test_diagnostics_database_name_override() {
        let store = Arc::new(crate::store::MemoryStore::new("db"));
        let mut config = Config::for_tests(Some("memory://db"));
        config.database_name = Some("gentle-giants".to_string());
        let state = AppState::new(Some(store), config);

        let report = diagnose(&state).await;

        assert_eq!(report.database_name.as_deref(), Some("gentle-giants"));
    }

    #[tokio::test]
    async fn test_diagnostics_field_set_is_stable() {
        let without = app_without_store();
        let (with, _store) = app_with_memory_store();

        for app in [without, with] {
            for _ in 0..2 {
                let (status, json) = get_json(&app, "/test").await;
                assert_eq!(status, StatusCode::OK);
                let object = json.as_object().unwrap();
                assert_eq!(object.len(), FIELDS.len());
                for field in FIELDS {
                    assert!(object.contains_key(field), "missing {}", field);
                }
            }
        }
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("ééé", 2), "éé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
