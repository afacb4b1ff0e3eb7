//! Health check route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

/// Report service status plus availability of the optional backends.
async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let classifier_available = state.classifier.is_available();
    Json(serde_json::json!({
        "status": "healthy",
        "classifier_available": classifier_available,
        "classifier_type": if classifier_available {
            Some(state.classifier.name())
        } else {
            None
        },
        "ner_available": state.masker.ner_available(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use mailtriage_classify::NoopClassifier;
    use mailtriage_core::MailTriageConfig;
    use mailtriage_mask::NoopNer;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_reports_backend_availability() {
        let dir = tempfile::tempdir().unwrap();
        let config = MailTriageConfig::from_env(dir.path()).unwrap();
        let state = Arc::new(AppState::new(
            config,
            Arc::new(NoopNer),
            Arc::new(NoopClassifier),
        ));
        let app = crate::routes::build_router(state);

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["classifier_available"], false);
        assert_eq!(body["classifier_type"], serde_json::Value::Null);
        assert_eq!(body["ner_available"], false);
    }
}
