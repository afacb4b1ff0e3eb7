//! The classification route: mask PII, then categorize the masked email.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::state::AppState;
use mailtriage_mask::MaskedEntity;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/classify", post(classify_email))
}

#[derive(Deserialize)]
pub struct EmailRequest {
    pub input_email_body: String,
}

#[derive(Serialize)]
pub struct EmailResponse {
    pub input_email_body: String,
    pub list_of_masked_entities: Vec<MaskedEntity>,
    pub masked_email: String,
    pub category_of_the_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_probabilities: Option<HashMap<String, f32>>,
}

type ValidationError = (StatusCode, Json<serde_json::Value>);

fn bad_request(detail: String) -> ValidationError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "detail": detail })),
    )
}

/// Mask PII in the email body, then classify the masked text.
///
/// Validation happens before the pipeline runs. A classifier failure
/// degrades to a sentinel category with HTTP 200; it is never a
/// request error.
async fn classify_email(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EmailRequest>,
) -> Result<Json<EmailResponse>, ValidationError> {
    let text = request.input_email_body.trim().to_string();
    if text.is_empty() {
        return Err(bad_request("Email body cannot be empty".to_string()));
    }
    if text.chars().count() > state.config.max_email_len {
        return Err(bad_request(format!(
            "Email body too long (max {} characters)",
            state.config.max_email_len
        )));
    }

    let masking = state.masker.mask(&text);

    let (category, probabilities) = if state.classifier.is_available() {
        match state.classifier.predict(&masking.masked_text) {
            Some(prediction) => (prediction.category, prediction.probabilities),
            None => {
                error!("Classification failed for a {}-char email", text.chars().count());
                ("error_during_classification".to_string(), HashMap::new())
            }
        }
    } else {
        ("classifier_not_available".to_string(), HashMap::new())
    };

    Ok(Json(EmailResponse {
        input_email_body: text,
        list_of_masked_entities: masking.entities,
        masked_email: masking.masked_text,
        category_of_the_email: category,
        prediction_probabilities: Some(probabilities),
    }))
}
