use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, warn};
use upload_guard_core::{
    api::{ValidateFileRequest, ValidateFileResponse},
    Outcome, ValidationRequest, Validator,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    validator: Arc<Validator<'static>>,
}

pub fn router(validator: Arc<Validator<'static>>) -> Router {
    let state = AppState { validator };
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/uploads/validate", post(validate_upload))
        .layer(TraceLayer::new_for_http())
        // Public endpoint without sessions; preflight gets an empty 200.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn validate_upload(
    State(st): State<AppState>,
    payload: Result<Json<ValidateFileRequest>, JsonRejection>,
) -> (StatusCode, Json<ValidateFileResponse>) {
    let request_id = Uuid::new_v4();
    info_span!("validate_upload", %request_id).in_scope(|| {
        let body = match payload {
            Ok(Json(body)) => body,
            Err(rejection) => {
                let reason = rejection.body_text();
                warn!(error = %reason, "malformed validation request");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ValidateFileResponse::malformed(format!(
                        "Invalid request body: {reason}"
                    ))),
                );
            }
        };

        let req = ValidationRequest::from(body);
        let verdict = st.validator.validate(&req);
        info!(
            file_name = %req.file_name,
            mime_type = %req.declared_media_type,
            outcome = ?verdict.outcome,
            "upload validated"
        );
        (status_for(verdict.outcome), Json(verdict.into()))
    })
}

fn status_for(outcome: Outcome) -> StatusCode {
    match outcome {
        Outcome::Accepted(_) => StatusCode::OK,
        Outcome::Rejected(_) => StatusCode::BAD_REQUEST,
        Outcome::Faulted => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
