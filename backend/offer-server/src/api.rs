//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use offer_form::{
    Applied, Branding, FormCommand, FormError, FormFeatures, FormState, ValidationErrors,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::error;

use crate::autosave::SavedIndicator;
use crate::errors::ServerError;
use crate::session::{FormSession, ProgressView};

pub struct ApiState {
    pub session: Mutex<FormSession>,
    pub saved: SavedIndicator,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub state: FormState,
    pub active_buyer: usize,
    pub revision: u64,
    pub progress: ProgressView,
    pub shown_errors: ValidationErrors,
    pub features: FormFeatures,
    pub branding: Branding,
    pub draft_saved: bool,
}

#[derive(Serialize)]
pub struct CommandResponse {
    #[serde(flatten)]
    pub applied: Applied,
    pub form: FormView,
}

#[derive(Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: ValidationErrors,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SubmitRejected {
    pub errors: ValidationErrors,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Form(FormError::InvariantViolation(_)) => StatusCode::CONFLICT,
            ServerError::Form(FormError::BuyerOutOfRange { .. }) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {self}");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

fn form_view(session: &FormSession, saved: &SavedIndicator) -> FormView {
    let store = session.store();
    FormView {
        state: store.state().clone(),
        active_buyer: store.active_buyer(),
        revision: store.revision(),
        progress: session.progress(),
        shown_errors: store.shown_errors().clone(),
        features: *session.features(),
        branding: session.branding().clone(),
        draft_saved: saved.is_visible(),
    }
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /form`
pub async fn get_form(State(state): State<Arc<ApiState>>) -> Json<FormView> {
    let session = state.session.lock().await;
    Json(form_view(&session, &state.saved))
}

/// `POST /form/commands`
///
/// Applies one command and returns the updated form.
pub async fn apply_command(
    State(state): State<Arc<ApiState>>,
    Json(command): Json<FormCommand>,
) -> Result<Json<CommandResponse>, ServerError> {
    let mut session = state.session.lock().await;
    let applied = session.apply(command).await?;
    Ok(Json(CommandResponse {
        applied,
        form: form_view(&session, &state.saved),
    }))
}

/// `GET /form/validation`
pub async fn get_validation(State(state): State<Arc<ApiState>>) -> Json<ValidationResponse> {
    let errors = state.session.lock().await.validation();
    Json(ValidationResponse {
        valid: errors.is_empty(),
        errors,
    })
}

/// `GET /form/progress`
pub async fn get_progress(State(state): State<Arc<ApiState>>) -> Json<ProgressView> {
    Json(state.session.lock().await.progress())
}

/// `POST /form/submit`
///
/// 200 with the submission payload, or 422 with the field errors.
pub async fn submit(State(state): State<Arc<ApiState>>) -> Response {
    let mut session = state.session.lock().await;
    match session.submit(Utc::now()).await {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(SubmitRejected { errors }),
        )
            .into_response(),
    }
}

/// `POST /form/reset`
pub async fn reset(State(state): State<Arc<ApiState>>) -> Result<Json<FormView>, ServerError> {
    let mut session = state.session.lock().await;
    session.apply(FormCommand::ClearForm).await?;
    Ok(Json(form_view(&session, &state.saved)))
}
