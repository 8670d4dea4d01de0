//! Trial-signup requests from the landing page.

use crate::{
    errors::AppError,
    handlers::blog_handlers::invalid_body,
    models::trial_request::{NewTrialRequest, TrialRequest},
    state::AppState,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

/// `POST /api/trial-requests`
pub async fn create_trial_request(
    State(state): State<AppState>,
    payload: Result<Json<NewTrialRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(new) = payload.map_err(invalid_body)?;
    let new = new.normalize();
    new.validate().map_err(AppError::validation)?;

    let request = state.store.create_trial_request(new).await?;
    tracing::info!(id = %request.id, "trial request received");
    Ok((StatusCode::CREATED, Json(request)))
}

/// `GET /api/trial-requests`
pub async fn list_trial_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrialRequest>>, AppError> {
    Ok(Json(state.store.trial_requests().await?))
}
