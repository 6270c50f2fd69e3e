//! Axum route handlers for the Matching API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::scorer::resume_match_score;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume: String,
    pub job_desc: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResult {
    pub result: String,
}

/// POST /match
///
/// Scores a resume against a job description and returns the model's review verbatim.
/// Body rejections become `AppError::Validation` (422) before the provider is touched.
pub async fn handle_match(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResult>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("match", %request_id);

    async move {
        info!(
            resume_bytes = request.resume.len(),
            job_desc_bytes = request.job_desc.len(),
            "match request received"
        );

        let result =
            resume_match_score(state.llm.as_ref(), &request.resume, &request.job_desc).await?;

        info!(result_bytes = result.len(), "match completed");
        Ok::<_, AppError>(Json(MatchResult { result }))
    }
    .instrument(span)
    .await
}
