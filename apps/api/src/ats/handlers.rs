//! Axum route handler for the ATS checker.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tracing::{debug, info};

use crate::ats::extract::DocumentKind;
use crate::ats::scorer::{score, validate_job_description, ScoreResult};
use crate::ats::upload::read_ats_form;
use crate::ats::AtsError;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/ats/check
///
/// Multipart form: `resume` (PDF or DOCX) + `jobDescription`.
/// Preconditions are checked in order (file, JD length, MIME) before any
/// extraction happens. A body that is not multipart carries no file.
pub async fn handle_ats_check(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ScoreResult>, AppError> {
    let multipart = multipart.map_err(|rejection| {
        debug!(%rejection, "ATS check without a multipart body");
        AtsError::MissingFile
    })?;
    let form = read_ats_form(multipart).await?;

    let resume = form.resume.ok_or(AtsError::MissingFile)?;
    let job_description = form.job_description.unwrap_or_default();
    validate_job_description(&job_description)?;
    let kind = DocumentKind::from_mime(&resume.content_type)?;

    let resume_text = state
        .extractor
        .extract_text(resume.file.path(), kind)
        .await?;
    let result = score(&resume_text, &job_description)?;

    info!(
        file_name = resume.file_name.as_deref().unwrap_or("<none>"),
        bytes = resume.size,
        ats_score = result.ats_score,
        matched = result.matched_keywords,
        total = result.total_keywords,
        analysis = ?result.analysis,
        "ATS check scored"
    );

    Ok(Json(result))
}
