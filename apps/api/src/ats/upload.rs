//! Multipart intake for the ATS form: a `resume` file and a `jobDescription` text field.

use std::io::Write;

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::AppError;

pub const RESUME_FIELD: &str = "resume";
pub const JOB_DESCRIPTION_FIELD: &str = "jobDescription";

/// Uploaded resume spooled to a temp file; the file is removed on drop.
#[derive(Debug)]
pub struct UploadedResume {
    pub file: NamedTempFile,
    pub file_name: Option<String>,
    /// Declared MIME type. Trusted as-is to pick the extraction path.
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Default)]
pub struct AtsForm {
    pub resume: Option<UploadedResume>,
    pub job_description: Option<String>,
}

/// Reads every field of the form. Unknown fields are skipped; an empty file
/// part (browser submitted with no file chosen) counts as no file.
pub async fn read_ats_form(mut multipart: Multipart) -> Result<AtsForm, AppError> {
    let mut form = AtsForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                if data.is_empty() {
                    continue;
                }
                form.resume = Some(spool(data, file_name, content_type)?);
            }
            Some(JOB_DESCRIPTION_FIELD) => {
                form.job_description = Some(field.text().await.map_err(multipart_error)?);
            }
            other => debug!(field = ?other, "Ignoring unexpected multipart field"),
        }
    }

    Ok(form)
}

fn spool(
    data: Bytes,
    file_name: Option<String>,
    content_type: String,
) -> Result<UploadedResume, AppError> {
    let mut file = tempfile::Builder::new()
        .prefix("resume-")
        .tempfile()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to create temp file: {e}")))?;
    file.write_all(&data)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to spool upload: {e}")))?;

    debug!(
        file_name = file_name.as_deref().unwrap_or("<none>"),
        %content_type,
        size = data.len(),
        "Spooled resume upload"
    );

    Ok(UploadedResume {
        file,
        file_name,
        content_type,
        size: data.len(),
    })
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}
