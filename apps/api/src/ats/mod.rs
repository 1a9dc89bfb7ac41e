// ATS checker: resume upload → text extraction → keyword overlap score.
// The scorer is pure; extraction and multipart intake are the only I/O.

pub mod extract;
pub mod handlers;
pub mod scorer;
pub mod upload;

use axum::http::StatusCode;
use thiserror::Error;

/// Every way an ATS check can fail. Each is terminal for the request.
#[derive(Debug, Error)]
pub enum AtsError {
    #[error("Resume file is required.")]
    MissingFile,

    #[error("Only PDF or DOCX files allowed (got {0}).")]
    UnsupportedFormat(String),

    #[error("Job description must be at least {min} characters (got {len}).")]
    JobDescriptionTooShort { len: usize, min: usize },

    #[error("No readable text found in the resume.")]
    EmptyResumeText,

    #[error("Error processing resume: {0}")]
    ExtractionFailure(String),

    #[error("Job description contains no keywords.")]
    EmptyTokenSet,
}

impl AtsError {
    pub fn status(&self) -> StatusCode {
        match self {
            AtsError::MissingFile
            | AtsError::JobDescriptionTooShort { .. }
            | AtsError::EmptyTokenSet => StatusCode::BAD_REQUEST,
            AtsError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AtsError::EmptyResumeText | AtsError::ExtractionFailure(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AtsError::MissingFile => "MISSING_FILE",
            AtsError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AtsError::JobDescriptionTooShort { .. } => "JOB_DESCRIPTION_TOO_SHORT",
            AtsError::EmptyResumeText => "EMPTY_RESUME_TEXT",
            AtsError::ExtractionFailure(_) => "EXTRACTION_FAILURE",
            AtsError::EmptyTokenSet => "EMPTY_TOKEN_SET",
        }
    }
}
