//! Resume match scorer: bag-of-words overlap between resume text and a job description.
//!
//! Algorithm:
//! 1. Lowercase both inputs.
//! 2. Split on runs of non-word characters (word = ASCII letter, digit, `_`).
//!    Empty tokens produced at split boundaries are kept.
//! 3. For every JD token, in order and with duplicates, count a hit when it
//!    appears anywhere in the resume tokens.
//! 4. raw = round(hits / jd_tokens × 100); reported score = min(raw, 98)
//! 5. Band from raw: <40 poor, 40 to 69 moderate, ≥70 great

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ats::AtsError;

/// Job descriptions shorter than this are rejected before scoring.
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 30;

/// The reported score never reaches 100.
pub const MAX_REPORTED_SCORE: u32 = 98;

const MODERATE_THRESHOLD: u32 = 40;
const GREAT_THRESHOLD: u32 = 70;

static NON_WORD: OnceLock<Regex> = OnceLock::new();

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Qualitative verdict derived from the unclamped score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchBand {
    Poor,
    Moderate,
    Great,
}

impl MatchBand {
    pub fn from_raw_score(raw: u32) -> Self {
        if raw < MODERATE_THRESHOLD {
            MatchBand::Poor
        } else if raw < GREAT_THRESHOLD {
            MatchBand::Moderate
        } else {
            MatchBand::Great
        }
    }

    /// Advice shown next to the score.
    pub fn message(self) -> &'static str {
        match self {
            MatchBand::Poor => "Poor match. Add more job-specific keywords.",
            MatchBand::Moderate => "Moderate match. Improve keyword usage and formatting.",
            MatchBand::Great => "Great match! Resume is well optimized.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub ats_score: u32,
    pub matched_keywords: usize,
    pub total_keywords: usize,
    pub analysis: MatchBand,
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Tokenization + scoring
// ────────────────────────────────────────────────────────────────────────────

/// Lowercases `text` and splits it on runs of non-word characters.
///
/// Leading/trailing separators yield empty tokens, and an empty input yields
/// a single empty token.
pub fn tokenize(text: &str) -> Vec<String> {
    let re = NON_WORD.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]+").expect("non-word regex"));
    let lowered = text.to_lowercase();
    re.split(&lowered).map(str::to_string).collect()
}

/// Scores `resume_text` against `job_description`.
pub fn score(resume_text: &str, job_description: &str) -> Result<ScoreResult, AtsError> {
    validate_job_description(job_description)?;
    if resume_text.trim().is_empty() {
        return Err(AtsError::EmptyResumeText);
    }

    let jd_tokens = tokenize(job_description);
    // A JD of pure punctuation passes the length check but holds no words.
    if jd_tokens.iter().all(|t| t.is_empty()) {
        return Err(AtsError::EmptyTokenSet);
    }

    let resume_tokens: HashSet<String> = tokenize(resume_text).into_iter().collect();
    let matched = jd_tokens
        .iter()
        .filter(|t| resume_tokens.contains(t.as_str()))
        .count();
    let total = jd_tokens.len();

    let raw = ((matched as f64 / total as f64) * 100.0).round() as u32;
    let band = MatchBand::from_raw_score(raw);

    Ok(ScoreResult {
        ats_score: raw.min(MAX_REPORTED_SCORE),
        matched_keywords: matched,
        total_keywords: total,
        analysis: band,
        message: band.message().to_string(),
    })
}

/// Length is counted in characters and the text is not trimmed.
pub fn validate_job_description(job_description: &str) -> Result<(), AtsError> {
    let len = job_description.chars().count();
    if len < MIN_JOB_DESCRIPTION_CHARS {
        return Err(AtsError::JobDescriptionTooShort {
            len,
            min: MIN_JOB_DESCRIPTION_CHARS,
        });
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
