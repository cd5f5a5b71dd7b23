use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultError {
    #[error("student name cannot be empty")]
    EmptyName,

    #[error("score ({score}) exceeds total questions ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

/// A finalized quiz result as kept for later admin review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    student_name: String,
    score: u32,
    total_questions: u32,
    submitted_at: DateTime<Utc>,
}

impl ResultRecord {
    /// Build a result record, enforcing `score <= total_questions`.
    ///
    /// # Errors
    ///
    /// Returns `ResultError` if the name is blank or the score is out of range.
    pub fn new(
        student_name: impl Into<String>,
        score: u32,
        total_questions: u32,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, ResultError> {
        let student_name = student_name.into().trim().to_owned();
        if student_name.is_empty() {
            return Err(ResultError::EmptyName);
        }
        if score > total_questions {
            return Err(ResultError::ScoreExceedsTotal {
                score,
                total: total_questions,
            });
        }

        Ok(Self {
            student_name,
            score,
            total_questions,
            submitted_at,
        })
    }

    /// Rehydrate a result record from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `ResultError` if the stored fields are inconsistent.
    pub fn from_persisted(
        student_name: String,
        score: u32,
        total_questions: u32,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, ResultError> {
        Self::new(student_name, score, total_questions, submitted_at)
    }

    #[must_use]
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}
