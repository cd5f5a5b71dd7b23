use chrono::{DateTime, Utc};
use std::sync::Arc;

use quiz_core::model::ResultId;
use storage::repository::{ResultRepository, ResultRow};

use crate::error::ResultsError;

/// Presentation-agnostic list item for a finalized result.
///
/// The admin dashboard may format timestamps (relative time, locale) as
/// needed; nothing here is pre-formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultListItem {
    pub id: ResultId,
    pub student_name: String,
    pub score: u32,
    pub total_questions: u32,
    pub submitted_at: DateTime<Utc>,
}

impl ResultListItem {
    #[must_use]
    pub fn from_row(row: &ResultRow) -> Self {
        Self {
            id: row.id,
            student_name: row.record.student_name().to_owned(),
            score: row.record.score(),
            total_questions: row.record.total_questions(),
            submitted_at: row.record.submitted_at(),
        }
    }
}

/// Read side of the results store, for admin review.
#[derive(Clone)]
pub struct ResultsService {
    results: Arc<dyn ResultRepository>,
}

impl ResultsService {
    #[must_use]
    pub fn new(results: Arc<dyn ResultRepository>) -> Self {
        Self { results }
    }

    /// List finalized results, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError` on storage failures.
    pub async fn list(&self, limit: u32) -> Result<Vec<ResultListItem>, ResultsError> {
        let rows = self.results.list_results(limit).await?;
        Ok(rows.iter().map(ResultListItem::from_row).collect())
    }
}
