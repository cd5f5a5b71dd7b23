use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{AdminSettings, Question, QuestionId, ResultId, ResultRecord};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A persisted result with its storage identifier.
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub id: ResultId,
    pub record: ResultRecord,
}

impl ResultRow {
    #[must_use]
    pub fn new(id: ResultId, record: ResultRecord) -> Self {
        Self { id, record }
    }
}

/// Repository contract for the admin-managed question bank.
///
/// The bank is an ordered list; a running quiz snapshots it once at start.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Fetch all questions in bank order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or deserialization failures.
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// Append a question to the end of the bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the ID is already taken, or other
    /// storage errors.
    async fn add_question(&self, question: &Question) -> Result<(), StorageError>;

    /// Remove the question at the given bank position.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the index is out of range.
    async fn remove_question_at(&self, index: usize) -> Result<(), StorageError>;

    /// Allocate an identifier for a question about to be added.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection failures.
    async fn next_question_id(&self) -> Result<QuestionId, StorageError>;
}

/// Repository contract for finalized quiz results.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Append a finalized result and return its storage ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn append_result(&self, record: &ResultRecord) -> Result<ResultId, StorageError>;

    /// List results, newest first, up to `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or deserialization failures.
    async fn list_results(&self, limit: u32) -> Result<Vec<ResultRow>, StorageError>;
}

/// Repository contract for the admin settings singleton.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetch the stored settings, if any were saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection failures.
    async fn get_settings(&self) -> Result<Option<AdminSettings>, StorageError>;

    /// Persist the settings, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the settings cannot be stored.
    async fn save_settings(&self, settings: &AdminSettings) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<Question>>>,
    results: Arc<Mutex<Vec<ResultRow>>>,
    settings: Arc<Mutex<Option<AdminSettings>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn add_question(&self, question: &Question) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.iter().any(|q| q.id() == question.id()) {
            return Err(StorageError::Conflict);
        }
        guard.push(question.clone());
        Ok(())
    }

    async fn remove_question_at(&self, index: usize) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if index >= guard.len() {
            return Err(StorageError::NotFound);
        }
        guard.remove(index);
        Ok(())
    }

    async fn next_question_id(&self) -> Result<QuestionId, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let max = guard.iter().map(|q| q.id().value()).max().unwrap_or(0);
        Ok(QuestionId::new(max + 1))
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn append_result(&self, record: &ResultRecord) -> Result<ResultId, StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = ResultId::new(guard.len() as u64 + 1);
        guard.push(ResultRow::new(id, record.clone()));
        Ok(id)
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<ResultRow>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SettingsRepository for InMemoryRepository {
    async fn get_settings(&self) -> Result<Option<AdminSettings>, StorageError> {
        let guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_settings(&self, settings: &AdminSettings) -> Result<(), StorageError> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(settings.clone());
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub results: Arc<dyn ResultRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo.clone());
        let settings: Arc<dyn SettingsRepository> = Arc::new(repo);
        Self {
            questions,
            results,
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionDraft;
    use quiz_core::time::fixed_now;

    fn build_question(id: u64) -> Question {
        QuestionDraft::new(
            format!("Q{id}"),
            vec!["a".into(), "b".into()],
            "a",
        )
        .validate(QuestionId::new(id))
        .unwrap()
    }

    #[tokio::test]
    async fn question_bank_keeps_insertion_order() {
        let repo = InMemoryRepository::new();
        repo.add_question(&build_question(1)).await.unwrap();
        repo.add_question(&build_question(2)).await.unwrap();
        repo.add_question(&build_question(3)).await.unwrap();

        let listed = repo.list_questions().await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].prompt(), "Q1");
        assert_eq!(listed[2].prompt(), "Q3");

        repo.remove_question_at(1).await.unwrap();
        let listed = repo.list_questions().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].prompt(), "Q3");
    }

    #[tokio::test]
    async fn remove_out_of_range_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo.remove_question_at(0).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn duplicate_question_id_conflicts() {
        let repo = InMemoryRepository::new();
        repo.add_question(&build_question(1)).await.unwrap();
        let err = repo.add_question(&build_question(1)).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn results_list_newest_first() {
        let repo = InMemoryRepository::new();
        for (name, score) in [("Ada", 1), ("Grace", 2), ("Edsger", 3)] {
            let record = ResultRecord::new(name, score, 3, fixed_now()).unwrap();
            repo.append_result(&record).await.unwrap();
        }

        let rows = repo.list_results(2).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].record.student_name(), "Edsger");
        assert_eq!(rows[1].record.student_name(), "Grace");
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_settings().await.unwrap().is_none());

        let settings = AdminSettings::from_persisted(Some("admin@school.edu".into()));
        repo.save_settings(&settings).await.unwrap();
        let loaded = repo.get_settings().await.unwrap().unwrap();
        assert_eq!(loaded.notification_email(), Some("admin@school.edu"));
    }
}
