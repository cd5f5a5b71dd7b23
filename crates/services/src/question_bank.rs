use std::sync::Arc;

use quiz_core::model::{Question, QuestionDraft};
use storage::repository::QuestionRepository;

use crate::error::QuestionBankError;

/// Admin-facing editor for the ordered question bank.
///
/// Validates drafts and delegates persistence to the repository. Running
/// sessions are unaffected: they snapshot the bank once at start.
#[derive(Clone)]
pub struct QuestionBankService {
    questions: Arc<dyn QuestionRepository>,
}

impl QuestionBankService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>) -> Self {
        Self { questions }
    }

    /// Fetch all questions in bank order.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError` on storage failures.
    pub async fn list(&self) -> Result<Vec<Question>, QuestionBankError> {
        Ok(self.questions.list_questions().await?)
    }

    /// Validate a draft and append it to the bank.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Question` if the draft fails validation,
    /// or `QuestionBankError::Storage` on persistence failures.
    pub async fn add(&self, draft: QuestionDraft) -> Result<Question, QuestionBankError> {
        let id = self.questions.next_question_id().await?;
        let question = draft.validate(id)?;
        self.questions.add_question(&question).await?;
        tracing::info!(id = %question.id(), "question added to bank");
        Ok(question)
    }

    /// Remove the question at the given bank position.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Storage` (`NotFound`) if the index is out
    /// of range.
    pub async fn remove_at(&self, index: usize) -> Result<(), QuestionBankError> {
        self.questions.remove_question_at(index).await?;
        tracing::info!(index, "question removed from bank");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionError;
    use storage::repository::{InMemoryRepository, StorageError};

    fn service() -> QuestionBankService {
        QuestionBankService::new(Arc::new(InMemoryRepository::new()))
    }

    fn draft(prompt: &str) -> QuestionDraft {
        QuestionDraft::new(prompt, vec!["yes".into(), "no".into()], "yes")
    }

    #[tokio::test]
    async fn add_assigns_sequential_ids() {
        let bank = service();
        let first = bank.add(draft("Q1")).await.unwrap();
        let second = bank.add(draft("Q2")).await.unwrap();
        assert!(second.id() > first.id());

        let listed = bank.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].prompt(), "Q1");
    }

    #[tokio::test]
    async fn add_rejects_invalid_draft() {
        let bank = service();
        let err = bank
            .add(QuestionDraft::new("Q", vec!["a".into(), "b".into()], "c"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuestionBankError::Question(QuestionError::AnswerNotInOptions)
        ));
        assert!(bank.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_at_out_of_range() {
        let bank = service();
        bank.add(draft("Q1")).await.unwrap();
        let err = bank.remove_at(3).await.unwrap_err();
        assert!(matches!(
            err,
            QuestionBankError::Storage(StorageError::NotFound)
        ));

        bank.remove_at(0).await.unwrap();
        assert!(bank.list().await.unwrap().is_empty());
    }
}
