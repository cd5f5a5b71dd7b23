use std::sync::Arc;

use quiz_core::model::{Receipt, ResultRecord, StudentIdentity};
use quiz_core::session::{AnswerOutcome, QuizSession};
use storage::repository::{QuestionRepository, ResultRepository, SettingsRepository};

use crate::Clock;
use crate::error::{DeliveryError, QuizError};
use crate::result_sink::{ResultPayload, ResultSink};

/// Orchestrates a student's run through the quiz: start, answer, finalize.
///
/// The session itself is pure; this service supplies the clock, snapshots the
/// question bank once at start, and drives delivery plus persistence on
/// finalize.
#[derive(Clone)]
pub struct QuizFlowService {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
    results: Arc<dyn ResultRepository>,
    settings: Arc<dyn SettingsRepository>,
    sink: Arc<dyn ResultSink>,
}

impl QuizFlowService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionRepository>,
        results: Arc<dyn ResultRepository>,
        settings: Arc<dyn SettingsRepository>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            clock,
            questions,
            results,
            settings,
            sink,
        }
    }

    /// Start a new session over the current question bank.
    ///
    /// The bank is read exactly once; later admin edits are not visible to
    /// the returned session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` (`EmptyQuestionBank`) if the bank is
    /// empty, or `QuizError::Storage` on storage failures.
    pub async fn start(&self) -> Result<QuizSession, QuizError> {
        let questions = self.questions.list_questions().await?;
        let session = QuizSession::start(questions, self.clock.now())?;
        tracing::info!(total = session.total_questions(), "quiz session started");
        Ok(session)
    }

    /// Answer the current question (`None` for a timeout).
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` if the session is already completed.
    pub fn answer(
        &self,
        session: &mut QuizSession,
        selected: Option<&str>,
    ) -> Result<AnswerOutcome, QuizError> {
        Ok(session.answer(selected, self.clock.now())?)
    }

    /// Deliver and record a completed session's result, at most once.
    ///
    /// On any delivery or persistence failure the in-flight submission is
    /// aborted, leaving the session retryable with the same or corrected
    /// identity.
    ///
    /// # Errors
    ///
    /// `QuizError::Session` for contract violations (`NotCompleted`,
    /// `AlreadySubmitted`, `SubmissionInFlight`), `QuizError::Delivery` when
    /// the sink or destination lookup fails, `QuizError::Storage` when the
    /// result cannot be recorded.
    pub async fn finalize(
        &self,
        session: &mut QuizSession,
        identity: StudentIdentity,
    ) -> Result<Receipt, QuizError> {
        session.begin_finalize()?;

        match self.deliver_and_record(session, identity).await {
            Ok(receipt) => Ok(receipt),
            Err(err) => {
                session.abort_finalize();
                tracing::warn!(error = %err, "finalize failed; session stays retryable");
                Err(err)
            }
        }
    }

    async fn deliver_and_record(
        &self,
        session: &mut QuizSession,
        identity: StudentIdentity,
    ) -> Result<Receipt, QuizError> {
        let destination = self
            .settings
            .get_settings()
            .await?
            .and_then(|s| s.notification_email().map(str::to_owned))
            .ok_or(QuizError::Delivery(DeliveryError::NoDestination))?;

        let payload = ResultPayload {
            student_name: identity.student_name().to_owned(),
            registration_number: identity.registration_number().to_owned(),
            contact_email: identity.contact_email().to_owned(),
            score: session.score(),
            total_questions: session.total_questions(),
            destination_address: destination,
        };
        self.sink
            .deliver(&payload)
            .await
            .map_err(QuizError::Delivery)?;

        let submitted_at = self.clock.now();
        let record = ResultRecord::new(
            identity.student_name(),
            session.score(),
            session.total_questions(),
            submitted_at,
        )?;
        self.results.append_result(&record).await?;

        let receipt = session.commit_finalize(identity, submitted_at)?;
        tracing::info!(
            score = receipt.score,
            total = receipt.total_questions,
            "quiz result submitted"
        );
        Ok(receipt)
    }
}
