use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::{Question, Receipt, StudentIdentity, Submission};

/// Per-question countdown, in seconds. Reset on every question advance.
pub const QUESTION_TIME_LIMIT_SECS: u32 = 30;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question bank is empty")]
    EmptyQuestionBank,

    #[error("too many questions for a single session: {len}")]
    TooManyQuestions { len: usize },

    #[error("session already completed")]
    SessionAlreadyCompleted,

    #[error("session is not completed yet")]
    NotCompleted,

    #[error("result already submitted for this session")]
    AlreadySubmitted,

    #[error("a submission is already in flight")]
    SubmissionInFlight,
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Completed,
}

/// What a single `answer` call did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub was_correct: bool,
    pub is_complete: bool,
}

/// What a single `tick` call did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub time_remaining_secs: u32,
    /// True when the countdown hit zero and the question was auto-answered.
    pub timed_out: bool,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One student's attempt at the full question sequence.
///
/// The question list is snapshotted at start; admin edits made afterwards are
/// not visible to a running session. The session moves one way through
/// `InProgress -> Completed`, then accepts at most one finalized submission.
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    score: u32,
    total_questions: u32,
    time_remaining_secs: u32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    submission: Option<Submission>,
    submitting: bool,
}

impl QuizSession {
    /// Start a session over a snapshot of the question bank.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyQuestionBank` if no questions are provided.
    pub fn start(
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyQuestionBank);
        }
        let total_questions = u32::try_from(questions.len())
            .map_err(|_| SessionError::TooManyQuestions {
                len: questions.len(),
            })?;

        Ok(Self {
            questions,
            current: 0,
            score: 0,
            total_questions,
            time_remaining_secs: QUESTION_TIME_LIMIT_SECS,
            started_at,
            completed_at: None,
            submission: None,
            submitting: false,
        })
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.completed_at.is_some() {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Index of the question currently shown. Frozen once completed.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
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
    pub fn time_remaining_secs(&self) -> u32 {
        self.time_remaining_secs
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_complete() {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    /// The snapshotted question list, e.g. for the answers review screen.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    /// Score the given selection against the current question and advance.
    ///
    /// `selected = None` represents a timeout and is scored as wrong.
    /// Answering the last question completes the session at `answered_at`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionAlreadyCompleted` if called after the
    /// session finished. That is caller misuse, not a student-visible state.
    pub fn answer(
        &mut self,
        selected: Option<&str>,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::SessionAlreadyCompleted);
        }

        // `current` is always in range while in progress.
        let question = &self.questions[self.current];
        let was_correct = selected.is_some_and(|sel| question.is_correct(sel));
        if was_correct {
            self.score += 1;
        }

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.time_remaining_secs = QUESTION_TIME_LIMIT_SECS;
        } else {
            self.completed_at = Some(answered_at);
        }

        Ok(AnswerOutcome {
            was_correct,
            is_complete: self.is_complete(),
        })
    }

    /// Count down one second; at zero the current question times out.
    ///
    /// A timeout is a normal transition equivalent to `answer(None)`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionAlreadyCompleted` on a stale tick after
    /// completion. The services timer cancels itself before this can happen.
    pub fn tick(&mut self, at: DateTime<Utc>) -> Result<TickOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::SessionAlreadyCompleted);
        }

        self.time_remaining_secs = self.time_remaining_secs.saturating_sub(1);
        if self.time_remaining_secs > 0 {
            return Ok(TickOutcome {
                time_remaining_secs: self.time_remaining_secs,
                timed_out: false,
                is_complete: false,
            });
        }

        let outcome = self.answer(None, at)?;
        Ok(TickOutcome {
            time_remaining_secs: self.time_remaining_secs,
            timed_out: true,
            is_complete: outcome.is_complete,
        })
    }

    /// Mark a submission as in flight.
    ///
    /// The caller must follow up with `commit_finalize` on successful delivery
    /// or `abort_finalize` on failure. While in flight, further finalize
    /// attempts are rejected.
    ///
    /// # Errors
    ///
    /// `NotCompleted` outside `Completed`, `AlreadySubmitted` after a
    /// successful finalize, `SubmissionInFlight` while one is pending.
    pub fn begin_finalize(&mut self) -> Result<(), SessionError> {
        if !self.is_complete() {
            return Err(SessionError::NotCompleted);
        }
        if self.submission.is_some() {
            return Err(SessionError::AlreadySubmitted);
        }
        if self.submitting {
            return Err(SessionError::SubmissionInFlight);
        }
        self.submitting = true;
        Ok(())
    }

    /// Record the submission after successful delivery.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySubmitted` if a submission was already recorded and
    /// `NotCompleted` if the session never finished.
    pub fn commit_finalize(
        &mut self,
        identity: StudentIdentity,
        submitted_at: DateTime<Utc>,
    ) -> Result<Receipt, SessionError> {
        if !self.is_complete() {
            return Err(SessionError::NotCompleted);
        }
        if self.submission.is_some() {
            return Err(SessionError::AlreadySubmitted);
        }

        self.submitting = false;
        self.submission = Some(Submission::new(identity, submitted_at));
        Ok(Receipt {
            score: self.score,
            total_questions: self.total_questions,
        })
    }

    /// Clear the in-flight flag after a failed delivery so finalize can be
    /// retried.
    pub fn abort_finalize(&mut self) {
        self.submitting = false;
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("time_remaining_secs", &self.time_remaining_secs)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .field("submitted", &self.submission.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IdentityDraft, Question, QuestionDraft, QuestionId};
    use crate::time::fixed_now;

    fn build_question(id: u64, correct: &str) -> Question {
        QuestionDraft::new(
            format!("Q{id}"),
            vec!["a".into(), "b".into(), correct.into()],
            correct,
        )
        .validate(QuestionId::new(id))
        .unwrap()
    }

    fn identity() -> StudentIdentity {
        IdentityDraft::new("Ada", "2024-001", "ada@example.com")
            .validate()
            .unwrap()
    }

    fn three_question_session() -> QuizSession {
        let questions = vec![
            build_question(1, "x1"),
            build_question(2, "x2"),
            build_question(3, "x3"),
        ];
        QuizSession::start(questions, fixed_now()).unwrap()
    }

    #[test]
    fn start_rejects_empty_bank() {
        let err = QuizSession::start(Vec::new(), fixed_now()).unwrap_err();
        assert_eq!(err, SessionError::EmptyQuestionBank);
    }

    #[test]
    fn start_initializes_state() {
        let session = three_question_session();
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.time_remaining_secs(), QUESTION_TIME_LIMIT_SECS);
        assert!(session.submission().is_none());
    }

    #[test]
    fn score_counts_exact_matches_only() {
        let mut session = three_question_session();
        session.answer(Some("x1"), fixed_now()).unwrap();
        session.answer(Some("wrong"), fixed_now()).unwrap();
        session.answer(Some("x3"), fixed_now()).unwrap();

        assert_eq!(session.score(), 2);
        assert_eq!(session.status(), SessionStatus::Completed);
    }

    #[test]
    fn index_advances_by_one_until_completion() {
        let mut session = three_question_session();
        assert_eq!(session.current_index(), 0);

        session.answer(None, fixed_now()).unwrap();
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.time_remaining_secs(), QUESTION_TIME_LIMIT_SECS);

        session.answer(None, fixed_now()).unwrap();
        assert_eq!(session.current_index(), 2);

        let outcome = session.answer(None, fixed_now()).unwrap();
        assert!(outcome.is_complete);
        // Frozen after completion.
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.completed_at(), Some(fixed_now()));
    }

    #[test]
    fn answer_after_completion_is_an_error() {
        let mut session = three_question_session();
        for _ in 0..3 {
            session.answer(None, fixed_now()).unwrap();
        }

        let err = session.answer(Some("x1"), fixed_now()).unwrap_err();
        assert_eq!(err, SessionError::SessionAlreadyCompleted);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn timer_reset_on_advance_and_timeout_scores_wrong() {
        let mut session = three_question_session();

        for expected in (1..QUESTION_TIME_LIMIT_SECS).rev() {
            let outcome = session.tick(fixed_now()).unwrap();
            assert!(!outcome.timed_out);
            assert_eq!(outcome.time_remaining_secs, expected);
        }

        // The 30th tick hits zero and auto-answers with no selection.
        let outcome = session.tick(fixed_now()).unwrap();
        assert!(outcome.timed_out);
        assert!(!outcome.is_complete);
        assert_eq!(session.score(), 0);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.time_remaining_secs(), QUESTION_TIME_LIMIT_SECS);
    }

    #[test]
    fn timing_out_last_question_completes_session() {
        let mut session = three_question_session();
        session.answer(Some("x1"), fixed_now()).unwrap();
        session.answer(Some("x2"), fixed_now()).unwrap();

        for _ in 0..QUESTION_TIME_LIMIT_SECS {
            let _ = session.tick(fixed_now()).unwrap();
        }

        assert!(session.is_complete());
        assert_eq!(session.score(), 2);

        let err = session.tick(fixed_now()).unwrap_err();
        assert_eq!(err, SessionError::SessionAlreadyCompleted);
    }

    #[test]
    fn finalize_requires_completion() {
        let mut session = three_question_session();
        let err = session.begin_finalize().unwrap_err();
        assert_eq!(err, SessionError::NotCompleted);
    }

    #[test]
    fn finalize_happy_path_records_submission_once() {
        let mut session = three_question_session();
        session.answer(Some("x1"), fixed_now()).unwrap();
        session.answer(None, fixed_now()).unwrap();
        session.answer(Some("x3"), fixed_now()).unwrap();

        session.begin_finalize().unwrap();
        let receipt = session.commit_finalize(identity(), fixed_now()).unwrap();
        assert_eq!(receipt.score, 2);
        assert_eq!(receipt.total_questions, 3);

        let submitted_at = session.submission().unwrap().submitted_at();

        let err = session.begin_finalize().unwrap_err();
        assert_eq!(err, SessionError::AlreadySubmitted);
        // State unchanged by the rejected second attempt.
        assert_eq!(session.score(), 2);
        assert_eq!(session.submission().unwrap().submitted_at(), submitted_at);
    }

    #[test]
    fn in_flight_submission_blocks_reentry_until_aborted() {
        let mut session = three_question_session();
        for _ in 0..3 {
            session.answer(None, fixed_now()).unwrap();
        }

        session.begin_finalize().unwrap();
        let err = session.begin_finalize().unwrap_err();
        assert_eq!(err, SessionError::SubmissionInFlight);

        // Delivery failed: the session stays retryable.
        session.abort_finalize();
        assert!(session.submission().is_none());
        session.begin_finalize().unwrap();
        session.commit_finalize(identity(), fixed_now()).unwrap();
        assert!(session.submission().is_some());
    }

    #[test]
    fn current_question_is_none_after_completion() {
        let mut session = three_question_session();
        assert_eq!(session.current_question().unwrap().prompt(), "Q1");
        for _ in 0..3 {
            session.answer(None, fixed_now()).unwrap();
        }
        assert!(session.current_question().is_none());
        assert_eq!(session.questions().len(), 3);
    }
}
