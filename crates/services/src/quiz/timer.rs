use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify, watch};
use tokio::task::JoinHandle;

use quiz_core::session::{QUESTION_TIME_LIMIT_SECS, QuizSession};

use crate::Clock;

/// Drives a shared session's per-question countdown in the background.
///
/// A one-shot sleep is re-armed after every tick and whenever the caller
/// signals an answer via [`CountdownTimer::rearm`], so each question gets its
/// full countdown regardless of when within a second the previous one was
/// answered. Remaining seconds are published on a watch channel for the UI
/// layer. The task stops on its own once the session completes; dropping the
/// timer aborts it early.
pub struct CountdownTimer {
    handle: JoinHandle<()>,
    remaining: watch::Receiver<u32>,
    rearm: Arc<Notify>,
}

impl CountdownTimer {
    #[must_use]
    pub fn spawn(session: Arc<Mutex<QuizSession>>, clock: Clock) -> Self {
        let (tx, remaining) = watch::channel(QUESTION_TIME_LIMIT_SECS);
        let rearm = Arc::new(Notify::new());
        let notify = Arc::clone(&rearm);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = tokio::time::sleep(Duration::from_secs(1)) => {
                        let mut guard = session.lock().await;
                        let Ok(outcome) = guard.tick(clock.now()) else {
                            // The session completed through an answer
                            // between ticks.
                            break;
                        };
                        // On a timeout the session already reset the
                        // countdown for the next question, so publish its
                        // value, not the zero.
                        let _ = tx.send(guard.time_remaining_secs());
                        if outcome.is_complete {
                            break;
                        }
                    }
                    () = notify.notified() => {
                        // An answer advanced the session; drop the pending
                        // sleep and start the next question's interval
                        // from scratch.
                        let guard = session.lock().await;
                        if guard.is_complete() {
                            break;
                        }
                        let _ = tx.send(guard.time_remaining_secs());
                    }
                }
            }
        });

        Self {
            handle,
            remaining,
            rearm,
        }
    }

    /// Restart the current one-second interval.
    ///
    /// Call after submitting an answer so the next question's countdown
    /// starts from the moment it appears. Stops the task instead if the
    /// answer completed the session.
    pub fn rearm(&self) {
        self.rearm.notify_one();
    }

    /// Subscribe to the published remaining-seconds value.
    #[must_use]
    pub fn remaining(&self) -> watch::Receiver<u32> {
        self.remaining.clone()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuestionDraft, QuestionId};
    use quiz_core::time::fixed_clock;

    fn build_question(id: u64) -> Question {
        QuestionDraft::new(
            format!("Q{id}"),
            vec!["a".into(), "b".into(), "c".into()],
            "a",
        )
        .validate(QuestionId::new(id))
        .unwrap()
    }

    fn shared_session(question_count: u64) -> Arc<Mutex<QuizSession>> {
        let questions = (1..=question_count).map(build_question).collect();
        let session = QuizSession::start(questions, fixed_clock().now()).unwrap();
        Arc::new(Mutex::new(session))
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_advances_to_next_question() {
        let session = shared_session(2);
        let timer = CountdownTimer::spawn(Arc::clone(&session), fixed_clock());

        let limit = u64::from(QUESTION_TIME_LIMIT_SECS);
        tokio::time::sleep(Duration::from_millis(limit * 1000 + 500)).await;

        let guard = session.lock().await;
        assert_eq!(guard.current_index(), 1);
        assert_eq!(guard.score(), 0);
        assert_eq!(guard.time_remaining_secs(), QUESTION_TIME_LIMIT_SECS);
        assert_eq!(*timer.remaining().borrow(), QUESTION_TIME_LIMIT_SECS);
        assert!(!timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_gives_the_next_question_a_full_interval() {
        let session = shared_session(2);
        let timer = CountdownTimer::spawn(Arc::clone(&session), fixed_clock());

        // Answer mid-interval, 500ms after the question appeared.
        tokio::time::sleep(Duration::from_millis(500)).await;
        session
            .lock()
            .await
            .answer(Some("b"), fixed_clock().now())
            .unwrap();
        timer.rearm();

        // 600ms later the old interval's deadline has passed; without the
        // re-arm this would already read 29.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(
            session.lock().await.time_remaining_secs(),
            QUESTION_TIME_LIMIT_SECS
        );

        // The fresh interval expires a full second after the re-arm.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(
            session.lock().await.time_remaining_secs(),
            QUESTION_TIME_LIMIT_SECS - 1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_after_final_answer_stops_the_task() {
        let session = shared_session(1);
        let timer = CountdownTimer::spawn(Arc::clone(&session), fixed_clock());

        session
            .lock()
            .await
            .answer(Some("a"), fixed_clock().now())
            .unwrap();
        timer.rearm();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn timer_stops_when_session_completes() {
        let session = shared_session(1);
        let timer = CountdownTimer::spawn(Arc::clone(&session), fixed_clock());

        tokio::time::sleep(Duration::from_secs(u64::from(QUESTION_TIME_LIMIT_SECS) + 2)).await;

        assert!(session.lock().await.is_complete());
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn timer_stops_after_answers_complete_the_session() {
        let session = shared_session(1);
        let timer = CountdownTimer::spawn(Arc::clone(&session), fixed_clock());

        session
            .lock()
            .await
            .answer(Some("a"), fixed_clock().now())
            .unwrap();

        // The next tick observes completion and the task exits.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(timer.is_finished());
    }
}
