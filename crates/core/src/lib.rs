#![forbid(unsafe_code)]

pub mod model;
pub mod session;
pub mod time;

pub use session::{AnswerOutcome, QuizSession, SessionError, SessionStatus, TickOutcome};
pub use time::Clock;
