mod flow;
mod timer;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use flow::QuizFlowService;
pub use timer::CountdownTimer;
