#![forbid(unsafe_code)]

pub mod auth;
pub mod error;
pub mod question_bank;
pub mod quiz;
pub mod result_sink;
pub mod results;
pub mod settings_service;

pub use quiz_core::Clock;

pub use auth::{Role, authenticate};
pub use error::{
    AuthError, DeliveryError, QuestionBankError, QuizError, ResultsError, SettingsError,
};
pub use question_bank::QuestionBankService;
pub use quiz::{CountdownTimer, QuizFlowService};
pub use result_sink::{MailApiConfig, MailApiSink, ResultPayload, ResultSink};
pub use results::{ResultListItem, ResultsService};
pub use settings_service::AdminSettingsService;
