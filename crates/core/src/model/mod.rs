mod identity;
mod ids;
mod question;
mod result;
mod settings;

pub use identity::{IdentityDraft, IdentityError, Receipt, StudentIdentity, Submission};
pub use ids::{ParseIdError, QuestionId, ResultId};
pub use question::{Question, QuestionDraft, QuestionError};
pub use result::{ResultError, ResultRecord};
pub use settings::{AdminSettings, AdminSettingsDraft};
