use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdentityError {
    #[error("student name cannot be empty")]
    EmptyName,

    #[error("registration number cannot be empty")]
    EmptyRegistrationNumber,

    #[error("contact email cannot be empty")]
    EmptyEmail,
}

/// Who a completed session is being submitted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentIdentity {
    student_name: String,
    registration_number: String,
    contact_email: String,
}

/// Unvalidated submission-form input.
#[derive(Debug, Clone, Default)]
pub struct IdentityDraft {
    pub student_name: String,
    pub registration_number: String,
    pub contact_email: String,
}

impl IdentityDraft {
    #[must_use]
    pub fn new(
        student_name: impl Into<String>,
        registration_number: impl Into<String>,
        contact_email: impl Into<String>,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            registration_number: registration_number.into(),
            contact_email: contact_email.into(),
        }
    }

    /// Validate the draft into a `StudentIdentity`.
    ///
    /// Presence checks only; the email is not parsed.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if any field is blank.
    pub fn validate(self) -> Result<StudentIdentity, IdentityError> {
        let student_name = self.student_name.trim().to_owned();
        if student_name.is_empty() {
            return Err(IdentityError::EmptyName);
        }
        let registration_number = self.registration_number.trim().to_owned();
        if registration_number.is_empty() {
            return Err(IdentityError::EmptyRegistrationNumber);
        }
        let contact_email = self.contact_email.trim().to_owned();
        if contact_email.is_empty() {
            return Err(IdentityError::EmptyEmail);
        }

        Ok(StudentIdentity {
            student_name,
            registration_number,
            contact_email,
        })
    }
}

impl StudentIdentity {
    #[must_use]
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    #[must_use]
    pub fn registration_number(&self) -> &str {
        &self.registration_number
    }

    #[must_use]
    pub fn contact_email(&self) -> &str {
        &self.contact_email
    }
}

/// What the student gets back from a successful finalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub score: u32,
    pub total_questions: u32,
}

/// The recorded outcome of a successful finalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    identity: StudentIdentity,
    submitted_at: DateTime<Utc>,
}

impl Submission {
    #[must_use]
    pub fn new(identity: StudentIdentity, submitted_at: DateTime<Utc>) -> Self {
        Self {
            identity,
            submitted_at,
        }
    }

    #[must_use]
    pub fn identity(&self) -> &StudentIdentity {
        &self.identity
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}
