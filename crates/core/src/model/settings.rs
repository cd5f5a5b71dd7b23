/// Admin configuration: where finalized results are sent.
///
/// A single record, persisted as a singleton row.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AdminSettings {
    notification_email: Option<String>,
}

/// Unvalidated admin settings input.
#[derive(Clone, Debug, Default)]
pub struct AdminSettingsDraft {
    pub notification_email: Option<String>,
}

impl AdminSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize the draft into persisted settings.
    ///
    /// Blank values are treated as unset; no email syntax validation is done.
    #[must_use]
    pub fn normalize(self) -> AdminSettings {
        AdminSettings {
            notification_email: normalize_optional(self.notification_email),
        }
    }
}

impl AdminSettings {
    #[must_use]
    pub fn from_persisted(notification_email: Option<String>) -> Self {
        AdminSettingsDraft { notification_email }.normalize()
    }

    #[must_use]
    pub fn notification_email(&self) -> Option<&str> {
        self.notification_email.as_deref()
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_drops_blank_email() {
        let settings = AdminSettingsDraft {
            notification_email: Some("   ".into()),
        }
        .normalize();
        assert_eq!(settings.notification_email(), None);
    }

    #[test]
    fn normalize_trims_email() {
        let settings = AdminSettingsDraft {
            notification_email: Some("  admin@school.edu ".into()),
        }
        .normalize();
        assert_eq!(settings.notification_email(), Some("admin@school.edu"));
    }
}
