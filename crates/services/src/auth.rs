use crate::error::AuthError;

/// Which screen set a successful login unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Student,
}

/// Check the hardcoded demo credentials.
///
/// This is a navigation gate, not authentication security.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` for any other pair.
pub fn authenticate(username: &str, password: &str) -> Result<Role, AuthError> {
    match (username, password) {
        ("admin", "admin@123") => Ok(Role::Admin),
        ("student", "student") => Ok(Role::Student),
        _ => Err(AuthError::InvalidCredentials),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_credentials_unlock_admin() {
        assert_eq!(authenticate("admin", "admin@123"), Ok(Role::Admin));
    }

    #[test]
    fn student_credentials_unlock_student() {
        assert_eq!(authenticate("student", "student"), Ok(Role::Student));
    }

    #[test]
    fn anything_else_is_rejected() {
        assert_eq!(
            authenticate("admin", "wrong"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(authenticate("", ""), Err(AuthError::InvalidCredentials));
    }
}
