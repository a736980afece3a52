use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CredentialsError {
    #[error("username is required")]
    MissingUsername,
    #[error("email is required")]
    MissingEmail,
    #[error("password is required")]
    MissingPassword,
}

impl CredentialsError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingUsername => "Please enter a username",
            Self::MissingEmail => "Please enter an email",
            Self::MissingPassword => "Please enter a password",
        }
    }
}

/// The authenticated identity as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
}

impl User {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// # Errors
    ///
    /// Returns `CredentialsError` when a field is blank.
    pub fn new(username: &str, password: &str) -> Result<Self, CredentialsError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CredentialsError::MissingUsername);
        }
        if password.is_empty() {
            return Err(CredentialsError::MissingPassword);
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// # Errors
    ///
    /// Returns `CredentialsError` when a field is blank.
    pub fn new(username: &str, email: &str, password: &str) -> Result<Self, CredentialsError> {
        let credentials = Credentials::new(username, password)?;
        let email = email.trim();
        if email.is_empty() {
            return Err(CredentialsError::MissingEmail);
        }
        Ok(Self {
            username: credentials.username,
            email: email.to_string(),
            password: credentials.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_trim_username_but_not_password() {
        let creds = Credentials::new("  alice ", " secret ").unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, " secret ");
    }

    #[test]
    fn registration_requires_email() {
        let err = Registration::new("bob", "   ", "pw").unwrap_err();
        assert_eq!(err, CredentialsError::MissingEmail);
    }

    #[test]
    fn blank_password_is_rejected() {
        assert_eq!(
            Credentials::new("bob", "").unwrap_err(),
            CredentialsError::MissingPassword
        );
    }
}
