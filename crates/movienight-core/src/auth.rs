//! Login and signup forms.
//!
//! These are UI-only. There is no authentication service behind them and
//! nothing is ever submitted anywhere; the forms only validate their fields
//! locally so the pages can show the same messages as before.

use crate::error::{MovieNightError, Result};

pub const EMAIL_REQUIRED: &str = "Please enter a valid email";
pub const PASSWORD_LENGTH: &str = "Your password must contain between 4 and 60 characters.";

const PASSWORD_MIN: usize = 4;
const PASSWORD_MAX: usize = 60;

/// Sign-in form fields.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginForm {
    /// Checks that both fields are filled in.
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(MovieNightError::validation(EMAIL_REQUIRED));
        }
        if self.password.is_empty() {
            return Err(MovieNightError::validation(PASSWORD_LENGTH));
        }
        Ok(())
    }
}

/// Sign-up form fields.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
}

impl SignupForm {
    /// Checks the email is present and the password length is in range.
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(MovieNightError::validation(EMAIL_REQUIRED));
        }
        let len = self.password.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
            return Err(MovieNightError::validation(PASSWORD_LENGTH));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<()>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_login_requires_email_then_password() {
        let form = LoginForm::default();
        assert_eq!(message(form.validate()), EMAIL_REQUIRED);

        let form = LoginForm {
            email: "user@example.com".into(),
            ..Default::default()
        };
        assert_eq!(message(form.validate()), PASSWORD_LENGTH);

        let form = LoginForm {
            email: "user@example.com".into(),
            password: "pw".into(),
            remember_me: true,
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_signup_checks_password_length() {
        let short = SignupForm {
            email: "user@example.com".into(),
            password: "abc".into(),
        };
        assert_eq!(message(short.validate()), PASSWORD_LENGTH);

        let long = SignupForm {
            email: "user@example.com".into(),
            password: "x".repeat(61),
        };
        assert_eq!(message(long.validate()), PASSWORD_LENGTH);

        let ok = SignupForm {
            email: "user@example.com".into(),
            password: "hunter22".into(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_signup_only_requires_a_non_empty_email() {
        let blank = SignupForm {
            email: "   ".into(),
            password: "hunter22".into(),
        };
        assert_eq!(message(blank.validate()), EMAIL_REQUIRED);

        let free_form = SignupForm {
            email: "nobody".into(),
            password: "hunter22".into(),
        };
        assert!(free_form.validate().is_ok());
    }
}
