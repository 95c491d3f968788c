//! Input validation for the credential operations.
//!
//! Every rule is checked and all failures are reported together, joined with ", ".

use std::sync::LazyLock;

use regex::Regex;

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Collected validation failures for one input.
#[derive(Debug, Default)]
struct Violations(Vec<&'static str>);

impl Violations {
    fn check(&mut self, ok: bool, message: &'static str) {
        if !ok {
            self.0.push(message);
        }
    }

    fn into_result(self) -> Result<(), String> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0.join(", "))
        }
    }
}

fn check_email(violations: &mut Violations, email: &str) {
    if email.is_empty() {
        violations.check(false, "Email is required");
    } else {
        violations.check(EMAIL_RE.is_match(email), "Invalid email format");
    }
}

/// Validate registration input.
pub fn validate_registration(email: &str, username: &str, password: &str) -> Result<(), String> {
    let mut violations = Violations::default();

    check_email(&mut violations, email);

    if password.is_empty() {
        violations.check(false, "Password is required");
    } else {
        violations.check(
            password.chars().count() >= MIN_PASSWORD_LENGTH,
            "Password must be at least 8 characters long",
        );
    }

    violations.check(!username.is_empty(), "User Name is required");

    violations.into_result()
}

/// Validate login input.
pub fn validate_login(email: &str, password: &str) -> Result<(), String> {
    let mut violations = Violations::default();

    check_email(&mut violations, email);
    violations.check(!password.is_empty(), "Password is required");

    violations.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration("a@x.com", "alice", "longpassword1").is_ok());
    }

    #[test]
    fn test_all_registration_errors_joined() {
        let err = validate_registration("", "", "").unwrap_err();
        assert_eq!(
            err,
            "Email is required, Password is required, User Name is required"
        );
    }

    #[test]
    fn test_username_only_needs_to_be_present() {
        assert!(validate_registration("a@x.com", " ", "longpassword1").is_ok());
        assert_eq!(
            validate_registration("a@x.com", "", "longpassword1").unwrap_err(),
            "User Name is required"
        );
    }

    #[test]
    fn test_bad_email_and_short_password() {
        let err = validate_registration("not-an-email", "alice", "short").unwrap_err();
        assert_eq!(
            err,
            "Invalid email format, Password must be at least 8 characters long"
        );
    }

    #[test]
    fn test_email_formats() {
        assert!(validate_login("a@x.com", "p").is_ok());
        assert!(validate_login("first.last@sub.example.org", "p").is_ok());
        assert!(validate_login("a@x", "p").is_err());
        assert!(validate_login("a b@x.com", "p").is_err());
        assert!(validate_login("@x.com", "p").is_err());
    }

    #[test]
    fn test_login_requires_password() {
        assert_eq!(
            validate_login("a@x.com", "").unwrap_err(),
            "Password is required"
        );
    }
}
