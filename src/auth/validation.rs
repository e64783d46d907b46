//! Form schemas for signup and login.

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::config;

/// Signup form. Field length limits mirror [`config::FIELD_MAX_LEN`] and
/// count Unicode scalar values, not UTF-16 units.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(custom(function = "required_alphanumeric"), length(max = 20, code = "max"))]
    pub name: String,
    #[serde(default)]
    #[validate(
        custom(function = "required_dotted_email"),
        email(code = "email"),
        length(max = 20, code = "max")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "required"), length(max = 20, code = "max"))]
    pub password: String,
}

/// Login form: same email and password rules as signup
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(
        custom(function = "required_dotted_email"),
        email(code = "email"),
        length(max = 20, code = "max")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "required"), length(max = 20, code = "max"))]
    pub password: String,
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// `email` alone accepts bare hosts such as `a@localhost`; a domain with at
/// least two non-empty labels is required on top of it.
fn required_dotted_email(value: &str) -> Result<(), ValidationError> {
    required(value)?;
    let domain = value.rsplit_once('@').map_or("", |(_, domain)| domain);
    let mut labels = domain.split('.');
    let dotted = labels.clone().count() >= 2 && labels.all(|label| !label.is_empty());
    if dotted {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

fn required_alphanumeric(value: &str) -> Result<(), ValidationError> {
    required(value)?;
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanum"))
    }
}

/// First failing check of a form, e.g. `name.alphanum`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub code: String,
}

impl FieldError {
    pub fn tag(&self) -> String {
        format!("{}.{}", self.field, self.code)
    }

    pub fn message(&self) -> String {
        match self.code.as_str() {
            "required" => format!("{} is required", self.field),
            "alphanum" => format!("{} may only contain letters and digits", self.field),
            "email" => format!("{} must be a valid email address", self.field),
            "max" => format!(
                "{} must be at most {} characters",
                self.field,
                config::FIELD_MAX_LEN
            ),
            _ => format!("{} is invalid", self.field),
        }
    }
}

/// Check order within a field; an empty value reports `required` rather than `email`
const CODE_PRIORITY: [&str; 4] = ["required", "alphanum", "email", "max"];

/// Reduce validator output to one error: fields in form order, checks in priority order
fn first_error(errors: &ValidationErrors, field_order: &[&'static str]) -> Option<FieldError> {
    let by_field = errors.field_errors();
    field_order.iter().find_map(|field| {
        let failures = by_field.get(*field)?;
        let code = CODE_PRIORITY
            .iter()
            .find(|code| failures.iter().any(|e| e.code == **code))
            .map(|code| code.to_string())
            .or_else(|| failures.first().map(|e| e.code.to_string()))?;
        Some(FieldError {
            field: *field,
            code,
        })
    })
}

impl SignupForm {
    pub fn check(&self) -> Result<(), FieldError> {
        self.validate()
            .map_err(|errors| first_error(&errors, &["name", "email", "password"]).unwrap_or_else(unknown))
    }
}

impl LoginForm {
    pub fn check(&self) -> Result<(), FieldError> {
        self.validate()
            .map_err(|errors| first_error(&errors, &["email", "password"]).unwrap_or_else(unknown))
    }
}

fn unknown() -> FieldError {
    FieldError {
        field: "form",
        code: "invalid".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(name: &str, email: &str, password: &str) -> SignupForm {
        SignupForm {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_valid_signup() {
        assert_eq!(signup("alice", "alice@x.io", "pw").check(), Ok(()));
        assert_eq!(signup("Bob42", "b@y.com", &"p".repeat(20)).check(), Ok(()));
    }

    #[test]
    fn test_non_alphanumeric_name() {
        let err = signup("al ice", "alice@x.io", "pw").check().unwrap_err();
        assert_eq!(err.tag(), "name.alphanum");

        let err = signup("<script>", "alice@x.io", "pw").check().unwrap_err();
        assert_eq!(err.tag(), "name.alphanum");
    }

    #[test]
    fn test_too_long_fields() {
        let err = signup(&"a".repeat(21), "alice@x.io", "pw").check().unwrap_err();
        assert_eq!(err.tag(), "name.max");

        let err = signup("alice", "averyverylongname@example.com", "pw").check().unwrap_err();
        assert_eq!(err.tag(), "email.max");

        let err = signup("alice", "alice@x.io", &"p".repeat(21)).check().unwrap_err();
        assert_eq!(err.tag(), "password.max");
    }

    #[test]
    fn test_empty_fields_are_required() {
        assert_eq!(signup("", "a@x.io", "pw").check().unwrap_err().tag(), "name.required");
        assert_eq!(signup("alice", "", "pw").check().unwrap_err().tag(), "email.required");
        assert_eq!(signup("alice", "a@x.io", "").check().unwrap_err().tag(), "password.required");
    }

    #[test]
    fn test_bad_email() {
        assert_eq!(
            signup("alice", "not-an-email", "pw").check().unwrap_err().tag(),
            "email.email"
        );
    }

    #[test]
    fn test_email_needs_dotted_domain() {
        for email in ["a@localhost", "a@x.", "a@.io", "a@x..io"] {
            let err = signup("alice", email, "pw").check().unwrap_err();
            assert_eq!(err.tag(), "email.email", "{email}");
        }

        let login = LoginForm {
            email: "a@localhost".into(),
            password: "pw".into(),
        };
        assert_eq!(login.check().unwrap_err().tag(), "email.email");
    }

    #[test]
    fn test_length_counts_characters() {
        let name = "é".repeat(20);
        assert_eq!(signup("alice", "a@x.io", &name).check(), Ok(()));
    }

    #[test]
    fn test_first_field_wins() {
        let err = signup("bad name", "bad", "").check().unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn test_login_shape() {
        let ok = LoginForm {
            email: "a@x.io".into(),
            password: "pw".into(),
        };
        assert_eq!(ok.check(), Ok(()));

        let bad = LoginForm {
            email: "a@x.io' OR 1=1".into(),
            password: "pw".into(),
        };
        assert!(bad.check().is_err());
    }

    #[test]
    fn test_messages_name_the_field() {
        let err = FieldError {
            field: "email",
            code: "max".into(),
        };
        assert_eq!(err.message(), "email must be at most 20 characters");
    }
}
