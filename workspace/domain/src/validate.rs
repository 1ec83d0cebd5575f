//! Validation as data: each entity has an ordered list of
//! (field, predicate, message) rules. Every rule is evaluated and every
//! failure is reported, so a caller sees the full set of problems at once
//! instead of fixing them one round-trip at a time.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a user's display name, in characters.
pub const NAME_MAX: usize = 50;
/// Maximum length of an email address, in characters.
pub const EMAIL_MAX: usize = 255;
/// Minimum length of a password, in characters.
pub const PASSWORD_MIN: usize = 6;
/// Maximum length of a micropost body, in characters.
pub const CONTENT_MAX: usize = 140;

// Local part: letters, digits and `._+-`. Domain: labels of letters,
// digits and hyphens separated by dots, final label letters only. This
// rejects commas, `_` or `+` in the domain and empty labels such as a
// trailing dot.
static EMAIL_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\w+\-.]+@[a-z\d\-]+(\.[a-z\d\-]+)*\.[a-z]+$")
        .expect("email pattern must compile")
});

/// One (field, reason) pair attached to a rejected entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub message: &'static str,
}

/// All violations collected in a single validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<Violation>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any violation is attached to the given field.
    pub fn on(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.0 {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", violation.field, violation.message)?;
            first = false;
        }
        Ok(())
    }
}

/// A single rule: the field it guards, whether it holds, and the reason
/// reported when it does not.
type Rule = (&'static str, bool, &'static str);

/// Evaluate an ordered rule list, collecting every failed predicate.
fn run(rules: Vec<Rule>) -> Result<(), ValidationErrors> {
    let violations: Vec<Violation> = rules
        .into_iter()
        .filter(|(_, holds, _)| !holds)
        .map(|(field, _, message)| Violation { field, message })
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(violations))
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn length(value: &str) -> usize {
    value.chars().count()
}

fn profile_rules(name: &str, email: &str) -> Vec<Rule> {
    vec![
        ("name", !blank(name), "can't be blank"),
        (
            "name",
            length(name) <= NAME_MAX,
            "is too long (maximum is 50 characters)",
        ),
        ("email", !blank(email), "can't be blank"),
        (
            "email",
            length(email) <= EMAIL_MAX,
            "is too long (maximum is 255 characters)",
        ),
        // Format only judged on non-blank input; blankness is already
        // reported above.
        (
            "email",
            blank(email) || EMAIL_FORMAT.is_match(email),
            "is invalid",
        ),
    ]
}

fn password_rules(password: &str) -> Vec<Rule> {
    vec![
        ("password", !blank(password), "can't be blank"),
        (
            "password",
            length(password) >= PASSWORD_MIN,
            "is too short (minimum is 6 characters)",
        ),
    ]
}

/// Rules for a sign-up: profile fields plus the initial credential.
pub fn new_user(name: &str, email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut rules = profile_rules(name, email);
    rules.extend(password_rules(password));
    run(rules)
}

/// Rules for a profile update. Password rules apply only when a new
/// credential is being set.
pub fn user_update(
    name: &str,
    email: &str,
    password: Option<&str>,
) -> Result<(), ValidationErrors> {
    let mut rules = profile_rules(name, email);
    if let Some(password) = password {
        rules.extend(password_rules(password));
    }
    run(rules)
}

/// Rules for a micropost body.
pub fn micropost(content: &str) -> Result<(), ValidationErrors> {
    run(vec![
        ("content", !blank(content), "can't be blank"),
        (
            "content",
            length(content) <= CONTENT_MAX,
            "is too long (maximum is 140 characters)",
        ),
    ])
}

/// The violation reported when an email loses the uniqueness check, either
/// at the application pre-check or at the storage-level unique index.
pub fn email_taken() -> ValidationErrors {
    ValidationErrors(vec![Violation {
        field: "email",
        message: "has already been taken",
    }])
}

/// The violation reported for a follow edge pointing back at its origin.
pub fn self_follow() -> ValidationErrors {
    ValidationErrors(vec![Violation {
        field: "followed",
        message: "can't be the follower",
    }])
}

/// The violation reported when a micropost names a missing author.
pub fn author_missing() -> ValidationErrors {
    ValidationErrors(vec![Violation {
        field: "user",
        message: "must exist",
    }])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_user() -> (&'static str, &'static str, &'static str) {
        ("A User", "user@test.com", "foobar")
    }

    #[test]
    fn accepts_a_valid_user() {
        let (name, email, password) = valid_user();
        assert!(new_user(name, email, password).is_ok());
    }

    #[test]
    fn name_must_be_present() {
        let (_, email, password) = valid_user();
        let errors = new_user(" ", email, password).unwrap_err();
        assert!(errors.on("name"));
    }

    #[test]
    fn name_boundary_is_fifty_characters() {
        let (_, email, password) = valid_user();
        assert!(new_user(&"n".repeat(50), email, password).is_ok());
        let errors = new_user(&"n".repeat(51), email, password).unwrap_err();
        assert!(errors.on("name"));
    }

    #[test]
    fn email_must_be_present() {
        let (name, _, password) = valid_user();
        let errors = new_user(name, " ", password).unwrap_err();
        assert!(errors.on("email"));
    }

    #[test]
    fn email_boundary_is_two_hundred_fifty_five_characters() {
        let (name, _, password) = valid_user();
        // 243 + "@example.com" (12) = 255
        let longest = format!("{}@example.com", "e".repeat(243));
        assert_eq!(longest.len(), 255);
        assert!(new_user(name, &longest, password).is_ok());

        // 244 + 12 = 256
        let too_long = format!("{}@example.com", "e".repeat(244));
        let errors = new_user(name, &too_long, password).unwrap_err();
        assert!(errors.on("email"));
    }

    #[test]
    fn accepts_well_formed_addresses() {
        let (name, _, password) = valid_user();
        let valid_addresses = [
            "user@example.com",
            "USER@foo.com",
            "A_US-ER@foo.bar.org",
            "first.last@foo.jp",
            "alice+bob@baz.cn",
        ];
        for address in valid_addresses {
            assert!(
                new_user(name, address, password).is_ok(),
                "{address:?} should be valid"
            );
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        let (name, _, password) = valid_user();
        let invalid_addresses = [
            "user@example,com",
            "user_at_foo.org",
            "user.name@example.",
            "foo@bar_bz.com",
            "foo@bar+baz.com",
        ];
        for address in invalid_addresses {
            let errors = new_user(name, address, password).unwrap_err();
            assert!(errors.on("email"), "{address:?} should be invalid");
        }
    }

    #[test]
    fn password_must_be_nonblank() {
        let (name, email, _) = valid_user();
        // Six spaces satisfy the length rule but not presence
        let errors = new_user(name, email, &" ".repeat(6)).unwrap_err();
        assert!(errors.on("password"));
    }

    #[test]
    fn password_has_a_minimum_length() {
        let (name, email, _) = valid_user();
        let errors = new_user(name, email, &"a".repeat(5)).unwrap_err();
        assert!(errors.on("password"));
        assert!(new_user(name, email, &"a".repeat(6)).is_ok());
    }

    #[test]
    fn update_without_password_skips_credential_rules() {
        let (name, email, _) = valid_user();
        assert!(user_update(name, email, None).is_ok());
        let errors = user_update(name, email, Some("short")).unwrap_err();
        assert!(errors.on("password"));
    }

    #[test]
    fn collects_every_violation_in_one_pass() {
        let errors = new_user(" ", "not-an-email", "bad").unwrap_err();
        assert!(errors.on("name"));
        assert!(errors.on("email"));
        assert!(errors.on("password"));
        assert_eq!(errors.0.len(), 3);
    }

    #[test]
    fn micropost_content_rules() {
        assert!(micropost("Lorem ipsum").is_ok());
        assert!(micropost("   ").unwrap_err().on("content"));
        assert!(micropost(&"a".repeat(141)).unwrap_err().on("content"));
        assert!(micropost(&"a".repeat(140)).is_ok());
    }
}
