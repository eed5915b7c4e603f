use validator::{ValidateEmail, ValidateLength};

use crate::domain::{
    error::RepositoryError,
    models::{user::UserCandidate, validation::ValidationResult},
    repositories::user_registration_repository::UserRegistrationRepository,
};

pub const MIN_PASSWORD_LENGTH: u64 = 8;

pub const FIRST_NAME_BLANK: &str = "First name should not be blank.";
pub const LAST_NAME_BLANK: &str = "Last name should not be blank.";
pub const EMAIL_INVALID: &str = "Email address is not valid.";
pub const EMAIL_TAKEN: &str = "Email address is already registered.";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long.";
pub const PASSWORD_TOO_WEAK: &str = "Password must contain at least one letter and one digit.";

enum FieldCheck {
    Holds(fn(&UserCandidate) -> bool),
    /// Looked up in the repository, skipped while the address is malformed
    EmailAvailable,
}

struct FieldRule {
    check: FieldCheck,
    message: &'static str,
}

// Evaluated top to bottom; messages come out in this order.
const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        check: FieldCheck::Holds(has_first_name),
        message: FIRST_NAME_BLANK,
    },
    FieldRule {
        check: FieldCheck::Holds(has_last_name),
        message: LAST_NAME_BLANK,
    },
    FieldRule {
        check: FieldCheck::Holds(has_valid_email),
        message: EMAIL_INVALID,
    },
    FieldRule {
        check: FieldCheck::EmailAvailable,
        message: EMAIL_TAKEN,
    },
    FieldRule {
        check: FieldCheck::Holds(has_long_password),
        message: PASSWORD_TOO_SHORT,
    },
    FieldRule {
        check: FieldCheck::Holds(has_mixed_password),
        message: PASSWORD_TOO_WEAK,
    },
];

fn has_first_name(candidate: &UserCandidate) -> bool {
    !candidate.first_name().trim().is_empty()
}

fn has_last_name(candidate: &UserCandidate) -> bool {
    !candidate.last_name().trim().is_empty()
}

fn has_valid_email(candidate: &UserCandidate) -> bool {
    candidate.email().validate_email()
}

fn has_long_password(candidate: &UserCandidate) -> bool {
    candidate
        .password()
        .expose()
        .validate_length(Some(MIN_PASSWORD_LENGTH), None, None)
}

fn has_mixed_password(candidate: &UserCandidate) -> bool {
    let password = candidate.password().expose();
    password.chars().any(char::is_alphabetic) && password.chars().any(|c| c.is_ascii_digit())
}

/// Checks a user candidate against the registration rules.
///
/// The photo-count rule is reported first, then every failing field rule.
/// Nothing short-circuits: the caller gets all violations at once.
#[derive(Debug, Clone)]
pub struct UserValidator {
    min_photo_count: usize,
}

impl UserValidator {
    pub fn new(min_photo_count: usize) -> Self {
        Self { min_photo_count }
    }

    pub fn min_photo_count(&self) -> usize {
        self.min_photo_count
    }

    /// Structural rule on the number of submitted photos
    pub fn check_photo_count(&self, count: usize) -> Option<String> {
        (count < self.min_photo_count)
            .then(|| format!("At least {} photos should be uploaded.", self.min_photo_count))
    }

    pub async fn validate<R>(
        &self,
        candidate: &UserCandidate,
        repository: &R,
    ) -> Result<ValidationResult, RepositoryError>
    where
        R: UserRegistrationRepository + Send + Sync,
    {
        let mut errors: Vec<String> = self
            .check_photo_count(candidate.photos().len())
            .into_iter()
            .collect();

        for rule in FIELD_RULES {
            let holds = match &rule.check {
                FieldCheck::Holds(check) => check(candidate),
                FieldCheck::EmailAvailable => {
                    !has_valid_email(candidate)
                        || !repository.email_exists(candidate.email()).await?
                }
            };
            if !holds {
                errors.push(rule.message.to_string());
            }
        }

        Ok(ValidationResult::from_errors(errors))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rstest::*;

    use super::*;
    use crate::domain::models::{
        credential::RawPassword,
        photo::Photo,
        user::{NewUser, User},
    };

    const PHOTO_COUNT_ERROR: &str = "At least 4 photos should be uploaded.";

    // only answers email lookups
    struct TakenEmails(Vec<&'static str>);

    #[async_trait]
    impl UserRegistrationRepository for TakenEmails {
        async fn register_user_with_photos(&self, _user: NewUser) -> Result<User, RepositoryError> {
            Err(RepositoryError::DatabaseError("not used".to_string()))
        }

        async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
            Ok(self.0.iter().any(|taken| *taken == email))
        }
    }

    fn candidate(first: &str, last: &str, email: &str, password: &str, photos: usize) -> UserCandidate {
        let mut candidate = UserCandidate::new(
            first.to_string(),
            last.to_string(),
            email.to_string(),
            RawPassword::new(password.to_string()),
            "/uploads/avatars/default.png",
        );
        for i in 0..photos {
            candidate.add_photo(Photo::new(
                format!("photo{}.png", i),
                format!("/uploads/photos/photo{}.png", i),
            ));
        }
        candidate
    }

    #[fixture]
    fn user_validator() -> UserValidator {
        UserValidator::new(4)
    }

    #[rstest]
    #[tokio::test]
    async fn test_valid_candidate_passes(user_validator: UserValidator) {
        let user = candidate("Ada", "Lovelace", "ada@example.com", "Str0ngP@ss", 4);
        let result = user_validator.validate(&user, &TakenEmails(vec![])).await.unwrap();
        assert!(result.success());
        assert!(result.errors().is_empty());
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[tokio::test]
    async fn test_too_few_photos_negative(user_validator: UserValidator, #[case] photos: usize) {
        let user = candidate("Ada", "Lovelace", "ada@example.com", "Str0ngP@ss", photos);
        let result = user_validator.validate(&user, &TakenEmails(vec![])).await.unwrap();
        assert!(!result.success());
        assert_eq!(result.errors(), &[PHOTO_COUNT_ERROR.to_string()]);
    }

    #[rstest]
    #[case("not-an-email", EMAIL_INVALID)]
    #[case("taken@example.com", EMAIL_TAKEN)]
    #[tokio::test]
    async fn test_email_rules_negative(
        user_validator: UserValidator,
        #[case] email: &str,
        #[case] expected: &str,
    ) {
        let user = candidate("Ada", "Lovelace", email, "Str0ngP@ss", 4);
        let result = user_validator
            .validate(&user, &TakenEmails(vec!["taken@example.com"]))
            .await
            .unwrap();
        assert_eq!(result.errors(), &[expected.to_string()]);
    }

    #[rstest]
    #[case("short1", vec![PASSWORD_TOO_SHORT])]
    #[case("onlyletters", vec![PASSWORD_TOO_WEAK])]
    #[case("12345678", vec![PASSWORD_TOO_WEAK])]
    #[case("abc", vec![PASSWORD_TOO_SHORT, PASSWORD_TOO_WEAK])]
    #[tokio::test]
    async fn test_password_rules_negative(
        user_validator: UserValidator,
        #[case] password: &str,
        #[case] expected: Vec<&str>,
    ) {
        let user = candidate("Ada", "Lovelace", "ada@example.com", password, 4);
        let result = user_validator.validate(&user, &TakenEmails(vec![])).await.unwrap();
        assert_eq!(result.errors(), expected.as_slice());
    }

    #[rstest]
    #[tokio::test]
    async fn test_all_violations_reported_in_order(user_validator: UserValidator) {
        let user = candidate(" ", "", "nope", "abc", 2);
        let result = user_validator.validate(&user, &TakenEmails(vec![])).await.unwrap();
        assert_eq!(
            result.errors(),
            &[
                PHOTO_COUNT_ERROR.to_string(),
                FIRST_NAME_BLANK.to_string(),
                LAST_NAME_BLANK.to_string(),
                EMAIL_INVALID.to_string(),
                PASSWORD_TOO_SHORT.to_string(),
                PASSWORD_TOO_WEAK.to_string(),
            ]
        );
    }

    #[rstest]
    fn test_photo_count_threshold_is_configurable() {
        let validator = UserValidator::new(2);
        assert_eq!(validator.check_photo_count(2), None);
        assert_eq!(
            validator.check_photo_count(1).as_deref(),
            Some("At least 2 photos should be uploaded.")
        );
    }
}
