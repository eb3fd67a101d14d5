//! # Form Processing
//!
//! Turns a raw [`Submission`] into an [`Outcome`].
//!
//! ## Pipeline
//! 1. Escape every scalar field, missing ones become empty
//! 2. Honeypot filled, stop right there with [`Outcome::Bot`]
//! 3. Check names, email, country, gender and message, collecting every failure
//! 4. No topics ticked, record [`DEFAULT_TOPIC`]
//!
//! Bad input is expected here, so nothing in this module fails with an error.
//! The failures are data for the form page.
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::{DEFAULT_TOPIC, Escaped, Gender, Identity, Submission, ValidSubmission};

static NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{3,15}$").unwrap_or_else(|e| panic!("BUG: Invalid name regex: {e}"))
});

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w.%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .unwrap_or_else(|e| panic!("BUG: Invalid email regex: {e}"))
});

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Le prénom n'est pas valide.")]
    GivenName,

    #[error("Le nom n'est pas valide.")]
    FamilyName,

    #[error("Le mail n'est pas valide.")]
    Email,

    #[error("Veuillez sélectionner un pays!")]
    Country,

    #[error("Veuillez sélectionner un genre")]
    Gender,

    #[error("Veuillez entrer un message")]
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Bot,
    Invalid(Vec<FieldError>),
    Valid(ValidSubmission),
}

pub fn process(submission: Submission) -> Outcome {
    let given_name = escape(submission.given_name.as_deref());
    let family_name = escape(submission.family_name.as_deref());
    let email = escape(submission.email.as_deref());
    let message = escape(submission.message.as_deref());
    let country = escape(submission.country.as_deref());
    let gender = escape(submission.gender.as_deref());

    if submission.honeypot.as_deref().is_some_and(|s| !s.is_empty()) {
        return Outcome::Bot;
    }

    let mut errors = Vec::new();

    if !is_valid_name(given_name.as_str()) {
        errors.push(FieldError::GivenName);
    }

    if !is_valid_name(family_name.as_str()) {
        errors.push(FieldError::FamilyName);
    }

    if !is_valid_email(email.as_str()) {
        errors.push(FieldError::Email);
    }

    if country.is_empty() {
        errors.push(FieldError::Country);
    }

    // A form sent with no radio ticked has no `genre` at all, which lands here as "".
    let gender = Gender::from_code(gender.as_str());
    if gender.is_none() {
        errors.push(FieldError::Gender);
    }

    if message.is_empty() {
        errors.push(FieldError::Message);
    }

    let Some(gender) = gender.filter(|_| errors.is_empty()) else {
        return Outcome::Invalid(errors);
    };

    Outcome::Valid(ValidSubmission {
        identity: Identity {
            given_name,
            family_name,
            gender,
            country,
            email,
        },
        topics: normalize_topics(submission.topics),
        message,
    })
}

pub fn is_valid_name(name: &str) -> bool {
    NAME.is_match(name)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email) && !email.contains("..")
}

fn normalize_topics(topics: Vec<String>) -> Vec<String> {
    if topics.is_empty() {
        vec![DEFAULT_TOPIC.to_string()]
    } else {
        topics
    }
}

fn escape(raw: Option<&str>) -> Escaped {
    Escaped::new(raw.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_submission() -> Submission {
        Submission {
            given_name: Some("Marie".to_string()),
            family_name: Some("Curie".to_string()),
            email: Some("marie.curie@example.org".to_string()),
            message: Some("Bonjour".to_string()),
            country: Some("France".to_string()),
            gender: Some("F".to_string()),
            topics: vec!["Support".to_string()],
            honeypot: Some(String::new()),
        }
    }

    fn errors_of(submission: Submission) -> Vec<FieldError> {
        match process(submission) {
            Outcome::Invalid(errors) => errors,
            other => panic!("expected errors, got {other:?}"),
        }
    }

    #[test]
    fn test_name_lengths() {
        assert!(is_valid_name("Bob"));
        assert!(is_valid_name("abcdefghijklmno"));
        assert!(is_valid_name("MiXeD"));
        assert!(!is_valid_name("Al"));
        assert!(!is_valid_name("abcdefghijklmnop"));
        assert!(!is_valid_name(""));
    }

    #[test]
    fn test_name_letters_only() {
        assert!(!is_valid_name("Jean-Luc"));
        assert!(!is_valid_name("Anne Marie"));
        assert!(!is_valid_name("Zoé"));
        assert!(!is_valid_name("R2D2x"));
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co"));
        assert!(is_valid_email("a_b%c-d@sub-domain.org"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@example.c"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user.example.com"));
    }

    #[test]
    fn test_email_double_dot() {
        assert!(!is_valid_email("first..last@example.com"));
        assert!(!is_valid_email("user@example..com"));
    }

    #[test]
    fn test_valid_submission() {
        let Outcome::Valid(valid) = process(valid_submission()) else {
            panic!("expected a valid submission");
        };

        assert_eq!(valid.identity.given_name.as_str(), "Marie");
        assert_eq!(valid.identity.gender, Gender::Female);
        assert_eq!(valid.topics, vec!["Support".to_string()]);
        assert_eq!(valid.message.as_str(), "Bonjour");
    }

    #[test]
    fn test_message_is_escaped() {
        let submission = Submission {
            message: Some("<script>alert('x')</script>".to_string()),
            ..valid_submission()
        };

        let Outcome::Valid(valid) = process(submission) else {
            panic!("expected a valid submission");
        };

        assert!(!valid.message.as_str().contains('<'));
        assert!(valid.message.as_str().starts_with("&lt;script&gt;"));
    }

    #[test]
    fn test_markup_in_name_is_rejected() {
        let submission = Submission {
            given_name: Some("<b>Bob</b>".to_string()),
            ..valid_submission()
        };

        assert_eq!(errors_of(submission), vec![FieldError::GivenName]);
    }

    #[test]
    fn test_honeypot_wins() {
        let submission = Submission {
            given_name: None,
            email: Some("nope".to_string()),
            honeypot: Some("http://spam.example".to_string()),
            ..Submission::default()
        };

        assert_eq!(process(submission), Outcome::Bot);
    }

    #[test]
    fn test_missing_gender_matches_invalid_gender() {
        let missing = Submission {
            gender: None,
            ..valid_submission()
        };
        let invalid = Submission {
            gender: Some("X".to_string()),
            ..valid_submission()
        };

        assert_eq!(errors_of(missing), vec![FieldError::Gender]);
        assert_eq!(errors_of(invalid), vec![FieldError::Gender]);
    }

    #[test]
    fn test_missing_country() {
        let submission = Submission {
            country: Some(String::new()),
            ..valid_submission()
        };

        assert_eq!(errors_of(submission), vec![FieldError::Country]);
    }

    #[test]
    fn test_all_errors_accumulate() {
        let submission = Submission {
            given_name: Some("Al".to_string()),
            family_name: Some("O'Neil".to_string()),
            email: Some("a..b@example.com".to_string()),
            country: None,
            gender: None,
            message: None,
            ..valid_submission()
        };

        assert_eq!(
            errors_of(submission),
            vec![
                FieldError::GivenName,
                FieldError::FamilyName,
                FieldError::Email,
                FieldError::Country,
                FieldError::Gender,
                FieldError::Message,
            ]
        );
    }

    #[test]
    fn test_empty_topics_default() {
        let submission = Submission {
            topics: Vec::new(),
            ..valid_submission()
        };

        let Outcome::Valid(valid) = process(submission) else {
            panic!("expected a valid submission");
        };

        assert_eq!(valid.topics, vec![DEFAULT_TOPIC.to_string()]);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(FieldError::GivenName.to_string(), "Le prénom n'est pas valide.");
        assert_eq!(FieldError::Message.to_string(), "Veuillez entrer un message");
    }
}
