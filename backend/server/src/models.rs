//! # Models
//!
//! Shapes flowing from the submitted form to the stored document.
//!
//! ## Lifecycle
//! - [`Submission`]: raw request fields, one per `POST /submit`, never stored
//! - [`ValidSubmission`]: escaped and validated payload handed to the store
//! - [`Record`]: the stored document, append-only
//!
//! ## Stored document
//! ```json
//! {
//!     "id": 1,
//!     "timestamp": "2024-03-02 14:05:09",
//!     "identity": {
//!         "given_name": "Marie",
//!         "family_name": "Curie",
//!         "gender": "F",
//!         "country": "France",
//!         "email": "marie@example.org"
//!     },
//!     "topics": ["Other"],
//!     "message": "Bonjour"
//! }
//! ```
use std::fmt;

use serde::{Deserialize, Serialize};

/// Topic recorded when the visitor ticks none.
pub const DEFAULT_TOPIC: &str = "Other";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raw fields of a submitted form. A field missing from the body is `None`.
#[derive(Debug, Default, Clone)]
pub struct Submission {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub topics: Vec<String>,
    pub honeypot: Option<String>,
}

/// Text that has been HTML escaped exactly once.
///
/// Displaying it writes the escaped form as is, so views can embed it
/// without escaping it a second time.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Escaped(String);

impl Escaped {
    pub fn new(raw: &str) -> Self {
        Self(html_escape::encode_quoted_attribute(raw).into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "H")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "H" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "H",
            Gender::Female => "F",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub given_name: Escaped,
    pub family_name: Escaped,
    pub gender: Gender,
    pub country: Escaped,
    pub email: Escaped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub identity: Identity,
    pub topics: Vec<String>,
    pub message: Escaped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub timestamp: String,
    pub identity: Identity,
    pub topics: Vec<String>,
    pub message: Escaped,
}

impl Record {
    pub fn new(id: u64, timestamp: String, submission: &ValidSubmission) -> Self {
        Self {
            id,
            timestamp,
            identity: submission.identity.clone(),
            topics: submission.topics.clone(),
            message: submission.message.clone(),
        }
    }
}
