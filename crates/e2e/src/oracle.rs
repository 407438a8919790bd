//! Expected-outcome oracle for the add-entry form
//!
//! The Address Book application validates submissions server-side. This
//! module repeats those rules so a test can predict which message the page
//! must show. The two rule sets are independent copies: when the
//! application changes a rule or a message, [`RULES`] has to change with it.
//!
//! Rules are evaluated in order and the first satisfied one decides the
//! outcome, even if later rules would also match.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::entry::EntryRecord;

/// Pattern the application accepts for email addresses
pub const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("valid email pattern"));

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 50;
pub const PHONE_LEN: usize = 10;

/// Where on the result page a message is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLocation {
    /// Paragraph directly under `<body>`
    TopLevel,
    /// Heading inside the entry form
    FormHeading,
}

/// The message a submission is expected to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedOutcome {
    FirstNameRequired,
    FirstNameTooShort,
    FirstNameTooLong,
    LastNameEmpty,
    LastNameTooShort,
    LastNameTooLong,
    InvalidEmail,
    InvalidPhoneLength,
    Added,
}

impl ExpectedOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ExpectedOutcome::FirstNameRequired => "First name is required",
            ExpectedOutcome::FirstNameTooShort => "Firstname cannot be less than 2 characters",
            ExpectedOutcome::FirstNameTooLong => "First name must be less than 50 characters",
            ExpectedOutcome::LastNameEmpty => "Last name cannot be empty",
            ExpectedOutcome::LastNameTooShort => "Last name cannot be less than 2 characters",
            ExpectedOutcome::LastNameTooLong => "Last name cannot be more than 50 characters",
            ExpectedOutcome::InvalidEmail => "Invalid email format",
            ExpectedOutcome::InvalidPhoneLength => {
                "Number cannot be less than or more than 10 digits"
            }
            ExpectedOutcome::Added => "The new address book entry was added successfully",
        }
    }

    pub fn location(&self) -> MessageLocation {
        match self {
            ExpectedOutcome::FirstNameRequired => MessageLocation::TopLevel,
            _ => MessageLocation::FormHeading,
        }
    }
}

/// A validation predicate paired with the outcome it produces
pub struct Rule {
    pub outcome: ExpectedOutcome,
    pub violated: fn(&EntryRecord) -> bool,
}

/// Validation rules in evaluation order
pub static RULES: [Rule; 8] = [
    Rule {
        outcome: ExpectedOutcome::FirstNameRequired,
        violated: |r| r.first_name().is_empty(),
    },
    Rule {
        outcome: ExpectedOutcome::FirstNameTooShort,
        violated: |r| text_len(r.first_name()) < MIN_NAME_LEN,
    },
    Rule {
        outcome: ExpectedOutcome::FirstNameTooLong,
        violated: |r| text_len(r.first_name()) > MAX_NAME_LEN,
    },
    Rule {
        outcome: ExpectedOutcome::LastNameEmpty,
        violated: |r| r.last_name().is_empty(),
    },
    Rule {
        outcome: ExpectedOutcome::LastNameTooShort,
        violated: |r| text_len(r.last_name()) < MIN_NAME_LEN,
    },
    Rule {
        outcome: ExpectedOutcome::LastNameTooLong,
        violated: |r| text_len(r.last_name()) > MAX_NAME_LEN,
    },
    Rule {
        outcome: ExpectedOutcome::InvalidEmail,
        violated: |r| !is_valid_email(r.email()),
    },
    Rule {
        outcome: ExpectedOutcome::InvalidPhoneLength,
        violated: |r| text_len(r.phone()) != PHONE_LEN,
    },
];

/// Predict the outcome of submitting `record`
pub fn expected_outcome(record: &EntryRecord) -> ExpectedOutcome {
    RULES
        .iter()
        .find(|rule| (rule.violated)(record))
        .map(|rule| rule.outcome)
        .unwrap_or(ExpectedOutcome::Added)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Length as the application measures it: UTF-16 code units, so a
/// character outside the BMP counts twice
pub fn text_len(s: &str) -> usize {
    s.encode_utf16().count()
}
