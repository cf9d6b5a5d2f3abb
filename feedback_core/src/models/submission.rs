//! Feedback form payload and reply models

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const FEEDBACK_PATH: &str = "/api/feedback";

pub const SUCCESS_MESSAGE: &str = "Success!";
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";

/// Field names a submission must carry, in form order.
pub const REQUIRED_FIELDS: [&str; 3] = ["name", "email", "message"];

/// Values read from the feedback form at submit time.
///
/// Every field is optional on the wire so that an absent field is reported as
/// a missing field instead of a decoding failure. An empty string counts as
/// missing; whitespace is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FormSubmission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        required(message = "Name is required"),
        length(min = 1, message = "Name is required")
    )]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        required(message = "Email is required"),
        length(min = 1, message = "Email is required")
    )]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        required(message = "Message is required"),
        length(min = 1, message = "Message is required")
    )]
    pub message: Option<String>,
}

impl FormSubmission {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            message: Some(message.into()),
        }
    }

    /// Assigns a named form field. Returns `false` for names the form does not have.
    pub fn set_field(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "message" => &mut self.message,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Keeps an already received value, like `FormData.get` returning the first entry.
    pub fn set_first(&mut self, field: &str, value: String) -> bool {
        if self.field(field).is_some() {
            return false;
        }
        self.set_field(field, value)
    }

    /// Builds a submission from decoded key/value pairs; repeated keys keep their first value.
    pub fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut submission = Self::default();
        for (field, value) in fields {
            submission.set_first(&field, value);
        }
        submission
    }

    pub fn field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => self.name.as_deref(),
            "email" => self.email.as_deref(),
            "message" => self.message.as_deref(),
            _ => None,
        }
    }

    /// Form-encoded key/value pairs for the fields that are set.
    pub fn to_pairs(&self) -> Vec<(&'static str, &str)> {
        REQUIRED_FIELDS
            .iter()
            .filter_map(|field| self.field(field).map(|value| (*field, value)))
            .collect()
    }
}

/// JSON body returned by the feedback endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub message: String,
}

impl ResponseMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn success() -> Self {
        Self::new(SUCCESS_MESSAGE)
    }

    pub fn missing_fields() -> Self {
        Self::new(MISSING_FIELDS_MESSAGE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted,
    Rejected { missing: Vec<String> },
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted)
    }
}
