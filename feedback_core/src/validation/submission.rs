//! Required-field check for feedback submissions

use super::{Validatable, ValidationResult};
use crate::models::{FormSubmission, SubmissionOutcome, REQUIRED_FIELDS};

impl FormSubmission {
    /// Checks that every required field is present and non-empty.
    pub fn check(&self) -> SubmissionOutcome {
        let result = self.validate_comprehensive();
        if result.is_valid {
            return SubmissionOutcome::Accepted;
        }

        SubmissionOutcome::Rejected {
            missing: missing_in_form_order(&result),
        }
    }
}

fn missing_in_form_order(result: &ValidationResult) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|field| result.errors.contains_key(**field))
        .map(|field| field.to_string())
        .collect()
}
