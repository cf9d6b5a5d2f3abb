pub mod submission;

pub use submission::{PayloadEncoding, SubmissionPayload};
