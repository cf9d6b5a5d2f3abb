pub mod request;
pub mod submission;

pub use request::ApiResponse;
pub use submission::*;
