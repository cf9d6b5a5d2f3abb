//! Application error types and handling

use crate::models::ResponseMessage;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid form payload: {0}")]
    InvalidPayload(String),

    #[error("Unsupported content type")]
    UnsupportedMediaType,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFields(_) | AppError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Config(_) | AppError::IoError(_) | AppError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::MissingFields(_) => ResponseMessage::missing_fields(),
            AppError::InvalidPayload(_) => ResponseMessage::new("Invalid form payload"),
            AppError::UnsupportedMediaType => ResponseMessage::new("Unsupported content type"),
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                ResponseMessage::new("Internal server error")
            }
            AppError::IoError(err) => {
                tracing::error!("IO error: {:?}", err);
                ResponseMessage::new("Internal server error")
            }
            AppError::Other(err) => {
                tracing::error!("Unexpected error: {:?}", err);
                ResponseMessage::new("Internal server error")
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
