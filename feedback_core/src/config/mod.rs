pub mod settings;

pub use settings::{AppConfig, CorsConfig, LogFormat, LoggingConfig, ServerConfig};
