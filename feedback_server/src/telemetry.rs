use feedback_core::config::LogFormat;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `LOG_FORMAT=json` overrides the configured format.
pub fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            let default_level = if cfg!(debug_assertions) {
                "debug"
            } else {
                "info"
            };

            default_directives(env!("CARGO_CRATE_NAME"), default_level).into()
        });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(format == LogFormat::Json);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}

/// The binary's own target plus the library and HTTP layers, all at `level`.
fn default_directives(crate_name: &str, level: &str) -> String {
    format!(
        "{}={level},feedback_core={level},tower_http={level}",
        crate_name.replace('-', "_"),
        level = level
    )
}
