//! Command-line counterpart of the feedback form

#[path = "../telemetry.rs"]
mod telemetry;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use feedback_core::{config::LogFormat, FeedbackClient, FormSubmission};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Encoding {
    Multipart,
    Json,
    Urlencoded,
}

/// Submit one feedback message and print the server's reply.
#[derive(Debug, Parser)]
#[command(name = "submit", version)]
struct Cli {
    /// Base URL of the feedback server
    #[arg(long, env = "FEEDBACK_URL", default_value = "http://127.0.0.1:3000")]
    url: String,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    message: Option<String>,

    #[arg(long, value_enum, default_value_t = Encoding::Multipart)]
    encoding: Encoding,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(LogFormat::Pretty);

    let submission = FormSubmission {
        name: cli.name,
        email: cli.email,
        message: cli.message,
    };

    let client = FeedbackClient::new(&cli.url)?;
    let reply = match cli.encoding {
        Encoding::Multipart => client.submit(&submission).await?,
        Encoding::Json => client.submit_json(&submission).await?,
        Encoding::Urlencoded => client.submit_urlencoded(&submission).await?,
    };

    println!("{}", reply.message);

    if !reply.is_accepted() {
        std::process::exit(1);
    }

    Ok(())
}
